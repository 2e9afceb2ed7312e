pub mod auth;
pub mod tributario;
