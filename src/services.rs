pub mod auth;
pub mod tributario_rules;
pub mod tributario_service;
