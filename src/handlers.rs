use axum::extract::State;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
};

pub mod auth;
pub mod tributario;

/// Resposta para qualquer rota não registrada.
pub async fn rota_nao_encontrada(State(app_state): State<AppState>, locale: Locale) -> ApiError {
    AppError::RotaNaoEncontrada.to_api_error(&locale, &app_state.i18n_store)
}
