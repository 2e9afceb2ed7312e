// src/middleware/json.rs

use axum::{
    extract::{FromRef, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
};

/// Corpo JSON desserializado e validado.
///
/// Corpo malformado, campo ausente ou de tipo errado vira 400 com o corpo
/// de erro padrão; falhas do `validator` listam uma mensagem por campo.
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_headers(req.headers());

        let Json(payload) = Json::<T>::from_request(req, state).await.map_err(|rejeicao| {
            tracing::debug!("Corpo rejeitado: {}", rejeicao.body_text());
            AppError::BadRequest(rejeicao.body_text()).to_api_error(&locale, &app_state.i18n_store)
        })?;

        payload
            .validate()
            .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

        Ok(ValidJson(payload))
    }
}
