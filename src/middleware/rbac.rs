// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::auth::RoleType,
};

/// Conjunto de perfis que podem executar uma ação.
pub trait RoleDef: Send + Sync + 'static {
    fn roles() -> &'static [RoleType];
}

/// Guardião: rejeita com 403 quem não tem um dos perfis de `T`.
/// Precisa rodar depois do `auth_guard`.
pub struct RequireRole<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_headers(&parts.headers);

        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::InvalidToken.to_api_error(&locale, &app_state.i18n_store))?;

        if !T::roles().contains(&user.0.role) {
            tracing::warn!(user_id = %user.0.id, role = ?user.0.role, "Acesso negado por perfil");
            return Err(AppError::Forbidden.to_api_error(&locale, &app_state.i18n_store));
        }

        Ok(RequireRole(PhantomData))
    }
}

// ---
// PERFIS
// ---

pub struct PodeEditarTributario;
impl RoleDef for PodeEditarTributario {
    fn roles() -> &'static [RoleType] {
        &[RoleType::Admin, RoleType::Advogado]
    }
}

pub struct SomenteAdmin;
impl RoleDef for SomenteAdmin {
    fn roles() -> &'static [RoleType] {
        &[RoleType::Admin]
    }
}
