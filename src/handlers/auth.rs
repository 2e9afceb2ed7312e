// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        json::ValidJson,
        rbac::{RequireRole, SomenteAdmin},
    },
    models::auth::{
        AuthResponse, CriarSenhaPayload, CriarSenhaResponse, LoginUserPayload, RegisterUserPayload,
        RegistroResponse, User, ValidarTokenPayload, ValidarTokenResponse,
    },
};

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login realizado", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    ValidJson(payload): ValidJson<LoginUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let resposta = app_state
        .auth_service
        .login_user(&payload.email, &payload.senha)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(resposta)))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "Usuário cadastrado; sem senha, traz o token de ativação", body = RegistroResponse),
        (status = 403, description = "Somente administradores"),
        (status = 409, description = "E-mail já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn register(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<SomenteAdmin>,
    ValidJson(payload): ValidJson<RegisterUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let registro = app_state
        .auth_service
        .register_user(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(registro)))
}

#[utoipa::path(
    post,
    path = "/api/auth/validar-token",
    tag = "Auth",
    request_body = ValidarTokenPayload,
    responses(
        (status = 200, description = "Situação do token de ativação", body = ValidarTokenResponse)
    )
)]
pub async fn validar_token(
    State(app_state): State<AppState>,
    locale: Locale,
    ValidJson(payload): ValidJson<ValidarTokenPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let resposta = app_state
        .auth_service
        .validar_token_ativacao(&payload.token)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(resposta))
}

#[utoipa::path(
    post,
    path = "/api/auth/criar-senha",
    tag = "Auth",
    request_body = CriarSenhaPayload,
    responses(
        (status = 200, description = "Senha criada e conta ativada", body = CriarSenhaResponse),
        (status = 400, description = "Senha fraca, confirmação diferente ou token inválido"),
        (status = 409, description = "Token já utilizado"),
        (status = 410, description = "Token expirado")
    )
)]
pub async fn criar_senha(
    State(app_state): State<AppState>,
    locale: Locale,
    ValidJson(payload): ValidJson<CriarSenhaPayload>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .auth_service
        .criar_senha(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(CriarSenhaResponse {
        success: true,
        message: "Senha criada com sucesso".into(),
    }))
}

// Handler da rota protegida /profile
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    tag = "Auth",
    responses(
        (status = 200, description = "Usuário autenticado", body = User),
        (status = 401, description = "Token ausente ou inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn profile(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}
