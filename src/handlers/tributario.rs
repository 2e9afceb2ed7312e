// src/handlers/tributario.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        json::ValidJson,
        rbac::{PodeEditarTributario, RequireRole},
    },
    models::tributario::{
        AtualizarDossieRequest, AtualizarImunidadeRequest, CreateTributarioRequest,
        DecisaoImunidade, EmitirGuiaRequest, PodeAvancarResponse, ProtocolarDossieRequest,
        RegistrarPagamentoRequest, SolicitarImunidadeRequest, Tributario, UpdateTributarioRequest,
    },
};

// ---
// Registro
// ---

#[utoipa::path(
    get,
    path = "/tributario/projeto/{projeto_id}",
    tag = "Tributario",
    responses(
        (status = 200, description = "Análise tributária do projeto", body = Tributario),
        (status = 404, description = "Projeto sem análise tributária")
    ),
    params(("projeto_id" = Uuid, Path, description = "ID do Projeto")),
    security(("api_jwt" = []))
)]
pub async fn get_by_projeto(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    Path(projeto_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let tributario = app_state
        .tributario_service
        .buscar_por_projeto(projeto_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(tributario)))
}

#[utoipa::path(
    post,
    path = "/tributario",
    tag = "Tributario",
    request_body = CreateTributarioRequest,
    responses(
        (status = 201, description = "Análise tributária criada", body = Tributario),
        (status = 409, description = "O projeto já possui análise tributária")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_tributario(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<PodeEditarTributario>,
    ValidJson(payload): ValidJson<CreateTributarioRequest>,
) -> Result<impl IntoResponse, ApiError> {

    let tributario = app_state
        .tributario_service
        .criar(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(tributario)))
}

#[utoipa::path(
    patch,
    path = "/tributario/{id}",
    tag = "Tributario",
    request_body = UpdateTributarioRequest,
    responses(
        (status = 200, description = "Análise tributária atualizada", body = Tributario),
        (status = 404, description = "Análise tributária não encontrada")
    ),
    params(("id" = Uuid, Path, description = "ID da Análise Tributária")),
    security(("api_jwt" = []))
)]
pub async fn update_tributario(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<PodeEditarTributario>,
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<UpdateTributarioRequest>,
) -> Result<impl IntoResponse, ApiError> {

    let tributario = app_state
        .tributario_service
        .atualizar(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(tributario)))
}

// ---
// Imunidade de ITBI
// ---

#[utoipa::path(
    post,
    path = "/tributario/{id}/imunidade",
    tag = "Tributario",
    request_body = SolicitarImunidadeRequest,
    responses(
        (status = 200, description = "Pedido de imunidade protocolado", body = Tributario),
        (status = 409, description = "Imunidade já solicitada"),
        (status = 422, description = "Operação não é integralização")
    ),
    params(("id" = Uuid, Path, description = "ID da Análise Tributária")),
    security(("api_jwt" = []))
)]
pub async fn solicitar_imunidade(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<PodeEditarTributario>,
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<SolicitarImunidadeRequest>,
) -> Result<impl IntoResponse, ApiError> {

    let tributario = app_state
        .tributario_service
        .solicitar_imunidade(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(tributario)))
}

#[utoipa::path(
    patch,
    path = "/tributario/{id}/imunidade/{status}",
    tag = "Tributario",
    request_body = AtualizarImunidadeRequest,
    responses(
        (status = 200, description = "Decisão registrada", body = Tributario),
        (status = 400, description = "Decisão diferente de DEFERIDA/INDEFERIDA"),
        (status = 409, description = "Imunidade não está em análise")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da Análise Tributária"),
        ("status" = DecisaoImunidade, Path, description = "DEFERIDA ou INDEFERIDA")
    ),
    security(("api_jwt" = []))
)]
pub async fn atualizar_imunidade(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<PodeEditarTributario>,
    Path((id, status)): Path<(Uuid, String)>,
    ValidJson(payload): ValidJson<AtualizarImunidadeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let decisao: DecisaoImunidade = status
        .parse()
        .map_err(|e: AppError| e.to_api_error(&locale, &app_state.i18n_store))?;

    let tributario = app_state
        .tributario_service
        .atualizar_imunidade(id, decisao, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(tributario)))
}

// ---
// Guias
// ---

#[utoipa::path(
    post,
    path = "/tributario/{tributario_id}/guias",
    tag = "Tributario",
    request_body = EmitirGuiaRequest,
    responses(
        (status = 201, description = "Guia emitida; devolve a análise com o livro de guias", body = Tributario),
        (status = 400, description = "Valor ou datas inválidos")
    ),
    params(("tributario_id" = Uuid, Path, description = "ID da Análise Tributária")),
    security(("api_jwt" = []))
)]
pub async fn emitir_guia(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<PodeEditarTributario>,
    Path(tributario_id): Path<Uuid>,
    ValidJson(payload): ValidJson<EmitirGuiaRequest>,
) -> Result<impl IntoResponse, ApiError> {

    let tributario = app_state
        .tributario_service
        .emitir_guia(tributario_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(tributario)))
}

#[utoipa::path(
    post,
    path = "/tributario/guias/{guia_id}/pagamento",
    tag = "Tributario",
    request_body = RegistrarPagamentoRequest,
    responses(
        (status = 200, description = "Pagamento registrado", body = Tributario),
        (status = 404, description = "Guia não encontrada"),
        (status = 409, description = "Guia já paga ou cancelada")
    ),
    params(("guia_id" = Uuid, Path, description = "ID da Guia")),
    security(("api_jwt" = []))
)]
pub async fn registrar_pagamento(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<PodeEditarTributario>,
    Path(guia_id): Path<Uuid>,
    ValidJson(payload): ValidJson<RegistrarPagamentoRequest>,
) -> Result<impl IntoResponse, ApiError> {

    let tributario = app_state
        .tributario_service
        .registrar_pagamento(guia_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(tributario)))
}

// ---
// Dossiê administrativo
// ---

#[utoipa::path(
    post,
    path = "/tributario/{id}/dossie",
    tag = "Tributario",
    request_body = ProtocolarDossieRequest,
    responses(
        (status = 200, description = "Dossiê protocolado", body = Tributario),
        (status = 409, description = "Dossiê já protocolado")
    ),
    params(("id" = Uuid, Path, description = "ID da Análise Tributária")),
    security(("api_jwt" = []))
)]
pub async fn protocolar_dossie(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<PodeEditarTributario>,
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<ProtocolarDossieRequest>,
) -> Result<impl IntoResponse, ApiError> {

    let tributario = app_state
        .tributario_service
        .protocolar_dossie(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(tributario)))
}

#[utoipa::path(
    patch,
    path = "/tributario/{id}/dossie",
    tag = "Tributario",
    request_body = AtualizarDossieRequest,
    responses(
        (status = 200, description = "Status do dossiê atualizado", body = Tributario),
        (status = 409, description = "Dossiê ainda não protocolado")
    ),
    params(("id" = Uuid, Path, description = "ID da Análise Tributária")),
    security(("api_jwt" = []))
)]
pub async fn atualizar_dossie(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<PodeEditarTributario>,
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<AtualizarDossieRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let tributario = app_state
        .tributario_service
        .atualizar_dossie(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(tributario)))
}

// ---
// Gate da etapa
// ---

#[utoipa::path(
    get,
    path = "/tributario/projeto/{projeto_id}/pode-avancar",
    tag = "Tributario",
    responses(
        (status = 200, description = "Resultado do gate da etapa tributária", body = PodeAvancarResponse)
    ),
    params(("projeto_id" = Uuid, Path, description = "ID do Projeto")),
    security(("api_jwt" = []))
)]
pub async fn pode_avancar(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    Path(projeto_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let resposta = app_state
        .tributario_service
        .pode_avancar(projeto_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(resposta)))
}
