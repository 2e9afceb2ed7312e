//! Backend do fluxo tributário do escritório: análise tributária por
//! projeto, livro de guias, imunidade de ITBI, dossiê e o gate que libera
//! a próxima etapa. Também traz o cliente HTTP tipado e as decisões de
//! apresentação usadas pelas telas.

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod client;
pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod view;

use crate::{config::AppState, docs::ApiDoc, middleware::auth::auth_guard};

pub fn create_router(app_state: AppState) -> Router {
    // Define as rotas de autenticação (login e ativação de conta são públicos)
    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/validar-token", post(handlers::auth::validar_token))
        .route("/criar-senha", post(handlers::auth::criar_senha))
        .merge(
            Router::new()
                .route("/profile", get(handlers::auth::profile))
                .route("/register", post(handlers::auth::register))
                .layer(axum_middleware::from_fn_with_state(
                    app_state.clone(),
                    auth_guard,
                )),
        );

    let tributario_routes = Router::new()
        .route("/", post(handlers::tributario::create_tributario))
        .route("/projeto/{projeto_id}", get(handlers::tributario::get_by_projeto))
        .route(
            "/projeto/{projeto_id}/pode-avancar",
            get(handlers::tributario::pode_avancar),
        )
        .route("/{id}", patch(handlers::tributario::update_tributario))
        .route("/{id}/imunidade", post(handlers::tributario::solicitar_imunidade))
        .route(
            "/{id}/imunidade/{status}",
            patch(handlers::tributario::atualizar_imunidade),
        )
        .route("/{id}/guias", post(handlers::tributario::emitir_guia))
        .route(
            "/guias/{guia_id}/pagamento",
            post(handlers::tributario::registrar_pagamento),
        )
        .route(
            "/{id}/dossie",
            post(handlers::tributario::protocolar_dossie)
                .patch(handlers::tributario::atualizar_dossie),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/tributario", tributario_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(handlers::rota_nao_encontrada)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
