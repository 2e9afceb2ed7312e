// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::register,
        handlers::auth::profile,
        handlers::auth::validar_token,
        handlers::auth::criar_senha,

        // --- Tributário ---
        handlers::tributario::get_by_projeto,
        handlers::tributario::create_tributario,
        handlers::tributario::update_tributario,
        handlers::tributario::solicitar_imunidade,
        handlers::tributario::atualizar_imunidade,
        handlers::tributario::emitir_guia,
        handlers::tributario::registrar_pagamento,
        handlers::tributario::protocolar_dossie,
        handlers::tributario::atualizar_dossie,
        handlers::tributario::pode_avancar,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::RoleType,
            models::auth::User,
            models::auth::LoginUserPayload,
            models::auth::RegisterUserPayload,
            models::auth::AuthResponse,
            models::auth::RegistroResponse,
            models::auth::ValidarTokenPayload,
            models::auth::ValidarTokenResponse,
            models::auth::CriarSenhaPayload,
            models::auth::CriarSenhaResponse,

            // --- Tributário ---
            models::tributario::TipoOperacaoTributaria,
            models::tributario::StatusTributario,
            models::tributario::StatusImunidade,
            models::tributario::DecisaoImunidade,
            models::tributario::StatusDossie,
            models::tributario::TipoGuia,
            models::tributario::StatusGuia,
            models::tributario::GuiaTributaria,
            models::tributario::Tributario,
            models::tributario::PodeAvancarResponse,

            // --- Payloads ---
            models::tributario::CreateTributarioRequest,
            models::tributario::UpdateTributarioRequest,
            models::tributario::SolicitarImunidadeRequest,
            models::tributario::AtualizarImunidadeRequest,
            models::tributario::EmitirGuiaRequest,
            models::tributario::RegistrarPagamentoRequest,
            models::tributario::ProtocolarDossieRequest,
            models::tributario::AtualizarDossieRequest,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Cadastro de Usuários"),
        (name = "Tributario", description = "Análise Tributária: guias, imunidade de ITBI, dossiê e gate da etapa")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
