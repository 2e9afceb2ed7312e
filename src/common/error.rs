use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::{
    common::i18n::{I18nStore, IDIOMA_PADRAO},
    middleware::i18n::Locale,
    models::tributario::StatusImunidade,
};

// Erros de domínio e infraestrutura. Handlers convertem para `ApiError`
// com `to_api_error`, que escolhe o idioma da mensagem.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Requisição inválida: {0}")]
    BadRequest(String),

    #[error("Campo obrigatório: {0}")]
    CampoObrigatorio(&'static str),

    #[error("Análise tributária já existe para o projeto")]
    TributarioJaExiste,

    #[error("Análise tributária não encontrada")]
    TributarioNaoEncontrado,

    #[error("Guia não encontrada")]
    GuiaNaoEncontrada,

    #[error("Guia já paga")]
    GuiaJaPaga,

    #[error("Guia cancelada")]
    GuiaCancelada,

    #[error("Vencimento anterior à emissão")]
    VencimentoAnteriorEmissao,

    #[error("Imunidade não aplicável ao tipo de operação")]
    ImunidadeNaoAplicavel,

    #[error("Transição de imunidade inválida a partir de {0:?}")]
    TransicaoImunidadeInvalida(Option<StatusImunidade>),

    #[error("Decisão de imunidade inválida: {0}")]
    DecisaoImunidadeInvalida(String),

    #[error("Dossiê já protocolado")]
    DossieJaProtocolado,

    #[error("Dossiê não protocolado")]
    DossieNaoProtocolado,

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Token de ativação inválido")]
    TokenAtivacaoInvalido,

    #[error("Token de ativação expirado")]
    TokenAtivacaoExpirado,

    #[error("Token de ativação já utilizado")]
    TokenAtivacaoUtilizado,

    #[error("Rota não encontrada")]
    RotaNaoEncontrada,

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// Corpo de erro enviado ao cliente.
///
/// `message` é uma lista quando há mais de uma mensagem (erros de validação,
/// uma por campo) e um texto simples nos demais casos.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiMessage {
    Single(String),
    List(Vec<String>),
}

impl ApiMessage {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            ApiMessage::Single(msg) => vec![msg],
            ApiMessage::List(list) => list,
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::BadRequest(_)
            | AppError::CampoObrigatorio(_)
            | AppError::VencimentoAnteriorEmissao
            | AppError::DecisaoImunidadeInvalida(_)
            | AppError::TokenAtivacaoInvalido => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::TributarioNaoEncontrado
            | AppError::GuiaNaoEncontrada
            | AppError::RotaNaoEncontrada => StatusCode::NOT_FOUND,
            AppError::TributarioJaExiste
            | AppError::GuiaJaPaga
            | AppError::GuiaCancelada
            | AppError::TransicaoImunidadeInvalida(_)
            | AppError::DossieJaProtocolado
            | AppError::DossieNaoProtocolado
            | AppError::EmailAlreadyExists
            | AppError::TokenAtivacaoUtilizado => StatusCode::CONFLICT,
            AppError::TokenAtivacaoExpirado => StatusCode::GONE,
            AppError::ImunidadeNaoAplicavel => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message_key(&self) -> (&'static str, Vec<String>) {
        match self {
            AppError::ValidationError(_) => ("validation.invalid", vec![]),
            AppError::BadRequest(detail) => ("request.invalid", vec![detail.clone()]),
            AppError::CampoObrigatorio(campo) => ("field.required", vec![campo.to_string()]),
            AppError::TributarioJaExiste => ("tributario.already_exists", vec![]),
            AppError::TributarioNaoEncontrado => ("tributario.not_found", vec![]),
            AppError::GuiaNaoEncontrada => ("guia.not_found", vec![]),
            AppError::GuiaJaPaga => ("guia.already_paid", vec![]),
            AppError::GuiaCancelada => ("guia.cancelled", vec![]),
            AppError::VencimentoAnteriorEmissao => ("guia.due_before_issue", vec![]),
            AppError::ImunidadeNaoAplicavel => ("imunidade.not_applicable", vec![]),
            AppError::TransicaoImunidadeInvalida(atual) => {
                let atual = atual.map(|s| s.as_str()).unwrap_or("NAO_SOLICITADA");
                ("imunidade.invalid_transition", vec![atual.to_string()])
            }
            AppError::DecisaoImunidadeInvalida(valor) => {
                ("imunidade.invalid_decision", vec![valor.clone()])
            }
            AppError::DossieJaProtocolado => ("dossie.already_filed", vec![]),
            AppError::DossieNaoProtocolado => ("dossie.not_filed", vec![]),
            AppError::EmailAlreadyExists => ("auth.email_exists", vec![]),
            AppError::InvalidCredentials => ("auth.invalid_credentials", vec![]),
            AppError::InvalidToken => ("auth.invalid_token", vec![]),
            AppError::Forbidden => ("auth.forbidden", vec![]),
            AppError::TokenAtivacaoInvalido => ("activation.invalid", vec![]),
            AppError::TokenAtivacaoExpirado => ("activation.expired", vec![]),
            AppError::TokenAtivacaoUtilizado => ("activation.used", vec![]),
            AppError::RotaNaoEncontrada => ("route.not_found", vec![]),
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => ("internal", vec![]),
        }
    }

    pub fn to_api_error(self, locale: &Locale, store: &I18nStore) -> ApiError {
        self.localize(&locale.0, store)
    }

    fn localize(self, lang: &str, store: &I18nStore) -> ApiError {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O detalhe fica só no log; o cliente recebe a mensagem genérica.
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let (key, args) = self.message_key();
        let error = store.translate(lang, key, &args);

        let details = match self {
            AppError::ValidationError(errors) => {
                let mut campos: Vec<_> = errors.field_errors().into_iter().collect();
                campos.sort_by(|a, b| a.0.cmp(&b.0));
                let messages: Vec<String> = campos
                    .into_iter()
                    .flat_map(|(field, field_errors)| {
                        field_errors.iter().map(move |e| match &e.message {
                            Some(m) => m.to_string(),
                            None => format!("{field}: {}", e.code),
                        })
                    })
                    .collect();
                Some(messages)
            }
            _ => None,
        };

        ApiError { status, error, details }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match self.details {
            Some(details) if !details.is_empty() => ApiMessage::List(details),
            _ => ApiMessage::Single(self.error.clone()),
        };

        let body = Json(json!({
            "statusCode": self.status.as_u16(),
            "error": self.status.canonical_reason().unwrap_or("Error"),
            "message": message,
        }));
        (self.status, body).into_response()
    }
}

// Para quando não há `Locale` à mão (middlewares): usa o idioma padrão.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.localize(IDIOMA_PADRAO, &I18nStore::new()).into_response()
    }
}
