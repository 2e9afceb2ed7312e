// src/models/tributario.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::{error::AppError, money::Centavos};

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tipo_operacao_tributaria", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoOperacaoTributaria {
    Integralizacao, // Integralização de bens ao capital
    Doacao,
    Outros,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_tributario", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusTributario {
    Pendente,
    EmCalculo,
    EmDossie,
    GuiasEmitidas,
    AguardandoPagamento,
    Pago,
    ImunidadeDeferida,
    Exigencia,
    Concluida,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_imunidade", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusImunidade {
    NaoAplicavel,
    EmAnalise,
    Deferida,
    Indeferida,
    Recurso, // Declarado, sem transição de entrada
}

impl StatusImunidade {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusImunidade::NaoAplicavel => "NAO_APLICAVEL",
            StatusImunidade::EmAnalise => "EM_ANALISE",
            StatusImunidade::Deferida => "DEFERIDA",
            StatusImunidade::Indeferida => "INDEFERIDA",
            StatusImunidade::Recurso => "RECURSO",
        }
    }
}

/// As duas decisões possíveis sobre um pedido de imunidade em análise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisaoImunidade {
    Deferida,
    Indeferida,
}

impl DecisaoImunidade {
    pub fn as_str(self) -> &'static str {
        match self {
            DecisaoImunidade::Deferida => "DEFERIDA",
            DecisaoImunidade::Indeferida => "INDEFERIDA",
        }
    }

    pub fn status_resultante(self) -> StatusImunidade {
        match self {
            DecisaoImunidade::Deferida => StatusImunidade::Deferida,
            DecisaoImunidade::Indeferida => StatusImunidade::Indeferida,
        }
    }
}

impl FromStr for DecisaoImunidade {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEFERIDA" => Ok(DecisaoImunidade::Deferida),
            "INDEFERIDA" => Ok(DecisaoImunidade::Indeferida),
            other => Err(AppError::DecisaoImunidadeInvalida(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_dossie", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusDossie {
    EmAnalise,
    Deferido,
    Indeferido,
    Exigencia,
    Recurso,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tipo_guia", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoGuia {
    Itbi,
    Itcmd,
    Iptu,
    TaxaJunta,
    TaxaCartorio,
    Outros,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_guia", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusGuia {
    Pendente,
    Enviada,
    Paga,
    Vencida,
    Cancelada,
}

// --- Structs ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuiaTributaria {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440010")]
    pub id: Uuid,
    pub tributario_id: Uuid,
    pub tipo: TipoGuia,
    #[schema(example = "2024000123")]
    pub numero: Option<String>,
    pub valor: Centavos,
    #[schema(value_type = String, format = Date, example = "2024-01-01")]
    pub data_emissao: NaiveDate,
    #[schema(value_type = String, format = Date, example = "2024-01-31")]
    pub data_vencimento: NaiveDate,
    pub status: StatusGuia,
    #[schema(value_type = Option<String>, format = Date, example = "2024-01-15")]
    pub data_pagamento: Option<NaiveDate>,
    #[schema(example = "1AbCdEfGh")]
    pub comprovante_drive_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tributario {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    pub projeto_id: Uuid,
    pub tipo: TipoOperacaoTributaria,
    pub status: StatusTributario,

    // Imunidade (só para INTEGRALIZACAO)
    pub imunidade_status: Option<StatusImunidade>,
    #[schema(example = "2024/001")]
    pub imunidade_protocolo: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub imunidade_deferimento: Option<NaiveDate>,
    pub imunidade_observacoes: Option<String>,

    // Agregados do livro de guias
    pub guias_emitidas: bool,
    pub guias_valor_total: Centavos,
    pub comprovantes_recebidos: bool,

    // Dossiê administrativo
    pub dossie_protocolo: Option<String>,
    pub dossie_status: Option<StatusDossie>,
    #[schema(value_type = Option<String>, format = Date)]
    pub dossie_data: Option<NaiveDate>,
    pub dossie_observacoes: Option<String>,

    #[sqlx(skip)]
    #[serde(default)]
    pub guias: Vec<GuiaTributaria>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tributario {
    pub fn guia(&self, guia_id: Uuid) -> Option<&GuiaTributaria> {
        self.guias.iter().find(|g| g.id == guia_id)
    }

    pub fn dossie_protocolado(&self) -> bool {
        self.dossie_protocolo.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PodeAvancarResponse {
    pub pode_avancar: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Existem 2 guia(s) pendente(s) de pagamento.")]
    pub motivo: Option<String>,
}

impl PodeAvancarResponse {
    pub fn liberado() -> Self {
        Self { pode_avancar: true, motivo: None }
    }

    pub fn bloqueado(motivo: impl Into<String>) -> Self {
        Self { pode_avancar: false, motivo: Some(motivo.into()) }
    }
}

// --- Payloads ---

fn obrigatorio(valor: &str, mensagem: &'static str) -> Result<(), ValidationError> {
    if valor.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(mensagem.into()));
    }
    Ok(())
}

fn protocolo_obrigatorio(protocolo: &str) -> Result<(), ValidationError> {
    obrigatorio(protocolo, "Informe o número do protocolo")
}

fn comprovante_obrigatorio(comprovante: &str) -> Result<(), ValidationError> {
    obrigatorio(comprovante, "Informe o comprovante de pagamento")
}

fn valor_positivo(valor: &Centavos) -> Result<(), ValidationError> {
    if !valor.is_positive() {
        return Err(ValidationError::new("range")
            .with_message("O valor da guia deve ser maior que zero".into()));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTributarioRequest {
    pub projeto_id: Uuid,
    #[schema(example = "INTEGRALIZACAO")]
    pub tipo: TipoOperacaoTributaria,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTributarioRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo: Option<TipoOperacaoTributaria>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusTributario>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dossie_status: Option<StatusDossie>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SolicitarImunidadeRequest {
    #[validate(custom(function = "protocolo_obrigatorio"))]
    #[schema(example = "2024/001")]
    pub protocolo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observacoes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarImunidadeRequest {
    #[schema(value_type = String, format = Date, example = "2024-02-10")]
    pub data_decisao: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observacoes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmitirGuiaRequest {
    pub tipo: TipoGuia,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numero: Option<String>,
    /// Valor em centavos.
    #[validate(custom(function = "valor_positivo"))]
    pub valor: Centavos,
    #[schema(value_type = String, format = Date, example = "2024-01-01")]
    pub data_emissao: NaiveDate,
    #[schema(value_type = String, format = Date, example = "2024-01-31")]
    pub data_vencimento: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrarPagamentoRequest {
    #[schema(value_type = String, format = Date, example = "2024-01-15")]
    pub data_pagamento: NaiveDate,
    #[validate(custom(function = "comprovante_obrigatorio"))]
    #[schema(example = "abc123")]
    pub comprovante_drive_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolarDossieRequest {
    #[validate(custom(function = "protocolo_obrigatorio"))]
    #[schema(example = "DOS-2024-77")]
    pub protocolo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observacoes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarDossieRequest {
    pub status: StatusDossie,
}
