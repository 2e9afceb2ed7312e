// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "role_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleType {
    Admin,
    Advogado,
    Cliente,
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    #[schema(example = "Maria Souza")]
    pub nome: String,
    #[schema(example = "maria@escritorio.com.br")]
    pub email: String,

    #[serde(skip_serializing, default)] // Nunca sai na resposta
    #[schema(ignore)]
    pub password_hash: String,

    pub role: RoleType,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados para login (o campo de senha se chama `senha` na API)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "Email inválido"))]
    #[schema(example = "maria@escritorio.com.br")]
    pub email: String,
    #[validate(length(min = 6, message = "Senha deve ter no mínimo 6 caracteres"))]
    pub senha: String,
}

// Dados para cadastro de um novo usuário (somente ADMIN).
// Sem `senha`, o usuário nasce inativo e recebe um token de ativação.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterUserPayload {
    #[validate(length(min = 3, message = "Nome deve ter no mínimo 3 caracteres"))]
    pub nome: String,
    #[validate(email(message = "Email inválido"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "Senha deve ter no mínimo 6 caracteres"))]
    pub senha: Option<String>,
    pub role: RoleType,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistroResponse {
    #[serde(flatten)]
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_ativacao: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_expira_em: Option<DateTime<Utc>>,
}

/// Token de uso único enviado ao usuário para criar a primeira senha.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TokenAtivacao {
    pub token: String,
    pub user_id: Uuid,
    pub expira_em: DateTime<Utc>,
    pub usado_em: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TokenAtivacao {
    pub fn expirado(&self, agora: DateTime<Utc>) -> bool {
        self.expira_em <= agora
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ValidarTokenPayload {
    #[validate(length(min = 1, message = "Token é obrigatório"))]
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidarTokenResponse {
    pub valido: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motivo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ValidarTokenResponse {
    pub fn invalido(motivo: impl Into<String>) -> Self {
        Self { valido: false, motivo: Some(motivo.into()), nome: None, email: None }
    }
}

fn senha_forte(senha: &str) -> Result<(), ValidationError> {
    let maiuscula = senha.chars().any(|c| c.is_uppercase());
    let minuscula = senha.chars().any(|c| c.is_lowercase());
    let numero = senha.chars().any(|c| c.is_ascii_digit());
    if !(maiuscula && minuscula && numero) {
        return Err(ValidationError::new("senha_fraca")
            .with_message("Senha deve conter letra maiúscula, minúscula e número".into()));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarSenhaPayload {
    #[validate(length(min = 1, message = "Token é obrigatório"))]
    pub token: String,
    #[validate(
        length(min = 8, message = "Senha deve ter no mínimo 8 caracteres"),
        custom(function = "senha_forte")
    )]
    pub senha: String,
    #[validate(must_match(other = "senha", message = "As senhas não coincidem"))]
    pub confirmar_senha: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CriarSenhaResponse {
    pub success: bool,
    pub message: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,      // Subject (ID do usuário)
    pub role: RoleType, // Perfil no momento da emissão
    pub exp: usize,     // Expiration time
    pub iat: usize,     // Issued At
}
