// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{
        AuthResponse, Claims, CriarSenhaPayload, RegisterUserPayload, RegistroResponse, RoleType,
        TokenAtivacao, User, ValidarTokenResponse,
    },
};

/// Validade do link de ativação enviado ao novo usuário.
const VALIDADE_ATIVACAO_HORAS: i64 = 72;

#[derive(Clone)]
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    jwt_secret: String,
    token_ttl: Duration,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        jwt_secret: String,
        token_ttl: Duration,
        bcrypt_cost: u32,
    ) -> Self {
        Self { user_repo, jwt_secret, token_ttl, bcrypt_cost }
    }

    async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let password_clone = password.to_owned();
        let cost = self.bcrypt_cost;
        let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hashed)
    }

    /// Com `senha`, o usuário já nasce ativo. Sem ela, nasce inativo e a
    /// resposta traz o token de ativação para o link de criação de senha.
    pub async fn register_user(
        &self,
        payload: &RegisterUserPayload,
    ) -> Result<RegistroResponse, AppError> {
        let now = Utc::now();
        let mut user = User {
            id: Uuid::new_v4(),
            nome: payload.nome.trim().to_string(),
            email: payload.email.trim().to_lowercase(),
            password_hash: String::new(),
            role: payload.role,
            ativo: false,
            created_at: now,
            updated_at: now,
        };

        let resposta = match &payload.senha {
            Some(senha) => {
                user.password_hash = self.hash_password(senha).await?;
                user.ativo = true;
                self.user_repo.create_user(&user).await?;
                RegistroResponse { user, token_ativacao: None, token_expira_em: None }
            }
            None => {
                let token = novo_token_ativacao(user.id, now);
                self.user_repo.create_pending_user(&user, &token).await?;
                RegistroResponse {
                    user,
                    token_ativacao: Some(token.token),
                    token_expira_em: Some(token.expira_em),
                }
            }
        };

        tracing::info!(
            user_id = %resposta.user.id,
            role = ?resposta.user.role,
            ativo = resposta.user.ativo,
            "Usuário cadastrado"
        );
        Ok(resposta)
    }

    /// Consulta usada pela tela de criação de senha antes do envio.
    /// Token inexistente, usado ou vencido não é erro: volta `valido: false`.
    pub async fn validar_token_ativacao(
        &self,
        token: &str,
    ) -> Result<ValidarTokenResponse, AppError> {
        let Some(registro) = self.user_repo.find_activation_token(token.trim()).await? else {
            return Ok(ValidarTokenResponse::invalido("Token inválido"));
        };
        if registro.usado_em.is_some() {
            return Ok(ValidarTokenResponse::invalido("Token já utilizado"));
        }
        if registro.expirado(Utc::now()) {
            return Ok(ValidarTokenResponse::invalido("Token expirado"));
        }

        let Some(user) = self.user_repo.find_by_id(registro.user_id).await? else {
            return Ok(ValidarTokenResponse::invalido("Token inválido"));
        };
        Ok(ValidarTokenResponse {
            valido: true,
            motivo: None,
            nome: Some(user.nome),
            email: Some(user.email),
        })
    }

    /// Define a primeira senha e ativa a conta. O token vale uma única vez.
    pub async fn criar_senha(&self, payload: &CriarSenhaPayload) -> Result<User, AppError> {
        let token = payload.token.trim();

        // Checagem prévia para não pagar o bcrypt com token ruim; o consumo
        // no repositório decide de vez.
        let registro = self
            .user_repo
            .find_activation_token(token)
            .await?
            .ok_or(AppError::TokenAtivacaoInvalido)?;
        if registro.usado_em.is_some() {
            return Err(AppError::TokenAtivacaoUtilizado);
        }
        if registro.expirado(Utc::now()) {
            return Err(AppError::TokenAtivacaoExpirado);
        }

        let password_hash = self.hash_password(&payload.senha).await?;
        let user = self
            .user_repo
            .activate_user(token, &password_hash, Utc::now())
            .await
            .inspect_err(|e| tracing::warn!("Ativação de conta rejeitada: {}", e))?;

        tracing::info!(user_id = %user.id, "Conta ativada");
        Ok(user)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let user = self
            .user_repo
            .find_by_email(email.trim())
            .await?
            .filter(|u| u.ativo)
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            tracing::warn!(user_id = %user.id, "Tentativa de login com senha incorreta");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.create_token(&user)?;
        Ok(AuthResponse { token, user })
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        // Usuário removido ou desativado depois da emissão do token
        self.user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .filter(|u| u.ativo)
            .ok_or(AppError::InvalidToken)
    }

    pub fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + self.token_ttl;

        let claims = Claims {
            sub: user.id,
            role: user.role,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    /// Cria o ADMIN inicial na primeira subida, se ainda não existir.
    pub async fn bootstrap_admin(&self, email: &str, senha: &str) -> Result<(), AppError> {
        if self.user_repo.find_by_email(email).await?.is_some() {
            return Ok(());
        }

        let payload = RegisterUserPayload {
            nome: "Administrador".into(),
            email: email.into(),
            senha: Some(senha.into()),
            role: RoleType::Admin,
        };
        self.register_user(&payload).await?;
        tracing::info!("👤 Usuário administrador inicial criado: {}", email);
        Ok(())
    }
}

fn novo_token_ativacao(user_id: Uuid, agora: DateTime<Utc>) -> TokenAtivacao {
    // Dois UUID v4 em hexadecimal: 244 bits aleatórios
    let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
    TokenAtivacao {
        token,
        user_id,
        expira_em: agora + Duration::hours(VALIDADE_ATIVACAO_HORAS),
        usado_em: None,
        created_at: agora,
    }
}
