use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{TokenAtivacao, User},
};

const USER_COLUMNS: &str =
    "id, nome, email, password_hash, role, ativo, created_at, updated_at";

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

const TOKEN_COLUMNS: &str = "token, user_id, expira_em, usado_em, created_at";

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_user<'e, E>(executor: E, user: &User) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO users (id, nome, email, password_hash, role, ativo, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id)
        .bind(&user.nome)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.ativo)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(executor)
        .await
        .map_err(|e| {
            // Converte erro de violação de chave única em um erro mais amigável
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            AppError::DatabaseError(e)
        })?;

        Ok(())
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    // Busca um usuário pelo seu e-mail
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    // Busca um usuário pelo seu ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    // Cria um novo usuário no banco de dados
    async fn create_user(&self, user: &User) -> Result<(), AppError> {
        Self::insert_user(&self.pool, user).await
    }

    async fn create_pending_user(
        &self,
        user: &User,
        token: &TokenAtivacao,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        Self::insert_user(&mut *tx, user).await?;

        sqlx::query(
            r#"
            INSERT INTO tokens_ativacao (token, user_id, expira_em, usado_em, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&token.token)
        .bind(token.user_id)
        .bind(token.expira_em)
        .bind(token.usado_em)
        .bind(token.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn find_activation_token(&self, token: &str) -> Result<Option<TokenAtivacao>, AppError> {
        let registro = sqlx::query_as::<_, TokenAtivacao>(&format!(
            "SELECT {TOKEN_COLUMNS} FROM tokens_ativacao WHERE token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registro)
    }

    async fn activate_user(
        &self,
        token: &str,
        password_hash: &str,
        agora: DateTime<Utc>,
    ) -> Result<User, AppError> {
        let mut tx = self.pool.begin().await?;

        // Bloqueia o token: um segundo consumo espera e então vê `usado_em`.
        let registro = sqlx::query_as::<_, TokenAtivacao>(&format!(
            "SELECT {TOKEN_COLUMNS} FROM tokens_ativacao WHERE token = $1 FOR UPDATE"
        ))
        .bind(token)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::TokenAtivacaoInvalido)?;

        if registro.usado_em.is_some() {
            return Err(AppError::TokenAtivacaoUtilizado);
        }
        if registro.expirado(agora) {
            return Err(AppError::TokenAtivacaoExpirado);
        }

        sqlx::query("UPDATE tokens_ativacao SET usado_em = $2 WHERE token = $1")
            .bind(token)
            .bind(agora)
            .execute(&mut *tx)
            .await?;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET password_hash = $2, ativo = TRUE, updated_at = $3
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(registro.user_id)
        .bind(password_hash)
        .bind(agora)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::TokenAtivacaoInvalido)?;

        tx.commit().await?;
        Ok(user)
    }
}
