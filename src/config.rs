// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::{
    common::i18n::I18nStore,
    db::{
        MemoryTributarioRepository, MemoryUserRepository, PgTributarioRepository,
        PgUserRepository, TributarioRepository, UserRepository,
    },
    services::{auth::AuthService, tributario_service::TributarioService},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Postgres,
    Memory,
}

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub storage: Storage,
    pub jwt_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let storage = match env::var("STORAGE").as_deref() {
            Ok("memory") => Storage::Memory,
            Ok("postgres") | Err(_) => Storage::Postgres,
            Ok(outro) => anyhow::bail!("STORAGE inválido: {outro} (use postgres ou memory)"),
        };

        let database_url = env::var("DATABASE_URL").ok();
        if storage == Storage::Postgres && database_url.is_none() {
            anyhow::bail!("DATABASE_URL deve ser definida");
        }

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let jwt_ttl_hours = match env::var("JWT_TTL_HOURS") {
            Ok(v) => v.parse().context("JWT_TTL_HOURS deve ser um número")?,
            Err(_) => 24,
        };
        let bcrypt_cost = match env::var("BCRYPT_COST") {
            Ok(v) => v.parse().context("BCRYPT_COST deve ser um número")?,
            Err(_) => bcrypt::DEFAULT_COST,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into()),
            storage,
            jwt_ttl_hours,
            bcrypt_cost,
            admin_email: env::var("ADMIN_EMAIL").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
        })
    }

    /// Configuração dos testes: armazenamento em memória e bcrypt barato.
    pub fn for_tests() -> Self {
        Self {
            database_url: None,
            jwt_secret: "segredo-de-teste".into(),
            bind_addr: "127.0.0.1:0".into(),
            storage: Storage::Memory,
            jwt_ttl_hours: 1,
            bcrypt_cost: 4,
            admin_email: None,
            admin_password: None,
        }
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth_service: AuthService,
    pub tributario_service: TributarioService,
    pub i18n_store: Arc<I18nStore>,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        match config.storage {
            Storage::Memory => {
                tracing::warn!("⚠️ STORAGE=memory: os dados não sobrevivem a um restart");
                Ok(Self::in_memory(config))
            }
            Storage::Postgres => {
                let database_url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL deve ser definida")?;

                let db_pool = PgPoolOptions::new()
                    .max_connections(5)
                    .acquire_timeout(Duration::from_secs(3))
                    .connect(database_url)
                    .await
                    .context("Falha ao conectar ao banco de dados")?;
                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

                sqlx::migrate!()
                    .run(&db_pool)
                    .await
                    .context("Falha ao rodar as migrações do banco de dados")?;
                tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

                Ok(Self::build(
                    config,
                    Arc::new(PgUserRepository::new(db_pool.clone())),
                    Arc::new(PgTributarioRepository::new(db_pool)),
                ))
            }
        }
    }

    pub fn in_memory(config: Config) -> Self {
        Self::build(
            config,
            Arc::new(MemoryUserRepository::new()),
            Arc::new(MemoryTributarioRepository::new()),
        )
    }

    // --- Monta o gráfico de dependências ---
    fn build(
        config: Config,
        user_repo: Arc<dyn UserRepository>,
        tributario_repo: Arc<dyn TributarioRepository>,
    ) -> Self {
        let auth_service = AuthService::new(
            user_repo,
            config.jwt_secret.clone(),
            chrono::Duration::hours(config.jwt_ttl_hours),
            config.bcrypt_cost,
        );
        let tributario_service = TributarioService::new(tributario_repo);

        Self {
            config: Arc::new(config),
            auth_service,
            tributario_service,
            i18n_store: Arc::new(I18nStore::new()),
        }
    }

    /// Cria o administrador inicial quando ADMIN_EMAIL/ADMIN_PASSWORD existem.
    pub async fn bootstrap(&self) -> anyhow::Result<()> {
        if let (Some(email), Some(senha)) = (&self.config.admin_email, &self.config.admin_password) {
            self.auth_service
                .bootstrap_admin(email, senha)
                .await
                .map_err(|e| anyhow::anyhow!("Falha ao criar o administrador inicial: {e}"))?;
        }
        Ok(())
    }
}
