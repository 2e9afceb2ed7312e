use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::{TokenAtivacao, User},
        tributario::{GuiaTributaria, Tributario},
    },
};

pub mod memory;
pub mod tributario_repo;
pub mod user_repo;

pub use memory::{MemoryTributarioRepository, MemoryUserRepository};
pub use tributario_repo::PgTributarioRepository;
pub use user_repo::PgUserRepository;

/// Registro alvo de uma alteração: pelo próprio id ou por uma de suas guias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alvo {
    Tributario(Uuid),
    Guia(Uuid),
}

impl Alvo {
    pub fn nao_encontrado(self) -> AppError {
        match self {
            Alvo::Tributario(_) => AppError::TributarioNaoEncontrado,
            Alvo::Guia(_) => AppError::GuiaNaoEncontrada,
        }
    }
}

/// O que a regra fez no livro de guias, além do cabeçalho.
#[derive(Debug, Clone, PartialEq)]
pub enum AlteracaoGuia {
    Nenhuma,
    Emitida(GuiaTributaria),
    Atualizada(GuiaTributaria),
}

pub type Regra<'a> =
    Box<dyn FnOnce(&mut Tributario) -> Result<AlteracaoGuia, AppError> + Send + 'a>;

/// Persistência do agregado Tributario e do seu livro de guias.
///
/// As leituras devolvem o registro já com `guias` em ordem de emissão.
#[async_trait]
pub trait TributarioRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tributario>, AppError>;

    async fn find_by_projeto_id(&self, projeto_id: Uuid) -> Result<Option<Tributario>, AppError>;

    /// Falha com `TributarioJaExiste` se o projeto já tiver um registro.
    async fn insert(&self, tributario: &Tributario) -> Result<(), AppError>;

    /// Carrega o registro bloqueado, aplica `regra` e grava cabeçalho e
    /// guia alterada antes de liberar o bloqueio. Duas alterações do mesmo
    /// registro nunca se intercalam. Se a regra falha nada é gravado.
    async fn alterar<'a>(&self, alvo: Alvo, regra: Regra<'a>) -> Result<Tributario, AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Falha com `EmailAlreadyExists` se o e-mail já estiver em uso.
    async fn create_user(&self, user: &User) -> Result<(), AppError>;

    /// Grava o usuário (inativo) e o seu token de ativação juntos.
    async fn create_pending_user(&self, user: &User, token: &TokenAtivacao)
        -> Result<(), AppError>;

    async fn find_activation_token(&self, token: &str) -> Result<Option<TokenAtivacao>, AppError>;

    /// Consome o token e ativa o usuário com a senha dada, tudo ou nada.
    /// Dois consumos simultâneos do mesmo token: só um vence, o outro
    /// recebe `TokenAtivacaoUtilizado`.
    async fn activate_user(
        &self,
        token: &str,
        password_hash: &str,
        agora: DateTime<Utc>,
    ) -> Result<User, AppError>;
}
