// src/db/memory.rs
//
// Armazenamento em memória (STORAGE=memory e testes). Mesma semântica
// dos repositórios Postgres: unicidade por projeto e por e-mail,
// guias em ordem de emissão.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{Alvo, Regra, TributarioRepository, UserRepository},
    models::{
        auth::{TokenAtivacao, User},
        tributario::Tributario,
    },
};

#[derive(Default)]
pub struct MemoryTributarioRepository {
    registros: RwLock<HashMap<Uuid, Tributario>>,
}

impl MemoryTributarioRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TributarioRepository for MemoryTributarioRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tributario>, AppError> {
        Ok(self.registros.read().await.get(&id).cloned())
    }

    async fn find_by_projeto_id(&self, projeto_id: Uuid) -> Result<Option<Tributario>, AppError> {
        let registros = self.registros.read().await;
        Ok(registros.values().find(|t| t.projeto_id == projeto_id).cloned())
    }

    async fn insert(&self, tributario: &Tributario) -> Result<(), AppError> {
        let mut registros = self.registros.write().await;
        if registros.values().any(|t| t.projeto_id == tributario.projeto_id) {
            return Err(AppError::TributarioJaExiste);
        }
        let mut novo = tributario.clone();
        novo.guias.clear();
        registros.insert(novo.id, novo);
        Ok(())
    }

    async fn alterar<'a>(&self, alvo: Alvo, regra: Regra<'a>) -> Result<Tributario, AppError> {
        // O lock de escrita vale da leitura até a gravação.
        let mut registros = self.registros.write().await;

        let existente = match alvo {
            Alvo::Tributario(id) => registros.get_mut(&id),
            Alvo::Guia(guia_id) => registros
                .values_mut()
                .find(|t| t.guias.iter().any(|g| g.id == guia_id)),
        }
        .ok_or(alvo.nao_encontrado())?;

        // A regra trabalha numa cópia: se falhar, o registro fica intacto.
        let mut alterado = existente.clone();
        regra(&mut alterado)?;
        *existente = alterado.clone();
        Ok(alterado)
    }
}

#[derive(Default)]
struct Usuarios {
    users: HashMap<Uuid, User>,
    tokens: HashMap<String, TokenAtivacao>,
}

impl Usuarios {
    fn email_em_uso(&self, email: &str) -> bool {
        self.users.values().any(|u| u.email.eq_ignore_ascii_case(email))
    }
}

#[derive(Default)]
pub struct MemoryUserRepository {
    dados: RwLock<Usuarios>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let dados = self.dados.read().await;
        Ok(dados
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.dados.read().await.users.get(&id).cloned())
    }

    async fn create_user(&self, user: &User) -> Result<(), AppError> {
        let mut dados = self.dados.write().await;
        if dados.email_em_uso(&user.email) {
            return Err(AppError::EmailAlreadyExists);
        }
        dados.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn create_pending_user(
        &self,
        user: &User,
        token: &TokenAtivacao,
    ) -> Result<(), AppError> {
        let mut dados = self.dados.write().await;
        if dados.email_em_uso(&user.email) {
            return Err(AppError::EmailAlreadyExists);
        }
        dados.users.insert(user.id, user.clone());
        dados.tokens.insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn find_activation_token(&self, token: &str) -> Result<Option<TokenAtivacao>, AppError> {
        Ok(self.dados.read().await.tokens.get(token).cloned())
    }

    async fn activate_user(
        &self,
        token: &str,
        password_hash: &str,
        agora: DateTime<Utc>,
    ) -> Result<User, AppError> {
        let mut dados = self.dados.write().await;
        let Usuarios { users, tokens } = &mut *dados;

        let registro = tokens.get_mut(token).ok_or(AppError::TokenAtivacaoInvalido)?;
        if registro.usado_em.is_some() {
            return Err(AppError::TokenAtivacaoUtilizado);
        }
        if registro.expirado(agora) {
            return Err(AppError::TokenAtivacaoExpirado);
        }
        let user = users.get_mut(&registro.user_id).ok_or(AppError::TokenAtivacaoInvalido)?;

        registro.usado_em = Some(agora);
        user.password_hash = password_hash.to_string();
        user.ativo = true;
        user.updated_at = agora;
        Ok(user.clone())
    }
}
