// src/client/cache.rs
//
// Cache de consultas do cliente. Chaves por projeto; uma mutação apaga
// todas as entradas do projeto dono (nunca mescla).

use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::tributario::{PodeAvancarResponse, Tributario};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Tributario(Uuid),
    PodeAvancar(Uuid),
}

impl QueryKey {
    pub fn projeto_id(&self) -> Uuid {
        match self {
            QueryKey::Tributario(id) | QueryKey::PodeAvancar(id) => *id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CachedQuery {
    /// `None` guarda a ausência: projeto ainda sem análise tributária.
    Tributario(Option<Tributario>),
    PodeAvancar(PodeAvancarResponse),
}

#[derive(Debug, Default)]
pub struct QueryCache {
    entradas: RwLock<HashMap<QueryKey, CachedQuery>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &QueryKey) -> Option<CachedQuery> {
        self.entradas.read().await.get(key).cloned()
    }

    pub async fn put(&self, key: QueryKey, valor: CachedQuery) {
        self.entradas.write().await.insert(key, valor);
    }

    pub async fn contains(&self, key: &QueryKey) -> bool {
        self.entradas.read().await.contains_key(key)
    }

    pub async fn invalidar_projeto(&self, projeto_id: Uuid) {
        let mut entradas = self.entradas.write().await;
        entradas.retain(|key, _| key.projeto_id() != projeto_id);
        tracing::debug!(projeto_id = %projeto_id, "Cache do projeto invalidado");
    }

    pub async fn limpar(&self) {
        self.entradas.write().await.clear();
    }
}
