// src/client.rs

//! Cliente HTTP tipado da API tributária.
//!
//! Não guarda regra de negócio: cada mutação é uma única ida ao servidor,
//! seguida da invalidação do cache do projeto dono. Leituras passam pelo
//! [`QueryCache`].

pub mod cache;
pub mod error;

use std::env;

use chrono::{Duration, NaiveDate, Utc};
use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::{error::ApiMessage, money::Centavos},
    models::{
        auth::{AuthResponse, LoginUserPayload},
        tributario::{
            AtualizarDossieRequest, AtualizarImunidadeRequest, CreateTributarioRequest,
            DecisaoImunidade, EmitirGuiaRequest, PodeAvancarResponse, ProtocolarDossieRequest,
            RegistrarPagamentoRequest, SolicitarImunidadeRequest, StatusDossie, TipoGuia,
            Tributario, UpdateTributarioRequest,
        },
    },
};

pub use cache::{CachedQuery, QueryCache, QueryKey};
pub use error::ClientError;

pub const DIAS_VENCIMENTO_PADRAO: i64 = 30;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self { api_url: api_url.into().trim_end_matches('/').to_string() }
    }

    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::new(env::var("API_URL").unwrap_or_else(|_| "http://localhost:3000".into()))
    }
}

/// Quantas vezes uma requisição é repetida após falha de rede ou 5xx.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub tentativas_extras: u32,
}

impl RetryPolicy {
    /// Mutações e a busca por projeto (404 ali é resposta esperada).
    pub const NENHUMA: RetryPolicy = RetryPolicy { tentativas_extras: 0 };
    /// Demais leituras.
    pub const LEITURA: RetryPolicy = RetryPolicy { tentativas_extras: 1 };
}

/// Formulário de emissão como digitado: valor em reais, datas opcionais.
#[derive(Debug, Clone)]
pub struct EmitirGuiaForm {
    pub tipo: TipoGuia,
    pub numero: Option<String>,
    pub valor: String,
    pub data_emissao: Option<NaiveDate>,
    pub data_vencimento: Option<NaiveDate>,
}

impl EmitirGuiaForm {
    /// Converte para o corpo da requisição. O valor vira centavos aqui,
    /// uma única vez; datas ausentes viram hoje e hoje + 30 dias.
    pub fn into_request(self, hoje: NaiveDate) -> Result<EmitirGuiaRequest, ClientError> {
        let valor = Centavos::from_reais(&self.valor)?;
        if !valor.is_positive() {
            return Err(ClientError::Validacao("O valor da guia deve ser maior que zero".into()));
        }

        Ok(EmitirGuiaRequest {
            tipo: self.tipo,
            numero: self.numero.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            valor,
            data_emissao: self.data_emissao.unwrap_or(hoje),
            data_vencimento: self
                .data_vencimento
                .unwrap_or(hoje + Duration::days(DIAS_VENCIMENTO_PADRAO)),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<ApiMessage>,
}

pub struct TributarioClient {
    http: reqwest::Client,
    config: ClientConfig,
    token: RwLock<Option<String>>,
    cache: QueryCache,
}

impl TributarioClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            token: RwLock::new(None),
            cache: QueryCache::new(),
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub async fn set_token(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    pub async fn has_token(&self) -> bool {
        self.token.read().await.is_some()
    }

    // =========================================================================
    //  SESSÃO
    // =========================================================================

    pub async fn login(&self, email: &str, senha: &str) -> Result<AuthResponse, ClientError> {
        let payload = LoginUserPayload { email: email.to_string(), senha: senha.to_string() };
        let resposta: AuthResponse = self
            .enviar(Method::POST, "/api/auth/login", Some(&payload), RetryPolicy::NENHUMA)
            .await?;
        self.set_token(resposta.token.clone()).await;
        Ok(resposta)
    }

    pub async fn logout(&self) {
        *self.token.write().await = None;
        self.cache.limpar().await;
    }

    // =========================================================================
    //  LEITURAS
    // =========================================================================

    /// Análise tributária do projeto. `Ok(None)` quando o projeto ainda
    /// não tem uma (404), sem repetir a requisição.
    pub async fn buscar_por_projeto(&self, projeto_id: Uuid) -> Result<Option<Tributario>, ClientError> {
        let key = QueryKey::Tributario(projeto_id);
        if let Some(CachedQuery::Tributario(valor)) = self.cache.get(&key).await {
            return Ok(valor);
        }

        let caminho = format!("/tributario/projeto/{projeto_id}");
        let resultado = self
            .enviar::<Tributario, ()>(Method::GET, &caminho, None, RetryPolicy::NENHUMA)
            .await;

        let valor = match resultado {
            Ok(tributario) => Some(tributario),
            Err(ClientError::Api { status: 404, .. }) => None,
            Err(e) => return Err(e),
        };
        self.cache.put(key, CachedQuery::Tributario(valor.clone())).await;
        Ok(valor)
    }

    pub async fn pode_avancar(&self, projeto_id: Uuid) -> Result<PodeAvancarResponse, ClientError> {
        let key = QueryKey::PodeAvancar(projeto_id);
        if let Some(CachedQuery::PodeAvancar(valor)) = self.cache.get(&key).await {
            return Ok(valor);
        }

        let caminho = format!("/tributario/projeto/{projeto_id}/pode-avancar");
        let resposta: PodeAvancarResponse = self
            .enviar::<_, ()>(Method::GET, &caminho, None, RetryPolicy::LEITURA)
            .await?;
        self.cache.put(key, CachedQuery::PodeAvancar(resposta.clone())).await;
        Ok(resposta)
    }

    // =========================================================================
    //  MUTAÇÕES
    // =========================================================================

    pub async fn criar(&self, req: &CreateTributarioRequest) -> Result<Tributario, ClientError> {
        self.mutar(Method::POST, "/tributario", req).await
    }

    pub async fn atualizar(&self, id: Uuid, req: &UpdateTributarioRequest) -> Result<Tributario, ClientError> {
        self.mutar(Method::PATCH, &format!("/tributario/{id}"), req).await
    }

    pub async fn solicitar_imunidade(
        &self,
        id: Uuid,
        req: &SolicitarImunidadeRequest,
    ) -> Result<Tributario, ClientError> {
        exigir(&req.protocolo, "Informe o número do protocolo")?;
        self.mutar(Method::POST, &format!("/tributario/{id}/imunidade"), req).await
    }

    pub async fn atualizar_imunidade(
        &self,
        id: Uuid,
        decisao: DecisaoImunidade,
        req: &AtualizarImunidadeRequest,
    ) -> Result<Tributario, ClientError> {
        let caminho = format!("/tributario/{id}/imunidade/{}", decisao.as_str());
        self.mutar(Method::PATCH, &caminho, req).await
    }

    /// Deferir/Indeferir: decisão com a data de hoje e observação padrão.
    pub async fn decidir_imunidade(&self, id: Uuid, decisao: DecisaoImunidade) -> Result<Tributario, ClientError> {
        let req = requisicao_de_decisao(decisao, Utc::now().date_naive());
        self.atualizar_imunidade(id, decisao, &req).await
    }

    pub async fn emitir_guia(&self, tributario_id: Uuid, form: EmitirGuiaForm) -> Result<Tributario, ClientError> {
        let req = form.into_request(Utc::now().date_naive())?;
        self.mutar(Method::POST, &format!("/tributario/{tributario_id}/guias"), &req)
            .await
    }

    pub async fn registrar_pagamento(
        &self,
        guia_id: Uuid,
        req: &RegistrarPagamentoRequest,
    ) -> Result<Tributario, ClientError> {
        exigir(&req.comprovante_drive_id, "Informe o comprovante de pagamento")?;
        self.mutar(Method::POST, &format!("/tributario/guias/{guia_id}/pagamento"), req)
            .await
    }

    pub async fn protocolar_dossie(
        &self,
        id: Uuid,
        req: &ProtocolarDossieRequest,
    ) -> Result<Tributario, ClientError> {
        exigir(&req.protocolo, "Informe o número do protocolo")?;
        self.mutar(Method::POST, &format!("/tributario/{id}/dossie"), req).await
    }

    pub async fn atualizar_dossie(&self, id: Uuid, status: StatusDossie) -> Result<Tributario, ClientError> {
        let req = AtualizarDossieRequest { status };
        self.mutar(Method::PATCH, &format!("/tributario/{id}/dossie"), &req).await
    }

    // =========================================================================
    //  TRANSPORTE
    // =========================================================================

    // Mutação: sem repetição; no sucesso invalida o projeto dono.
    async fn mutar<B: Serialize + ?Sized>(
        &self,
        metodo: Method,
        caminho: &str,
        corpo: &B,
    ) -> Result<Tributario, ClientError> {
        let tributario: Tributario = self
            .enviar(metodo, caminho, Some(corpo), RetryPolicy::NENHUMA)
            .await?;
        self.cache.invalidar_projeto(tributario.projeto_id).await;
        Ok(tributario)
    }

    async fn enviar<T, B>(
        &self,
        metodo: Method,
        caminho: &str,
        corpo: Option<&B>,
        politica: RetryPolicy,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.config.api_url, caminho);
        let mut tentativa = 0;

        let resposta = loop {
            match self.enviar_uma_vez(metodo.clone(), &url, corpo).await {
                Err(e) if e.repetivel() && tentativa < politica.tentativas_extras => {
                    tentativa += 1;
                    tracing::warn!(%url, tentativa, "Repetindo requisição após falha: {}", e);
                }
                resultado => break resultado?,
            }
        };

        Ok(resposta.json::<T>().await?)
    }

    async fn enviar_uma_vez<B: Serialize + ?Sized>(
        &self,
        metodo: Method,
        url: &str,
        corpo: Option<&B>,
    ) -> Result<reqwest::Response, ClientError> {
        let mut request = self.http.request(metodo, url);
        let token = self.token.read().await.clone();
        let autenticada = token.is_some();
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(corpo) = corpo {
            request = request.json(corpo);
        }

        let resposta = request.send().await?;
        let status = resposta.status();
        if status.is_success() {
            return Ok(resposta);
        }

        // Sem token (login) o 401 é só credencial errada
        if status == StatusCode::UNAUTHORIZED && autenticada {
            tracing::warn!("Sessão expirada; descartando o token");
            self.logout().await;
            return Err(ClientError::SessaoExpirada);
        }

        let mensagens = resposta
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .map(ApiMessage::into_vec)
            .unwrap_or_default();

        Err(ClientError::Api { status: status.as_u16(), mensagens })
    }
}

pub fn requisicao_de_decisao(decisao: DecisaoImunidade, hoje: NaiveDate) -> AtualizarImunidadeRequest {
    let observacoes = match decisao {
        DecisaoImunidade::Deferida => "Deferido",
        DecisaoImunidade::Indeferida => "Indeferido",
    };
    AtualizarImunidadeRequest { data_decisao: hoje, observacoes: Some(observacoes.into()) }
}

fn exigir(valor: &str, mensagem: &str) -> Result<(), ClientError> {
    if valor.trim().is_empty() {
        return Err(ClientError::Validacao(mensagem.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hoje() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn form(valor: &str) -> EmitirGuiaForm {
        EmitirGuiaForm {
            tipo: TipoGuia::Itbi,
            numero: None,
            valor: valor.into(),
            data_emissao: None,
            data_vencimento: None,
        }
    }

    #[test]
    fn formulario_converte_reais_uma_vez() {
        assert_eq!(form("1500.00").into_request(hoje()).unwrap().valor, Centavos(150000));
        assert_eq!(form("19.999").into_request(hoje()).unwrap().valor, Centavos(2000));
        assert_eq!(form("250.50").into_request(hoje()).unwrap().valor, Centavos(25050));
    }

    #[test]
    fn formulario_preenche_datas_padrao() {
        let req = form("10").into_request(hoje()).unwrap();
        assert_eq!(req.data_emissao, hoje());
        assert_eq!(req.data_vencimento, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
    }

    #[test]
    fn formulario_rejeita_valor_zero() {
        assert!(matches!(form("0.001").into_request(hoje()), Err(ClientError::Validacao(_))));
        assert!(matches!(form("").into_request(hoje()), Err(ClientError::Valor(_))));
    }

    #[test]
    fn decisao_usa_observacao_padrao() {
        let req = requisicao_de_decisao(DecisaoImunidade::Indeferida, hoje());
        assert_eq!(req.data_decisao, hoje());
        assert_eq!(req.observacoes.as_deref(), Some("Indeferido"));
    }

    #[test]
    fn url_base_sem_barra_final() {
        assert_eq!(ClientConfig::new("http://api:3000/").api_url, "http://api:3000");
    }
}
