// src/client/error.rs

use thiserror::Error;

use crate::common::money::MoneyError;

pub const MENSAGEM_GENERICA: &str = "Ocorreu um erro. Tente novamente.";
pub const MENSAGEM_SESSAO_EXPIRADA: &str = "Sua sessão expirou. Faça login novamente.";

#[derive(Debug, Error)]
pub enum ClientError {
    /// 401: o token guardado foi descartado.
    #[error("Sessão expirada")]
    SessaoExpirada,

    #[error("Erro da API ({status}): {mensagens:?}")]
    Api { status: u16, mensagens: Vec<String> },

    /// Rejeitado antes do envio.
    #[error("{0}")]
    Validacao(String),

    #[error(transparent)]
    Valor(#[from] MoneyError),

    #[error("Falha de comunicação com a API: {0}")]
    Transporte(#[from] reqwest::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::SessaoExpirada => Some(401),
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transporte(e) => e.status().map(|s| s.as_u16()),
            ClientError::Validacao(_) | ClientError::Valor(_) => None,
        }
    }

    /// Falhas de rede e 5xx podem ser repetidas; o resto não muda repetindo.
    pub fn repetivel(&self) -> bool {
        match self {
            ClientError::Transporte(e) => !e.is_decode() && !e.is_builder(),
            ClientError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Mensagem curta para notificação: a primeira mensagem da API,
    /// o motivo da validação local, ou `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Api { mensagens, .. } => mensagens
                .iter()
                .map(|m| m.trim())
                .find(|m| !m.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
            ClientError::Validacao(msg) => msg.clone(),
            ClientError::Valor(e) => e.to_string(),
            ClientError::SessaoExpirada => MENSAGEM_SESSAO_EXPIRADA.to_string(),
            ClientError::Transporte(_) => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usa_a_primeira_mensagem_da_lista() {
        let erro = ClientError::Api {
            status: 400,
            mensagens: vec!["Informe o número do protocolo".into(), "outra".into()],
        };
        assert_eq!(erro.user_message("Erro ao solicitar imunidade"), "Informe o número do protocolo");
    }

    #[test]
    fn sem_mensagem_usa_o_fallback() {
        let erro = ClientError::Api { status: 500, mensagens: vec![] };
        assert_eq!(erro.user_message("Erro ao emitir guia"), "Erro ao emitir guia");
        assert!(erro.repetivel());
    }

    #[test]
    fn erros_de_cliente_nao_se_repetem() {
        let erro = ClientError::Api { status: 409, mensagens: vec!["Esta guia já está paga.".into()] };
        assert!(!erro.repetivel());
        assert_eq!(erro.status(), Some(409));
        assert!(!ClientError::SessaoExpirada.repetivel());
    }

    #[test]
    fn validacao_local_mostra_o_motivo() {
        let erro = ClientError::Validacao("Informe o comprovante de pagamento".into());
        assert_eq!(erro.user_message(MENSAGEM_GENERICA), "Informe o comprovante de pagamento");
        assert_eq!(ClientError::from(MoneyError::Vazio).user_message(MENSAGEM_GENERICA), "Informe o valor");
    }
}
