// src/view/gate.rs

use crate::models::tributario::PodeAvancarResponse;
use crate::view::{Icone, Variante};

pub const TITULO_PRONTO: &str = "Pronto para Avançar";
pub const DESCRICAO_PRONTO: &str = "Todas as pendências tributárias foram resolvidas. \
O projeto pode avançar para a etapa de Registros (Etapa 7).";
pub const TITULO_BLOQUEADO: &str = "Bloqueado - Pendências Tributárias";
pub const MOTIVO_PADRAO: &str = "Existem pendências tributárias que impedem o avanço para a \
próxima etapa. Resolva as pendências para continuar.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PainelGate {
    Pronto,
    Bloqueado { motivo: String },
}

impl PainelGate {
    pub fn titulo(&self) -> &'static str {
        match self {
            PainelGate::Pronto => TITULO_PRONTO,
            PainelGate::Bloqueado { .. } => TITULO_BLOQUEADO,
        }
    }

    pub fn descricao(&self) -> &str {
        match self {
            PainelGate::Pronto => DESCRICAO_PRONTO,
            PainelGate::Bloqueado { motivo } => motivo,
        }
    }

    pub fn variante(&self) -> Variante {
        match self {
            PainelGate::Pronto => Variante::Sucesso,
            PainelGate::Bloqueado { .. } => Variante::Falha,
        }
    }

    pub fn icone(&self) -> Icone {
        match self {
            PainelGate::Pronto => Icone::Confirmado,
            PainelGate::Bloqueado { .. } => Icone::Recusado,
        }
    }
}

/// `None` (ainda não carregado) não mostra painel nenhum.
pub fn painel_gate(resposta: Option<&PodeAvancarResponse>) -> Option<PainelGate> {
    let resposta = resposta?;
    if resposta.pode_avancar {
        return Some(PainelGate::Pronto);
    }

    let motivo = resposta
        .motivo
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(MOTIVO_PADRAO);
    Some(PainelGate::Bloqueado { motivo: motivo.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sem_resposta_nao_mostra_nada() {
        assert_eq!(painel_gate(None), None);
    }

    #[test]
    fn liberado_mostra_pronto() {
        let painel = painel_gate(Some(&PodeAvancarResponse::liberado())).unwrap();
        assert_eq!(painel, PainelGate::Pronto);
        assert_eq!(painel.titulo(), "Pronto para Avançar");
        assert_eq!(painel.variante(), Variante::Sucesso);
    }

    #[test]
    fn bloqueado_mostra_o_motivo() {
        let painel = painel_gate(Some(&PodeAvancarResponse::bloqueado("X"))).unwrap();
        assert_eq!(painel.descricao(), "X");
        assert_eq!(painel.variante(), Variante::Falha);
    }

    #[test]
    fn bloqueado_sem_motivo_usa_mensagem_padrao() {
        let resposta = PodeAvancarResponse { pode_avancar: false, motivo: None };
        let painel = painel_gate(Some(&resposta)).unwrap();
        assert_eq!(painel.descricao(), MOTIVO_PADRAO);
    }
}
