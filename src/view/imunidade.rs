// src/view/imunidade.rs

use crate::{
    models::tributario::{DecisaoImunidade, StatusImunidade, TipoOperacaoTributaria, Tributario},
    view::{formato::formatar_data, Icone, Variante},
};

/// Estado da seção "Imunidade ITBI".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecaoImunidade {
    /// Ainda não pedida: só o botão "Solicitar Imunidade ITBI".
    Solicitar,
    EmAnalise {
        protocolo: String,
        observacoes: Option<String>,
    },
    Deferida {
        protocolo: String,
        data_deferimento: Option<String>,
        observacoes: Option<String>,
    },
    Indeferida {
        protocolo: String,
        data_decisao: Option<String>,
        motivo: Option<String>,
    },
    Recurso {
        protocolo: String,
        observacoes: Option<String>,
    },
}

impl SecaoImunidade {
    /// Botões de decisão; só existem com o pedido em análise.
    pub fn acoes_de_decisao(&self) -> &'static [DecisaoImunidade] {
        match self {
            SecaoImunidade::EmAnalise { .. } => &[DecisaoImunidade::Deferida, DecisaoImunidade::Indeferida],
            _ => &[],
        }
    }

    pub fn pode_solicitar(&self) -> bool {
        matches!(self, SecaoImunidade::Solicitar)
    }

    pub fn titulo(&self) -> &'static str {
        match self {
            SecaoImunidade::Solicitar => "Solicitar Imunidade ITBI",
            SecaoImunidade::EmAnalise { .. } => "Em Análise",
            SecaoImunidade::Deferida { .. } => "Imunidade Deferida",
            SecaoImunidade::Indeferida { .. } => "Imunidade Indeferida",
            SecaoImunidade::Recurso { .. } => "Imunidade em Recurso",
        }
    }

    pub fn variante(&self) -> Variante {
        match self {
            SecaoImunidade::Deferida { .. } => Variante::Sucesso,
            SecaoImunidade::Indeferida { .. } => Variante::Falha,
            SecaoImunidade::EmAnalise { .. } | SecaoImunidade::Recurso { .. } => Variante::Pendente,
            SecaoImunidade::Solicitar => Variante::Neutra,
        }
    }

    pub fn icone(&self) -> Option<Icone> {
        match self {
            SecaoImunidade::Solicitar => None,
            SecaoImunidade::EmAnalise { .. } | SecaoImunidade::Recurso { .. } => Some(Icone::Alerta),
            SecaoImunidade::Deferida { .. } => Some(Icone::Confirmado),
            SecaoImunidade::Indeferida { .. } => Some(Icone::Recusado),
        }
    }
}

pub fn rotulo_decisao(decisao: DecisaoImunidade) -> &'static str {
    match decisao {
        DecisaoImunidade::Deferida => "Deferir Imunidade",
        DecisaoImunidade::Indeferida => "Indeferir Imunidade",
    }
}

/// A seção só existe para integralização de bens.
pub fn secao_imunidade(t: &Tributario) -> Option<SecaoImunidade> {
    if t.tipo != TipoOperacaoTributaria::Integralizacao {
        return None;
    }

    let protocolo = t.imunidade_protocolo.clone().unwrap_or_default();
    let observacoes = t.imunidade_observacoes.clone();

    let secao = match t.imunidade_status {
        None | Some(StatusImunidade::NaoAplicavel) => SecaoImunidade::Solicitar,
        Some(StatusImunidade::EmAnalise) => SecaoImunidade::EmAnalise { protocolo, observacoes },
        Some(StatusImunidade::Deferida) => SecaoImunidade::Deferida {
            protocolo,
            data_deferimento: t.imunidade_deferimento.map(formatar_data),
            observacoes,
        },
        Some(StatusImunidade::Indeferida) => SecaoImunidade::Indeferida {
            protocolo,
            data_decisao: t.imunidade_deferimento.map(formatar_data),
            motivo: observacoes,
        },
        Some(StatusImunidade::Recurso) => SecaoImunidade::Recurso { protocolo, observacoes },
    };
    Some(secao)
}
