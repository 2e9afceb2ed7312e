// src/view/resumo.rs

use crate::{
    models::tributario::{StatusTributario, Tributario},
    view::{
        formato::{rotulo_status_tributario, rotulo_tipo_operacao},
        Variante,
    },
};

/// Cartão "Resumo da Análise Tributária".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resumo {
    pub tipo: &'static str,
    pub status: &'static str,
    pub variante_status: Variante,
    /// Só aparece depois da primeira guia.
    pub valor_total: Option<String>,
    pub comprovantes_recebidos: &'static str,
    pub dossie_protocolo: Option<String>,
}

pub fn variante_status_tributario(status: StatusTributario) -> Variante {
    match status {
        StatusTributario::Concluida | StatusTributario::Pago | StatusTributario::ImunidadeDeferida => {
            Variante::Sucesso
        }
        StatusTributario::Pendente | StatusTributario::AguardandoPagamento => Variante::Pendente,
        _ => Variante::Neutra,
    }
}

pub fn resumo(t: &Tributario) -> Resumo {
    Resumo {
        tipo: rotulo_tipo_operacao(t.tipo),
        status: rotulo_status_tributario(t.status),
        variante_status: variante_status_tributario(t.status),
        valor_total: t.guias_emitidas.then(|| t.guias_valor_total.formatar()),
        comprovantes_recebidos: if t.comprovantes_recebidos { "Sim" } else { "Não" },
        dossie_protocolo: t.dossie_protocolo.clone(),
    }
}
