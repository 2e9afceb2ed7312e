// src/view/dossie.rs

use crate::{
    models::tributario::{StatusDossie, Tributario},
    view::{
        formato::{formatar_data, rotulo_status_dossie},
        Variante,
    },
};

/// Opções do seletor "Atualizar Status", na ordem em que aparecem.
pub const STATUS_DOSSIE: [StatusDossie; 5] = [
    StatusDossie::EmAnalise,
    StatusDossie::Deferido,
    StatusDossie::Indeferido,
    StatusDossie::Exigencia,
    StatusDossie::Recurso,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecaoDossie {
    Protocolar,
    Protocolado {
        protocolo: String,
        status: Option<(&'static str, Variante)>,
        data: Option<String>,
        observacoes: Option<String>,
    },
}

pub fn variante_status_dossie(status: StatusDossie) -> Variante {
    match status {
        StatusDossie::Deferido => Variante::Sucesso,
        StatusDossie::Indeferido => Variante::Falha,
        _ => Variante::Pendente,
    }
}

pub fn secao_dossie(t: &Tributario) -> SecaoDossie {
    let Some(protocolo) = t.dossie_protocolo.clone() else {
        return SecaoDossie::Protocolar;
    };

    SecaoDossie::Protocolado {
        protocolo,
        status: t
            .dossie_status
            .map(|s| (rotulo_status_dossie(s), variante_status_dossie(s))),
        data: t.dossie_data.map(formatar_data),
        observacoes: t.dossie_observacoes.clone(),
    }
}
