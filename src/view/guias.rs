// src/view/guias.rs

use uuid::Uuid;

use crate::{
    models::tributario::{GuiaTributaria, StatusGuia},
    view::{
        formato::{formatar_data, rotulo_status_guia, rotulo_tipo_guia, SEM_VALOR},
        Icone, Variante,
    },
};

pub const SEM_GUIAS: &str = "Nenhuma guia emitida";

pub fn variante_status_guia(status: StatusGuia) -> Variante {
    match status {
        StatusGuia::Paga => Variante::Sucesso,
        StatusGuia::Vencida => Variante::Falha,
        _ => Variante::Pendente,
    }
}

pub fn icone_status_guia(status: StatusGuia) -> Icone {
    match status {
        StatusGuia::Paga => Icone::Confirmado,
        StatusGuia::Vencida => Icone::Recusado,
        _ => Icone::Relogio,
    }
}

/// "Registrar pagamento" aparece em toda guia que ainda não foi paga.
pub fn pode_registrar_pagamento(guia: &GuiaTributaria) -> bool {
    guia.status != StatusGuia::Paga
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinhaGuia {
    pub id: Uuid,
    pub tipo: &'static str,
    pub numero: String,
    pub valor: String,
    pub emissao: String,
    pub vencimento: String,
    pub status: &'static str,
    pub variante: Variante,
    pub icone: Icone,
    pub registrar_pagamento: bool,
}

impl From<&GuiaTributaria> for LinhaGuia {
    fn from(guia: &GuiaTributaria) -> Self {
        Self {
            id: guia.id,
            tipo: rotulo_tipo_guia(guia.tipo),
            numero: guia.numero.clone().unwrap_or_else(|| SEM_VALOR.to_string()),
            valor: guia.valor.formatar(),
            emissao: formatar_data(guia.data_emissao),
            vencimento: formatar_data(guia.data_vencimento),
            status: rotulo_status_guia(guia.status),
            variante: variante_status_guia(guia.status),
            icone: icone_status_guia(guia.status),
            registrar_pagamento: pode_registrar_pagamento(guia),
        }
    }
}

/// Tabela do livro de guias, na ordem de emissão.
pub fn tabela_guias(guias: &[GuiaTributaria]) -> Vec<LinhaGuia> {
    guias.iter().map(LinhaGuia::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::money::Centavos;
    use crate::models::tributario::TipoGuia;
    use chrono::{NaiveDate, Utc};

    fn guia(status: StatusGuia) -> GuiaTributaria {
        GuiaTributaria {
            id: Uuid::new_v4(),
            tributario_id: Uuid::new_v4(),
            tipo: TipoGuia::Itbi,
            numero: None,
            valor: Centavos(25050),
            data_emissao: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            data_vencimento: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            status,
            data_pagamento: None,
            comprovante_drive_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn guia_paga_nao_oferece_pagamento() {
        assert!(!pode_registrar_pagamento(&guia(StatusGuia::Paga)));
        for status in [StatusGuia::Pendente, StatusGuia::Enviada, StatusGuia::Vencida, StatusGuia::Cancelada] {
            assert!(pode_registrar_pagamento(&guia(status)));
        }
    }

    #[test]
    fn selo_por_status() {
        assert_eq!(variante_status_guia(StatusGuia::Paga), Variante::Sucesso);
        assert_eq!(variante_status_guia(StatusGuia::Vencida), Variante::Falha);
        assert_eq!(variante_status_guia(StatusGuia::Enviada), Variante::Pendente);
        assert_eq!(icone_status_guia(StatusGuia::Cancelada), Icone::Relogio);
    }

    #[test]
    fn linha_formata_valor_e_datas() {
        let linhas = tabela_guias(&[guia(StatusGuia::Pendente)]);
        assert_eq!(linhas.len(), 1);
        let linha = &linhas[0];
        assert_eq!(linha.valor, "R$ 250,50");
        assert_eq!(linha.numero, "-");
        assert_eq!(linha.vencimento, "31/01/2024");
        assert!(linha.registrar_pagamento);
    }
}
