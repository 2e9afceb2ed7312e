// src/view/formato.rs

use chrono::NaiveDate;

use crate::models::tributario::{
    StatusDossie, StatusGuia, StatusTributario, TipoGuia, TipoOperacaoTributaria,
};

pub const SEM_VALOR: &str = "-";

/// `2024-01-31` -> "31/01/2024".
pub fn formatar_data(data: NaiveDate) -> String {
    data.format("%d/%m/%Y").to_string()
}

pub fn rotulo_tipo_operacao(tipo: TipoOperacaoTributaria) -> &'static str {
    match tipo {
        TipoOperacaoTributaria::Integralizacao => "Integralização de Bens",
        TipoOperacaoTributaria::Doacao => "Doação",
        TipoOperacaoTributaria::Outros => "Outros",
    }
}

pub fn rotulo_status_tributario(status: StatusTributario) -> &'static str {
    match status {
        StatusTributario::Pendente => "Pendente",
        StatusTributario::EmCalculo => "Em Cálculo",
        StatusTributario::EmDossie => "Em Dossiê",
        StatusTributario::GuiasEmitidas => "Guias Emitidas",
        StatusTributario::AguardandoPagamento => "Aguardando Pagamento",
        StatusTributario::Pago => "Pago",
        StatusTributario::ImunidadeDeferida => "Imunidade Deferida",
        StatusTributario::Exigencia => "Exigência",
        StatusTributario::Concluida => "Concluída",
    }
}

pub fn rotulo_tipo_guia(tipo: TipoGuia) -> &'static str {
    match tipo {
        TipoGuia::Itbi => "ITBI",
        TipoGuia::Itcmd => "ITCMD",
        TipoGuia::Iptu => "IPTU",
        TipoGuia::TaxaJunta => "Taxa Junta Comercial",
        TipoGuia::TaxaCartorio => "Taxa Cartório",
        TipoGuia::Outros => "Outros",
    }
}

pub fn rotulo_status_guia(status: StatusGuia) -> &'static str {
    match status {
        StatusGuia::Pendente => "Pendente",
        StatusGuia::Enviada => "Enviada",
        StatusGuia::Paga => "Paga",
        StatusGuia::Vencida => "Vencida",
        StatusGuia::Cancelada => "Cancelada",
    }
}

pub fn rotulo_status_dossie(status: StatusDossie) -> &'static str {
    match status {
        StatusDossie::EmAnalise => "Em Análise",
        StatusDossie::Deferido => "Deferido",
        StatusDossie::Indeferido => "Indeferido",
        StatusDossie::Exigencia => "Exigência",
        StatusDossie::Recurso => "Recurso",
    }
}
