// src/services/tributario_rules.rs

//! Regras do fluxo tributário, sem I/O.
//!
//! Cada função recebe o agregado carregado, valida a transição pedida e
//! o altera no lugar. O serviço só carrega, chama a regra e grava; a
//! apresentação nunca reimplementa nada daqui.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    common::{error::AppError, money::Centavos},
    models::tributario::{
        AtualizarImunidadeRequest, DecisaoImunidade, EmitirGuiaRequest, GuiaTributaria,
        PodeAvancarResponse, ProtocolarDossieRequest, RegistrarPagamentoRequest,
        SolicitarImunidadeRequest, StatusDossie, StatusGuia, StatusImunidade, StatusTributario,
        TipoOperacaoTributaria, Tributario, UpdateTributarioRequest,
    },
};

pub const MOTIVO_NAO_CONFIGURADO: &str = "Análise tributária não configurada para este projeto.";
pub const MOTIVO_EXIGENCIA: &str = "Existe exigência fiscal pendente na análise tributária.";
pub const MOTIVO_IMUNIDADE_EM_ANALISE: &str = "Pedido de imunidade de ITBI ainda em análise.";
pub const MOTIVO_IMUNIDADE_EM_RECURSO: &str = "Imunidade de ITBI em fase de recurso.";
pub const MOTIVO_DOSSIE_NAO_PROTOCOLADO: &str = "Dossiê administrativo não protocolado.";
pub const MOTIVO_DOSSIE_EXIGENCIA: &str = "Dossiê administrativo com exigência pendente.";
pub const MOTIVO_DOSSIE_INDEFERIDO: &str = "Dossiê administrativo indeferido.";

// --- Registro ---

/// Estado inicial da imunidade: ausente (ainda não solicitada) para
/// integralização, NAO_APLICAVEL para os demais tipos.
pub fn imunidade_inicial(tipo: TipoOperacaoTributaria) -> Option<StatusImunidade> {
    match tipo {
        TipoOperacaoTributaria::Integralizacao => None,
        TipoOperacaoTributaria::Doacao | TipoOperacaoTributaria::Outros => {
            Some(StatusImunidade::NaoAplicavel)
        }
    }
}

pub fn novo_tributario(projeto_id: Uuid, tipo: TipoOperacaoTributaria, agora: DateTime<Utc>) -> Tributario {
    Tributario {
        id: Uuid::new_v4(),
        projeto_id,
        tipo,
        status: StatusTributario::Pendente,
        imunidade_status: imunidade_inicial(tipo),
        imunidade_protocolo: None,
        imunidade_deferimento: None,
        imunidade_observacoes: None,
        guias_emitidas: false,
        guias_valor_total: Centavos::ZERO,
        comprovantes_recebidos: false,
        dossie_protocolo: None,
        dossie_status: None,
        dossie_data: None,
        dossie_observacoes: None,
        guias: Vec::new(),
        created_at: agora,
        updated_at: agora,
    }
}

pub fn aplicar_patch(t: &mut Tributario, patch: &UpdateTributarioRequest) -> Result<(), AppError> {
    if patch.dossie_status.is_some() && !t.dossie_protocolado() {
        return Err(AppError::DossieNaoProtocolado);
    }

    if let Some(tipo) = patch.tipo {
        if tipo != t.tipo {
            t.tipo = tipo;
            t.imunidade_status = match (tipo, t.imunidade_status) {
                (TipoOperacaoTributaria::Integralizacao, Some(StatusImunidade::NaoAplicavel)) => None,
                (TipoOperacaoTributaria::Integralizacao, atual) => atual,
                (_, None) => Some(StatusImunidade::NaoAplicavel),
                (_, atual) => atual,
            };
        }
    }
    if let Some(status) = patch.status {
        t.status = status;
    }
    if let Some(dossie_status) = patch.dossie_status {
        t.dossie_status = Some(dossie_status);
    }
    Ok(())
}

// --- Imunidade ---

pub fn solicitar_imunidade(t: &mut Tributario, req: &SolicitarImunidadeRequest) -> Result<(), AppError> {
    if t.tipo != TipoOperacaoTributaria::Integralizacao {
        return Err(AppError::ImunidadeNaoAplicavel);
    }
    match t.imunidade_status {
        None | Some(StatusImunidade::NaoAplicavel) => {}
        atual => return Err(AppError::TransicaoImunidadeInvalida(atual)),
    }

    let protocolo = req.protocolo.trim();
    if protocolo.is_empty() {
        return Err(AppError::CampoObrigatorio("protocolo"));
    }

    t.imunidade_status = Some(StatusImunidade::EmAnalise);
    t.imunidade_protocolo = Some(protocolo.to_string());
    t.imunidade_observacoes = texto_opcional(req.observacoes.as_deref());
    Ok(())
}

pub fn decidir_imunidade(
    t: &mut Tributario,
    decisao: DecisaoImunidade,
    req: &AtualizarImunidadeRequest,
) -> Result<(), AppError> {
    if t.tipo != TipoOperacaoTributaria::Integralizacao {
        return Err(AppError::ImunidadeNaoAplicavel);
    }
    if t.imunidade_status != Some(StatusImunidade::EmAnalise) {
        return Err(AppError::TransicaoImunidadeInvalida(t.imunidade_status));
    }

    t.imunidade_status = Some(decisao.status_resultante());
    t.imunidade_deferimento = Some(req.data_decisao);
    if let Some(obs) = texto_opcional(req.observacoes.as_deref()) {
        t.imunidade_observacoes = Some(obs);
    }
    if decisao == DecisaoImunidade::Deferida {
        t.status = StatusTributario::ImunidadeDeferida;
    }
    Ok(())
}

// --- Livro de guias ---

pub fn nova_guia(
    t: &Tributario,
    req: &EmitirGuiaRequest,
    agora: DateTime<Utc>,
) -> Result<GuiaTributaria, AppError> {
    if !req.valor.is_positive() {
        return Err(AppError::CampoObrigatorio("valor"));
    }
    if req.data_vencimento < req.data_emissao {
        return Err(AppError::VencimentoAnteriorEmissao);
    }

    Ok(GuiaTributaria {
        id: Uuid::new_v4(),
        tributario_id: t.id,
        tipo: req.tipo,
        numero: texto_opcional(req.numero.as_deref()),
        valor: req.valor,
        data_emissao: req.data_emissao,
        data_vencimento: req.data_vencimento,
        status: StatusGuia::Pendente,
        data_pagamento: None,
        comprovante_drive_id: None,
        created_at: agora,
        updated_at: agora,
    })
}

/// Anexa a guia ao livro e recalcula agregados e status.
pub fn registrar_emissao(t: &mut Tributario, guia: GuiaTributaria) {
    t.guias.push(guia);
    recalcular_agregados(t);
    if segue_livro_de_guias(t.status) {
        t.status = match t.status {
            StatusTributario::Pago | StatusTributario::AguardandoPagamento => {
                StatusTributario::AguardandoPagamento
            }
            _ => StatusTributario::GuiasEmitidas,
        };
    }
}

/// Marca a guia como paga e devolve a versão atualizada dela.
pub fn registrar_pagamento(
    t: &mut Tributario,
    guia_id: Uuid,
    req: &RegistrarPagamentoRequest,
    agora: DateTime<Utc>,
) -> Result<GuiaTributaria, AppError> {
    let comprovante = req.comprovante_drive_id.trim();
    if comprovante.is_empty() {
        return Err(AppError::CampoObrigatorio("comprovanteDriveId"));
    }

    let guia = t
        .guias
        .iter_mut()
        .find(|g| g.id == guia_id)
        .ok_or(AppError::GuiaNaoEncontrada)?;

    match guia.status {
        StatusGuia::Paga => return Err(AppError::GuiaJaPaga),
        StatusGuia::Cancelada => return Err(AppError::GuiaCancelada),
        StatusGuia::Pendente | StatusGuia::Enviada | StatusGuia::Vencida => {}
    }

    guia.status = StatusGuia::Paga;
    guia.data_pagamento = Some(req.data_pagamento);
    guia.comprovante_drive_id = Some(comprovante.to_string());
    guia.updated_at = agora;
    let atualizada = guia.clone();

    recalcular_agregados(t);
    if segue_livro_de_guias(t.status) {
        t.status = if todas_guias_pagas(t) {
            StatusTributario::Pago
        } else {
            StatusTributario::AguardandoPagamento
        };
    }
    Ok(atualizada)
}

/// `guias_valor_total` soma apenas guias não canceladas.
pub fn recalcular_agregados(t: &mut Tributario) {
    t.guias_emitidas = !t.guias.is_empty();
    t.guias_valor_total = t
        .guias
        .iter()
        .filter(|g| g.status != StatusGuia::Cancelada)
        .map(|g| g.valor)
        .sum();
    t.comprovantes_recebidos = t.guias.iter().any(|g| g.comprovante_drive_id.is_some());
}

fn guias_em_aberto(t: &Tributario) -> usize {
    t.guias
        .iter()
        .filter(|g| !matches!(g.status, StatusGuia::Paga | StatusGuia::Cancelada))
        .count()
}

fn todas_guias_pagas(t: &Tributario) -> bool {
    guias_em_aberto(t) == 0
}

// Status definidos manualmente (EM_DOSSIE, EXIGENCIA, ...) não são
// sobrescritos pelos eventos do livro de guias.
fn segue_livro_de_guias(status: StatusTributario) -> bool {
    matches!(
        status,
        StatusTributario::Pendente
            | StatusTributario::EmCalculo
            | StatusTributario::GuiasEmitidas
            | StatusTributario::AguardandoPagamento
            | StatusTributario::Pago
    )
}

// --- Dossiê ---

pub fn protocolar_dossie(
    t: &mut Tributario,
    req: &ProtocolarDossieRequest,
    hoje: NaiveDate,
) -> Result<(), AppError> {
    if t.dossie_protocolado() {
        return Err(AppError::DossieJaProtocolado);
    }
    let protocolo = req.protocolo.trim();
    if protocolo.is_empty() {
        return Err(AppError::CampoObrigatorio("protocolo"));
    }

    t.dossie_protocolo = Some(protocolo.to_string());
    t.dossie_data = Some(hoje);
    t.dossie_status = Some(StatusDossie::EmAnalise);
    t.dossie_observacoes = texto_opcional(req.observacoes.as_deref());
    Ok(())
}

pub fn atualizar_dossie(t: &mut Tributario, status: StatusDossie) -> Result<(), AppError> {
    if !t.dossie_protocolado() {
        return Err(AppError::DossieNaoProtocolado);
    }
    t.dossie_status = Some(status);
    Ok(())
}

// --- Gate ---

/// Decide se o projeto pode sair da etapa tributária.
/// A primeira pendência encontrada vira o `motivo`.
pub fn avaliar_gate(tributario: Option<&Tributario>) -> PodeAvancarResponse {
    let Some(t) = tributario else {
        return PodeAvancarResponse::bloqueado(MOTIVO_NAO_CONFIGURADO);
    };

    match t.status {
        StatusTributario::Concluida => return PodeAvancarResponse::liberado(),
        StatusTributario::Exigencia => return PodeAvancarResponse::bloqueado(MOTIVO_EXIGENCIA),
        _ => {}
    }

    if t.tipo == TipoOperacaoTributaria::Integralizacao {
        match t.imunidade_status {
            Some(StatusImunidade::EmAnalise) => {
                return PodeAvancarResponse::bloqueado(MOTIVO_IMUNIDADE_EM_ANALISE);
            }
            Some(StatusImunidade::Recurso) => {
                return PodeAvancarResponse::bloqueado(MOTIVO_IMUNIDADE_EM_RECURSO);
            }
            _ => {}
        }
    }

    let em_aberto = guias_em_aberto(t);
    if em_aberto > 0 {
        return PodeAvancarResponse::bloqueado(format!(
            "Existem {em_aberto} guia(s) pendente(s) de pagamento."
        ));
    }

    match t.dossie_status {
        _ if !t.dossie_protocolado() => PodeAvancarResponse::bloqueado(MOTIVO_DOSSIE_NAO_PROTOCOLADO),
        Some(StatusDossie::Exigencia) => PodeAvancarResponse::bloqueado(MOTIVO_DOSSIE_EXIGENCIA),
        Some(StatusDossie::Indeferido) => PodeAvancarResponse::bloqueado(MOTIVO_DOSSIE_INDEFERIDO),
        _ => PodeAvancarResponse::liberado(),
    }
}

fn texto_opcional(valor: Option<&str>) -> Option<String> {
    valor.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tributario::TipoGuia;

    fn data(ano: i32, mes: u32, dia: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(ano, mes, dia).unwrap()
    }

    fn registro(tipo: TipoOperacaoTributaria) -> Tributario {
        novo_tributario(Uuid::new_v4(), tipo, Utc::now())
    }

    fn emitir(t: &mut Tributario, valor: i64) -> Uuid {
        let req = EmitirGuiaRequest {
            tipo: TipoGuia::Itbi,
            numero: None,
            valor: Centavos(valor),
            data_emissao: data(2024, 1, 1),
            data_vencimento: data(2024, 1, 31),
        };
        let guia = nova_guia(t, &req, Utc::now()).unwrap();
        let id = guia.id;
        registrar_emissao(t, guia);
        id
    }

    fn pagar(t: &mut Tributario, guia_id: Uuid) -> Result<GuiaTributaria, AppError> {
        let req = RegistrarPagamentoRequest {
            data_pagamento: data(2024, 1, 15),
            comprovante_drive_id: "abc123".into(),
        };
        registrar_pagamento(t, guia_id, &req, Utc::now())
    }

    fn protocolar(t: &mut Tributario) {
        let req = ProtocolarDossieRequest { protocolo: "DOS-1".into(), observacoes: None };
        protocolar_dossie(t, &req, data(2024, 2, 1)).unwrap();
    }

    fn solicitar(t: &mut Tributario) -> Result<(), AppError> {
        let req = SolicitarImunidadeRequest { protocolo: "2024/001".into(), observacoes: None };
        solicitar_imunidade(t, &req)
    }

    fn decidir(t: &mut Tributario, decisao: DecisaoImunidade) -> Result<(), AppError> {
        let req = AtualizarImunidadeRequest { data_decisao: data(2024, 2, 10), observacoes: None };
        decidir_imunidade(t, decisao, &req)
    }

    #[test]
    fn novo_registro_comeca_pendente() {
        let doacao = registro(TipoOperacaoTributaria::Doacao);
        assert_eq!(doacao.status, StatusTributario::Pendente);
        assert_eq!(doacao.imunidade_status, Some(StatusImunidade::NaoAplicavel));
        assert!(!doacao.guias_emitidas);

        let integralizacao = registro(TipoOperacaoTributaria::Integralizacao);
        assert_eq!(integralizacao.imunidade_status, None);
    }

    #[test]
    fn patch_de_tipo_normaliza_imunidade() {
        let mut t = registro(TipoOperacaoTributaria::Doacao);
        let patch = UpdateTributarioRequest {
            tipo: Some(TipoOperacaoTributaria::Integralizacao),
            ..Default::default()
        };
        aplicar_patch(&mut t, &patch).unwrap();
        assert_eq!(t.imunidade_status, None);

        let patch = UpdateTributarioRequest {
            tipo: Some(TipoOperacaoTributaria::Outros),
            status: Some(StatusTributario::EmCalculo),
            ..Default::default()
        };
        aplicar_patch(&mut t, &patch).unwrap();
        assert_eq!(t.imunidade_status, Some(StatusImunidade::NaoAplicavel));
        assert_eq!(t.status, StatusTributario::EmCalculo);
    }

    #[test]
    fn patch_de_dossie_exige_protocolo() {
        let mut t = registro(TipoOperacaoTributaria::Doacao);
        let patch = UpdateTributarioRequest {
            dossie_status: Some(StatusDossie::Deferido),
            ..Default::default()
        };
        assert!(matches!(aplicar_patch(&mut t, &patch), Err(AppError::DossieNaoProtocolado)));

        protocolar(&mut t);
        aplicar_patch(&mut t, &patch).unwrap();
        assert_eq!(t.dossie_status, Some(StatusDossie::Deferido));
    }

    #[test]
    fn imunidade_so_para_integralizacao() {
        let mut t = registro(TipoOperacaoTributaria::Doacao);
        assert!(matches!(solicitar(&mut t), Err(AppError::ImunidadeNaoAplicavel)));
    }

    #[test]
    fn imunidade_segue_em_frente() {
        let mut t = registro(TipoOperacaoTributaria::Integralizacao);

        // Sem pedido não há decisão
        assert!(matches!(
            decidir(&mut t, DecisaoImunidade::Deferida),
            Err(AppError::TransicaoImunidadeInvalida(None))
        ));

        solicitar(&mut t).unwrap();
        assert_eq!(t.imunidade_status, Some(StatusImunidade::EmAnalise));
        assert_eq!(t.imunidade_protocolo.as_deref(), Some("2024/001"));

        // Pedido duplicado
        assert!(matches!(
            solicitar(&mut t),
            Err(AppError::TransicaoImunidadeInvalida(Some(StatusImunidade::EmAnalise)))
        ));

        decidir(&mut t, DecisaoImunidade::Deferida).unwrap();
        assert_eq!(t.imunidade_status, Some(StatusImunidade::Deferida));
        assert_eq!(t.imunidade_deferimento, Some(data(2024, 2, 10)));
        assert_eq!(t.status, StatusTributario::ImunidadeDeferida);

        // Decisão é terminal
        assert!(matches!(
            decidir(&mut t, DecisaoImunidade::Indeferida),
            Err(AppError::TransicaoImunidadeInvalida(Some(StatusImunidade::Deferida)))
        ));
    }

    #[test]
    fn indeferimento_nao_muda_status_geral() {
        let mut t = registro(TipoOperacaoTributaria::Integralizacao);
        solicitar(&mut t).unwrap();
        decidir(&mut t, DecisaoImunidade::Indeferida).unwrap();
        assert_eq!(t.imunidade_status, Some(StatusImunidade::Indeferida));
        assert_eq!(t.status, StatusTributario::Pendente);
    }

    #[test]
    fn protocolo_em_branco_e_rejeitado() {
        let mut t = registro(TipoOperacaoTributaria::Integralizacao);
        let req = SolicitarImunidadeRequest { protocolo: "   ".into(), observacoes: None };
        assert!(matches!(
            solicitar_imunidade(&mut t, &req),
            Err(AppError::CampoObrigatorio("protocolo"))
        ));
        assert_eq!(t.imunidade_status, None);
    }

    #[test]
    fn emissao_atualiza_agregados_e_status() {
        let mut t = registro(TipoOperacaoTributaria::Doacao);
        emitir(&mut t, 25050);
        emitir(&mut t, 1000);

        assert!(t.guias_emitidas);
        assert_eq!(t.guias_valor_total, Centavos(26050));
        assert_eq!(t.status, StatusTributario::GuiasEmitidas);
        assert!(t.guias.iter().all(|g| g.status == StatusGuia::Pendente));
    }

    #[test]
    fn vencimento_antes_da_emissao_e_rejeitado() {
        let t = registro(TipoOperacaoTributaria::Doacao);
        let req = EmitirGuiaRequest {
            tipo: TipoGuia::Itcmd,
            numero: Some("  ".into()),
            valor: Centavos(100),
            data_emissao: data(2024, 1, 31),
            data_vencimento: data(2024, 1, 1),
        };
        assert!(matches!(
            nova_guia(&t, &req, Utc::now()),
            Err(AppError::VencimentoAnteriorEmissao)
        ));
    }

    #[test]
    fn pagamento_marca_guia_e_recalcula_status() {
        let mut t = registro(TipoOperacaoTributaria::Doacao);
        let primeira = emitir(&mut t, 25050);
        let segunda = emitir(&mut t, 1000);

        let paga = pagar(&mut t, primeira).unwrap();
        assert_eq!(paga.status, StatusGuia::Paga);
        assert_eq!(paga.data_pagamento, Some(data(2024, 1, 15)));
        assert_eq!(paga.comprovante_drive_id.as_deref(), Some("abc123"));
        assert!(t.comprovantes_recebidos);
        assert_eq!(t.status, StatusTributario::AguardandoPagamento);

        pagar(&mut t, segunda).unwrap();
        assert_eq!(t.status, StatusTributario::Pago);

        // Nova guia reabre a pendência
        emitir(&mut t, 500);
        assert_eq!(t.status, StatusTributario::AguardandoPagamento);
    }

    #[test]
    fn pagamento_duplicado_ou_de_guia_cancelada_falha() {
        let mut t = registro(TipoOperacaoTributaria::Doacao);
        let id = emitir(&mut t, 100);
        pagar(&mut t, id).unwrap();
        assert!(matches!(pagar(&mut t, id), Err(AppError::GuiaJaPaga)));

        let cancelada = emitir(&mut t, 200);
        t.guias.iter_mut().find(|g| g.id == cancelada).unwrap().status = StatusGuia::Cancelada;
        assert!(matches!(pagar(&mut t, cancelada), Err(AppError::GuiaCancelada)));

        assert!(matches!(pagar(&mut t, Uuid::new_v4()), Err(AppError::GuiaNaoEncontrada)));
    }

    #[test]
    fn pagamento_sem_comprovante_falha() {
        let mut t = registro(TipoOperacaoTributaria::Doacao);
        let id = emitir(&mut t, 100);
        let req = RegistrarPagamentoRequest {
            data_pagamento: data(2024, 1, 15),
            comprovante_drive_id: String::new(),
        };
        assert!(registrar_pagamento(&mut t, id, &req, Utc::now()).is_err());
        assert_eq!(t.guias[0].status, StatusGuia::Pendente);
    }

    #[test]
    fn total_ignora_guias_canceladas() {
        let mut t = registro(TipoOperacaoTributaria::Doacao);
        emitir(&mut t, 100);
        let cancelada = emitir(&mut t, 900);
        t.guias.iter_mut().find(|g| g.id == cancelada).unwrap().status = StatusGuia::Cancelada;
        recalcular_agregados(&mut t);
        assert_eq!(t.guias_valor_total, Centavos(100));
    }

    #[test]
    fn status_manual_nao_e_sobrescrito_pelas_guias() {
        let mut t = registro(TipoOperacaoTributaria::Doacao);
        t.status = StatusTributario::EmDossie;
        let id = emitir(&mut t, 100);
        assert_eq!(t.status, StatusTributario::EmDossie);
        pagar(&mut t, id).unwrap();
        assert_eq!(t.status, StatusTributario::EmDossie);
    }

    #[test]
    fn dossie_protocolado_uma_vez() {
        let mut t = registro(TipoOperacaoTributaria::Doacao);
        assert!(matches!(
            atualizar_dossie(&mut t, StatusDossie::Deferido),
            Err(AppError::DossieNaoProtocolado)
        ));

        protocolar(&mut t);
        assert_eq!(t.dossie_status, Some(StatusDossie::EmAnalise));
        assert_eq!(t.dossie_data, Some(data(2024, 2, 1)));

        let req = ProtocolarDossieRequest { protocolo: "DOS-2".into(), observacoes: None };
        assert!(matches!(
            protocolar_dossie(&mut t, &req, data(2024, 2, 2)),
            Err(AppError::DossieJaProtocolado)
        ));

        atualizar_dossie(&mut t, StatusDossie::Exigencia).unwrap();
        assert_eq!(t.dossie_status, Some(StatusDossie::Exigencia));
    }

    #[test]
    fn gate_sem_registro_bloqueia() {
        let resposta = avaliar_gate(None);
        assert!(!resposta.pode_avancar);
        assert_eq!(resposta.motivo.as_deref(), Some(MOTIVO_NAO_CONFIGURADO));
    }

    #[test]
    fn gate_libera_com_guias_pagas_e_dossie_protocolado() {
        let mut t = registro(TipoOperacaoTributaria::Doacao);
        let id = emitir(&mut t, 100);

        let resposta = avaliar_gate(Some(&t));
        assert!(!resposta.pode_avancar);
        assert_eq!(
            resposta.motivo.as_deref(),
            Some("Existem 1 guia(s) pendente(s) de pagamento.")
        );

        pagar(&mut t, id).unwrap();
        assert_eq!(
            avaliar_gate(Some(&t)).motivo.as_deref(),
            Some(MOTIVO_DOSSIE_NAO_PROTOCOLADO)
        );

        protocolar(&mut t);
        assert_eq!(avaliar_gate(Some(&t)), PodeAvancarResponse::liberado());
    }

    #[test]
    fn gate_bloqueia_imunidade_sem_decisao() {
        let mut t = registro(TipoOperacaoTributaria::Integralizacao);
        protocolar(&mut t);
        assert!(avaliar_gate(Some(&t)).pode_avancar);

        solicitar(&mut t).unwrap();
        assert_eq!(
            avaliar_gate(Some(&t)).motivo.as_deref(),
            Some(MOTIVO_IMUNIDADE_EM_ANALISE)
        );

        decidir(&mut t, DecisaoImunidade::Indeferida).unwrap();
        assert!(avaliar_gate(Some(&t)).pode_avancar);
    }

    #[test]
    fn gate_respeita_exigencia_e_conclusao() {
        let mut t = registro(TipoOperacaoTributaria::Doacao);
        protocolar(&mut t);

        t.status = StatusTributario::Exigencia;
        assert_eq!(avaliar_gate(Some(&t)).motivo.as_deref(), Some(MOTIVO_EXIGENCIA));

        t.status = StatusTributario::Pendente;
        atualizar_dossie(&mut t, StatusDossie::Exigencia).unwrap();
        assert_eq!(avaliar_gate(Some(&t)).motivo.as_deref(), Some(MOTIVO_DOSSIE_EXIGENCIA));

        emitir(&mut t, 100);
        t.status = StatusTributario::Concluida;
        assert!(avaliar_gate(Some(&t)).pode_avancar);
    }
}
