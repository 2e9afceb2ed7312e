// src/services/tributario_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AlteracaoGuia, Alvo, TributarioRepository},
    models::tributario::{
        AtualizarDossieRequest, AtualizarImunidadeRequest, CreateTributarioRequest,
        DecisaoImunidade, EmitirGuiaRequest, PodeAvancarResponse, ProtocolarDossieRequest,
        RegistrarPagamentoRequest, SolicitarImunidadeRequest, Tributario, UpdateTributarioRequest,
    },
    services::tributario_rules as regras,
};

#[derive(Clone)]
pub struct TributarioService {
    repo: Arc<dyn TributarioRepository>,
}

impl TributarioService {
    pub fn new(repo: Arc<dyn TributarioRepository>) -> Self {
        Self { repo }
    }

    async fn carregar(&self, id: Uuid) -> Result<Tributario, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::TributarioNaoEncontrado)
    }

    // Carrega, aplica a regra e grava sob o bloqueio do repositório;
    // devolve o registro relido, com o livro de guias.
    async fn alterar<F>(&self, alvo: Alvo, regra: F) -> Result<Tributario, AppError>
    where
        F: FnOnce(&mut Tributario) -> Result<AlteracaoGuia, AppError> + Send,
    {
        let alterado = match self.repo.alterar(alvo, Box::new(regra)).await {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(alvo = ?alvo, "Operação rejeitada: {}", e);
                return Err(e);
            }
        };
        self.carregar(alterado.id).await
    }

    // Mutações só de cabeçalho.
    async fn alterar_cabecalho<F>(&self, id: Uuid, regra: F) -> Result<Tributario, AppError>
    where
        F: FnOnce(&mut Tributario) -> Result<(), AppError> + Send,
    {
        self.alterar(Alvo::Tributario(id), |t| {
            regra(t)?;
            t.updated_at = Utc::now();
            Ok(AlteracaoGuia::Nenhuma)
        })
        .await
    }

    // =========================================================================
    //  REGISTRO
    // =========================================================================

    pub async fn buscar_por_projeto(&self, projeto_id: Uuid) -> Result<Tributario, AppError> {
        self.repo
            .find_by_projeto_id(projeto_id)
            .await?
            .ok_or(AppError::TributarioNaoEncontrado)
    }

    pub async fn criar(&self, req: &CreateTributarioRequest) -> Result<Tributario, AppError> {
        let tributario = regras::novo_tributario(req.projeto_id, req.tipo, Utc::now());
        self.repo.insert(&tributario).await?;

        tracing::info!(
            tributario_id = %tributario.id,
            projeto_id = %req.projeto_id,
            tipo = ?req.tipo,
            "Análise tributária criada"
        );
        self.carregar(tributario.id).await
    }

    pub async fn atualizar(
        &self,
        id: Uuid,
        patch: &UpdateTributarioRequest,
    ) -> Result<Tributario, AppError> {
        let atualizado = self
            .alterar_cabecalho(id, |t| regras::aplicar_patch(t, patch))
            .await?;
        tracing::info!(tributario_id = %id, status = ?atualizado.status, "Análise tributária atualizada");
        Ok(atualizado)
    }

    // =========================================================================
    //  IMUNIDADE
    // =========================================================================

    pub async fn solicitar_imunidade(
        &self,
        id: Uuid,
        req: &SolicitarImunidadeRequest,
    ) -> Result<Tributario, AppError> {
        let atualizado = self
            .alterar_cabecalho(id, |t| regras::solicitar_imunidade(t, req))
            .await?;
        tracing::info!(tributario_id = %id, protocolo = %req.protocolo.trim(), "Imunidade solicitada");
        Ok(atualizado)
    }

    pub async fn atualizar_imunidade(
        &self,
        id: Uuid,
        decisao: DecisaoImunidade,
        req: &AtualizarImunidadeRequest,
    ) -> Result<Tributario, AppError> {
        let atualizado = self
            .alterar_cabecalho(id, |t| regras::decidir_imunidade(t, decisao, req))
            .await?;
        tracing::info!(tributario_id = %id, decisao = decisao.as_str(), "Imunidade decidida");
        Ok(atualizado)
    }

    // =========================================================================
    //  GUIAS
    // =========================================================================

    pub async fn emitir_guia(
        &self,
        tributario_id: Uuid,
        req: &EmitirGuiaRequest,
    ) -> Result<Tributario, AppError> {
        let agora = Utc::now();
        let atualizado = self
            .alterar(Alvo::Tributario(tributario_id), |t| {
                let guia = regras::nova_guia(t, req, agora)?;
                regras::registrar_emissao(t, guia.clone());
                t.updated_at = agora;
                Ok(AlteracaoGuia::Emitida(guia))
            })
            .await?;

        if let Some(guia) = atualizado.guias.last() {
            tracing::info!(
                tributario_id = %tributario_id,
                guia_id = %guia.id,
                valor = %guia.valor,
                "Guia emitida"
            );
        }
        Ok(atualizado)
    }

    pub async fn registrar_pagamento(
        &self,
        guia_id: Uuid,
        req: &RegistrarPagamentoRequest,
    ) -> Result<Tributario, AppError> {
        let agora = Utc::now();
        let atualizado = self
            .alterar(Alvo::Guia(guia_id), |t| {
                let guia = regras::registrar_pagamento(t, guia_id, req, agora)?;
                t.updated_at = agora;
                Ok(AlteracaoGuia::Atualizada(guia))
            })
            .await?;

        tracing::info!(
            tributario_id = %atualizado.id,
            guia_id = %guia_id,
            guia_status = ?atualizado.guia(guia_id).map(|g| g.status),
            status = ?atualizado.status,
            "Pagamento de guia registrado"
        );
        Ok(atualizado)
    }

    // =========================================================================
    //  DOSSIÊ
    // =========================================================================

    pub async fn protocolar_dossie(
        &self,
        id: Uuid,
        req: &ProtocolarDossieRequest,
    ) -> Result<Tributario, AppError> {
        let hoje = Utc::now().date_naive();
        let atualizado = self
            .alterar_cabecalho(id, |t| regras::protocolar_dossie(t, req, hoje))
            .await?;
        tracing::info!(tributario_id = %id, protocolo = %req.protocolo.trim(), "Dossiê protocolado");
        Ok(atualizado)
    }

    pub async fn atualizar_dossie(
        &self,
        id: Uuid,
        req: &AtualizarDossieRequest,
    ) -> Result<Tributario, AppError> {
        let atualizado = self
            .alterar_cabecalho(id, |t| regras::atualizar_dossie(t, req.status))
            .await?;
        tracing::info!(tributario_id = %id, status = ?req.status, "Status do dossiê atualizado");
        Ok(atualizado)
    }

    // =========================================================================
    //  GATE
    // =========================================================================

    pub async fn pode_avancar(&self, projeto_id: Uuid) -> Result<PodeAvancarResponse, AppError> {
        let tributario = self.repo.find_by_projeto_id(projeto_id).await?;
        Ok(regras::avaliar_gate(tributario.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::money::Centavos,
        db::MemoryTributarioRepository,
        models::tributario::{StatusGuia, StatusTributario, TipoGuia, TipoOperacaoTributaria},
    };
    use chrono::NaiveDate;

    fn service() -> TributarioService {
        TributarioService::new(Arc::new(MemoryTributarioRepository::new()))
    }

    fn criar_req(tipo: TipoOperacaoTributaria) -> CreateTributarioRequest {
        CreateTributarioRequest { projeto_id: Uuid::new_v4(), tipo }
    }

    #[tokio::test]
    async fn segundo_registro_para_o_mesmo_projeto_falha() {
        let service = service();
        let req = criar_req(TipoOperacaoTributaria::Doacao);
        service.criar(&req).await.unwrap();
        assert!(matches!(service.criar(&req).await, Err(AppError::TributarioJaExiste)));
    }

    #[tokio::test]
    async fn emissao_e_pagamento_persistem_no_livro() {
        let service = service();
        let t = service.criar(&criar_req(TipoOperacaoTributaria::Doacao)).await.unwrap();

        let emissao = EmitirGuiaRequest {
            tipo: TipoGuia::Itcmd,
            numero: Some("123".into()),
            valor: Centavos(150000),
            data_emissao: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            data_vencimento: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        };
        let t = service.emitir_guia(t.id, &emissao).await.unwrap();
        assert_eq!(t.guias.len(), 1);
        assert_eq!(t.guias_valor_total, Centavos(150000));

        let pagamento = RegistrarPagamentoRequest {
            data_pagamento: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            comprovante_drive_id: "drive-1".into(),
        };
        let t = service.registrar_pagamento(t.guias[0].id, &pagamento).await.unwrap();
        assert_eq!(t.guias[0].status, StatusGuia::Paga);
        assert_eq!(t.status, StatusTributario::Pago);
        assert!(t.comprovantes_recebidos);
    }

    #[tokio::test]
    async fn pagamento_de_guia_inexistente_e_404() {
        let pagamento = RegistrarPagamentoRequest {
            data_pagamento: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            comprovante_drive_id: "drive-1".into(),
        };
        assert!(matches!(
            service().registrar_pagamento(Uuid::new_v4(), &pagamento).await,
            Err(AppError::GuiaNaoEncontrada)
        ));
    }

    #[tokio::test]
    async fn gate_sem_registro_nao_e_erro() {
        let resposta = service().pode_avancar(Uuid::new_v4()).await.unwrap();
        assert!(!resposta.pode_avancar);
    }

    #[tokio::test]
    async fn regra_rejeitada_nao_grava_nada() {
        let service = service();
        let t = service.criar(&criar_req(TipoOperacaoTributaria::Outros)).await.unwrap();
        let req = SolicitarImunidadeRequest { protocolo: "1".into(), observacoes: None };
        assert!(matches!(
            service.solicitar_imunidade(t.id, &req).await,
            Err(AppError::ImunidadeNaoAplicavel)
        ));
        let relido = service.buscar_por_projeto(t.projeto_id).await.unwrap();
        assert_eq!(relido, t);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn emissoes_concorrentes_mantem_o_total() {
        let service = service();
        let t = service.criar(&criar_req(TipoOperacaoTributaria::Doacao)).await.unwrap();
        let id = t.id;

        let tarefas: Vec<_> = (0..1000)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move {
                    let req = EmitirGuiaRequest {
                        tipo: TipoGuia::Itcmd,
                        numero: None,
                        valor: Centavos(100),
                        data_emissao: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                        data_vencimento: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
                    };
                    service.emitir_guia(id, &req).await.unwrap();
                })
            })
            .collect();
        for tarefa in tarefas {
            tarefa.await.unwrap();
        }

        let t = service.buscar_por_projeto(t.projeto_id).await.unwrap();
        let soma: Centavos = t.guias.iter().map(|g| g.valor).sum();
        assert_eq!(t.guias.len(), 1000);
        assert_eq!(t.guias_valor_total, soma);
        assert_eq!(t.guias_valor_total, Centavos(100_000));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn pagamentos_concorrentes_da_mesma_guia_so_um_vence() {
        let service = service();
        let t = service.criar(&criar_req(TipoOperacaoTributaria::Doacao)).await.unwrap();
        let emissao = EmitirGuiaRequest {
            tipo: TipoGuia::Itcmd,
            numero: None,
            valor: Centavos(5000),
            data_emissao: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            data_vencimento: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        };
        let guia_id = service.emitir_guia(t.id, &emissao).await.unwrap().guias[0].id;

        let tarefas: Vec<_> = (0..50)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    let pagamento = RegistrarPagamentoRequest {
                        data_pagamento: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
                        comprovante_drive_id: format!("drive-{i}"),
                    };
                    service.registrar_pagamento(guia_id, &pagamento).await
                })
            })
            .collect();

        let mut sucessos = 0;
        for tarefa in tarefas {
            match tarefa.await.unwrap() {
                Ok(_) => sucessos += 1,
                Err(e) => assert!(matches!(e, AppError::GuiaJaPaga), "erro inesperado: {e}"),
            }
        }
        assert_eq!(sucessos, 1);
    }
}
