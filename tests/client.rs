mod common;

use chrono::{Duration, NaiveDate, Utc};
use tributario_backend::{
    client::{ClientConfig, ClientError, EmitirGuiaForm, QueryKey, TributarioClient},
    common::money::Centavos,
    config::{AppState, Config},
    models::{
        auth::RoleType,
        tributario::{
            CreateTributarioRequest, DecisaoImunidade, RegistrarPagamentoRequest,
            SolicitarImunidadeRequest, StatusGuia, StatusImunidade, StatusTributario, TipoGuia,
            TipoOperacaoTributaria,
        },
    },
    view::{
        guias::tabela_guias,
        imunidade::{secao_imunidade, SecaoImunidade},
    },
};
use uuid::Uuid;

use crate::common::{spawn_server, SENHA};

async fn cliente_logado(role: RoleType) -> TributarioClient {
    let state = AppState::in_memory(Config::for_tests());
    let email = format!("{}@escritorio.com.br", Uuid::new_v4());
    state
        .auth_service
        .register_user(&tributario_backend::models::auth::RegisterUserPayload {
            nome: "Ana Lima".into(),
            email: email.clone(),
            senha: Some(SENHA.into()),
            role,
        })
        .await
        .unwrap();

    let url = spawn_server(state).await;
    let client = TributarioClient::new(ClientConfig::new(url));
    client.login(&email, SENHA).await.unwrap();
    client
}

#[tokio::test]
async fn projeto_sem_analise_e_ausencia() {
    let client = cliente_logado(RoleType::Advogado).await;
    let projeto_id = Uuid::new_v4();

    assert_eq!(client.buscar_por_projeto(projeto_id).await.unwrap(), None);
    assert!(client.cache().contains(&QueryKey::Tributario(projeto_id)).await);
}

#[tokio::test]
async fn cenario_doacao_guia_e_pagamento() {
    let client = cliente_logado(RoleType::Advogado).await;
    let projeto_id = Uuid::new_v4();

    // Ausência fica em cache até a criação invalidar o projeto
    assert_eq!(client.buscar_por_projeto(projeto_id).await.unwrap(), None);
    let criado = client
        .criar(&CreateTributarioRequest { projeto_id, tipo: TipoOperacaoTributaria::Doacao })
        .await
        .unwrap();
    assert!(!client.cache().contains(&QueryKey::Tributario(projeto_id)).await);

    let t = client.buscar_por_projeto(projeto_id).await.unwrap().unwrap();
    assert_eq!(t.id, criado.id);
    assert_eq!(t.status, StatusTributario::Pendente);
    assert_eq!(t.imunidade_status, Some(StatusImunidade::NaoAplicavel));

    let form = EmitirGuiaForm {
        tipo: TipoGuia::Itcmd,
        numero: None,
        valor: "250.50".into(),
        data_emissao: NaiveDate::from_ymd_opt(2024, 1, 1),
        data_vencimento: NaiveDate::from_ymd_opt(2024, 1, 31),
    };
    let t = client.emitir_guia(t.id, form).await.unwrap();
    assert_eq!(t.guias.len(), 1);
    assert_eq!(t.guias[0].valor, Centavos(25050));
    assert_eq!(t.guias[0].status, StatusGuia::Pendente);
    assert!(tabela_guias(&t.guias)[0].registrar_pagamento);

    let pagamento = RegistrarPagamentoRequest {
        data_pagamento: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        comprovante_drive_id: "abc123".into(),
    };
    client.registrar_pagamento(t.guias[0].id, &pagamento).await.unwrap();

    let t = client.buscar_por_projeto(projeto_id).await.unwrap().unwrap();
    assert_eq!(t.guias[0].status, StatusGuia::Paga);
    assert!(!tabela_guias(&t.guias)[0].registrar_pagamento);

    let gate = client.pode_avancar(projeto_id).await.unwrap();
    assert!(!gate.pode_avancar);
}

#[tokio::test]
async fn emissao_com_datas_padrao() {
    let client = cliente_logado(RoleType::Advogado).await;
    let projeto_id = Uuid::new_v4();
    let t = client
        .criar(&CreateTributarioRequest { projeto_id, tipo: TipoOperacaoTributaria::Outros })
        .await
        .unwrap();

    let form = EmitirGuiaForm {
        tipo: TipoGuia::TaxaJunta,
        numero: Some("JC-1".into()),
        valor: "1500.00".into(),
        data_emissao: None,
        data_vencimento: None,
    };
    let t = client.emitir_guia(t.id, form).await.unwrap();
    let guia = &t.guias[0];
    assert_eq!(guia.valor, Centavos(150000));
    assert_eq!(guia.data_vencimento - guia.data_emissao, Duration::days(30));
}

#[tokio::test]
async fn cenario_imunidade_deferida() {
    let client = cliente_logado(RoleType::Advogado).await;
    let projeto_id = Uuid::new_v4();
    let t = client
        .criar(&CreateTributarioRequest { projeto_id, tipo: TipoOperacaoTributaria::Integralizacao })
        .await
        .unwrap();

    let req = SolicitarImunidadeRequest { protocolo: "2024/001".into(), observacoes: None };
    let t = client.solicitar_imunidade(t.id, &req).await.unwrap();
    assert_eq!(t.imunidade_status, Some(StatusImunidade::EmAnalise));
    let secao = secao_imunidade(&t).unwrap();
    assert_eq!(secao.acoes_de_decisao(), &[DecisaoImunidade::Deferida, DecisaoImunidade::Indeferida]);

    let t = client.decidir_imunidade(t.id, DecisaoImunidade::Deferida).await.unwrap();
    assert_eq!(t.imunidade_status, Some(StatusImunidade::Deferida));
    assert_eq!(t.imunidade_deferimento, Some(Utc::now().date_naive()));
    assert!(matches!(secao_imunidade(&t), Some(SecaoImunidade::Deferida { .. })));
}

#[tokio::test]
async fn validacao_local_nao_chega_ao_servidor() {
    let client = cliente_logado(RoleType::Advogado).await;
    let req = SolicitarImunidadeRequest { protocolo: "  ".into(), observacoes: None };
    let erro = client.solicitar_imunidade(Uuid::new_v4(), &req).await.unwrap_err();
    assert!(matches!(erro, ClientError::Validacao(_)));
}

#[tokio::test]
async fn mutacao_invalida_o_gate_do_projeto() {
    let client = cliente_logado(RoleType::Admin).await;
    let projeto_id = Uuid::new_v4();

    let gate = client.pode_avancar(projeto_id).await.unwrap();
    assert!(!gate.pode_avancar);
    assert!(client.cache().contains(&QueryKey::PodeAvancar(projeto_id)).await);

    client
        .criar(&CreateTributarioRequest { projeto_id, tipo: TipoOperacaoTributaria::Doacao })
        .await
        .unwrap();
    assert!(!client.cache().contains(&QueryKey::PodeAvancar(projeto_id)).await);
}

#[tokio::test]
async fn cliente_sem_permissao_recebe_mensagem_do_servidor() {
    let client = cliente_logado(RoleType::Cliente).await;
    let erro = client
        .criar(&CreateTributarioRequest {
            projeto_id: Uuid::new_v4(),
            tipo: TipoOperacaoTributaria::Doacao,
        })
        .await
        .unwrap_err();

    assert_eq!(erro.status(), Some(403));
    assert_eq!(
        erro.user_message("Erro ao criar análise tributária"),
        "Você não tem permissão para acessar este recurso."
    );
}
