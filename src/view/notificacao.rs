// src/view/notificacao.rs

use crate::client::ClientError;

/// Operações do fluxo tributário que geram notificação.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operacao {
    Criar,
    Atualizar,
    SolicitarImunidade,
    AtualizarImunidade,
    EmitirGuia,
    RegistrarPagamento,
    ProtocolarDossie,
    AtualizarDossie,
}

impl Operacao {
    pub fn mensagem_sucesso(self) -> &'static str {
        match self {
            Operacao::Criar => "Análise tributária criada com sucesso",
            Operacao::Atualizar => "Análise tributária atualizada",
            Operacao::SolicitarImunidade => "Imunidade ITBI solicitada com sucesso",
            Operacao::AtualizarImunidade => "Status da imunidade atualizado",
            Operacao::EmitirGuia => "Guia emitida com sucesso",
            Operacao::RegistrarPagamento => "Pagamento registrado com sucesso",
            Operacao::ProtocolarDossie => "Dossiê protocolado com sucesso",
            Operacao::AtualizarDossie => "Status do dossiê atualizado",
        }
    }

    pub fn mensagem_erro(self) -> &'static str {
        match self {
            Operacao::Criar => "Erro ao criar análise tributária",
            Operacao::Atualizar => "Erro ao atualizar análise tributária",
            Operacao::SolicitarImunidade => "Erro ao solicitar imunidade",
            Operacao::AtualizarImunidade => "Erro ao atualizar imunidade",
            Operacao::EmitirGuia => "Erro ao emitir guia",
            Operacao::RegistrarPagamento => "Erro ao registrar pagamento",
            Operacao::ProtocolarDossie => "Erro ao protocolar dossiê",
            Operacao::AtualizarDossie => "Erro ao atualizar dossiê",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notificacao {
    Sucesso(String),
    Erro(String),
}

/// Notificação transitória do resultado de uma mutação.
pub fn notificacao<T>(operacao: Operacao, resultado: &Result<T, ClientError>) -> Notificacao {
    match resultado {
        Ok(_) => Notificacao::Sucesso(operacao.mensagem_sucesso().to_string()),
        Err(e) => Notificacao::Erro(e.user_message(operacao.mensagem_erro())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn erro_da_api_usa_a_mensagem_do_servidor() {
        let resultado: Result<(), _> = Err(ClientError::Api {
            status: 409,
            mensagens: vec!["Esta guia já está paga.".into()],
        });
        assert_eq!(
            notificacao(Operacao::RegistrarPagamento, &resultado),
            Notificacao::Erro("Esta guia já está paga.".into())
        );
    }

    #[test]
    fn erro_sem_mensagem_usa_o_texto_da_operacao() {
        let resultado: Result<(), _> = Err(ClientError::Api { status: 500, mensagens: vec![] });
        assert_eq!(
            notificacao(Operacao::EmitirGuia, &resultado),
            Notificacao::Erro("Erro ao emitir guia".into())
        );
        assert_eq!(
            notificacao(Operacao::EmitirGuia, &Ok::<(), ClientError>(())),
            Notificacao::Sucesso("Guia emitida com sucesso".into())
        );
    }
}
