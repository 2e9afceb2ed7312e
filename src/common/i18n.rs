// src/common/i18n.rs

use std::collections::HashMap;

pub const IDIOMA_PADRAO: &str = "pt";

/// Tabela de mensagens de erro por idioma, montada uma vez na inicialização.
/// Mensagens podem ter parâmetros posicionais `{0}`, `{1}`...
#[derive(Debug, Clone)]
pub struct I18nStore {
    mensagens: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

impl I18nStore {
    pub fn new() -> Self {
        let mut mensagens = HashMap::new();
        mensagens.insert("pt", HashMap::from(PT));
        mensagens.insert("en", HashMap::from(EN));
        Self { mensagens }
    }

    /// Traduz a chave para o idioma pedido, caindo para o português
    /// e, por último, para a própria chave.
    pub fn translate(&self, lang: &str, key: &str, args: &[String]) -> String {
        let template = self
            .mensagens
            .get(lang)
            .and_then(|m| m.get(key))
            .or_else(|| self.mensagens.get(IDIOMA_PADRAO).and_then(|m| m.get(key)))
            .copied()
            .unwrap_or(key);

        args.iter()
            .enumerate()
            .fold(template.to_string(), |msg, (i, arg)| {
                msg.replace(&format!("{{{i}}}"), arg)
            })
    }
}

const PT: [(&str, &str); 23] = [
    ("validation.invalid", "Um ou mais campos são inválidos."),
    ("request.invalid", "Requisição inválida: {0}"),
    ("tributario.already_exists", "Já existe uma análise tributária para este projeto."),
    ("tributario.not_found", "Análise tributária não encontrada."),
    ("guia.not_found", "Guia tributária não encontrada."),
    ("guia.already_paid", "Esta guia já está paga."),
    ("guia.cancelled", "Não é possível registrar pagamento de uma guia cancelada."),
    ("guia.due_before_issue", "A data de vencimento não pode ser anterior à data de emissão."),
    ("imunidade.not_applicable", "A imunidade de ITBI só se aplica a operações de integralização de bens."),
    ("imunidade.invalid_transition", "Não é possível executar esta ação com a imunidade no status {0}."),
    ("imunidade.invalid_decision", "Decisão de imunidade inválida: {0}. Use DEFERIDA ou INDEFERIDA."),
    ("dossie.already_filed", "O dossiê administrativo já foi protocolado."),
    ("dossie.not_filed", "O dossiê administrativo ainda não foi protocolado."),
    ("auth.email_exists", "Este e-mail já está em uso."),
    ("auth.invalid_credentials", "E-mail ou senha inválidos."),
    ("auth.invalid_token", "Token de autenticação inválido ou ausente."),
    ("auth.forbidden", "Você não tem permissão para acessar este recurso."),
    ("activation.invalid", "Token inválido."),
    ("activation.expired", "Token expirado. Solicite um novo link de ativação."),
    ("activation.used", "Este token já foi utilizado."),
    ("internal", "Ocorreu um erro inesperado. Tente novamente mais tarde."),
    ("field.required", "O campo '{0}' é obrigatório."),
    ("route.not_found", "Recurso não encontrado."),
];

const EN: [(&str, &str); 23] = [
    ("validation.invalid", "One or more fields are invalid."),
    ("request.invalid", "Invalid request: {0}"),
    ("tributario.already_exists", "A tax analysis already exists for this project."),
    ("tributario.not_found", "Tax analysis not found."),
    ("guia.not_found", "Tax guide not found."),
    ("guia.already_paid", "This guide is already paid."),
    ("guia.cancelled", "Cannot register payment for a cancelled guide."),
    ("guia.due_before_issue", "The due date cannot be earlier than the issue date."),
    ("imunidade.not_applicable", "ITBI immunity only applies to capital contribution in kind."),
    ("imunidade.invalid_transition", "This action is not allowed while immunity status is {0}."),
    ("imunidade.invalid_decision", "Invalid immunity decision: {0}. Use DEFERIDA or INDEFERIDA."),
    ("dossie.already_filed", "The administrative dossier has already been filed."),
    ("dossie.not_filed", "The administrative dossier has not been filed yet."),
    ("auth.email_exists", "This e-mail is already in use."),
    ("auth.invalid_credentials", "Invalid e-mail or password."),
    ("auth.invalid_token", "Invalid or missing authentication token."),
    ("auth.forbidden", "You are not allowed to access this resource."),
    ("activation.invalid", "Invalid token."),
    ("activation.expired", "Token expired. Request a new activation link."),
    ("activation.used", "This token has already been used."),
    ("internal", "An unexpected error occurred. Please try again later."),
    ("field.required", "The field '{0}' is required."),
    ("route.not_found", "Resource not found."),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traduz_com_parametros() {
        let store = I18nStore::new();
        let msg = store.translate("pt", "field.required", &["protocolo".to_string()]);
        assert_eq!(msg, "O campo 'protocolo' é obrigatório.");
    }

    #[test]
    fn idioma_desconhecido_cai_para_portugues() {
        let store = I18nStore::new();
        assert_eq!(
            store.translate("fr", "guia.already_paid", &[]),
            "Esta guia já está paga."
        );
        assert_eq!(store.translate("en", "guia.already_paid", &[]), "This guide is already paid.");
    }

    #[test]
    fn chave_desconhecida_retorna_a_chave() {
        let store = I18nStore::new();
        assert_eq!(store.translate("pt", "nao.existe", &[]), "nao.existe");
    }
}
