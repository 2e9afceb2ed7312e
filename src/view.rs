//! Decisões de apresentação da etapa tributária.
//!
//! Funções puras sobre os tipos do domínio: o que aparece, com qual
//! rótulo e quais ações ficam disponíveis. Nenhuma regra de transição
//! é decidida aqui, só refletida.

pub mod dossie;
pub mod formato;
pub mod gate;
pub mod guias;
pub mod imunidade;
pub mod notificacao;
pub mod resumo;

/// Variante visual de um selo ou painel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variante {
    Sucesso,
    Falha,
    Pendente,
    Neutra,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icone {
    Confirmado,
    Recusado,
    Relogio,
    Alerta,
}
