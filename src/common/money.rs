// src/common/money.rs

use std::fmt;
use std::str::FromStr;

use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Valor monetário em centavos de real.
///
/// Todo valor que circula entre cliente, API e banco é um inteiro de centavos.
/// A conversão de texto em reais acontece uma única vez, em [`Centavos::from_reais`],
/// e a volta para texto uma única vez, em [`Centavos::formatar`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    sqlx::Type, ToSchema,
)]
#[serde(transparent)]
#[sqlx(transparent)]
#[schema(value_type = i64, example = 150000)]
pub struct Centavos(pub i64);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Informe o valor")]
    Vazio,

    #[error("Valor inválido: '{0}'")]
    Invalido(String),

    #[error("O valor não pode ser negativo")]
    Negativo,

    #[error("Valor fora do limite suportado")]
    ForaDoLimite,
}

impl Centavos {
    pub const ZERO: Centavos = Centavos(0);

    /// Converte um valor decimal em reais ("1500.00") para centavos,
    /// arredondando para o centavo mais próximo ("19.999" -> 2000).
    pub fn from_reais(input: &str) -> Result<Self, MoneyError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(MoneyError::Vazio);
        }

        // "250,50" (vírgula decimal, sem separador de milhar) também é aceito
        let normalizado = if trimmed.contains(',') && !trimmed.contains('.') {
            trimmed.replacen(',', ".", 1)
        } else {
            trimmed.to_string()
        };

        let reais = Decimal::from_str(&normalizado)
            .map_err(|_| MoneyError::Invalido(input.to_string()))?;

        if reais.is_sign_negative() && !reais.is_zero() {
            return Err(MoneyError::Negativo);
        }

        let centavos = reais
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or(MoneyError::ForaDoLimite)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

        centavos.to_i64().map(Centavos).ok_or(MoneyError::ForaDoLimite)
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Formata no padrão pt-BR: `Centavos(150000)` -> "R$ 1.500,00".
    pub fn formatar(self) -> String {
        let sinal = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let reais = (abs / 100).to_string();
        let centavos = abs % 100;

        let mut agrupado = String::with_capacity(reais.len() + reais.len() / 3);
        for (i, digito) in reais.chars().enumerate() {
            if i > 0 && (reais.len() - i) % 3 == 0 {
                agrupado.push('.');
            }
            agrupado.push(digito);
        }

        format!("{sinal}R$ {agrupado},{centavos:02}")
    }
}

impl fmt::Display for Centavos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatar())
    }
}

impl std::iter::Sum for Centavos {
    fn sum<I: Iterator<Item = Centavos>>(iter: I) -> Self {
        Centavos(iter.map(|c| c.0).sum())
    }
}
