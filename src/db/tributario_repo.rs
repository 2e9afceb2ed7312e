// src/db/tributario_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Executor};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AlteracaoGuia, Alvo, Regra, TributarioRepository},
    models::tributario::{GuiaTributaria, Tributario},
};

const TRIBUTARIO_COLUMNS: &str = r#"
    id, projeto_id, tipo, status,
    imunidade_status, imunidade_protocolo, imunidade_deferimento, imunidade_observacoes,
    guias_emitidas, guias_valor_total, comprovantes_recebidos,
    dossie_protocolo, dossie_status, dossie_data, dossie_observacoes,
    created_at, updated_at
"#;

const GUIA_COLUMNS: &str = r#"
    id, tributario_id, tipo, numero, valor, data_emissao, data_vencimento,
    status, data_pagamento, comprovante_drive_id, created_at, updated_at
"#;

#[derive(Clone)]
pub struct PgTributarioRepository {
    pool: PgPool,
}

impl PgTributarioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Carrega o cabeçalho por uma condição arbitrária e anexa as guias.
    async fn find_where(&self, condition: &str, value: Uuid) -> Result<Option<Tributario>, AppError> {
        let sql = format!("SELECT {TRIBUTARIO_COLUMNS} FROM tributarios WHERE {condition}");
        let header = sqlx::query_as::<_, Tributario>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        match header {
            Some(mut tributario) => {
                tributario.guias = Self::list_guias(&self.pool, tributario.id).await?;
                Ok(Some(tributario))
            }
            None => Ok(None),
        }
    }

    async fn list_guias<'e, E>(executor: E, tributario_id: Uuid) -> Result<Vec<GuiaTributaria>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // `seq` é a ordem de emissão
        let sql = format!(
            "SELECT {GUIA_COLUMNS} FROM guias_tributarias WHERE tributario_id = $1 ORDER BY seq ASC"
        );
        let guias = sqlx::query_as::<_, GuiaTributaria>(&sql)
            .bind(tributario_id)
            .fetch_all(executor)
            .await?;

        Ok(guias)
    }

    async fn insert_guia<'e, E>(executor: E, guia: &GuiaTributaria) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO guias_tributarias (
                id, tributario_id, tipo, numero, valor, data_emissao, data_vencimento,
                status, data_pagamento, comprovante_drive_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(guia.id)
        .bind(guia.tributario_id)
        .bind(guia.tipo)
        .bind(&guia.numero)
        .bind(guia.valor)
        .bind(guia.data_emissao)
        .bind(guia.data_vencimento)
        .bind(guia.status)
        .bind(guia.data_pagamento)
        .bind(&guia.comprovante_drive_id)
        .bind(guia.created_at)
        .bind(guia.updated_at)
        .execute(executor)
        .await?;

        Ok(())
    }

    async fn update_guia<'e, E>(executor: E, guia: &GuiaTributaria) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE guias_tributarias SET
                tipo = $2, numero = $3, valor = $4, data_emissao = $5, data_vencimento = $6,
                status = $7, data_pagamento = $8, comprovante_drive_id = $9, updated_at = $10
            WHERE id = $1
            "#,
        )
        .bind(guia.id)
        .bind(guia.tipo)
        .bind(&guia.numero)
        .bind(guia.valor)
        .bind(guia.data_emissao)
        .bind(guia.data_vencimento)
        .bind(guia.status)
        .bind(guia.data_pagamento)
        .bind(&guia.comprovante_drive_id)
        .bind(guia.updated_at)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::GuiaNaoEncontrada);
        }
        Ok(())
    }

    async fn update_header<'e, E>(executor: E, t: &Tributario) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE tributarios SET
                tipo = $2, status = $3,
                imunidade_status = $4, imunidade_protocolo = $5,
                imunidade_deferimento = $6, imunidade_observacoes = $7,
                guias_emitidas = $8, guias_valor_total = $9, comprovantes_recebidos = $10,
                dossie_protocolo = $11, dossie_status = $12, dossie_data = $13,
                dossie_observacoes = $14, updated_at = $15
            WHERE id = $1
            "#,
        )
        .bind(t.id)
        .bind(t.tipo)
        .bind(t.status)
        .bind(t.imunidade_status)
        .bind(&t.imunidade_protocolo)
        .bind(t.imunidade_deferimento)
        .bind(&t.imunidade_observacoes)
        .bind(t.guias_emitidas)
        .bind(t.guias_valor_total)
        .bind(t.comprovantes_recebidos)
        .bind(&t.dossie_protocolo)
        .bind(t.dossie_status)
        .bind(t.dossie_data)
        .bind(&t.dossie_observacoes)
        .bind(t.updated_at)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::TributarioNaoEncontrado);
        }
        Ok(())
    }
}

#[async_trait]
impl TributarioRepository for PgTributarioRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tributario>, AppError> {
        self.find_where("id = $1", id).await
    }

    async fn find_by_projeto_id(&self, projeto_id: Uuid) -> Result<Option<Tributario>, AppError> {
        self.find_where("projeto_id = $1", projeto_id).await
    }

    async fn insert(&self, t: &Tributario) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO tributarios (
                id, projeto_id, tipo, status, imunidade_status,
                guias_emitidas, guias_valor_total, comprovantes_recebidos,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(t.id)
        .bind(t.projeto_id)
        .bind(t.tipo)
        .bind(t.status)
        .bind(t.imunidade_status)
        .bind(t.guias_emitidas)
        .bind(t.guias_valor_total)
        .bind(t.comprovantes_recebidos)
        .bind(t.created_at)
        .bind(t.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // UNIQUE (projeto_id): um registro por projeto
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::TributarioJaExiste;
                }
            }
            AppError::DatabaseError(e)
        })?;

        Ok(())
    }

    async fn alterar<'a>(&self, alvo: Alvo, regra: Regra<'a>) -> Result<Tributario, AppError> {
        let (condition, value) = match alvo {
            Alvo::Tributario(id) => ("id = $1", id),
            Alvo::Guia(guia_id) => (
                "id = (SELECT tributario_id FROM guias_tributarias WHERE id = $1)",
                guia_id,
            ),
        };

        let mut tx = self.pool.begin().await?;

        // FOR UPDATE serializa as alterações do mesmo registro até o commit
        let sql = format!("SELECT {TRIBUTARIO_COLUMNS} FROM tributarios WHERE {condition} FOR UPDATE");
        let mut tributario = sqlx::query_as::<_, Tributario>(&sql)
            .bind(value)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(alvo.nao_encontrado())?;
        tributario.guias = Self::list_guias(&mut *tx, tributario.id).await?;

        // Erro da regra: a transação cai no drop (rollback)
        match regra(&mut tributario)? {
            AlteracaoGuia::Nenhuma => {}
            AlteracaoGuia::Emitida(guia) => Self::insert_guia(&mut *tx, &guia).await?,
            AlteracaoGuia::Atualizada(guia) => Self::update_guia(&mut *tx, &guia).await?,
        }
        Self::update_header(&mut *tx, &tributario).await?;

        tx.commit().await?;
        Ok(tributario)
    }
}
