use serde_json::Value;
use shared_types::AppError;
use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

use super::{key_conflict, RawRecord, Write};
use crate::error_convert::SqlxErrorExt;

/// Postgres-backed record store. Bodies live in `records.body` (JSONB);
/// unique values in `record_keys`.
#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

const UNIQUE_VIOLATION: &str = "23505";

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>, AppError> {
        self.pool.begin().await.map_err(SqlxErrorExt::into_app_error)
    }

    async fn insert_in(
        tx: &mut Transaction<'static, Postgres>,
        kind: &'static str,
        id: Uuid,
        body: &Value,
        keys: &[(&'static str, String)],
    ) -> Result<(), AppError> {
        sqlx::query("INSERT INTO records (kind, id, version, body) VALUES ($1, $2, 1, $3)")
            .bind(kind)
            .bind(id)
            .bind(body)
            .execute(&mut **tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::conflict("Record already exists")
                } else {
                    e.into_app_error()
                }
            })?;
        Self::claim_keys_in(tx, kind, id, keys).await
    }

    /// Returns false if the stored version is not `expected_version`.
    async fn replace_in(
        tx: &mut Transaction<'static, Postgres>,
        kind: &'static str,
        id: Uuid,
        expected_version: i64,
        body: &Value,
        keys: &[(&'static str, String)],
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE records
            SET body = $1, version = version + 1, updated_at = NOW()
            WHERE kind = $2 AND id = $3 AND version = $4
            "#,
        )
        .bind(body)
        .bind(kind)
        .bind(id)
        .bind(expected_version)
        .execute(&mut **tx)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("DELETE FROM record_keys WHERE kind = $1 AND record_id = $2")
            .bind(kind)
            .bind(id)
            .execute(&mut **tx)
            .await
            .map_err(SqlxErrorExt::into_app_error)?;
        Self::claim_keys_in(tx, kind, id, keys).await?;
        Ok(true)
    }

    async fn claim_keys_in(
        tx: &mut Transaction<'static, Postgres>,
        kind: &'static str,
        id: Uuid,
        keys: &[(&'static str, String)],
    ) -> Result<(), AppError> {
        for (name, value) in keys {
            sqlx::query(
                "INSERT INTO record_keys (kind, key_name, key_value, record_id) VALUES ($1, $2, $3, $4)",
            )
            .bind(kind)
            .bind(*name)
            .bind(value)
            .bind(id)
            .execute(&mut **tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    key_conflict(name)
                } else {
                    e.into_app_error()
                }
            })?;
        }
        Ok(())
    }

    pub async fn insert(
        &self,
        kind: &'static str,
        id: Uuid,
        body: Value,
        keys: &[(&'static str, String)],
    ) -> Result<(), AppError> {
        let mut tx = self.begin().await?;
        Self::insert_in(&mut tx, kind, id, &body, keys).await?;
        tx.commit().await.map_err(SqlxErrorExt::into_app_error)
    }

    pub async fn get(&self, kind: &'static str, id: Uuid) -> Result<Option<RawRecord>, AppError> {
        let row = sqlx::query_as::<_, (i64, Value)>(
            "SELECT version, body FROM records WHERE kind = $1 AND id = $2",
        )
        .bind(kind)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

        Ok(row.map(|(version, body)| RawRecord { version, body }))
    }

    /// Every record of `kind` in insertion order. Scope filtering happens in
    /// the engines on the decoded records.
    pub async fn list(&self, kind: &'static str) -> Result<Vec<RawRecord>, AppError> {
        let rows = sqlx::query_as::<_, (i64, Value)>(
            "SELECT version, body FROM records WHERE kind = $1 ORDER BY seq",
        )
        .bind(kind)
        .fetch_all(&self.pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

        Ok(rows
            .into_iter()
            .map(|(version, body)| RawRecord { version, body })
            .collect())
    }

    pub async fn find_by_key(
        &self,
        kind: &'static str,
        key_name: &str,
        value: &str,
    ) -> Result<Option<RawRecord>, AppError> {
        let row = sqlx::query_as::<_, (i64, Value)>(
            r#"
            SELECT r.version, r.body
            FROM record_keys k
            JOIN records r ON r.kind = k.kind AND r.id = k.record_id
            WHERE k.kind = $1 AND k.key_name = $2 AND k.key_value = $3
            "#,
        )
        .bind(kind)
        .bind(key_name)
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

        Ok(row.map(|(version, body)| RawRecord { version, body }))
    }

    pub async fn compare_and_swap(
        &self,
        kind: &'static str,
        id: Uuid,
        expected_version: i64,
        body: Value,
        keys: &[(&'static str, String)],
    ) -> Result<bool, AppError> {
        let mut tx = self.begin().await?;
        if !Self::replace_in(&mut tx, kind, id, expected_version, &body, keys).await? {
            return Ok(false);
        }
        tx.commit().await.map_err(SqlxErrorExt::into_app_error)?;
        Ok(true)
    }

    pub async fn delete(&self, kind: &'static str, id: Uuid) -> Result<Option<Value>, AppError> {
        // record_keys rows go with it through ON DELETE CASCADE.
        let body = sqlx::query_scalar::<_, Value>(
            "DELETE FROM records WHERE kind = $1 AND id = $2 RETURNING body",
        )
        .bind(kind)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;
        Ok(body)
    }

    pub async fn commit(&self, writes: Vec<Write>) -> Result<bool, AppError> {
        let mut tx = self.begin().await?;
        for write in &writes {
            match write {
                Write::Insert { kind, id, body, keys } => {
                    Self::insert_in(&mut tx, *kind, *id, body, keys).await?;
                }
                Write::Replace {
                    kind,
                    id,
                    expected_version,
                    body,
                    keys,
                } => {
                    if !Self::replace_in(&mut tx, *kind, *id, *expected_version, body, keys).await? {
                        // Dropping the transaction rolls back earlier writes.
                        return Ok(false);
                    }
                }
            }
        }
        tx.commit().await.map_err(SqlxErrorExt::into_app_error)?;
        Ok(true)
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
            .map_err(SqlxErrorExt::into_app_error)
    }
}
