//! `TodoStore` over an `sqlx::AnyPool`.
//!
//! MySQL and SQLite share every statement; only the table DDL differs, and
//! that comes from `Backend`. Writes prepare the statement first and then
//! execute it, so the two failure steps stay distinguishable.

use async_trait::async_trait;
use sqlx::any::{AnyPoolOptions, AnyRow};
use sqlx::AnyPool;
use sqlx::{Executor, Row, Statement};
use tokio::sync::mpsc;

use super::{
    forward_rows, stream_from, Backend, DatabaseConfig, TodoStore, TodoStream, DELETE_SQL,
    INSERT_SQL, LIST_SQL, UPDATE_SQL,
};
use crate::error::{StartupError, StoreError};
use crate::types::{Todo, TodoId};

/// Rows buffered between the fetching task and the response body.
const ROW_BUFFER: usize = 32;

#[derive(Debug, Clone)]
pub struct SqlStore {
    pool: AnyPool,
    backend: Backend,
}

impl SqlStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StartupError> {
        sqlx::any::install_default_drivers();

        let mut options = AnyPoolOptions::new().max_connections(config.max_connections);
        if config.is_in_memory() {
            // The database is gone once its last connection closes.
            options = options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }
        let pool = options
            .connect(&config.dsn)
            .await
            .map_err(StartupError::Connect)?;

        let store = Self {
            pool,
            backend: Backend::from_dsn(&config.dsn),
        };
        store.ensure_schema().await?;
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> Result<(), StartupError> {
        let sql = self.backend.create_table_sql();
        sqlx::query(sql)
            .execute(&self.pool)
            .await
            .map_err(|source| StartupError::Migrate { sql, source })?;
        Ok(())
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }
}

fn decode(row: &AnyRow) -> Result<Todo, sqlx::Error> {
    Ok(Todo {
        id: row.try_get("id")?,
        note: row.try_get("note")?,
    })
}

#[async_trait]
impl TodoStore for SqlStore {
    async fn list(&self) -> Result<TodoStream, StoreError> {
        let (tx, rx) = mpsc::channel(ROW_BUFFER);
        let pool = self.pool.clone();
        tokio::spawn(async move {
            forward_rows(sqlx::query(LIST_SQL).fetch(&pool), decode, tx).await;
        });
        stream_from(rx).await
    }

    async fn create(&self, note: &str) -> Result<(), StoreError> {
        let stmt = (&self.pool)
            .prepare(INSERT_SQL)
            .await
            .map_err(StoreError::Prepare)?;
        let result = stmt
            .query()
            .bind(note)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Exec)?;
        tracing::debug!(rows_affected = result.rows_affected(), "todo inserted");
        Ok(())
    }

    async fn update(&self, id: &TodoId, note: &str) -> Result<(), StoreError> {
        let stmt = (&self.pool)
            .prepare(UPDATE_SQL)
            .await
            .map_err(StoreError::Prepare)?;
        let result = stmt
            .query()
            .bind(note)
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(StoreError::Exec)?;
        tracing::debug!(id = id.as_str(), rows_affected = result.rows_affected(), "todo updated");
        Ok(())
    }

    async fn delete(&self, id: &TodoId) -> Result<(), StoreError> {
        let stmt = (&self.pool)
            .prepare(DELETE_SQL)
            .await
            .map_err(StoreError::Prepare)?;
        let result = stmt
            .query()
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(StoreError::Exec)?;
        tracing::debug!(id = id.as_str(), rows_affected = result.rows_affected(), "todo deleted");
        Ok(())
    }
}
