//! Transactional store backing the CSV import pipeline.
//!
//! One import call scans its whole file through a single [`PgImportTx`];
//! nothing written through it is visible to other readers until `commit`.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use checkin_core::{CreateCheckinRequest, Error, ImportStore, ImportTransaction, Result};

use crate::checkins::insert_checkin_tx;
use crate::tags::{ensure_tag_tx, set_checkin_tags_tx};

/// PostgreSQL implementation of [`ImportStore`].
#[derive(Clone)]
pub struct PgImportStore {
    pool: PgPool,
}

impl PgImportStore {
    /// Create a new PgImportStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImportStore for PgImportStore {
    type Tx = PgImportTx;

    async fn begin(&self) -> Result<PgImportTx> {
        let tx = self.pool.begin().await.map_err(Error::Database)?;
        Ok(PgImportTx { tx })
    }
}

/// A single open import transaction.
pub struct PgImportTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl ImportTransaction for PgImportTx {
    async fn insert_checkin(&mut self, req: CreateCheckinRequest) -> Result<Uuid> {
        insert_checkin_tx(&mut self.tx, req).await
    }

    async fn ensure_tag(&mut self, name: &str) -> Result<()> {
        ensure_tag_tx(&mut self.tx, name).await
    }

    async fn set_checkin_tags(&mut self, checkin_id: Uuid, tags: &[String]) -> Result<()> {
        set_checkin_tags_tx(&mut self.tx, checkin_id, tags).await
    }

    async fn commit(self) -> Result<()> {
        self.tx.commit().await.map_err(Error::Database)
    }

    async fn rollback(self) -> Result<()> {
        self.tx.rollback().await.map_err(Error::Database)
    }
}
