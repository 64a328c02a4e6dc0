//! Check-in repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row, Transaction};
use tracing::debug;
use uuid::Uuid;

use checkin_core::defaults::{PAGE_LIMIT, PAGE_OFFSET};
use checkin_core::{
    CheckinEvent, CheckinRepository, CreateCheckinRequest, Error, ListCheckinsRequest,
    ListCheckinsResponse, Result,
};

use crate::tags::{ensure_tag_tx, set_checkin_tags_tx};

/// Insert a check-in inside an open transaction, returning its ID.
///
/// Tags requested on the payload are ensured and linked in the same
/// transaction.
pub(crate) async fn insert_checkin_tx(
    tx: &mut Transaction<'_, Postgres>,
    req: CreateCheckinRequest,
) -> Result<Uuid> {
    let checkin_id = Uuid::now_v7();
    let now = Utc::now();

    sqlx::query(
        "INSERT INTO checkin (id, user_id, checked_in_at, note, link, source, created_at_utc, updated_at_utc)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $7)",
    )
    .bind(checkin_id)
    .bind(req.user_id)
    .bind(req.checked_in_at)
    .bind(&req.note)
    .bind(&req.link)
    .bind(req.source.as_str())
    .bind(now)
    .execute(&mut **tx)
    .await
    .map_err(Error::Database)?;

    if let Some(tags) = req.tags {
        for tag_name in &tags {
            ensure_tag_tx(tx, tag_name).await?;
        }
        set_checkin_tags_tx(tx, checkin_id, &tags).await?;
    }

    debug!(
        subsystem = "db",
        component = "checkins",
        op = "insert",
        checkin_id = %checkin_id,
        "Check-in inserted"
    );
    Ok(checkin_id)
}

fn row_to_checkin(row: &sqlx::postgres::PgRow) -> Result<CheckinEvent> {
    let source: String = row.get("source");
    Ok(CheckinEvent {
        id: row.get("id"),
        user_id: row.get("user_id"),
        checked_in_at: row.get("checked_in_at"),
        note: row.get("note"),
        link: row.get("link"),
        source: source.parse().map_err(Error::Internal)?,
        created_at_utc: row.get("created_at_utc"),
        updated_at_utc: row.get("updated_at_utc"),
        tags: row.get("tags"),
    })
}

/// PostgreSQL implementation of CheckinRepository.
pub struct PgCheckinRepository {
    pool: Pool<Postgres>,
}

impl PgCheckinRepository {
    /// Create a new PgCheckinRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CheckinRepository for PgCheckinRepository {
    async fn insert(&self, req: CreateCheckinRequest) -> Result<Uuid> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let checkin_id = insert_checkin_tx(&mut tx, req).await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(checkin_id)
    }

    async fn fetch(&self, id: Uuid) -> Result<CheckinEvent> {
        let row = sqlx::query(
            r#"
            SELECT
                c.id, c.user_id, c.checked_in_at, c.note, c.link, c.source,
                c.created_at_utc, c.updated_at_utc,
                COALESCE(
                    array_agg(ct.tag_name ORDER BY ct.tag_name)
                        FILTER (WHERE ct.tag_name IS NOT NULL),
                    '{}'
                ) AS tags
            FROM checkin c
            LEFT JOIN checkin_tag ct ON ct.checkin_id = c.id
            WHERE c.id = $1
            GROUP BY c.id
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or(Error::CheckinNotFound(id))?;

        row_to_checkin(&row)
    }

    async fn list(&self, req: ListCheckinsRequest) -> Result<ListCheckinsResponse> {
        let limit = req.limit.unwrap_or(PAGE_LIMIT);
        let offset = req.offset.unwrap_or(PAGE_OFFSET);

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM checkin WHERE user_id = $1")
            .bind(req.user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        let rows = sqlx::query(
            r#"
            SELECT
                c.id, c.user_id, c.checked_in_at, c.note, c.link, c.source,
                c.created_at_utc, c.updated_at_utc,
                COALESCE(
                    array_agg(ct.tag_name ORDER BY ct.tag_name)
                        FILTER (WHERE ct.tag_name IS NOT NULL),
                    '{}'
                ) AS tags
            FROM checkin c
            LEFT JOIN checkin_tag ct ON ct.checkin_id = c.id
            WHERE c.user_id = $1
            GROUP BY c.id
            ORDER BY c.checked_in_at DESC, c.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(req.user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let checkins = rows
            .iter()
            .map(row_to_checkin)
            .collect::<Result<Vec<_>>>()?;

        Ok(ListCheckinsResponse { checkins, total })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM checkin WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::CheckinNotFound(id));
        }
        Ok(())
    }
}
