//! Tag repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row, Transaction};
use uuid::Uuid;

use checkin_core::defaults::MAX_TAG_CHARS;
use checkin_core::{Error, Result, Tag, TagRepository};

/// Validate a tag name.
///
/// Rules:
/// - Length between 1-255 characters
/// - No embedded newline
///
/// Returns Ok(()) if valid, Err with message if invalid.
pub fn validate_tag_name(tag: &str) -> std::result::Result<(), String> {
    if tag.is_empty() {
        return Err("Tag name cannot be empty".to_string());
    }
    if tag.chars().count() > MAX_TAG_CHARS {
        return Err(format!(
            "Tag name must be {} characters or less",
            MAX_TAG_CHARS
        ));
    }
    if tag.contains('\n') {
        return Err("Tag name cannot contain a newline".to_string());
    }
    Ok(())
}

/// Insert the tag row if absent.
///
/// Safe under concurrent callers racing on the same name: the primary key
/// on `tag.name` absorbs the conflict, so every caller resolves to the same
/// persistent identity.
pub(crate) async fn ensure_tag_tx(tx: &mut Transaction<'_, Postgres>, name: &str) -> Result<()> {
    sqlx::query("INSERT INTO tag (name, created_at_utc) VALUES ($1, $2) ON CONFLICT (name) DO NOTHING")
        .bind(name)
        .bind(Utc::now())
        .execute(&mut **tx)
        .await
        .map_err(Error::Database)?;
    Ok(())
}

/// Replace a check-in's tag associations inside an open transaction.
pub(crate) async fn set_checkin_tags_tx(
    tx: &mut Transaction<'_, Postgres>,
    checkin_id: Uuid,
    tags: &[String],
) -> Result<()> {
    sqlx::query("DELETE FROM checkin_tag WHERE checkin_id = $1")
        .bind(checkin_id)
        .execute(&mut **tx)
        .await
        .map_err(Error::Database)?;

    for tag_name in tags {
        sqlx::query(
            "INSERT INTO checkin_tag (checkin_id, tag_name) VALUES ($1, $2)
             ON CONFLICT (checkin_id, tag_name) DO NOTHING",
        )
        .bind(checkin_id)
        .bind(tag_name)
        .execute(&mut **tx)
        .await
        .map_err(Error::Database)?;
    }
    Ok(())
}

/// PostgreSQL implementation of TagRepository.
pub struct PgTagRepository {
    pool: Pool<Postgres>,
}

impl PgTagRepository {
    /// Create a new PgTagRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagRepository for PgTagRepository {
    async fn ensure(&self, name: &str) -> Result<()> {
        validate_tag_name(name).map_err(Error::InvalidInput)?;

        sqlx::query(
            "INSERT INTO tag (name, created_at_utc) VALUES ($1, $2) ON CONFLICT (name) DO NOTHING",
        )
        .bind(name)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Tag>> {
        let rows = sqlx::query(
            r#"
            SELECT
                t.name,
                t.created_at_utc,
                COUNT(ct.checkin_id) as checkin_count
            FROM tag t
            LEFT JOIN checkin_tag ct ON t.name = ct.tag_name
            GROUP BY t.name, t.created_at_utc
            ORDER BY t.name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let tags = rows
            .into_iter()
            .map(|row| Tag {
                name: row.get("name"),
                created_at_utc: row.get("created_at_utc"),
                checkin_count: row.get("checkin_count"),
            })
            .collect();

        Ok(tags)
    }

    async fn get_for_checkin(&self, checkin_id: Uuid) -> Result<Vec<String>> {
        let rows =
            sqlx::query("SELECT tag_name FROM checkin_tag WHERE checkin_id = $1 ORDER BY tag_name")
                .bind(checkin_id)
                .fetch_all(&self.pool)
                .await
                .map_err(Error::Database)?;

        let tags = rows.into_iter().map(|row| row.get("tag_name")).collect();
        Ok(tags)
    }

    async fn set_for_checkin(&self, checkin_id: Uuid, tags: Vec<String>) -> Result<()> {
        for tag_name in &tags {
            validate_tag_name(tag_name).map_err(Error::InvalidInput)?;
        }

        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        for tag_name in &tags {
            ensure_tag_tx(&mut tx, tag_name).await?;
        }
        set_checkin_tags_tx(&mut tx, checkin_id, &tags).await?;

        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }
}
