//! Repository and store trait definitions.
//!
//! Implementations live in `checkin-db`; the CSV import pipeline is written
//! against these traits so orchestrator tests can run on an in-memory mock.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{CheckinEvent, CreateCheckinRequest, ListCheckinsRequest, ListCheckinsResponse, Tag};
use crate::Result;

// =============================================================================
// CHECK-IN REPOSITORY
// =============================================================================

/// Repository for check-in CRUD operations.
#[async_trait]
pub trait CheckinRepository: Send + Sync {
    /// Insert a new check-in, associating any requested tags.
    async fn insert(&self, req: CreateCheckinRequest) -> Result<Uuid>;

    /// Fetch a full check-in by ID, tags included.
    async fn fetch(&self, id: Uuid) -> Result<CheckinEvent>;

    /// List a user's check-ins, newest first, with pagination.
    async fn list(&self, req: ListCheckinsRequest) -> Result<ListCheckinsResponse>;

    /// Permanently delete a check-in.
    async fn delete(&self, id: Uuid) -> Result<()>;
}

// =============================================================================
// TAG REPOSITORY
// =============================================================================

/// Repository for tag operations.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Create a tag if it doesn't exist.
    async fn ensure(&self, name: &str) -> Result<()>;

    /// List all tags with usage counts.
    async fn list(&self) -> Result<Vec<Tag>>;

    /// Get all tags for a check-in.
    async fn get_for_checkin(&self, checkin_id: Uuid) -> Result<Vec<String>>;

    /// Set tags for a check-in (replace all).
    async fn set_for_checkin(&self, checkin_id: Uuid, tags: Vec<String>) -> Result<()>;
}

// =============================================================================
// IMPORT STORE
// =============================================================================

/// Factory for import transactions.
///
/// One CSV import scans the whole file inside a single transaction: either
/// every valid row commits or none do.
#[async_trait]
pub trait ImportStore: Send + Sync {
    type Tx: ImportTransaction;

    /// Begin a new import transaction.
    async fn begin(&self) -> Result<Self::Tx>;
}

/// Transactional sink the import pipeline writes through.
#[async_trait]
pub trait ImportTransaction: Send {
    /// Insert a check-in inside this transaction.
    async fn insert_checkin(&mut self, req: CreateCheckinRequest) -> Result<Uuid>;

    /// Get-or-create a tag by exact name. Must be conflict-tolerant so that
    /// concurrent imports racing on the same name resolve to one entity.
    async fn ensure_tag(&mut self, name: &str) -> Result<()>;

    /// Associate tags with a check-in (replace all).
    async fn set_checkin_tags(&mut self, checkin_id: Uuid, tags: &[String]) -> Result<()>;

    /// Commit everything written through this transaction.
    async fn commit(self) -> Result<()>;

    /// Discard everything written through this transaction.
    async fn rollback(self) -> Result<()>;
}
