//! Owner-scoped persistence for resumes and cover letters.
//!
//! Handlers only ever see `Arc<dyn Repository<R>>`; the backing store is
//! chosen once at startup (PostgreSQL when `DATABASE_URL` is set, otherwise
//! the in-process `MemoryStore`).

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::Record;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait Repository<R: Record>: Send + Sync {
    /// All records belonging to `owner_id`, oldest first.
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<R>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<R>, StoreError>;

    /// Creates a record when `id` is `None`; otherwise replaces every field of
    /// the existing record, keeping `created_at` and bumping `updated_at`.
    /// Returns `None` when `id` names no record.
    async fn save(&self, id: Option<Uuid>, fields: R::Fields) -> Result<Option<R>, StoreError>;

    /// Returns whether a record was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}
