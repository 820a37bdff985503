//! Storage behind the API.
//!
//! Handlers talk to a [`ContentStore`]; [`PgStore`] persists to PostgreSQL
//! and [`MemoryStore`] keeps everything in process (used when no database
//! is configured, and by tests).

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::resource::{ResourceKind, ResourceRecord};
use crate::section::{GlobalSection, NewGlobalSection, SectionFilter, SectionUpdate};
use crate::user::{User, UserChanges, UserDraft};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique value (section key, user email) is already taken.
    #[error("{0} already exists")]
    Conflict(String),

    #[error("stale version: expected {expected}, stored {actual}")]
    VersionConflict { expected: i32, actual: i32 },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait SectionStore: Send + Sync {
    async fn list_sections(&self, filter: &SectionFilter) -> StoreResult<Vec<GlobalSection>>;

    async fn find_section(&self, id: Uuid) -> StoreResult<Option<GlobalSection>>;

    async fn find_section_by_key(&self, key: &str) -> StoreResult<Option<GlobalSection>>;

    /// Fails with [`StoreError::Conflict`] when the key is taken.
    async fn insert_section(&self, section: NewGlobalSection) -> StoreResult<GlobalSection>;

    /// `Ok(None)` when the id is unknown; [`StoreError::VersionConflict`]
    /// when `update.version` is set and stale.
    async fn update_section(
        &self,
        id: Uuid,
        update: SectionUpdate,
    ) -> StoreResult<Option<GlobalSection>>;

    async fn delete_section(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait ResourceStore: Send + Sync {
    async fn list_resources(&self, kind: ResourceKind) -> StoreResult<Vec<ResourceRecord>>;

    async fn find_resource(
        &self,
        kind: ResourceKind,
        id: Uuid,
    ) -> StoreResult<Option<ResourceRecord>>;

    async fn insert_resource(
        &self,
        kind: ResourceKind,
        data: Map<String, Value>,
    ) -> StoreResult<ResourceRecord>;

    /// Shallow-merges `changes` into the stored payload.
    async fn update_resource(
        &self,
        kind: ResourceKind,
        id: Uuid,
        changes: Map<String, Value>,
    ) -> StoreResult<Option<ResourceRecord>>;

    async fn delete_resource(&self, kind: ResourceKind, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list_users(&self) -> StoreResult<Vec<User>>;

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// `email` must already be normalized.
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Fails with [`StoreError::Conflict`] when the email is taken.
    async fn insert_user(&self, draft: UserDraft) -> StoreResult<User>;

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> StoreResult<Option<User>>;

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool>;
}

/// Everything the API needs from storage.
pub trait ContentStore: SectionStore + ResourceStore + UserStore {}

impl<T: SectionStore + ResourceStore + UserStore> ContentStore for T {}
