mod embedded;
mod memory;
mod postgres;

pub use memory::MemoryDatabase;
pub use postgres::PgDatabase;

use async_trait::async_trait;
use uuid::Uuid;

use std::sync::Arc;

use crate::models::{Note, NoteChanges, NoteDraft, Profile, ProfileChanges};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("migration error: {0}")]
    Migration(#[from] refinery::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Row absent, or owned by someone else. The two are not told apart.
    #[error("record not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Table access shared by all storage backends.
///
/// Every call carries the owner identifier and backends must filter on it.
/// Handlers never call this directly; they go through the owner-bound
/// repositories below.
#[async_trait]
pub trait Database: Send + Sync {
    async fn profile_get(&self, owner: Uuid) -> Result<Option<Profile>, StoreError>;

    async fn profile_update(
        &self,
        owner: Uuid,
        changes: ProfileChanges,
    ) -> Result<Option<Profile>, StoreError>;

    /// Owner's notes, newest first.
    async fn note_list(&self, owner: Uuid) -> Result<Vec<Note>, StoreError>;

    async fn note_get(&self, owner: Uuid, id: Uuid) -> Result<Option<Note>, StoreError>;

    async fn note_insert(
        &self,
        owner: Uuid,
        title: String,
        content: String,
    ) -> Result<Note, StoreError>;

    async fn note_update(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: NoteChanges,
    ) -> Result<Option<Note>, StoreError>;

    /// Returns the number of rows removed.
    async fn note_delete(&self, owner: Uuid, id: Uuid) -> Result<u64, StoreError>;
}

pub struct ProfileRepository {
    db: Arc<dyn Database>,
    owner: Uuid,
}

impl ProfileRepository {
    pub fn new(db: Arc<dyn Database>, owner: Uuid) -> Self {
        Self { db, owner }
    }

    pub async fn get(&self) -> Result<Profile, RepositoryError> {
        self.db
            .profile_get(self.owner)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    pub async fn update(&self, changes: ProfileChanges) -> Result<Profile, RepositoryError> {
        let profile = self
            .db
            .profile_update(self.owner, changes)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        tracing::debug!("profile {} updated", self.owner);
        Ok(profile)
    }
}

pub struct NoteRepository {
    db: Arc<dyn Database>,
    owner: Uuid,
}

impl NoteRepository {
    pub fn new(db: Arc<dyn Database>, owner: Uuid) -> Self {
        Self { db, owner }
    }

    pub async fn list(&self) -> Result<Vec<Note>, RepositoryError> {
        Ok(self.db.note_list(self.owner).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Note, RepositoryError> {
        self.db
            .note_get(self.owner, id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    pub async fn create(&self, draft: NoteDraft) -> Result<Note, RepositoryError> {
        let content = draft.content.unwrap_or_default();
        let note = self.db.note_insert(self.owner, draft.title, content).await?;

        tracing::debug!("note {} created for {}", note.id, self.owner);
        Ok(note)
    }

    pub async fn update(&self, id: Uuid, changes: NoteChanges) -> Result<Note, RepositoryError> {
        self.db
            .note_update(self.owner, id, changes)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Hard delete. Succeeds whether or not a row matched.
    pub async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let removed = self.db.note_delete(self.owner, id).await?;
        if removed == 0 {
            tracing::debug!("delete of note {id} matched no row for {}", self.owner);
        }

        Ok(true)
    }
}
