use async_trait::async_trait;
use tokio_postgres::{Client, NoTls, Row};
use uuid::Uuid;

use super::{Database, StoreError, embedded::migrations};
use crate::models::{Note, NoteChanges, Profile, ProfileChanges};

const PROFILE_COLUMNS: &str = "id, name, timezone, updated_at";
const NOTE_COLUMNS: &str = "id, user_id, title, content, created_at, updated_at";

/// PostgreSQL backend over a single pipelined client connection.
pub struct PgDatabase {
    client: Client,
}

impl PgDatabase {
    pub async fn connect(database_dsn: &str) -> Result<Self, StoreError> {
        let (client, con) = tokio_postgres::connect(database_dsn, NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = con.await {
                tracing::error!("connection error: {}", e);
            }
        });

        Ok(Self { client })
    }

    pub async fn migrate(&mut self) -> Result<(), StoreError> {
        let migrations_report = migrations::runner().run_async(&mut self.client).await?;

        for migration in migrations_report.applied_migrations() {
            tracing::info!(
                "Migration Applied -  Name: {}, Version: {}",
                migration.name(),
                migration.version()
            );
        }

        tracing::info!("DB migrations finished!");

        Ok(())
    }

    /// Inserts a profile row the way account provisioning would.
    pub async fn provision_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        timezone: &str,
    ) -> Result<Profile, StoreError> {
        let row = self
            .client
            .query_one(
                &format!(
                    "INSERT INTO profiles (id, name, timezone) VALUES ($1, $2, $3) \
                     RETURNING {PROFILE_COLUMNS}"
                ),
                &[&id, &name, &timezone],
            )
            .await?;

        Ok(profile_from_row(&row))
    }
}

fn profile_from_row(row: &Row) -> Profile {
    Profile {
        id: row.get("id"),
        name: row.get("name"),
        timezone: row.get("timezone"),
        updated_at: row.get("updated_at"),
    }
}

fn note_from_row(row: &Row) -> Note {
    Note {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl Database for PgDatabase {
    async fn profile_get(&self, owner: Uuid) -> Result<Option<Profile>, StoreError> {
        let row = self
            .client
            .query_opt(
                &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"),
                &[&owner],
            )
            .await?;

        Ok(row.as_ref().map(profile_from_row))
    }

    async fn profile_update(
        &self,
        owner: Uuid,
        changes: ProfileChanges,
    ) -> Result<Option<Profile>, StoreError> {
        let row = self
            .client
            .query_opt(
                &format!(
                    "UPDATE profiles SET name = COALESCE($2, name), \
                     timezone = COALESCE($3, timezone), updated_at = now() \
                     WHERE id = $1 RETURNING {PROFILE_COLUMNS}"
                ),
                &[&owner, &changes.name, &changes.timezone],
            )
            .await?;

        Ok(row.as_ref().map(profile_from_row))
    }

    async fn note_list(&self, owner: Uuid) -> Result<Vec<Note>, StoreError> {
        let rows = self
            .client
            .query(
                &format!(
                    "SELECT {NOTE_COLUMNS} FROM notes WHERE user_id = $1 \
                     ORDER BY created_at DESC"
                ),
                &[&owner],
            )
            .await?;

        Ok(rows.iter().map(note_from_row).collect())
    }

    async fn note_get(&self, owner: Uuid, id: Uuid) -> Result<Option<Note>, StoreError> {
        let row = self
            .client
            .query_opt(
                &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = $1 AND user_id = $2"),
                &[&id, &owner],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn note_insert(
        &self,
        owner: Uuid,
        title: String,
        content: String,
    ) -> Result<Note, StoreError> {
        let row = self
            .client
            .query_one(
                &format!(
                    "INSERT INTO notes (user_id, title, content) VALUES ($1, $2, $3) \
                     RETURNING {NOTE_COLUMNS}"
                ),
                &[&owner, &title, &content],
            )
            .await?;

        Ok(note_from_row(&row))
    }

    async fn note_update(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: NoteChanges,
    ) -> Result<Option<Note>, StoreError> {
        let row = self
            .client
            .query_opt(
                &format!(
                    "UPDATE notes SET title = COALESCE($3, title), \
                     content = COALESCE($4, content), updated_at = now() \
                     WHERE id = $1 AND user_id = $2 RETURNING {NOTE_COLUMNS}"
                ),
                &[&id, &owner, &changes.title, &changes.content],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn note_delete(&self, owner: Uuid, id: Uuid) -> Result<u64, StoreError> {
        let rows = self
            .client
            .execute(
                "DELETE FROM notes WHERE id = $1 AND user_id = $2",
                &[&id, &owner],
            )
            .await?;

        Ok(rows)
    }
}
