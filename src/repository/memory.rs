use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use std::collections::HashMap;

use super::{Database, StoreError};
use crate::models::{Note, NoteChanges, Profile, ProfileChanges};

#[derive(Default)]
struct Tables {
    profiles: HashMap<Uuid, Profile>,
    // (insertion sequence, row)
    notes: Vec<(u64, Note)>,
    next_seq: u64,
}

/// In-process backend with the same filtering rules as [`super::PgDatabase`].
#[derive(Default)]
pub struct MemoryDatabase {
    tables: RwLock<Tables>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a profile row the way account provisioning would.
    pub async fn provision_profile(&self, id: Uuid, name: Option<&str>, timezone: &str) -> Profile {
        let profile = Profile {
            id,
            name: name.map(str::to_string),
            timezone: timezone.to_string(),
            updated_at: Utc::now(),
        };

        self.tables
            .write()
            .await
            .profiles
            .insert(id, profile.clone());

        profile
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn profile_get(&self, owner: Uuid) -> Result<Option<Profile>, StoreError> {
        Ok(self.tables.read().await.profiles.get(&owner).cloned())
    }

    async fn profile_update(
        &self,
        owner: Uuid,
        changes: ProfileChanges,
    ) -> Result<Option<Profile>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(profile) = tables.profiles.get_mut(&owner) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            profile.name = Some(name);
        }
        if let Some(timezone) = changes.timezone {
            profile.timezone = timezone;
        }
        profile.updated_at = Utc::now();

        Ok(Some(profile.clone()))
    }

    async fn note_list(&self, owner: Uuid) -> Result<Vec<Note>, StoreError> {
        let tables = self.tables.read().await;
        let mut owned: Vec<&(u64, Note)> = tables
            .notes
            .iter()
            .filter(|(_, note)| note.user_id == owner)
            .collect();

        owned.sort_by(|(a_seq, a), (b_seq, b)| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b_seq.cmp(a_seq))
        });

        Ok(owned.into_iter().map(|(_, note)| note.clone()).collect())
    }

    async fn note_get(&self, owner: Uuid, id: Uuid) -> Result<Option<Note>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .notes
            .iter()
            .map(|(_, note)| note)
            .find(|note| note.id == id && note.user_id == owner)
            .cloned())
    }

    async fn note_insert(
        &self,
        owner: Uuid,
        title: String,
        content: String,
    ) -> Result<Note, StoreError> {
        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4(),
            user_id: owner,
            title,
            content,
            created_at: now,
            updated_at: now,
        };

        let mut tables = self.tables.write().await;
        let seq = tables.next_seq;
        tables.next_seq += 1;
        tables.notes.push((seq, note.clone()));

        Ok(note)
    }

    async fn note_update(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: NoteChanges,
    ) -> Result<Option<Note>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some((_, note)) = tables
            .notes
            .iter_mut()
            .find(|(_, note)| note.id == id && note.user_id == owner)
        else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            note.title = title;
        }
        if let Some(content) = changes.content {
            note.content = content;
        }
        note.updated_at = Utc::now();

        Ok(Some(note.clone()))
    }

    async fn note_delete(&self, owner: Uuid, id: Uuid) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.notes.len();
        tables
            .notes
            .retain(|(_, note)| !(note.id == id && note.user_id == owner));

        Ok((before - tables.notes.len()) as u64)
    }
}
