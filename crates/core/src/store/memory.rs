use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ResourceStore, SectionStore, StoreError, StoreResult, UserStore};
use crate::resource::{ResourceKind, ResourceRecord};
use crate::section::{GlobalSection, NewGlobalSection, SectionFilter, SectionUpdate};
use crate::user::{User, UserChanges, UserDraft};

/// In-process store. Nothing survives a restart.
///
/// Maps are keyed by v7 uuids, so iteration order is creation order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sections: RwLock<BTreeMap<Uuid, GlobalSection>>,
    resources: RwLock<HashMap<ResourceKind, BTreeMap<Uuid, ResourceRecord>>>,
    users: RwLock<BTreeMap<Uuid, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SectionStore for MemoryStore {
    async fn list_sections(&self, filter: &SectionFilter) -> StoreResult<Vec<GlobalSection>> {
        let sections = self.sections.read().await;
        Ok(sections
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect())
    }

    async fn find_section(&self, id: Uuid) -> StoreResult<Option<GlobalSection>> {
        Ok(self.sections.read().await.get(&id).cloned())
    }

    async fn find_section_by_key(&self, key: &str) -> StoreResult<Option<GlobalSection>> {
        let sections = self.sections.read().await;
        Ok(sections.values().find(|s| s.section_key == key).cloned())
    }

    async fn insert_section(&self, section: NewGlobalSection) -> StoreResult<GlobalSection> {
        let mut sections = self.sections.write().await;
        if sections.values().any(|s| s.section_key == section.section_key) {
            return Err(StoreError::Conflict(format!(
                "section `{}`",
                section.section_key
            )));
        }
        let now = Utc::now();
        let stored = GlobalSection {
            id: Uuid::now_v7(),
            section_key: section.section_key,
            data_fr: section.data_fr,
            data_en: section.data_en,
            is_active: section.is_active,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        sections.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_section(
        &self,
        id: Uuid,
        update: SectionUpdate,
    ) -> StoreResult<Option<GlobalSection>> {
        let mut sections = self.sections.write().await;

        let Some(current) = sections.get(&id) else {
            return Ok(None);
        };
        if let Some(expected) = update.version {
            if expected != current.version {
                return Err(StoreError::VersionConflict {
                    expected,
                    actual: current.version,
                });
            }
        }
        if let Some(key) = &update.section_key {
            if sections.values().any(|s| s.id != id && &s.section_key == key) {
                return Err(StoreError::Conflict(format!("section `{key}`")));
            }
        }

        let Some(stored) = sections.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(key) = update.section_key {
            stored.section_key = key;
        }
        if let Some(data_fr) = update.data_fr {
            stored.data_fr = data_fr;
        }
        if let Some(data_en) = update.data_en {
            stored.data_en = Some(data_en);
        }
        if let Some(active) = update.is_active {
            stored.is_active = active;
        }
        stored.version += 1;
        stored.updated_at = Utc::now();
        Ok(Some(stored.clone()))
    }

    async fn delete_section(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.sections.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn list_resources(&self, kind: ResourceKind) -> StoreResult<Vec<ResourceRecord>> {
        let resources = self.resources.read().await;
        Ok(resources
            .get(&kind)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn find_resource(
        &self,
        kind: ResourceKind,
        id: Uuid,
    ) -> StoreResult<Option<ResourceRecord>> {
        let resources = self.resources.read().await;
        Ok(resources.get(&kind).and_then(|r| r.get(&id)).cloned())
    }

    async fn insert_resource(
        &self,
        kind: ResourceKind,
        data: Map<String, Value>,
    ) -> StoreResult<ResourceRecord> {
        let record = ResourceRecord::new(data);
        self.resources
            .write()
            .await
            .entry(kind)
            .or_default()
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_resource(
        &self,
        kind: ResourceKind,
        id: Uuid,
        changes: Map<String, Value>,
    ) -> StoreResult<Option<ResourceRecord>> {
        let mut resources = self.resources.write().await;
        let Some(record) = resources.get_mut(&kind).and_then(|r| r.get_mut(&id)) else {
            return Ok(None);
        };
        record.merge(changes);
        Ok(Some(record.clone()))
    }

    async fn delete_resource(&self, kind: ResourceKind, id: Uuid) -> StoreResult<bool> {
        let mut resources = self.resources.write().await;
        Ok(resources
            .get_mut(&kind)
            .is_some_and(|r| r.remove(&id).is_some()))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.users.read().await.values().cloned().collect())
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, draft: UserDraft) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == draft.email) {
            return Err(StoreError::Conflict(format!("user `{}`", draft.email)));
        }
        let user = User::from_draft(draft);
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> StoreResult<Option<User>> {
        let mut users = self.users.write().await;
        if let Some(email) = &changes.email {
            if users.values().any(|u| u.id != id && &u.email == email) {
                return Err(StoreError::Conflict(format!("user `{email}`")));
            }
        }
        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };
        user.apply(changes);
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.users.write().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::Role;
    use serde_json::json;

    fn hero() -> NewGlobalSection {
        NewGlobalSection {
            section_key: "hero".to_string(),
            data_fr: json!({"title": "Bienvenue"}),
            data_en: Some(json!({"title": "Welcome"})),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn section_keys_are_unique() {
        let store = MemoryStore::new();
        store.insert_section(hero()).await.unwrap();
        let err = store.insert_section(hero()).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.list_sections(&SectionFilter::default()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_bumps_version_and_checks_it() {
        let store = MemoryStore::new();
        let created = store.insert_section(hero()).await.unwrap();
        assert_eq!(created.version, 1);

        let update = SectionUpdate {
            data_fr: Some(json!({"title": "Salut"})),
            version: Some(1),
            ..SectionUpdate::default()
        };
        let updated = store
            .update_section(created.id, update.clone())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.version, 2);
        assert_eq!(updated.data_fr["title"], "Salut");
        assert_eq!(updated.data_en, created.data_en);

        let err = store.update_section(created.id, update).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::VersionConflict {
                expected: 1,
                actual: 2
            }
        ));
    }

    #[tokio::test]
    async fn unversioned_update_is_last_write_wins() {
        let store = MemoryStore::new();
        let created = store.insert_section(hero()).await.unwrap();
        for title in ["Un", "Deux"] {
            let update = SectionUpdate {
                data_fr: Some(json!({ "title": title })),
                ..SectionUpdate::default()
            };
            store.update_section(created.id, update).await.unwrap();
        }
        let stored = store.find_section_by_key("hero").await.unwrap().unwrap();
        assert_eq!(stored.data_fr["title"], "Deux");
        assert_eq!(stored.version, 3);
    }

    #[tokio::test]
    async fn update_and_delete_unknown_section() {
        let store = MemoryStore::new();
        let missing = Uuid::now_v7();
        assert!(store
            .update_section(missing, SectionUpdate::default())
            .await
            .unwrap()
            .is_none());
        assert!(!store.delete_section(missing).await.unwrap());
    }

    #[tokio::test]
    async fn unknown_id_wins_over_a_taken_key() {
        let store = MemoryStore::new();
        store.insert_section(hero()).await.unwrap();
        let rename = SectionUpdate {
            section_key: Some("hero".to_string()),
            ..SectionUpdate::default()
        };
        let result = store.update_section(Uuid::now_v7(), rename).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn stale_version_wins_over_a_taken_key() {
        let store = MemoryStore::new();
        store.insert_section(hero()).await.unwrap();
        let footer = NewGlobalSection {
            section_key: "footer".to_string(),
            ..hero()
        };
        let footer = store.insert_section(footer).await.unwrap();
        let rename = SectionUpdate {
            section_key: Some("hero".to_string()),
            version: Some(7),
            ..SectionUpdate::default()
        };
        let err = store.update_section(footer.id, rename).await.unwrap_err();
        assert!(matches!(err, StoreError::VersionConflict { expected: 7, actual: 1 }));
    }

    #[tokio::test]
    async fn resources_are_partitioned_by_kind() {
        let store = MemoryStore::new();
        let data = json!({"name": "Chambre Deluxe"}).as_object().cloned().unwrap();
        let room = store.insert_resource(ResourceKind::Room, data).await.unwrap();

        assert!(store
            .find_resource(ResourceKind::Venue, room.id)
            .await
            .unwrap()
            .is_none());
        assert_eq!(store.list_resources(ResourceKind::Room).await.unwrap().len(), 1);
        assert!(store.list_resources(ResourceKind::Offer).await.unwrap().is_empty());

        let changes = json!({"price": 220}).as_object().cloned().unwrap();
        let updated = store
            .update_resource(ResourceKind::Room, room.id, changes)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.data["name"], "Chambre Deluxe");
        assert_eq!(updated.data["price"], 220);

        assert!(store.delete_resource(ResourceKind::Room, room.id).await.unwrap());
        assert!(!store.delete_resource(ResourceKind::Room, room.id).await.unwrap());
    }

    #[tokio::test]
    async fn user_emails_are_unique() {
        let store = MemoryStore::new();
        let draft = UserDraft {
            email: "admin@carlton.mg".to_string(),
            name: "Admin".to_string(),
            role: Role::Admin,
            password_hash: "hash".to_string(),
        };
        let admin = store.insert_user(draft.clone()).await.unwrap();
        assert!(matches!(
            store.insert_user(draft).await.unwrap_err(),
            StoreError::Conflict(_)
        ));
        assert_eq!(
            store
                .find_user_by_email("admin@carlton.mg")
                .await
                .unwrap()
                .map(|u| u.id),
            Some(admin.id)
        );
    }
}
