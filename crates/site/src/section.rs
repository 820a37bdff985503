//! Fetch-or-seed loading of page sections, and saving edits back.

use carlton_core::bilingual::{localize, Locale};
use carlton_core::section::{GlobalSection, NewGlobalSection, SectionUpdate};
use serde_json::Value;

use crate::api::SectionApi;
use crate::error::ClientError;

/// Where the content a page renders came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Stored,
    /// This load stored the compiled-in default.
    Seeded,
    /// The API failed; the compiled-in default is shown unsaved.
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSection {
    /// Mixed `{fr, en}` document.
    pub content: Value,
    pub record: Option<GlobalSection>,
    pub origin: Origin,
}

impl LoadedSection {
    /// The content projected onto one locale.
    pub fn render(&self, locale: Locale) -> Value {
        localize(&self.content, locale)
    }

    /// Render for a language tag such as `en-GB`; unknown tags get French.
    pub fn render_tag(&self, tag: &str) -> Value {
        self.render(Locale::parse(tag).unwrap_or_default())
    }

    /// Version of the stored record this content was read from.
    pub fn version(&self) -> Option<i32> {
        self.record.as_ref().map(|record| record.version)
    }

    /// Replace the value at a JSON pointer such as `/slides/0/title`.
    /// Returns `false` when nothing lives at that path.
    pub fn apply_edit(&mut self, pointer: &str, value: Value) -> bool {
        match self.content.pointer_mut(pointer) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

/// One editable section of a page and its compiled-in default.
#[derive(Debug, Clone)]
pub struct PageSection {
    key: String,
    defaults: Value,
}

impl PageSection {
    pub fn new(key: impl Into<String>, defaults: Value) -> Self {
        Self {
            key: key.into(),
            defaults,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn defaults(&self) -> &Value {
        &self.defaults
    }

    /// Load the section for rendering. Never fails: any error is logged and
    /// the compiled-in default is returned instead.
    pub async fn load(&self, api: &dyn SectionApi) -> LoadedSection {
        match self.fetch_or_seed(api).await {
            Ok(loaded) => loaded,
            Err(err) => {
                tracing::warn!(section = %self.key, "showing built-in content: {err}");
                LoadedSection {
                    content: self.defaults.clone(),
                    record: None,
                    origin: Origin::Fallback,
                }
            }
        }
    }

    async fn fetch_or_seed(&self, api: &dyn SectionApi) -> Result<LoadedSection, ClientError> {
        if let Some(record) = api.find_by_key(&self.key).await? {
            return self.loaded(record, Origin::Stored);
        }

        let seed = NewGlobalSection::from_mixed(self.key.as_str(), &self.defaults);
        match api.create(&seed).await {
            Ok(record) => {
                tracing::info!(section = %self.key, "seeded section from built-in content");
                self.loaded(record, Origin::Seeded)
            }
            Err(ClientError::Conflict(_)) => {
                tracing::debug!(section = %self.key, "section seeded concurrently, reloading");
                let record = api
                    .find_by_key(&self.key)
                    .await?
                    .ok_or_else(|| ClientError::NotStored(self.key.clone()))?;
                self.loaded(record, Origin::Stored)
            }
            Err(err) => Err(err),
        }
    }

    fn loaded(&self, record: GlobalSection, origin: Origin) -> Result<LoadedSection, ClientError> {
        let content = record.mixed_with_template(&self.defaults)?;
        Ok(LoadedSection {
            content,
            record: Some(record),
            origin,
        })
    }

    /// Store an edited mixed document.
    ///
    /// `base_version` is the version the editor started from, `None` when the
    /// content was never read from a stored record. The current record is
    /// fetched again for its id and version; if it no longer matches the base
    /// the save is refused with [`ClientError::Conflict`] rather than
    /// overwriting someone else's edit. A section with nothing stored is
    /// created.
    pub async fn save(
        &self,
        api: &dyn SectionApi,
        base_version: Option<i32>,
        mixed: &Value,
    ) -> Result<GlobalSection, ClientError> {
        let Some(current) = api.find_by_key(&self.key).await? else {
            let seed = NewGlobalSection::from_mixed(self.key.as_str(), mixed);
            let record = api.create(&seed).await?;
            tracing::info!(section = %self.key, "stored section on first save");
            return Ok(record);
        };

        match base_version {
            Some(base) if base == current.version => {}
            Some(base) => {
                return Err(ClientError::Conflict(format!(
                    "section `{}` changed since it was loaded (version {base}, now {})",
                    self.key, current.version
                )));
            }
            None => {
                return Err(ClientError::Conflict(format!(
                    "section `{}` is stored at version {} but was edited from built-in content",
                    self.key, current.version
                )));
            }
        }

        let update = SectionUpdate::from_mixed(mixed, Some(current.version));
        let saved = api.update(current.id, &update).await?;
        tracing::info!(section = %self.key, version = saved.version, "section saved");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use super::*;
    use async_trait::async_trait;
    use carlton_core::section::SectionFilter;
    use carlton_core::store::{MemoryStore, SectionStore, StoreError};
    use serde_json::json;
    use uuid::Uuid;

    /// Talks to an in-process store the way the HTTP API would.
    #[derive(Default)]
    struct StoreApi {
        store: MemoryStore,
        offline: AtomicBool,
        creates: AtomicUsize,
    }

    impl StoreApi {
        fn check_online(&self) -> Result<(), ClientError> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(ClientError::Status {
                    status: 503,
                    message: "Service Unavailable".to_string(),
                });
            }
            Ok(())
        }

        async fn stored(&self) -> Vec<GlobalSection> {
            self.store.list_sections(&SectionFilter::default()).await.unwrap()
        }
    }

    fn client_error(err: StoreError) -> ClientError {
        match err {
            StoreError::Conflict(_) | StoreError::VersionConflict { .. } => {
                ClientError::Conflict(err.to_string())
            }
            StoreError::Database(_) => ClientError::Status {
                status: 500,
                message: err.to_string(),
            },
        }
    }

    #[async_trait]
    impl SectionApi for StoreApi {
        async fn find_by_key(&self, key: &str) -> Result<Option<GlobalSection>, ClientError> {
            self.check_online()?;
            let found = self.store.find_section_by_key(key).await.map_err(client_error)?;
            // Let a concurrent load observe the same miss.
            tokio::task::yield_now().await;
            Ok(found)
        }

        async fn create(&self, section: &NewGlobalSection) -> Result<GlobalSection, ClientError> {
            self.check_online()?;
            self.creates.fetch_add(1, Ordering::SeqCst);
            self.store.insert_section(section.clone()).await.map_err(client_error)
        }

        async fn update(
            &self,
            id: Uuid,
            update: &SectionUpdate,
        ) -> Result<GlobalSection, ClientError> {
            self.check_online()?;
            self.store
                .update_section(id, update.clone())
                .await
                .map_err(client_error)?
                .ok_or_else(|| ClientError::Status {
                    status: 404,
                    message: "Section not found".to_string(),
                })
        }
    }

    fn hero() -> PageSection {
        PageSection::new(
            "hero",
            json!({
                "slides": [
                    {"title": {"fr": "Bienvenue", "en": "Welcome"}, "image": "/uploads/hero.jpg"}
                ]
            }),
        )
    }

    #[tokio::test]
    async fn first_load_seeds_then_reads_back() {
        let api = StoreApi::default();
        let section = hero();

        let first = section.load(&api).await;
        assert_eq!(first.origin, Origin::Seeded);
        assert_eq!(first.content, *section.defaults());

        let second = section.load(&api).await;
        assert_eq!(second.origin, Origin::Stored);
        assert_eq!(second.content, *section.defaults());
        assert_eq!(api.stored().await.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_first_loads_store_one_record() {
        let api = StoreApi::default();
        let section = hero();

        let (a, b) = tokio::join!(section.load(&api), section.load(&api));
        let mut origins = [a.origin, b.origin];
        origins.sort_by_key(|origin| *origin == Origin::Stored);
        assert_eq!(origins, [Origin::Seeded, Origin::Stored]);
        assert_eq!(a.content, b.content);
        assert_eq!(api.creates.load(Ordering::SeqCst), 2);
        assert_eq!(api.stored().await.len(), 1);
    }

    #[tokio::test]
    async fn offline_api_falls_back_to_defaults() {
        let api = StoreApi::default();
        api.offline.store(true, Ordering::SeqCst);

        let loaded = hero().load(&api).await;
        assert_eq!(loaded.origin, Origin::Fallback);
        assert!(loaded.record.is_none());
        assert_eq!(loaded.render(Locale::En)["slides"][0]["title"], "Welcome");
        assert_eq!(loaded.render_tag("en-GB")["slides"][0]["title"], "Welcome");
        assert_eq!(loaded.render_tag("mg")["slides"][0]["title"], "Bienvenue");
    }

    #[tokio::test]
    async fn corrupt_record_falls_back_to_defaults() {
        let api = StoreApi::default();
        api.store
            .insert_section(NewGlobalSection {
                section_key: "hero".to_string(),
                data_fr: json!({"title": "Pas de diapositives"}),
                data_en: None,
                is_active: true,
            })
            .await
            .unwrap();

        let loaded = hero().load(&api).await;
        assert_eq!(loaded.origin, Origin::Fallback);
        assert_eq!(loaded.content, *hero().defaults());
    }

    #[tokio::test]
    async fn missing_english_reads_as_french() {
        let api = StoreApi::default();
        api.store
            .insert_section(NewGlobalSection {
                section_key: "hero".to_string(),
                data_fr: json!({"slides": [{"title": "Bonjour", "image": "/uploads/a.jpg"}]}),
                data_en: None,
                is_active: true,
            })
            .await
            .unwrap();

        let loaded = hero().load(&api).await;
        assert_eq!(loaded.origin, Origin::Stored);
        let slide = json!({"title": {"fr": "Bonjour", "en": "Bonjour"}, "image": "/uploads/a.jpg"});
        assert_eq!(loaded.content, json!({"slides": [slide]}));
    }

    #[tokio::test]
    async fn hero_edit_round_trip() {
        let api = StoreApi::default();
        let section = hero();

        let mut loaded = section.load(&api).await;
        assert!(loaded.apply_edit("/slides/0/title", json!({"fr": "Salut", "en": "Hi"})));
        assert!(!loaded.apply_edit("/slides/3/title", json!("nope")));

        let saved = section
            .save(&api, loaded.version(), &loaded.content)
            .await
            .unwrap();
        assert_eq!(saved.version, 2);
        assert_eq!(saved.data_fr["slides"][0]["title"], "Salut");
        assert_eq!(saved.data_en.as_ref().unwrap()["slides"][0]["title"], "Hi");

        let reloaded = section.load(&api).await;
        assert_eq!(reloaded.render(Locale::Fr)["slides"][0]["title"], "Salut");
        assert_eq!(reloaded.render(Locale::En)["slides"][0]["title"], "Hi");
        assert_eq!(reloaded.render(Locale::En)["slides"][0]["image"], "/uploads/hero.jpg");
    }

    #[tokio::test]
    async fn save_from_stale_version_is_refused() {
        let api = StoreApi::default();
        let section = hero();
        let loaded = section.load(&api).await;

        let mut first = loaded.clone();
        first.apply_edit("/slides/0/title", json!({"fr": "Un", "en": "One"}));
        section.save(&api, first.version(), &first.content).await.unwrap();

        let mut second = loaded;
        second.apply_edit("/slides/0/title", json!({"fr": "Deux", "en": "Two"}));
        let err = section
            .save(&api, second.version(), &second.content)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Conflict(_)));

        let stored = api.stored().await;
        assert_eq!(stored[0].data_fr["slides"][0]["title"], "Un");
    }

    #[tokio::test]
    async fn saving_an_unstored_section_creates_it() {
        let api = StoreApi::default();
        let section = hero();
        let saved = section.save(&api, None, section.defaults()).await.unwrap();
        assert_eq!(saved.version, 1);
        assert_eq!(api.stored().await.len(), 1);
    }

    #[tokio::test]
    async fn edit_of_fallback_content_does_not_overwrite_stored_edits() {
        let api = StoreApi::default();
        let section = hero();
        let mut loaded = section.load(&api).await;
        loaded.apply_edit("/slides/0/title", json!({"fr": "Salut", "en": "Hi"}));
        section.save(&api, loaded.version(), &loaded.content).await.unwrap();

        api.offline.store(true, Ordering::SeqCst);
        let mut fallback = section.load(&api).await;
        assert_eq!(fallback.origin, Origin::Fallback);
        assert_eq!(fallback.version(), None);
        api.offline.store(false, Ordering::SeqCst);

        fallback.apply_edit("/slides/0/image", json!("/uploads/other.jpg"));
        let err = section
            .save(&api, fallback.version(), &fallback.content)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Conflict(_)));

        let stored = api.stored().await;
        assert_eq!(stored[0].version, 2);
        assert_eq!(stored[0].data_fr["slides"][0]["title"], "Salut");
    }

    #[test]
    fn load_runs_on_a_plain_executor() {
        let api = StoreApi::default();
        let loaded = tokio_test::block_on(hero().load(&api));
        assert_eq!(loaded.origin, Origin::Seeded);
    }
}
