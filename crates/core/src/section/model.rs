use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::bilingual::{self, LocaleDocuments, ReconstructError};

/// A page section's bilingual content, keyed by `section_key`.
/// Maps to the `global_sections` PostgreSQL table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSection {
    pub id: Uuid,
    pub section_key: String,
    pub data_fr: Value,
    pub data_en: Option<Value>,
    pub is_active: bool,
    /// Incremented on every update; a PUT carrying a stale value is refused.
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GlobalSection {
    /// The mixed document, using the page default to tell plain leaves from
    /// localized ones.
    pub fn mixed_with_template(&self, template: &Value) -> Result<Value, ReconstructError> {
        bilingual::reconstruct_with_template(&self.data_fr, self.data_en.as_ref(), template)
    }
}

/// Body of `POST /api/globalSections`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGlobalSection {
    pub section_key: String,
    pub data_fr: Value,
    #[serde(default)]
    pub data_en: Option<Value>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl NewGlobalSection {
    /// Seed a section from a page's mixed default document.
    pub fn from_mixed(section_key: impl Into<String>, mixed: &Value) -> Self {
        let LocaleDocuments { data_fr, data_en } = bilingual::split(mixed);
        Self {
            section_key: section_key.into(),
            data_fr,
            data_en: Some(data_en),
            is_active: true,
        }
    }
}

/// Body of `PUT /api/globalSections/:id`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_fr: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_en: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// The version the editor read. When present it must match the stored one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
}

impl SectionUpdate {
    /// Replace both locale documents from an edited mixed document.
    pub fn from_mixed(mixed: &Value, version: Option<i32>) -> Self {
        let LocaleDocuments { data_fr, data_en } = bilingual::split(mixed);
        Self {
            data_fr: Some(data_fr),
            data_en: Some(data_en),
            version,
            ..Self::default()
        }
    }
}

/// Query string of `GET /api/globalSections`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl SectionFilter {
    pub fn by_key(key: impl Into<String>) -> Self {
        Self {
            section_key: Some(key.into()),
            is_active: None,
        }
    }

    pub fn matches(&self, section: &GlobalSection) -> bool {
        self.section_key
            .as_deref()
            .map_or(true, |key| key == section.section_key)
            && self.is_active.map_or(true, |active| active == section.is_active)
    }
}
