use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::kind::ResourceKind;

/// A stored resource. The payload fields are flattened next to the id and
/// timestamps when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    pub id: Uuid,
    #[serde(flatten)]
    pub data: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResourceRecord {
    pub fn new(data: Map<String, Value>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            data,
            created_at: now,
            updated_at: now,
        }
    }

    /// Shallow merge: supplied keys replace stored ones, others are kept.
    pub fn merge(&mut self, changes: Map<String, Value>) {
        self.data.extend(changes);
        self.updated_at = Utc::now();
    }
}

/// Database row representation of a resource.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ResourceRow {
    pub id: Uuid,
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResourceRow {
    pub fn into_record(self, kind: ResourceKind) -> ResourceRecord {
        let data = match self.data {
            Value::Object(map) => map,
            other => {
                tracing::warn!(id = %self.id, table = kind.table(), "non-object payload: {other}");
                Map::new()
            }
        };
        ResourceRecord {
            id: self.id,
            data,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
