use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One row of `profile_layouts`: the whole layout document as jsonb, replaced
/// wholesale on every save. The checksum is informational (change detection
/// for clients), not an optimistic lock.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LayoutRecord {
    pub profile_id: Uuid,
    pub document: Value,
    pub checksum: String,
    pub updated_at: DateTime<Utc>,
}
