use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use crate::database::models::layout::LayoutRecord;
use crate::database::models::profile::Profile;
use crate::layout::ResolvedLayout;

/// Fields of `profiles` that never leave the server
const PRIVATE_FIELDS: &[&str] = &["user_id"];

/// SHA-256 hex digest of the compact JSON encoding. Informational only:
/// saves return it so clients can detect a concurrent overwrite after the
/// fact, but nothing checks it on write (last write wins).
pub fn document_checksum(document: &Value) -> String {
    let encoded = document.to_string();
    format!("{:x}", Sha256::digest(encoded.as_bytes()))
}

/// Convert a profile row into the public wire format
pub fn profile_to_api_value(profile: &Profile) -> Result<Value, serde_json::Error> {
    let mut value = serde_json::to_value(profile)?;
    if let Value::Object(ref mut obj) = value {
        for field in PRIVATE_FIELDS {
            obj.remove(*field);
        }
    }
    Ok(value)
}

/// Everything a rendering client needs for one page fetch:
/// `{ profile, layout }` with the layout fully resolved.
pub fn page_document(profile: &Profile, layout: &ResolvedLayout) -> Result<Value, serde_json::Error> {
    Ok(json!({
        "profile": profile_to_api_value(profile)?,
        "layout": serde_json::to_value(layout)?,
    }))
}

/// Stored-layout envelope returned by the layout endpoints
pub fn layout_to_api_value(record: &LayoutRecord) -> Value {
    json!({
        "document": record.document,
        "checksum": record.checksum,
        "updated_at": record.updated_at.to_rfc3339(),
        "stored": true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    fn sample_profile() -> Profile {
        Profile {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            username: "nightowl".to_string(),
            display_name: "Night Owl".to_string(),
            bio: String::new(),
            avatar_url: None,
            banner_url: None,
            status: Some("Playing Hades".to_string()),
            links: json!([]),
            favorite_games: json!([]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn checksum_is_stable_hex() {
        let doc = json!({"blocks": [{"id": "b1", "type": "header"}]});
        let first = document_checksum(&doc);
        let second = document_checksum(&doc);
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));

        let other = document_checksum(&json!({"blocks": []}));
        assert_ne!(first, other);
    }

    #[test]
    fn profile_wire_format_hides_private_fields() {
        let value = profile_to_api_value(&sample_profile()).unwrap();
        assert!(value.get("username").is_some());
        assert!(value.get("status").is_some());
        assert!(value.get("user_id").is_none());
    }

    #[test]
    fn layout_envelope_carries_checksum() {
        let record = LayoutRecord {
            profile_id: Uuid::new_v4(),
            document: json!({"blocks": []}),
            checksum: "abc123".to_string(),
            updated_at: Utc::now(),
        };
        let value = layout_to_api_value(&record);
        assert_eq!(value["checksum"], json!("abc123"));
        assert_eq!(value["stored"], json!(true));
    }
}
