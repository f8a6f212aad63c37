//! Record Codec
//!
//! Records travel as `serde_json::Value` trees. Stored slots are wrapped in a
//! versioned envelope:
//!
//! ```json
//! { "schemaVersion": 1, "payload": [ ... ] }
//! ```
//!
//! A tree without the envelope is read as a legacy version 1 payload.
//! Decode failures are classified so callers can tell a missing field from a
//! type mismatch or a payload written by a newer schema.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Schema version written by this build
pub const SCHEMA_VERSION: u32 = 1;

const VERSION_KEY: &str = "schemaVersion";
const PAYLOAD_KEY: &str = "payload";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("missing field `{field}`")]
    FieldMissing { field: String },
    #[error("type mismatch: {detail}")]
    TypeMismatch { detail: String },
    #[error("unsupported schema version {found} (supported up to {supported})")]
    UnsupportedVersion { found: u64, supported: u32 },
    #[error("malformed record: {detail}")]
    Malformed { detail: String },
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        classify(&err)
    }
}

#[derive(Debug, Error)]
#[error("failed to encode record: {0}")]
pub struct EncodeError(#[from] serde_json::Error);

fn classify(err: &serde_json::Error) -> DecodeError {
    let message = err.to_string();

    if let Some(rest) = message.strip_prefix("missing field `") {
        let field = rest.split('`').next().unwrap_or_default().to_string();
        return DecodeError::FieldMissing { field };
    }

    if message.starts_with("invalid type")
        || message.starts_with("invalid value")
        || message.starts_with("invalid length")
    {
        return DecodeError::TypeMismatch { detail: message };
    }

    DecodeError::Malformed { detail: message }
}

/// Record to tree
pub fn encode<T: Serialize + ?Sized>(record: &T) -> Result<Value, EncodeError> {
    Ok(serde_json::to_value(record)?)
}

/// Tree to record
pub fn decode<T: DeserializeOwned>(tree: Value) -> Result<T, DecodeError> {
    Ok(serde_json::from_value(tree)?)
}

/// Wrap a payload in the current envelope
pub fn wrap(payload: Value) -> Value {
    let mut envelope = Map::new();
    envelope.insert(VERSION_KEY.to_string(), Value::from(SCHEMA_VERSION));
    envelope.insert(PAYLOAD_KEY.to_string(), payload);
    Value::Object(envelope)
}

/// Strip the envelope, checking its version
pub fn unwrap_envelope(tree: Value) -> Result<Value, DecodeError> {
    let mut map = match tree {
        Value::Object(map) => map,
        other => return Ok(other),
    };

    if !map.contains_key(VERSION_KEY) {
        return Ok(Value::Object(map));
    }

    let version = map
        .get(VERSION_KEY)
        .and_then(Value::as_u64)
        .ok_or_else(|| DecodeError::TypeMismatch {
            detail: format!("`{}` must be an unsigned integer", VERSION_KEY),
        })?;
    if version == 0 || version > u64::from(SCHEMA_VERSION) {
        return Err(DecodeError::UnsupportedVersion {
            found: version,
            supported: SCHEMA_VERSION,
        });
    }

    map.remove(PAYLOAD_KEY).ok_or_else(|| DecodeError::FieldMissing {
        field: PAYLOAD_KEY.to_string(),
    })
}

/// Record to stored text, enveloped
pub fn to_slot_text<T: Serialize + ?Sized>(record: &T) -> Result<String, EncodeError> {
    let tree = wrap(encode(record)?);
    Ok(serde_json::to_string(&tree)?)
}

/// Stored text to record, accepting enveloped and legacy trees
pub fn from_slot_text<T: DeserializeOwned>(text: &str) -> Result<T, DecodeError> {
    let tree: Value = serde_json::from_str(text).map_err(|e| DecodeError::Malformed {
        detail: e.to_string(),
    })?;
    decode(unwrap_envelope(tree)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ApartmentProfile, Defect, DefectCategory, FileAttachment, Priority, Status, Task,
    };
    use chrono::NaiveDate;
    use serde_json::json;

    fn sample_task() -> Task {
        let mut task = Task::new("Fix drawer", "Kitchen drawer sticks", "Kitchen");
        task.priority = Priority::High;
        task.due_date = Some("01/15/2025".to_string());
        task.notes = "Ask landlord first".to_string();
        task.add_sub_task("Measure rail");
        task.attachments.push(FileAttachment {
            id: "f1".to_string(),
            name: "drawer.jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
            uri: "/tmp/f1.jpg".to_string(),
            size: 1234,
        });
        task.set_status(Status::InProgress);
        task
    }

    #[test]
    fn test_records_survive_encode_decode() {
        let task = sample_task();
        assert_eq!(decode::<Task>(encode(&task).unwrap()).unwrap(), task);

        let mut defect = Defect::new(
            "Hallway",
            DefectCategory::WallsFloors,
            Priority::Low,
            "Cracked tile",
            NaiveDate::from_ymd_opt(2024, 11, 2).unwrap(),
        );
        defect.assigned_to = Some("Building manager".to_string());
        defect.images.push("/tmp/old.jpg".to_string());
        defect.add_sub_task("Photograph crack");
        assert_eq!(decode::<Defect>(encode(&defect).unwrap()).unwrap(), defect);

        let profile = ApartmentProfile {
            garden: true,
            ..ApartmentProfile::default()
        };
        assert_eq!(decode::<ApartmentProfile>(encode(&profile).unwrap()).unwrap(), profile);
    }

    #[test]
    fn test_missing_array_is_field_missing() {
        let mut tree = encode(&sample_task()).unwrap();
        tree.as_object_mut().unwrap().remove("subTasks");

        let err = decode::<Task>(tree).unwrap_err();
        assert_eq!(err, DecodeError::FieldMissing { field: "subTasks".to_string() });
    }

    #[test]
    fn test_wrong_type_is_type_mismatch() {
        let mut tree = encode(&sample_task()).unwrap();
        tree["title"] = json!(42);

        assert!(matches!(decode::<Task>(tree), Err(DecodeError::TypeMismatch { .. })));
    }

    #[test]
    fn test_envelope() {
        let task = sample_task();
        let text = to_slot_text(&vec![task.clone()]).unwrap();
        let tree: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(tree["schemaVersion"], 1);

        let tasks: Vec<Task> = from_slot_text(&text).unwrap();
        assert_eq!(tasks, vec![task]);
    }

    #[test]
    fn test_legacy_tree_without_envelope() {
        let legacy = json!({
            "rooms": 2, "bathrooms": 1, "parking": 0, "warehouse": false,
            "balconies": 0, "selectedRoomNames": []
        });
        let profile: ApartmentProfile = from_slot_text(&legacy.to_string()).unwrap();
        assert_eq!(profile.rooms, 2);
    }

    #[test]
    fn test_future_version_rejected() {
        let text = json!({ "schemaVersion": 9, "payload": [] }).to_string();
        let err = from_slot_text::<Vec<Task>>(&text).unwrap_err();
        assert_eq!(err, DecodeError::UnsupportedVersion { found: 9, supported: 1 });
    }

    #[test]
    fn test_garbage_text_is_malformed() {
        assert!(matches!(
            from_slot_text::<Vec<Task>>("{not json"),
            Err(DecodeError::Malformed { .. })
        ));
    }
}
