//! Sub-tasks and file attachments
//!
//! Both are owned by exactly one task or defect and have no lifecycle of
//! their own.

use serde::{Deserialize, Serialize};

use super::entity::new_id;

/// Small checklist entry inside a task or defect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTask {
    pub id: String,
    pub title: String,
    pub is_completed: bool,
}

impl SubTask {
    /// New incomplete sub-task with a fresh id
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            is_completed: false,
        }
    }

    /// Copy for a duplicated parent: fresh id, not completed
    pub fn fresh_copy(&self) -> Self {
        Self {
            id: new_id(),
            title: self.title.clone(),
            is_completed: false,
        }
    }
}

/// Metadata of a file persisted next to the app data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttachment {
    pub id: String,
    /// Display name, usually the original file name
    pub name: String,
    /// MIME type, or the legacy `image` / `file` markers
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Absolute path or `file://` URI of the persisted copy
    pub uri: String,
    /// Size in bytes
    pub size: u64,
}

impl FileAttachment {
    pub fn is_image(&self) -> bool {
        self.mime_type == "image" || self.mime_type.starts_with("image/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_copy_resets_state() {
        let mut original = SubTask::new("Buy filters");
        original.is_completed = true;

        let copy = original.fresh_copy();
        assert_ne!(copy.id, original.id);
        assert_eq!(copy.title, "Buy filters");
        assert!(!copy.is_completed);
    }

    #[test]
    fn test_attachment_wire_names() {
        let attachment = FileAttachment {
            id: "a1".to_string(),
            name: "leak.jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
            uri: "/data/attachments/a1.jpg".to_string(),
            size: 2048,
        };
        let json = serde_json::to_value(&attachment).unwrap();
        assert_eq!(json["type"], "image/jpeg");
        assert!(attachment.is_image());

        let sub_task = serde_json::to_value(SubTask::new("x")).unwrap();
        assert!(sub_task.get("isCompleted").is_some());
    }
}
