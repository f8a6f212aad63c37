//! Enumerations shared by tasks and defects
//!
//! Stored by symbolic name (`IN_PROGRESS`, `WALLS_FLOORS`, ...). Every enum
//! carries an `Unknown` variant so that names written by a newer or foreign
//! build decode instead of failing the whole record.

use serde::{Deserialize, Serialize};

/// Lifecycle of a task or defect; any state may move to any other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    Closed,
    #[serde(other)]
    Unknown,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Open, Status::InProgress, Status::Closed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "OPEN",
            Status::InProgress => "IN_PROGRESS",
            Status::Closed => "CLOSED",
            Status::Unknown => "UNKNOWN",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Status::Open => "Open",
            Status::InProgress => "In Progress",
            Status::Closed => "Closed",
            Status::Unknown => "Unknown",
        }
    }

    /// List order: open work first
    pub fn rank(&self) -> u8 {
        match self {
            Status::Open => 0,
            Status::InProgress => 1,
            Status::Closed => 2,
            Status::Unknown => 3,
        }
    }

    pub fn is_closed(&self) -> bool {
        *self == Status::Closed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    #[serde(other)]
    Unknown,
}

impl Priority {
    /// Highest first, as reports and lists show them
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Unknown => "UNKNOWN",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Unknown => "Unknown",
        }
    }

    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
            Priority::Unknown => 3,
        }
    }
}

/// Trade a defect belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DefectCategory {
    Electricity,
    Plumbing,
    Installations,
    Windows,
    WallsFloors,
    #[default]
    Other,
    #[serde(other)]
    Unknown,
}

impl DefectCategory {
    pub const ALL: [DefectCategory; 6] = [
        DefectCategory::Electricity,
        DefectCategory::Plumbing,
        DefectCategory::Installations,
        DefectCategory::Windows,
        DefectCategory::WallsFloors,
        DefectCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DefectCategory::Electricity => "ELECTRICITY",
            DefectCategory::Plumbing => "PLUMBING",
            DefectCategory::Installations => "INSTALLATIONS",
            DefectCategory::Windows => "WINDOWS",
            DefectCategory::WallsFloors => "WALLS_FLOORS",
            DefectCategory::Other => "OTHER",
            DefectCategory::Unknown => "UNKNOWN",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DefectCategory::Electricity => "Electricity",
            DefectCategory::Plumbing => "Plumbing",
            DefectCategory::Installations => "Installations",
            DefectCategory::Windows => "Windows",
            DefectCategory::WallsFloors => "Walls & Floors",
            DefectCategory::Other => "Other",
            DefectCategory::Unknown => "Unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_match_serde() {
        for status in Status::ALL {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, serde_json::Value::String(status.as_str().to_string()));
            let back: Status = serde_json::from_value(json).unwrap();
            assert_eq!(back, status);
        }
        for category in DefectCategory::ALL {
            let json = serde_json::to_value(category).unwrap();
            assert_eq!(json.as_str(), Some(category.as_str()));
        }
        assert_eq!(serde_json::to_value(Priority::High).unwrap().as_str(), Some("HIGH"));
    }

    #[test]
    fn test_unrecognized_name_decodes_to_unknown() {
        let status: Status = serde_json::from_str("\"BLOCKED\"").unwrap();
        assert_eq!(status, Status::Unknown);
        let priority: Priority = serde_json::from_str("\"URGENT\"").unwrap();
        assert_eq!(priority, Priority::Unknown);
        let category: DefectCategory = serde_json::from_str("\"ROOF\"").unwrap();
        assert_eq!(category, DefectCategory::Unknown);
        let lowercase: Status = serde_json::from_str("\"closed\"").unwrap();
        assert_eq!(lowercase, Status::Unknown);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Status::InProgress.display_name(), "In Progress");
        assert_eq!(DefectCategory::WallsFloors.display_name(), "Walls & Floors");
        assert_eq!(Priority::default(), Priority::Medium);
    }
}
