//! Apartment profile entered during onboarding

use serde::{Deserialize, Serialize};

/// Shape of the apartment; drives the personalized checklist and categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApartmentProfile {
    pub rooms: u32,
    pub bathrooms: u32,
    pub parking: u32,
    pub warehouse: bool,
    #[serde(default)]
    pub garden: bool,
    pub balconies: u32,
    /// Free-text room labels picked by the user
    pub selected_room_names: Vec<String>,
}

impl Default for ApartmentProfile {
    fn default() -> Self {
        Self {
            rooms: 4,
            bathrooms: 1,
            parking: 1,
            warehouse: false,
            garden: false,
            balconies: 0,
            selected_room_names: vec![
                "Salon".to_string(),
                "Kitchen".to_string(),
                "Master Bedroom".to_string(),
                "Mamad".to_string(),
            ],
        }
    }
}
