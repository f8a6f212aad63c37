//! Building Company Entity
//!
//! The contractor a defect report is sent to.

use serde::{Deserialize, Serialize};

use super::entity::{new_id, Entity};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingCompany {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub contact_person: String,
    pub notes: String,
    pub is_default: bool,
}

impl BuildingCompany {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            email: email.into(),
            phone: String::new(),
            address: String::new(),
            contact_person: String::new(),
            notes: String::new(),
            is_default: false,
        }
    }
}

impl Entity for BuildingCompany {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }
}
