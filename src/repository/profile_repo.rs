//! Profile Repository

use super::SharedStorage;
use crate::domain::{ApartmentProfile, DomainResult};
use crate::generator;

/// The single apartment profile in the `user_data` slot
pub struct ProfileRepository {
    storage: SharedStorage,
}

impl ProfileRepository {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }

    /// `None` until onboarding has been completed
    pub async fn get(&self) -> Option<ApartmentProfile> {
        let storage = self.storage.lock().await;
        storage.load_profile()
    }

    /// Overwrites any stored profile
    pub async fn save(&self, profile: &ApartmentProfile) -> DomainResult<()> {
        let storage = self.storage.lock().await;
        storage.save_profile(profile)?;
        Ok(())
    }

    pub async fn is_onboarded(&self) -> bool {
        self.get().await.is_some()
    }

    /// Task categories offered for the stored profile
    pub async fn available_categories(&self) -> Vec<String> {
        generator::available_task_categories(self.get().await.as_ref())
    }
}
