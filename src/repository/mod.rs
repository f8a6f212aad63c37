//! Repository Layer
//!
//! Async facades over the shared `AppStorage`. Each call locks the storage,
//! loads the slot it needs, applies the change and writes the slot back.

mod traits;
mod checklist_repo;
mod defect_repo;
mod profile_repo;
mod company_repo;


use std::sync::Arc;
use tokio::sync::Mutex;

use crate::store::AppStorage;

pub use traits::{Repository, SearchableRepository};
pub use checklist_repo::ChecklistRepository;
pub use defect_repo::DefectRepository;
pub use profile_repo::ProfileRepository;
pub use company_repo::{CompanyRepository, default_companies};

/// Storage handle shared by every repository
pub type SharedStorage = Arc<Mutex<AppStorage>>;

pub fn shared(storage: AppStorage) -> SharedStorage {
    Arc::new(Mutex::new(storage))
}

/// Remove files of a deleted owner that no stored record still references
///
/// Call after the owner's slot has been written. Nothing is removed while any
/// record slot is unreadable.
pub(crate) fn cascade_delete(
    storage: &AppStorage,
    attachments: &crate::attachments::AttachmentStore,
    uris: &[String],
) -> usize {
    if uris.is_empty() {
        return 0;
    }
    let Some(referenced) = storage.referenced_files() else {
        log::warn!("Keeping {} attachment files until all records read cleanly", uris.len());
        return 0;
    };
    let removed = attachments.delete_owned(uris.iter().map(String::as_str), &referenced);
    log::debug!("Cascade removed {} of {} attachment files", removed, uris.len());
    removed
}
