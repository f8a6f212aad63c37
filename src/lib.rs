//! MoveIn Core
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - codec: Record trees and the versioned slot envelope
//! - store: Key-value backends and typed slots
//! - query: Filtering, ordering and calendar lookups
//! - repository: Async data access used by the screens
//!
//! plus the checklist generator, attachment files and the defect report.

use std::fs;

use chrono::NaiveDate;
use log::{info, warn};

pub mod domain;
pub mod codec;
pub mod store;
pub mod query;
pub mod generator;
pub mod attachments;
pub mod report;
pub mod config;
pub mod repository;

use attachments::AttachmentStore;
use config::{AppConfig, Backend};
use domain::{ApartmentProfile, Checklist, DomainResult};
use report::{DefectReport, ReportConfig};
use repository::{
    ChecklistRepository, CompanyRepository, DefectRepository, ProfileRepository, Repository,
    SharedStorage,
};
use store::{AppStorage, JsonFileStore, KeyValueStore, MemoryStore, SqliteStore, StoreResult};

/// Everything the presentation layer needs, built once at startup
pub struct AppContext {
    pub config: AppConfig,
    pub storage: SharedStorage,
    pub attachments: AttachmentStore,
    pub checklist: ChecklistRepository,
    pub defects: DefectRepository,
    pub profile: ProfileRepository,
    pub companies: CompanyRepository,
}

fn open_store(config: &AppConfig) -> StoreResult<Box<dyn KeyValueStore>> {
    let store: Box<dyn KeyValueStore> = match config.backend {
        Backend::Memory => Box::new(MemoryStore::new()),
        Backend::Files => Box::new(JsonFileStore::open(config.slots_dir())?),
        Backend::Sqlite => {
            fs::create_dir_all(&config.data_dir)?;
            Box::new(SqliteStore::open(&config.database_path())?)
        }
    };
    Ok(store)
}

impl AppContext {
    pub fn open(config: &AppConfig) -> DomainResult<Self> {
        info!(
            "Opening data dir {} ({:?} backend)",
            config.data_dir.display(),
            config.backend
        );

        let storage = repository::shared(AppStorage::new(open_store(config)?));
        let attachments = AttachmentStore::new(config.attachments_path())?;

        Ok(Self {
            config: config.clone(),
            checklist: ChecklistRepository::new(storage.clone(), attachments.clone()),
            defects: DefectRepository::new(storage.clone(), attachments.clone()),
            profile: ProfileRepository::new(storage.clone()),
            companies: CompanyRepository::new(storage.clone()),
            storage,
            attachments,
        })
    }

    /// Save the profile and generate its checklist
    pub async fn complete_onboarding(&self, profile: &ApartmentProfile) -> DomainResult<Checklist> {
        self.profile.save(profile).await?;
        self.checklist.initialize_from_profile(profile).await
    }

    /// Delete attachment files no record points at
    ///
    /// Skipped (returning 0) while any record slot is unreadable.
    pub async fn cleanup_attachments(&self) -> DomainResult<usize> {
        let storage = self.storage.lock().await;
        let Some(referenced) = storage.referenced_files() else {
            warn!("Skipping attachment cleanup, stored records could not all be read");
            return Ok(0);
        };
        Ok(self.attachments.cleanup_orphans(&referenced)?)
    }

    /// Report over the stored defects, addressed as configured
    pub async fn defect_report(&self, config: &ReportConfig, today: NaiveDate) -> DomainResult<DefectReport> {
        let defects = self.defects.list().await?;
        Ok(DefectReport::build(&defects, config, today))
    }

    /// Latest lines written by the logger installed with `init_logging`
    pub fn recent_log_lines(&self) -> Vec<String> {
        rolling_logger::recent_lines()
    }
}

/// Install the rolling file logger under the configured log directory
pub fn init_logging(config: &AppConfig) -> Result<(), String> {
    rolling_logger::init_logger(config.log_path(), &config.app_name)
}
