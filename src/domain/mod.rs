//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! Nothing in here touches storage; serde derives describe the wire shape.

mod entity;
mod date;
mod status;
mod serde_helpers;
mod attachment;
mod profile;
mod task;
mod checklist;
mod defect;
mod company;
mod trackable;

pub use entity::{Entity, DomainError, DomainResult, new_id};
pub use date::{
    parse_date, format_date, today, today_string, tomorrow_string, next_week_string,
    is_overdue, DATE_FORMAT,
};
pub use status::{Status, Priority, DefectCategory};
pub use attachment::{SubTask, FileAttachment};
pub use profile::ApartmentProfile;
pub use task::Task;
pub use checklist::{Bucket, Checklist, bucket_for_due_date};
pub use defect::{Defect, StatusChange};
pub use company::BuildingCompany;
pub use trackable::Trackable;
