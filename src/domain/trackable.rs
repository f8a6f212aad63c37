//! Common view over tasks and defects
//!
//! Calendar queries and attachment cleanup only care about these fields.

use super::attachment::{FileAttachment, SubTask};
use super::date::parse_date;
use super::status::{Priority, Status};
use chrono::NaiveDate;

pub trait Trackable {
    fn item_id(&self) -> &str;
    fn status(&self) -> Status;
    fn priority(&self) -> Priority;
    fn due_date_text(&self) -> Option<&str>;
    fn sub_tasks(&self) -> &[SubTask];
    fn attachments(&self) -> &[FileAttachment];

    /// Legacy image paths; only defects have them
    fn image_paths(&self) -> &[String] {
        &[]
    }

    /// Parsed due date; unparseable counts as no date
    fn due_date(&self) -> Option<NaiveDate> {
        self.due_date_text().and_then(parse_date)
    }

    fn is_due_on(&self, date: NaiveDate) -> bool {
        self.due_date() == Some(date)
    }

    fn incomplete_sub_tasks(&self) -> usize {
        self.sub_tasks().iter().filter(|s| !s.is_completed).count()
    }

    /// Every file path this item owns
    fn owned_files(&self) -> Vec<&str> {
        self.attachments()
            .iter()
            .map(|a| a.uri.as_str())
            .chain(self.image_paths().iter().map(|p| p.as_str()))
            .collect()
    }
}
