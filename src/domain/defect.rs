//! Defect Entity
//!
//! An issue found in the apartment, tracked OPEN -> IN_PROGRESS -> CLOSED.
//! Any transition is allowed; closing with open sub-tasks is reported back to
//! the caller but never refused.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::attachment::{FileAttachment, SubTask};
use super::date::format_date;
use super::entity::{new_id, Entity};
use super::serde_helpers::empty_as_none;
use super::status::{DefectCategory, Priority, Status};
use super::trackable::Trackable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Defect {
    pub id: String,
    /// Room or area label
    pub location: String,
    pub category: DefectCategory,
    pub priority: Priority,
    pub description: String,
    pub status: Status,
    /// `MM/dd/yyyy`
    pub created_at: String,
    #[serde(default, with = "empty_as_none")]
    pub due_date: Option<String>,
    /// Set when the defect is closed, cleared when it is reopened
    #[serde(default, with = "empty_as_none")]
    pub closed_date: Option<String>,
    pub notes: String,
    #[serde(default, with = "empty_as_none")]
    pub assigned_to: Option<String>,
    /// Image paths written before attachments existed
    pub images: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<FileAttachment>,
    pub sub_tasks: Vec<SubTask>,
}

/// Outcome of a status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub previous: Status,
    pub current: Status,
    /// Sub-tasks still open when the defect was closed; 0 for other moves
    pub incomplete_sub_tasks: usize,
}

impl StatusChange {
    /// The UI should warn before keeping this change
    pub fn needs_warning(&self) -> bool {
        self.current.is_closed() && self.incomplete_sub_tasks > 0
    }
}

impl Defect {
    pub fn new(
        location: impl Into<String>,
        category: DefectCategory,
        priority: Priority,
        description: impl Into<String>,
        created_on: NaiveDate,
    ) -> Self {
        Self {
            id: new_id(),
            location: location.into(),
            category,
            priority,
            description: description.into(),
            status: Status::Open,
            created_at: format_date(created_on),
            due_date: None,
            closed_date: None,
            notes: String::new(),
            assigned_to: None,
            images: Vec::new(),
            attachments: Vec::new(),
            sub_tasks: Vec::new(),
        }
    }

    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    pub fn set_status(&mut self, status: Status, today: NaiveDate) -> StatusChange {
        let previous = self.status;
        self.status = status;

        let incomplete_sub_tasks = if status.is_closed() {
            if !previous.is_closed() || self.closed_date.is_none() {
                self.closed_date = Some(format_date(today));
            }
            self.incomplete_sub_tasks()
        } else {
            self.closed_date = None;
            0
        };

        StatusChange {
            previous,
            current: status,
            incomplete_sub_tasks,
        }
    }

    /// Copy with a fresh id, reopened, created today, with fresh incomplete
    /// sub-tasks
    pub fn duplicate(&self, today: NaiveDate) -> Self {
        Self {
            id: new_id(),
            status: Status::Open,
            created_at: format_date(today),
            closed_date: None,
            sub_tasks: self.sub_tasks.iter().map(SubTask::fresh_copy).collect(),
            ..self.clone()
        }
    }

    pub fn add_sub_task(&mut self, title: impl Into<String>) -> &SubTask {
        self.sub_tasks.push(SubTask::new(title));
        &self.sub_tasks[self.sub_tasks.len() - 1]
    }

    pub fn toggle_sub_task(&mut self, sub_task_id: &str) -> Option<bool> {
        let sub_task = self.sub_tasks.iter_mut().find(|s| s.id == sub_task_id)?;
        sub_task.is_completed = !sub_task.is_completed;
        Some(sub_task.is_completed)
    }

    pub fn remove_sub_task(&mut self, sub_task_id: &str) -> Option<SubTask> {
        let index = self.sub_tasks.iter().position(|s| s.id == sub_task_id)?;
        Some(self.sub_tasks.remove(index))
    }

    pub fn remove_attachment(&mut self, attachment_id: &str) -> Option<FileAttachment> {
        let index = self.attachments.iter().position(|a| a.id == attachment_id)?;
        Some(self.attachments.remove(index))
    }
}

impl Entity for Defect {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }
}

impl Trackable for Defect {
    fn item_id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> Status {
        self.status
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn due_date_text(&self) -> Option<&str> {
        self.due_date.as_deref()
    }

    fn sub_tasks(&self) -> &[SubTask] {
        &self.sub_tasks
    }

    fn attachments(&self) -> &[FileAttachment] {
        &self.attachments
    }

    fn image_paths(&self) -> &[String] {
        &self.images
    }
}
