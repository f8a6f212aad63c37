//! Task Entity
//!
//! A checklist item: seeded at onboarding or added by the user. Completion is
//! derived from `status`; the stored `isCompleted` flag is written for older
//! readers and ignored on the way back in.

use serde::{Deserialize, Serialize};

use super::attachment::{FileAttachment, SubTask};
use super::entity::{new_id, Entity};
use super::serde_helpers::empty_as_none;
use super::status::{Priority, Status};
use super::trackable::Trackable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TaskRecord", into = "TaskRecord")]
pub struct Task {
    /// Unique identifier
    pub id: String,
    pub title: String,
    pub description: String,
    /// Free-text category label (see `generator::available_task_categories`)
    pub category: String,
    pub status: Status,
    pub priority: Priority,
    /// `MM/dd/yyyy`, kept as entered
    pub due_date: Option<String>,
    pub sub_tasks: Vec<SubTask>,
    pub attachments: Vec<FileAttachment>,
    pub notes: String,
    /// Added by the user rather than seeded
    pub is_user_added: bool,
}

impl Task {
    /// Seeded task with a fixed id
    pub fn seeded(id: &str, title: &str, description: &str, category: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            status: Status::Open,
            priority: Priority::Medium,
            due_date: None,
            sub_tasks: Vec::new(),
            attachments: Vec::new(),
            notes: String::new(),
            is_user_added: false,
        }
    }

    /// User-created task with a fresh id
    pub fn new(title: impl Into<String>, description: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            description: description.into(),
            category: category.into(),
            status: Status::Open,
            priority: Priority::Medium,
            due_date: None,
            sub_tasks: Vec::new(),
            attachments: Vec::new(),
            notes: String::new(),
            is_user_added: true,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_closed()
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    /// Checkbox semantics: checked is CLOSED, unchecked is OPEN
    pub fn set_completed(&mut self, completed: bool) {
        self.status = if completed { Status::Closed } else { Status::Open };
    }

    pub fn toggle_completed(&mut self) {
        let completed = self.is_completed();
        self.set_completed(!completed);
    }

    /// Copy with a fresh id, reopened, with fresh incomplete sub-tasks
    ///
    /// Attachments are shared with the original; their files are only removed
    /// once no record references them.
    pub fn duplicate(&self) -> Self {
        Self {
            id: new_id(),
            title: format!("{} (Copy)", self.title),
            status: Status::Open,
            sub_tasks: self.sub_tasks.iter().map(SubTask::fresh_copy).collect(),
            is_user_added: true,
            ..self.clone()
        }
    }

    pub fn add_sub_task(&mut self, title: impl Into<String>) -> &SubTask {
        self.sub_tasks.push(SubTask::new(title));
        &self.sub_tasks[self.sub_tasks.len() - 1]
    }

    /// Flip a sub-task; returns its new state
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

impl Entity for Task {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }
}

impl Trackable for Task {
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
}

/// Stored shape of a task
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRecord {
    id: String,
    title: String,
    description: String,
    category: String,
    #[serde(default)]
    is_completed: bool,
    notes: String,
    priority: Priority,
    #[serde(default, with = "empty_as_none")]
    due_date: Option<String>,
    is_user_added: bool,
    status: Status,
    sub_tasks: Vec<SubTask>,
    attachments: Vec<FileAttachment>,
}

impl From<TaskRecord> for Task {
    fn from(record: TaskRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            category: record.category,
            status: record.status,
            priority: record.priority,
            due_date: record.due_date,
            sub_tasks: record.sub_tasks,
            attachments: record.attachments,
            notes: record.notes,
            is_user_added: record.is_user_added,
        }
    }
}

impl From<Task> for TaskRecord {
    fn from(task: Task) -> Self {
        Self {
            is_completed: task.is_completed(),
            id: task.id,
            title: task.title,
            description: task.description,
            category: task.category,
            notes: task.notes,
            priority: task.priority,
            due_date: task.due_date,
            is_user_added: task.is_user_added,
            status: task.status,
            sub_tasks: task.sub_tasks,
            attachments: task.attachments,
        }
    }
}
