//! Checklist Repository
//!
//! Tasks across the three checklist buckets. A write saves only the bucket
//! slots it changed.

use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::info;

use super::traits::{Repository, SearchableRepository};
use super::{cascade_delete, SharedStorage};
use crate::attachments::AttachmentStore;
use crate::domain::{
    self, bucket_for_due_date, ApartmentProfile, Bucket, Checklist, DomainError, DomainResult,
    FileAttachment, Status, SubTask, Task, Trackable,
};
use crate::generator;
use crate::query::{due_on, sort_items, split_active_closed, Filter, TaskFilter};
use crate::store::AppStorage;

fn task_not_found(id: &str) -> DomainError {
    DomainError::NotFound(format!("Task {}", id))
}

/// Load, change, save the changed buckets
fn modify<R>(
    storage: &AppStorage,
    change: impl FnOnce(&mut Checklist) -> DomainResult<R>,
) -> DomainResult<R> {
    let before = storage.checklist_for_update()?;
    let mut checklist = before.clone();
    let result = change(&mut checklist)?;
    storage.save_checklist_changes(&before, &checklist)?;
    Ok(result)
}

/// Checklist tasks stored in the bucket slots
pub struct ChecklistRepository {
    storage: SharedStorage,
    attachments: AttachmentStore,
}

impl ChecklistRepository {
    pub fn new(storage: SharedStorage, attachments: AttachmentStore) -> Self {
        Self { storage, attachments }
    }

    // ========================
    // Buckets
    // ========================

    /// Whole checklist; unreadable buckets show as empty
    pub async fn load_checklist(&self) -> Checklist {
        let storage = self.storage.lock().await;
        storage.load_checklist().unwrap_or_default()
    }

    pub async fn save_checklist(&self, checklist: &Checklist) -> DomainResult<()> {
        let storage = self.storage.lock().await;
        storage.save_checklist(checklist)?;
        Ok(())
    }

    pub async fn list_bucket(&self, bucket: Bucket) -> Vec<Task> {
        self.load_checklist().await.bucket(bucket).clone()
    }

    /// Replace the checklist with the one generated for `profile`
    ///
    /// Writes all three buckets without reading the stored ones.
    pub async fn initialize_from_profile(&self, profile: &ApartmentProfile) -> DomainResult<Checklist> {
        let checklist = generator::personalized_checklist(profile);
        self.save_checklist(&checklist).await?;
        info!("Generated checklist with {} tasks", checklist.len());
        Ok(checklist)
    }

    /// Add to a bucket chosen by the caller
    pub async fn create_in(&self, bucket: Bucket, task: &Task) -> DomainResult<Task> {
        let storage = self.storage.lock().await;
        modify(&storage, |checklist| {
            checklist.push(bucket, task.clone());
            Ok(task.clone())
        })
    }

    /// Add to the bucket its due date points to, relative to `today`
    pub async fn create_on(&self, task: &Task, today: NaiveDate) -> DomainResult<(Bucket, Task)> {
        let bucket = bucket_for_due_date(task.due_date.as_deref(), today);
        let created = self.create_in(bucket, task).await?;
        Ok((bucket, created))
    }

    pub async fn find_with_bucket(&self, id: &str) -> Option<(Bucket, Task)> {
        let checklist = self.load_checklist().await;
        checklist.find(id).map(|(bucket, task)| (bucket, task.clone()))
    }

    // ========================
    // Task State
    // ========================

    /// Apply `change` to one task and save
    async fn update_task(
        &self,
        id: &str,
        change: impl FnOnce(&mut Task) + Send,
    ) -> DomainResult<Task> {
        let storage = self.storage.lock().await;
        modify(&storage, |checklist| {
            let task = checklist.find_mut(id).ok_or_else(|| task_not_found(id))?;
            change(task);
            Ok(task.clone())
        })
    }

    pub async fn set_status(&self, id: &str, status: Status) -> DomainResult<Task> {
        self.update_task(id, |task| task.set_status(status)).await
    }

    pub async fn toggle_completed(&self, id: &str) -> DomainResult<Task> {
        self.update_task(id, Task::toggle_completed).await
    }

    /// Copy placed right after the original, in the same bucket
    pub async fn duplicate(&self, id: &str) -> DomainResult<Task> {
        let storage = self.storage.lock().await;
        modify(&storage, |checklist| {
            let (bucket, original) = checklist.find(id).ok_or_else(|| task_not_found(id))?;
            let copy = original.duplicate();
            let tasks = checklist.bucket_mut(bucket);
            let index = tasks
                .iter()
                .position(|t| t.id == id)
                .map_or(tasks.len(), |i| i + 1);
            tasks.insert(index, copy.clone());
            Ok(copy)
        })
    }

    // ========================
    // Sub-tasks
    // ========================

    pub async fn add_sub_task(&self, id: &str, title: &str) -> DomainResult<SubTask> {
        let storage = self.storage.lock().await;
        modify(&storage, |checklist| {
            let task = checklist.find_mut(id).ok_or_else(|| task_not_found(id))?;
            Ok(task.add_sub_task(title).clone())
        })
    }

    pub async fn toggle_sub_task(&self, id: &str, sub_task_id: &str) -> DomainResult<bool> {
        let storage = self.storage.lock().await;
        modify(&storage, |checklist| {
            let task = checklist.find_mut(id).ok_or_else(|| task_not_found(id))?;
            task.toggle_sub_task(sub_task_id)
                .ok_or_else(|| DomainError::NotFound(format!("Sub-task {}", sub_task_id)))
        })
    }

    pub async fn remove_sub_task(&self, id: &str, sub_task_id: &str) -> DomainResult<SubTask> {
        let storage = self.storage.lock().await;
        modify(&storage, |checklist| {
            let task = checklist.find_mut(id).ok_or_else(|| task_not_found(id))?;
            task.remove_sub_task(sub_task_id)
                .ok_or_else(|| DomainError::NotFound(format!("Sub-task {}", sub_task_id)))
        })
    }

    // ========================
    // Attachments
    // ========================

    /// Copy a file in and attach it to the task
    pub async fn add_attachment(
        &self,
        id: &str,
        source: &Path,
        name: &str,
        mime: Option<&str>,
    ) -> DomainResult<FileAttachment> {
        let storage = self.storage.lock().await;
        let before = storage.checklist_for_update()?;
        let mut checklist = before.clone();
        let task = checklist.find_mut(id).ok_or_else(|| task_not_found(id))?;

        let attachment = self.attachments.persist(source, name, mime)?;
        task.attachments.push(attachment.clone());
        storage.save_checklist_changes(&before, &checklist)?;
        Ok(attachment)
    }

    /// Detach and delete the file unless another record still uses it
    pub async fn remove_attachment(&self, id: &str, attachment_id: &str) -> DomainResult<FileAttachment> {
        let storage = self.storage.lock().await;
        let removed = modify(&storage, |checklist| {
            let task = checklist.find_mut(id).ok_or_else(|| task_not_found(id))?;
            task.remove_attachment(attachment_id)
                .ok_or_else(|| DomainError::NotFound(format!("Attachment {}", attachment_id)))
        })?;
        cascade_delete(&storage, &self.attachments, &[removed.uri.clone()]);
        Ok(removed)
    }

    // ========================
    // Queries
    // ========================

    pub async fn filter(&self, filter: &TaskFilter) -> Vec<Task> {
        let tasks: Vec<Task> = self.load_checklist().await.tasks().cloned().collect();
        filter.apply(&tasks)
    }

    pub async fn due_on(&self, date: NaiveDate) -> Vec<Task> {
        let tasks: Vec<Task> = self.load_checklist().await.tasks().cloned().collect();
        due_on(&tasks, date)
    }

    /// One bucket ordered by status, then priority, then overdue first
    pub async fn sorted(&self, bucket: Bucket, today: NaiveDate) -> Vec<Task> {
        let mut tasks = self.list_bucket(bucket).await;
        sort_items(&mut tasks, today);
        tasks
    }

    /// Sorted, split into (not completed, completed)
    pub async fn active_and_completed(&self, bucket: Bucket, today: NaiveDate) -> (Vec<Task>, Vec<Task>) {
        split_active_closed(self.sorted(bucket, today).await)
    }

    /// Share of closed tasks
    pub async fn progress(&self) -> f32 {
        self.load_checklist().await.progress()
    }
}

#[async_trait]
impl Repository<Task> for ChecklistRepository {
    /// Routed by due date relative to today
    async fn create(&self, task: &Task) -> DomainResult<Task> {
        let (_, created) = self.create_on(task, domain::today()).await?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &String) -> DomainResult<Option<Task>> {
        Ok(self.find_with_bucket(id).await.map(|(_, task)| task))
    }

    async fn list(&self) -> DomainResult<Vec<Task>> {
        Ok(self.load_checklist().await.tasks().cloned().collect())
    }

    async fn update(&self, task: &Task) -> DomainResult<Task> {
        let storage = self.storage.lock().await;
        modify(&storage, |checklist| {
            if checklist.replace(task.clone()) {
                Ok(task.clone())
            } else {
                Err(task_not_found(&task.id))
            }
        })
    }

    /// Also deletes the task's attachment files
    async fn delete(&self, id: &String) -> DomainResult<()> {
        let storage = self.storage.lock().await;
        let (_, removed) = modify(&storage, |checklist| {
            checklist.remove(id).ok_or_else(|| task_not_found(id))
        })?;

        let files: Vec<String> = removed.owned_files().into_iter().map(str::to_string).collect();
        cascade_delete(&storage, &self.attachments, &files);
        Ok(())
    }
}

#[async_trait]
impl SearchableRepository<Task> for ChecklistRepository {
    async fn search(&self, query: &str) -> DomainResult<Vec<Task>> {
        Ok(self.filter(&TaskFilter::new().text(query)).await)
    }
}
