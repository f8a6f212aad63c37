//! Defect Repository
//!
//! The defect list lives in a single slot and keeps insertion order; the
//! sorted view is computed on read.

use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::warn;

use super::traits::{Repository, SearchableRepository};
use super::{cascade_delete, SharedStorage};
use crate::attachments::AttachmentStore;
use crate::domain::{
    Defect, DomainError, DomainResult, FileAttachment, Status, StatusChange, SubTask, Trackable,
};
use crate::query::{due_on, sort_items, split_active_closed, DefectFilter, Filter};
use crate::store::AppStorage;

fn defect_not_found(id: &str) -> DomainError {
    DomainError::NotFound(format!("Defect {}", id))
}

fn modify<R>(
    storage: &AppStorage,
    change: impl FnOnce(&mut Vec<Defect>) -> DomainResult<R>,
) -> DomainResult<R> {
    let mut defects = storage.load_defects();
    let result = change(&mut defects)?;
    storage.save_defects(&defects)?;
    Ok(result)
}

fn find_mut<'a>(defects: &'a mut [Defect], id: &str) -> DomainResult<&'a mut Defect> {
    defects
        .iter_mut()
        .find(|d| d.id == id)
        .ok_or_else(|| defect_not_found(id))
}

pub struct DefectRepository {
    storage: SharedStorage,
    attachments: AttachmentStore,
}

impl DefectRepository {
    pub fn new(storage: SharedStorage, attachments: AttachmentStore) -> Self {
        Self { storage, attachments }
    }

    async fn load(&self) -> Vec<Defect> {
        let storage = self.storage.lock().await;
        storage.load_defects()
    }

    /// Change status, stamping or clearing the closed date
    ///
    /// Closing with open sub-tasks goes through; the returned change says so.
    pub async fn set_status(
        &self,
        id: &str,
        status: Status,
        today: NaiveDate,
    ) -> DomainResult<(Defect, StatusChange)> {
        let storage = self.storage.lock().await;
        let (defect, change) = modify(&storage, |defects| {
            let defect = find_mut(defects, id)?;
            let change = defect.set_status(status, today);
            Ok((defect.clone(), change))
        })?;
        if change.needs_warning() {
            warn!(
                "Defect {} closed with {} open sub-tasks",
                id, change.incomplete_sub_tasks
            );
        }
        Ok((defect, change))
    }

    /// Copy appended to the list: new id, OPEN, fresh incomplete sub-tasks
    pub async fn duplicate(&self, id: &str, today: NaiveDate) -> DomainResult<Defect> {
        let storage = self.storage.lock().await;
        modify(&storage, |defects| {
            let original = defects
                .iter()
                .find(|d| d.id == id)
                .ok_or_else(|| defect_not_found(id))?;
            let copy = original.duplicate(today);
            defects.push(copy.clone());
            Ok(copy)
        })
    }

    // ========================
    // Sub-tasks
    // ========================

    pub async fn add_sub_task(&self, id: &str, title: &str) -> DomainResult<SubTask> {
        let storage = self.storage.lock().await;
        modify(&storage, |defects| {
            Ok(find_mut(defects, id)?.add_sub_task(title).clone())
        })
    }

    pub async fn toggle_sub_task(&self, id: &str, sub_task_id: &str) -> DomainResult<bool> {
        let storage = self.storage.lock().await;
        modify(&storage, |defects| {
            find_mut(defects, id)?
                .toggle_sub_task(sub_task_id)
                .ok_or_else(|| DomainError::NotFound(format!("Sub-task {}", sub_task_id)))
        })
    }

    pub async fn remove_sub_task(&self, id: &str, sub_task_id: &str) -> DomainResult<SubTask> {
        let storage = self.storage.lock().await;
        modify(&storage, |defects| {
            find_mut(defects, id)?
                .remove_sub_task(sub_task_id)
                .ok_or_else(|| DomainError::NotFound(format!("Sub-task {}", sub_task_id)))
        })
    }

    // ========================
    // Attachments
    // ========================

    pub async fn add_attachment(
        &self,
        id: &str,
        source: &Path,
        name: &str,
        mime: Option<&str>,
    ) -> DomainResult<FileAttachment> {
        let storage = self.storage.lock().await;
        let mut defects = storage.load_defects();
        let defect = find_mut(&mut defects, id)?;

        let attachment = self.attachments.persist(source, name, mime)?;
        defect.attachments.push(attachment.clone());
        storage.save_defects(&defects)?;
        Ok(attachment)
    }

    pub async fn remove_attachment(&self, id: &str, attachment_id: &str) -> DomainResult<FileAttachment> {
        let storage = self.storage.lock().await;
        let removed = modify(&storage, |defects| {
            find_mut(defects, id)?
                .remove_attachment(attachment_id)
                .ok_or_else(|| DomainError::NotFound(format!("Attachment {}", attachment_id)))
        })?;
        cascade_delete(&storage, &self.attachments, &[removed.uri.clone()]);
        Ok(removed)
    }

    /// Drop a legacy image path and its file
    pub async fn remove_image(&self, id: &str, path: &str) -> DomainResult<()> {
        let storage = self.storage.lock().await;
        modify(&storage, |defects| {
            let defect = find_mut(defects, id)?;
            let index = defect
                .images
                .iter()
                .position(|p| p == path)
                .ok_or_else(|| DomainError::NotFound(format!("Image {}", path)))?;
            defect.images.remove(index);
            Ok(())
        })?;
        cascade_delete(&storage, &self.attachments, &[path.to_string()]);
        Ok(())
    }

    // ========================
    // Queries
    // ========================

    pub async fn filter(&self, filter: &DefectFilter) -> Vec<Defect> {
        filter.apply(&self.load().await)
    }

    pub async fn due_on(&self, date: NaiveDate) -> Vec<Defect> {
        due_on(&self.load().await, date)
    }

    /// Status, then priority, then overdue first
    pub async fn sorted(&self, today: NaiveDate) -> Vec<Defect> {
        let mut defects = self.load().await;
        sort_items(&mut defects, today);
        defects
    }

    /// Sorted, split into (not closed, closed)
    pub async fn active_and_closed(&self, today: NaiveDate) -> (Vec<Defect>, Vec<Defect>) {
        split_active_closed(self.sorted(today).await)
    }
}

#[async_trait]
impl Repository<Defect> for DefectRepository {
    async fn create(&self, defect: &Defect) -> DomainResult<Defect> {
        let storage = self.storage.lock().await;
        modify(&storage, |defects| {
            defects.push(defect.clone());
            Ok(defect.clone())
        })
    }

    async fn find_by_id(&self, id: &String) -> DomainResult<Option<Defect>> {
        Ok(self.load().await.into_iter().find(|d| &d.id == id))
    }

    async fn list(&self) -> DomainResult<Vec<Defect>> {
        Ok(self.load().await)
    }

    async fn update(&self, defect: &Defect) -> DomainResult<Defect> {
        let storage = self.storage.lock().await;
        modify(&storage, |defects| {
            let slot = find_mut(defects, &defect.id)?;
            *slot = defect.clone();
            Ok(defect.clone())
        })
    }

    /// Also deletes attachment and image files
    async fn delete(&self, id: &String) -> DomainResult<()> {
        let storage = self.storage.lock().await;
        let removed = modify(&storage, |defects| {
            let index = defects
                .iter()
                .position(|d| &d.id == id)
                .ok_or_else(|| defect_not_found(id))?;
            Ok(defects.remove(index))
        })?;

        let files: Vec<String> = removed.owned_files().into_iter().map(str::to_string).collect();
        cascade_delete(&storage, &self.attachments, &files);
        Ok(())
    }
}

#[async_trait]
impl SearchableRepository<Defect> for DefectRepository {
    async fn search(&self, query: &str) -> DomainResult<Vec<Defect>> {
        Ok(self.filter(&DefectFilter::new().text(query)).await)
    }
}
