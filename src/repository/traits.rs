//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for data access.
//! Implementations sit on top of the typed slot storage.

use async_trait::async_trait;
use crate::domain::{Entity, DomainResult};

/// Core repository trait for CRUD operations
///
/// Generic over any Entity type.
/// All operations are async so callers can share one storage handle.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Store a new entity; ids are trusted to be unique
    async fn create(&self, entity: &T) -> DomainResult<T>;

    async fn find_by_id(&self, id: &T::Id) -> DomainResult<Option<T>>;

    async fn list(&self) -> DomainResult<Vec<T>>;

    /// Replace an existing entity; `NotFound` if its id is unknown
    async fn update(&self, entity: &T) -> DomainResult<T>;

    /// Delete entity by ID; deleting an unknown id is `NotFound`
    async fn delete(&self, id: &T::Id) -> DomainResult<()>;
}

/// Extension for repositories that support text search
#[async_trait]
pub trait SearchableRepository<T: Entity>: Repository<T> {
    /// Case-insensitive substring search, in stored order
    async fn search(&self, query: &str) -> DomainResult<Vec<T>>;
}
