//! # Project Store
//!
//! The remote document collection that owns the authoritative copy of
//! every project. The session only ever talks to it through
//! [`ProjectStore`], so the backend can be swapped (HTTP service, in-memory
//! for tests and offline use).

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::error::StoreError;
use crate::core::project::Project;

pub mod http;
pub mod memory;

pub use http::HttpProjectStore;
pub use memory::{InMemoryStore, StoreCall};

#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Returns the name of the backend, for logs.
    fn name(&self) -> &str;

    /// Blocks until the store answers, or fails with `Unavailable`.
    async fn wait_until_ready(&self, _timeout: Duration) -> Result<(), StoreError> {
        Ok(())
    }

    /// Every project, keyed by name.
    async fn list_all(&self) -> Result<HashMap<String, Project>, StoreError>;

    async fn get(&self, name: &str) -> Result<Project, StoreError>;

    /// Inserts or overwrites `project` under its name. Returns the name.
    async fn create(&self, project: &Project) -> Result<String, StoreError>;

    /// Replaces an existing project. Fails with `NotFound` if `name` is absent.
    async fn update(&self, name: &str, project: &Project) -> Result<Project, StoreError>;

    async fn delete(&self, name: &str) -> Result<(), StoreError>;
}
