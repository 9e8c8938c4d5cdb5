//! In-process store.
//!
//! Backs `--backend memory` for offline use and stands in for the remote
//! service in tests. Recent calls are recorded, and a failure can be queued for
//! the next call to a given operation.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use log::debug;

use crate::core::error::StoreError;
use crate::core::project::Project;
use crate::store::ProjectStore;

/// Most recent calls kept by [`InMemoryStore::calls`].
pub const CALL_LOG_LIMIT: usize = 256;

/// One recorded call, with the arguments it was made with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    ListAll,
    Get(String),
    Create(Project),
    Update(String, Project),
    Delete(String),
}

#[derive(Default)]
struct Inner {
    projects: HashMap<String, Project>,
    calls: VecDeque<StoreCall>,
    failures: HashMap<&'static str, StoreError>,
    latency: Option<Duration>,
}

#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_projects(projects: impl IntoIterator<Item = Project>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.lock();
            for project in projects {
                inner.projects.insert(project.name.clone(), project);
            }
        }
        store
    }

    /// Delay every call by `latency`.
    pub fn with_latency(self, latency: Duration) -> Self {
        self.lock().latency = Some(latency);
        self
    }

    /// Makes the next call to `operation` ("list", "get", "create",
    /// "update", "delete") fail with `error`.
    pub fn fail_next(&self, operation: &'static str, error: StoreError) {
        self.lock().failures.insert(operation, error);
    }

    /// The last [`CALL_LOG_LIMIT`] calls, oldest first.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.iter().cloned().collect()
    }

    pub fn snapshot(&self) -> HashMap<String, Project> {
        self.lock().projects.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Records `call` and returns the queued failure for `operation`, if any.
    async fn enter(&self, operation: &'static str, call: StoreCall) -> Result<(), StoreError> {
        debug!("In-memory store: {:?}", call);
        let (latency, failure) = {
            let mut inner = self.lock();
            if inner.calls.len() == CALL_LOG_LIMIT {
                inner.calls.pop_front();
            }
            inner.calls.push_back(call);
            (inner.latency, inner.failures.remove(operation))
        };
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        failure.map_or(Ok(()), Err)
    }
}

#[async_trait]
impl ProjectStore for InMemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn list_all(&self) -> Result<HashMap<String, Project>, StoreError> {
        self.enter("list", StoreCall::ListAll).await?;
        Ok(self.snapshot())
    }

    async fn get(&self, name: &str) -> Result<Project, StoreError> {
        self.enter("get", StoreCall::Get(name.to_string())).await?;
        self.lock()
            .projects
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    async fn create(&self, project: &Project) -> Result<String, StoreError> {
        self.enter("create", StoreCall::Create(project.clone())).await?;
        self.lock()
            .projects
            .insert(project.name.clone(), project.clone());
        Ok(project.name.clone())
    }

    async fn update(&self, name: &str, project: &Project) -> Result<Project, StoreError> {
        self.enter("update", StoreCall::Update(name.to_string(), project.clone()))
            .await?;
        let mut inner = self.lock();
        match inner.projects.get_mut(name) {
            Some(existing) => {
                *existing = project.clone();
                Ok(project.clone())
            }
            None => Err(StoreError::NotFound(name.to_string())),
        }
    }

    async fn delete(&self, name: &str) -> Result<(), StoreError> {
        self.enter("delete", StoreCall::Delete(name.to_string()))
            .await?;
        self.lock().projects.remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_project;

    #[tokio::test]
    async fn test_create_then_list() {
        let store = InMemoryStore::new();
        let name = store.create(&sample_project("db")).await.unwrap();
        assert_eq!(name, "db");
        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all["db"], sample_project("db"));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = InMemoryStore::new();
        let err = store.update("ghost", &sample_project("ghost")).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound("ghost".into()));
    }

    #[tokio::test]
    async fn test_update_replaces_whole_document() {
        let store = InMemoryStore::with_projects([sample_project("web").with_variable("A", "1")]);
        let replaced = sample_project("web").with_variable("B", "2");
        store.update("web", &replaced).await.unwrap();
        assert_eq!(store.get("web").await.unwrap(), replaced);
    }

    #[tokio::test]
    async fn test_call_log_is_bounded() {
        let store = InMemoryStore::new();
        for i in 0..CALL_LOG_LIMIT + 10 {
            let _ = store.get(&format!("p{i}")).await;
        }
        let calls = store.calls();
        assert_eq!(calls.len(), CALL_LOG_LIMIT);
        assert_eq!(calls[0], StoreCall::Get("p10".into()));
        assert_eq!(
            calls.last(),
            Some(&StoreCall::Get(format!("p{}", CALL_LOG_LIMIT + 9)))
        );
    }

    #[tokio::test]
    async fn test_queued_failure_fires_once() {
        let store = InMemoryStore::with_projects([sample_project("web")]);
        store.fail_next("delete", StoreError::Network("reset".into()));

        assert!(store.delete("web").await.is_err());
        assert!(store.snapshot().contains_key("web"));
        assert!(store.delete("web").await.is_ok());
        assert!(store.snapshot().is_empty());
        assert_eq!(
            store.calls(),
            vec![StoreCall::Delete("web".into()), StoreCall::Delete("web".into())]
        );
    }
}
