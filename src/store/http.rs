//! HTTP document-store backend.
//!
//! Projects live as JSON documents in one collection:
//!
//! ```text
//! GET    {base}/v1/ping                                   readiness
//! GET    {base}/v1/buckets/{b}/scopes/{s}/collections/{c}/documents
//! GET    …/documents/{name}
//! PUT    …/documents/{name}                               upsert
//! POST   …/documents/{name}                               replace (404 if absent)
//! DELETE …/documents/{name}
//! ```
//!
//! Requests carry basic auth when a username is configured.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{RequestBuilder, Response, StatusCode, Url};

use crate::core::config::StoreSettings;
use crate::core::error::StoreError;
use crate::core::project::Project;
use crate::store::ProjectStore;

const READY_POLL_INTERVAL: Duration = Duration::from_millis(250);

pub struct HttpProjectStore {
    base_url: Url,
    bucket: String,
    scope: String,
    collection: String,
    username: Option<String>,
    password: Option<String>,
    client: reqwest::Client,
}

impl HttpProjectStore {
    pub fn new(settings: &StoreSettings) -> Result<Self, StoreError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|e| StoreError::Unavailable(format!("invalid store URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::Unavailable(format!(
                "invalid store URL: {}",
                settings.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|e| StoreError::Network(e.to_string()))?;

        Ok(Self {
            base_url,
            bucket: settings.bucket.clone(),
            scope: settings.scope.clone(),
            collection: settings.collection.clone(),
            username: settings.username.clone(),
            password: settings.password.clone(),
            client,
        })
    }

    /// `{base}/v1/...segments`, each segment percent-encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("v1").extend(segments);
        }
        url
    }

    fn documents_url(&self, name: Option<&str>) -> Url {
        let mut segments = vec![
            "buckets",
            self.bucket.as_str(),
            "scopes",
            self.scope.as_str(),
            "collections",
            self.collection.as_str(),
            "documents",
        ];
        if let Some(name) = name {
            segments.push(name);
        }
        self.url(&segments)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.username {
            Some(user) => request.basic_auth(user, self.password.as_ref()),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        self.authorize(request)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))
    }

    /// Maps non-success statuses onto `StoreError`. A 404 on a named
    /// document becomes `NotFound`.
    async fn check(response: Response, name: Option<&str>) -> Result<Response, StoreError> {
        let status = response.status();
        debug!("Store response status: {}", status);
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            if let Some(name) = name {
                return Err(StoreError::NotFound(name.to_string()));
            }
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        warn!("Store API error: {} - {}", status.as_u16(), message);
        Err(StoreError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let response = self.send(self.client.get(self.url(&["ping"]))).await?;
        Self::check(response, None).await.map(|_| ())
    }
}

#[async_trait]
impl ProjectStore for HttpProjectStore {
    fn name(&self) -> &str {
        "http"
    }

    async fn wait_until_ready(&self, timeout: Duration) -> Result<(), StoreError> {
        info!("Waiting up to {:?} for store at {}", timeout, self.base_url);
        let probe = async {
            loop {
                match self.ping().await {
                    Ok(()) => return,
                    Err(e) => debug!("Store not ready: {}", e),
                }
                tokio::time::sleep(READY_POLL_INTERVAL).await;
            }
        };
        tokio::time::timeout(timeout, probe).await.map_err(|_| {
            StoreError::Unavailable(format!(
                "no answer from {} within {}s",
                self.base_url,
                timeout.as_secs()
            ))
        })
    }

    async fn list_all(&self) -> Result<HashMap<String, Project>, StoreError> {
        let response = self.send(self.client.get(self.documents_url(None))).await?;
        let response = Self::check(response, None).await?;
        let projects: Vec<Project> = response
            .json()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))?;
        info!("Fetched {} projects", projects.len());
        Ok(projects.into_iter().map(|p| (p.name.clone(), p)).collect())
    }

    async fn get(&self, name: &str) -> Result<Project, StoreError> {
        let response = self
            .send(self.client.get(self.documents_url(Some(name))))
            .await?;
        Self::check(response, Some(name))
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))
    }

    async fn create(&self, project: &Project) -> Result<String, StoreError> {
        let request = self
            .client
            .put(self.documents_url(Some(&project.name)))
            .json(project);
        let response = self.send(request).await?;
        Self::check(response, None).await?;
        Ok(project.name.clone())
    }

    async fn update(&self, name: &str, project: &Project) -> Result<Project, StoreError> {
        let request = self
            .client
            .post(self.documents_url(Some(name)))
            .json(project);
        let response = self.send(request).await?;
        Self::check(response, Some(name)).await?;
        Ok(project.clone())
    }

    async fn delete(&self, name: &str) -> Result<(), StoreError> {
        let response = self
            .send(self.client.delete(self.documents_url(Some(name))))
            .await?;
        Self::check(response, Some(name)).await.map(|_| ())
    }
}
