//! Remote task API client
//!
//! Defines the interface the engine consumes and its reqwest-backed
//! implementation against the collection endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use td_core::task::{NewTask, QueryDescriptor, Task, TaskStatus};

use crate::config::SyncConfig;
use crate::error::Result;
use crate::wire::{decode_error, DataEnvelope};

/// Interface to the remote, paginated, filterable task collection
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Fetch one page of tasks for the given descriptor
    async fn list(&self, descriptor: &QueryDescriptor) -> Result<Vec<Task>>;

    /// Fetch a single task by id
    async fn get(&self, id: i64) -> Result<Task>;

    /// Create a new task
    async fn create(&self, draft: &NewTask) -> Result<Task>;

    /// Update a task; fields left unset in the draft are untouched
    async fn update(&self, id: i64, draft: &NewTask) -> Result<Task>;

    /// Status-only update, used by the toggle mutation
    async fn update_status(&self, id: i64, status: TaskStatus) -> Result<Task> {
        self.update(id, &NewTask::status_only(status)).await
    }

    /// Delete a task, returning the deleted representation
    async fn delete(&self, id: i64) -> Result<Task>;
}

/// reqwest-backed implementation of [`TaskApi`]
pub struct HttpTaskApi {
    client: Client,
    base_url: String,
}

impl HttpTaskApi {
    /// Create a client against the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a client from an engine configuration
    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        let status = resp.status();
        if status.is_success() {
            let envelope: DataEnvelope<T> = resp.json().await?;
            return Ok(envelope.data);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(decode_error(status.as_u16(), &body))
    }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn list(&self, descriptor: &QueryDescriptor) -> Result<Vec<Task>> {
        debug!(?descriptor, "fetching task page");
        let resp = self
            .client
            .get(self.url("/tasks"))
            .query(&descriptor.request_params())
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn get(&self, id: i64) -> Result<Task> {
        let resp = self
            .client
            .get(self.url(&format!("/tasks/{id}")))
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn create(&self, draft: &NewTask) -> Result<Task> {
        let resp = self
            .client
            .post(self.url("/tasks"))
            .json(&DataEnvelope { data: draft })
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn update(&self, id: i64, draft: &NewTask) -> Result<Task> {
        let resp = self
            .client
            .put(self.url(&format!("/tasks/{id}")))
            .json(&DataEnvelope { data: draft })
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn delete(&self, id: i64) -> Result<Task> {
        let resp = self
            .client
            .delete(self.url(&format!("/tasks/{id}")))
            .send()
            .await?;
        Self::decode(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let api = HttpTaskApi::new("http://localhost:1337/api/");
        assert_eq!(api.url("/tasks"), "http://localhost:1337/api/tasks");
        assert_eq!(api.url("/tasks/7"), "http://localhost:1337/api/tasks/7");
    }

    #[test]
    fn test_create_body_envelope() {
        let draft = NewTask::new("A", "B");
        let body = serde_json::to_value(DataEnvelope { data: &draft }).unwrap();
        assert_eq!(body["data"]["title"], "A");
        assert_eq!(body["data"]["description"], "B");
        assert_eq!(body["data"]["status"], TaskStatus::NotCompleted.label());
    }
}
