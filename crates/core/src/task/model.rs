//! Task model definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::Result;

/// Task status as stored on the server
///
/// Wire values are the three fixed labels the backend uses; anything
/// else fails deserialization. Statuses are mutually exclusive: a task
/// carries exactly one of them (or none, for malformed records).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "Не выполнена")]
    NotCompleted,
    #[serde(rename = "Выполнена")]
    Completed,
    #[serde(rename = "Избранное")]
    Favourite,
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::NotCompleted
    }
}

impl TaskStatus {
    /// All status values, in display order
    pub const ALL: [TaskStatus; 3] = [Self::NotCompleted, Self::Completed, Self::Favourite];

    /// The fixed wire label for this status
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotCompleted => "Не выполнена",
            Self::Completed => "Выполнена",
            Self::Favourite => "Избранное",
        }
    }

    /// Parse a wire label back into a status
    pub fn from_label(label: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.label() == label)
            .ok_or_else(|| Error::StatusNotFound(label.to_string()))
    }

    /// Apply the status-cycle rule against a requested target
    ///
    /// Pressing the control for the status a task already has turns it
    /// off (back to `NotCompleted`); pressing any other control sets
    /// that status directly.
    pub fn toggled(self, requested: TaskStatus) -> TaskStatus {
        if requested == self {
            TaskStatus::NotCompleted
        } else {
            requested
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Compute the next status for a task given the requested target
///
/// A missing current status is a data-integrity failure, not something
/// to paper over with a default.
pub fn next_status(current: Option<TaskStatus>, requested: TaskStatus) -> Result<TaskStatus> {
    match current {
        Some(current) => Ok(current.toggled(requested)),
        None => Err(Error::StatusNotFound("task has no stored status".to_string())),
    }
}

/// Task attributes as the server sends them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAttributes {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: DateTime<Utc>,
}

/// A task record cached from the remote collection
///
/// The server owns the record; the id is server-assigned and unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub attributes: TaskAttributes,
}

impl Task {
    /// The status to render when the stored one is missing
    pub fn display_status(&self) -> TaskStatus {
        self.attributes.status.unwrap_or_default()
    }
}

/// Payload for creating or updating a task
///
/// Fields left as `None` are omitted from the request body, which is
/// how the status-only update for toggling is expressed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewTask {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl NewTask {
    /// Full payload for a freshly created task
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
            status: Some(TaskStatus::NotCompleted),
        }
    }

    /// Set the status
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Status-only payload, used by the toggle mutation
    pub fn status_only(status: TaskStatus) -> Self {
        Self {
            title: None,
            description: None,
            status: Some(status),
        }
    }
}
