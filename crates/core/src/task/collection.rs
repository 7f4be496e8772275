//! In-memory task collection store
//!
//! The authoritative ordered set of tasks loaded so far for the
//! current query descriptor. Order is the server's, except that
//! freshly created tasks go to the front.

use super::model::{Task, TaskStatus};
use crate::error::Error;
use crate::Result;

/// Ordered collection of cached tasks with unique ids
///
/// Every operation either applies fully or leaves the prior contents
/// untouched; readers never observe a partial mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskCollection {
    tasks: Vec<Task>,
}

impl TaskCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// The loaded tasks, in display order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    /// Discard the contents and start over from a fresh page-1 fetch
    pub fn replace(&mut self, tasks: Vec<Task>) {
        self.tasks.clear();
        self.append_page(tasks);
    }

    /// Append the next page of results
    ///
    /// Ids already present are skipped so the uniqueness invariant
    /// holds even when a create shifted page boundaries server-side.
    /// An empty incoming page means end-of-data; that is the caller's
    /// signal to stop paging, not an error here.
    pub fn append_page(&mut self, tasks: Vec<Task>) {
        for task in tasks {
            if !self.contains(task.id) {
                self.tasks.push(task);
            }
        }
    }

    /// Put a freshly created task at the front, regardless of status
    pub fn prepend_one(&mut self, task: Task) {
        if self.contains(task.id) {
            return;
        }
        self.tasks.insert(0, task);
    }

    /// Remove a task after its remote deletion succeeded
    ///
    /// A missing id is a no-op: the deletion already happened remotely
    /// and there is nothing left to reconcile.
    pub fn remove_by_id(&mut self, id: i64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Patch a task's status after a confirmed remote update
    ///
    /// A missing id means the cache has drifted from the server, which
    /// callers must surface rather than swallow.
    pub fn patch_status(&mut self, id: i64, status: TaskStatus) -> Result<()> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(Error::TaskNotFound(id))?;
        task.attributes.status = Some(status);
        Ok(())
    }
}

impl<'a> IntoIterator for &'a TaskCollection {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
