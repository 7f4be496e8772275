//! Task synchronization engine
//!
//! Owns the in-memory task collection and keeps it consistent with the
//! remote collection endpoint: primary filtered fetches with a
//! fixed-delay retry loop, sentinel-driven page appends, and guarded
//! per-task mutations. Every list fetch is tagged with the state
//! generation at the time it was issued; a response whose generation no
//! longer matches the current one is discarded, so a stale page-1
//! response can never overwrite a newer filtered collection.

use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use td_core::task::{
    next_status, NewTask, QueryDescriptor, StatusFilter, Task, TaskCollection, TaskStatus,
};

use crate::api::TaskApi;
use crate::config::SyncConfig;
use crate::error::{Result, SyncError};
use crate::guard::ActionGuard;
use crate::notify::Notify;
use crate::observer::SentinelObserver;

struct EngineState {
    collection: TaskCollection,
    /// Filter plus the last loaded page for it
    descriptor: QueryDescriptor,
    /// Set when a page fetch came back empty; cleared on filter change
    exhausted: bool,
    /// Bumped on every descriptor change; stale responses are dropped
    generation: u64,
}

struct Inner {
    api: Arc<dyn TaskApi>,
    notifier: Arc<dyn Notify>,
    guard: ActionGuard,
    observer: SentinelObserver,
    state: RwLock<EngineState>,
    retry_delay: Duration,
    retry_task: StdMutex<Option<JoinHandle<()>>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        let mut slot = self
            .retry_task
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }
}

/// The client-side synchronization engine
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct SyncEngine {
    inner: Arc<Inner>,
}

impl SyncEngine {
    pub fn new(api: Arc<dyn TaskApi>, notifier: Arc<dyn Notify>, config: SyncConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                notifier,
                guard: ActionGuard::new(),
                observer: SentinelObserver::new(),
                state: RwLock::new(EngineState {
                    collection: TaskCollection::new(),
                    descriptor: QueryDescriptor::new(StatusFilter::All, config.page_size),
                    exhausted: false,
                    generation: 0,
                }),
                retry_delay: config.retry_delay,
                retry_task: StdMutex::new(None),
            }),
        }
    }

    /// Kick off the initial primary fetch (called once at mount)
    pub fn start(&self) {
        self.spawn_refresh();
    }

    /// Primary list fetch for the current filter, retrying on a fixed
    /// delay until success or until the query is superseded
    ///
    /// On success the collection is replaced wholesale; this is the
    /// only operation that replaces, and it always fetches page 1.
    pub async fn refresh(&self) {
        loop {
            let (descriptor, generation) = {
                let state = self.inner.state.read().await;
                (
                    QueryDescriptor::new(state.descriptor.filter, state.descriptor.page_size),
                    state.generation,
                )
            };
            match self.inner.api.list(&descriptor).await {
                Ok(tasks) => {
                    let mut state = self.inner.state.write().await;
                    if state.generation != generation {
                        debug!("discarding stale list response for superseded query");
                        return;
                    }
                    state.exhausted = tasks.is_empty();
                    state.collection.replace(tasks);
                    state.descriptor = descriptor;
                    info!(
                        count = state.collection.len(),
                        "task list refreshed"
                    );
                    return;
                }
                Err(e) => {
                    warn!(error = %e, "primary task fetch failed, retrying after delay");
                    self.inner.notifier.warn(&e.user_message());
                    tokio::time::sleep(self.inner.retry_delay).await;
                    let state = self.inner.state.read().await;
                    if state.generation != generation {
                        debug!("pending retry cancelled by query change");
                        return;
                    }
                }
            }
        }
    }

    /// Replace the filter, reset to page 1 and refetch
    ///
    /// The prior collection is discarded immediately so no stale
    /// cross-filter tasks stay visible, any pending retry is
    /// superseded, and the scroll observer is torn down until the
    /// fresh list re-arms it.
    pub async fn set_filter(&self, filter: StatusFilter) {
        {
            let mut state = self.inner.state.write().await;
            state.descriptor = state.descriptor.with_filter(filter);
            state.generation += 1;
            state.exhausted = false;
            state.collection.replace(Vec::new());
        }
        self.inner.observer.disarm();
        self.spawn_refresh();
    }

    /// Fetch and append the next page for the current filter
    ///
    /// An empty page marks the query exhausted without advancing the
    /// page; a failure is surfaced once and not retried, leaving the
    /// page untouched so a later re-arm can try again.
    pub async fn load_next_page(&self) -> Result<()> {
        let (candidate, generation) = {
            let state = self.inner.state.read().await;
            if state.exhausted {
                return Ok(());
            }
            (state.descriptor.next_page(), state.generation)
        };
        match self.inner.api.list(&candidate).await {
            Ok(tasks) => {
                let mut state = self.inner.state.write().await;
                if state.generation != generation {
                    debug!("discarding stale page response for superseded query");
                    return Ok(());
                }
                if tasks.is_empty() {
                    info!(page = candidate.page, "no more pages for the current query");
                    state.exhausted = true;
                } else {
                    state.collection.append_page(tasks);
                    state.descriptor = candidate;
                    info!(
                        page = candidate.page,
                        count = state.collection.len(),
                        "appended task page"
                    );
                }
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, page = candidate.page, "page fetch failed");
                self.inner.notifier.warn(&e.user_message());
                Err(e)
            }
        }
    }

    /// Arm the scroll observer with a fresh sentinel visibility signal
    ///
    /// Refused while the current query is exhausted; a filter change
    /// clears exhaustion and arming resumes.
    pub async fn arm_scroll(&self, visibility: watch::Receiver<bool>) {
        if self.inner.state.read().await.exhausted {
            debug!("not arming scroll: current query is exhausted");
            return;
        }
        let engine = self.clone();
        self.inner.observer.arm(visibility, move || async move {
            let _ = engine.load_next_page().await;
        });
    }

    /// Whether a scroll arming is currently pending
    pub fn is_scroll_armed(&self) -> bool {
        self.inner.observer.is_armed()
    }

    /// Create a task and put it at the front of the collection
    pub async fn create_task(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Task> {
        let draft = NewTask::new(title, description);
        match self.inner.api.create(&draft).await {
            Ok(task) => {
                let mut state = self.inner.state.write().await;
                state.collection.prepend_one(task.clone());
                info!(task_id = task.id, "task created");
                Ok(task)
            }
            Err(e) => {
                warn!(error = %e, "task creation failed");
                self.inner.notifier.warn(&e.user_message());
                Err(e)
            }
        }
    }

    /// Delete a task remotely, then drop it from the collection
    pub async fn delete_task(&self, id: i64) -> Result<()> {
        let Some(_permit) = self.inner.guard.begin(id) else {
            debug!(task_id = id, "skipping delete: action already in flight");
            return Err(SyncError::ActionInFlight(id));
        };
        match self.inner.api.delete(id).await {
            Ok(_) => {
                let mut state = self.inner.state.write().await;
                state.collection.remove_by_id(id);
                info!(task_id = id, "task deleted");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, task_id = id, "task deletion failed");
                self.inner.notifier.warn(&e.user_message());
                Err(e)
            }
        }
    }

    /// Cycle a task's status towards the requested target
    ///
    /// The store is only patched after the server confirms, with the
    /// status the server returned. Integrity failures (task missing
    /// from the cache, unrecognized stored status) are logged and
    /// propagated, never shown as a retryable user warning.
    pub async fn toggle_status(&self, id: i64, requested: TaskStatus) -> Result<TaskStatus> {
        let current = {
            let state = self.inner.state.read().await;
            match state.collection.get(id) {
                Some(task) => task.attributes.status,
                None => {
                    let err = SyncError::Core(td_core::Error::TaskNotFound(id));
                    error!(error = %err, "toggle requested for a task missing from the cache");
                    return Err(err);
                }
            }
        };
        let next = match next_status(current, requested) {
            Ok(next) => next,
            Err(e) => {
                let err = SyncError::Core(e);
                error!(error = %err, task_id = id, "cannot cycle status");
                return Err(err);
            }
        };

        let Some(_permit) = self.inner.guard.begin(id) else {
            debug!(task_id = id, "skipping toggle: action already in flight");
            return Err(SyncError::ActionInFlight(id));
        };
        match self.inner.api.update_status(id, next).await {
            Ok(updated) => {
                let status = match updated.attributes.status {
                    Some(status) => status,
                    None => {
                        debug!(
                            task_id = id,
                            "status update confirmation carried no status, keeping the requested one"
                        );
                        next
                    }
                };
                let mut state = self.inner.state.write().await;
                match state.collection.patch_status(id, status) {
                    Ok(()) => {
                        info!(task_id = id, status = %status, "task status updated");
                        Ok(status)
                    }
                    Err(e) => {
                        let err = SyncError::Core(e);
                        error!(error = %err, "store drifted from server after status update");
                        Err(err)
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, task_id = id, "status update failed");
                self.inner.notifier.warn(&e.user_message());
                Err(e)
            }
        }
    }

    /// The mark-done control
    pub async fn mark_done(&self, id: i64) -> Result<TaskStatus> {
        self.toggle_status(id, TaskStatus::Completed).await
    }

    /// The mark-favourite control
    pub async fn mark_favourite(&self, id: i64) -> Result<TaskStatus> {
        self.toggle_status(id, TaskStatus::Favourite).await
    }

    /// Snapshot of the loaded tasks for the presentation layer
    pub async fn tasks(&self) -> Vec<Task> {
        self.inner.state.read().await.collection.tasks().to_vec()
    }

    /// The current descriptor (filter + last loaded page)
    pub async fn descriptor(&self) -> QueryDescriptor {
        self.inner.state.read().await.descriptor
    }

    /// Whether the current query has no further pages
    pub async fn is_exhausted(&self) -> bool {
        self.inner.state.read().await.exhausted
    }

    /// Whether a mutation for this task is in flight (disables its
    /// controls)
    pub fn is_task_busy(&self, id: i64) -> bool {
        self.inner.guard.contains(id)
    }

    /// Cancel the pending retry and tear down the scroll observer
    ///
    /// Called on view teardown so no timer acts on an unmounted view.
    pub fn shutdown(&self) {
        let mut slot = self
            .inner
            .retry_task
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(handle) = slot.take() {
            handle.abort();
        }
        drop(slot);
        self.inner.observer.disarm();
    }

    fn spawn_refresh(&self) {
        let engine = self.clone();
        let handle = tokio::spawn(async move { engine.refresh().await });
        let mut slot = self
            .inner
            .retry_task
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(prev) = slot.replace(handle) {
            prev.abort();
        }
    }
}
