//! Session task store.
//!
//! [`TaskStore`] owns the canonical task list for one session. It is
//! constructed once and shared by reference (or `Arc`) with whatever needs
//! it; there is no ambient lookup.
//!
//! Every operation is one HTTP round trip. The list is only touched after a
//! successful response, and the lock is never held across an `.await`, so
//! concurrent operations interleave freely: the response that lands last
//! decides the final state. An update whose target was removed in the
//! meantime reports [`StoreError::NotFound`] instead of writing anything.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use taskly_client::{HttpTaskApi, ServerClient, StatusUpdate, TaskApi};
use taskly_core::{Task, TaskForm, TaskId, TaskRow, TaskStatus};
use tracing::{debug, instrument, warn};

use crate::errors::StoreError;
use crate::policy::{Outcome, StoreOperation, raise, swallow};

/// The session's task list plus the operations that keep it in sync.
pub struct TaskStore {
    api: Arc<dyn TaskApi>,
    tasks: RwLock<Vec<Task>>,
    initialized: AtomicBool,
    busy: AtomicBool,
}

impl TaskStore {
    /// Create an empty store backed by `api`.
    pub fn new(api: Arc<dyn TaskApi>) -> Self {
        Self {
            api,
            tasks: RwLock::new(Vec::new()),
            initialized: AtomicBool::new(false),
            busy: AtomicBool::new(false),
        }
    }

    /// Create an empty store talking HTTP through `client`.
    pub fn with_client(client: ServerClient) -> Self {
        Self::new(Arc::new(HttpTaskApi::new(client)))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────

    /// Snapshot of the current list, in server order.
    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.read().clone()
    }

    /// Look up one task.
    pub fn get(&self, id: &TaskId) -> Option<Task> {
        self.tasks.read().iter().find(|t| &t.id == id).cloned()
    }

    /// Tasks with the given status, in list order.
    pub fn tasks_with_status(&self, status: TaskStatus) -> Vec<Task> {
        self.tasks
            .read()
            .iter()
            .filter(|t| t.status == status)
            .cloned()
            .collect()
    }

    /// Number of tasks held.
    pub fn len(&self) -> usize {
        self.tasks.read().len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.tasks.read().is_empty()
    }

    /// Whether [`initialize`](Self::initialize) has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Whether an [`update_task`](Self::update_task) is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────

    /// Run the initial fetch once per store.
    ///
    /// The store is marked initialized before the fetch starts, so
    /// concurrent callers never fetch twice. A failed fetch is logged and
    /// leaves the list empty. Returns whether this call ran the fetch.
    pub async fn initialize(&self) -> bool {
        if self.initialized.swap(true, Ordering::AcqRel) {
            return false;
        }
        let _ = self.fetch_tasks().await;
        true
    }

    /// Replace the whole list with the server's rows.
    ///
    /// Failures (transport, status, undecodable rows) are logged and leave
    /// the list as it was.
    #[instrument(skip(self))]
    pub async fn fetch_tasks(&self) -> Outcome<usize> {
        swallow(StoreOperation::Fetch, self.try_fetch().await)
    }

    async fn try_fetch(&self) -> Result<usize, StoreError> {
        let rows = self.api.list_tasks().await?;
        let tasks = dedupe(translate_all(rows)?);
        let count = tasks.len();
        *self.tasks.write() = tasks;
        debug!(count, "task list replaced");
        Ok(count)
    }

    /// Create a task and append the server's copy.
    ///
    /// Any failure is logged and returned so the caller can show it.
    #[instrument(skip(self, form), fields(title = %form.title))]
    pub async fn create_task(&self, form: &TaskForm) -> Result<Task, StoreError> {
        raise(StoreOperation::Create, self.try_create(form).await)
    }

    async fn try_create(&self, form: &TaskForm) -> Result<Task, StoreError> {
        let task = self.api.create_task(form).await?.into_task()?;
        let mut tasks = self.tasks.write();
        if let Some(existing) = tasks.iter_mut().find(|t| t.id == task.id) {
            warn!(id = %task.id, "created task id already listed, replacing");
            existing.clone_from(&task);
        } else {
            tasks.push(task.clone());
        }
        Ok(task)
    }

    /// Change a task's status and replace it in place.
    ///
    /// Failures, including a target that vanished from the list before the
    /// response arrived, are logged and leave the list unchanged.
    #[instrument(skip(self))]
    pub async fn update_task_status(&self, id: &TaskId, status: TaskStatus) -> Outcome<Task> {
        swallow(
            StoreOperation::UpdateStatus,
            self.try_update_status(id, status).await,
        )
    }

    async fn try_update_status(&self, id: &TaskId, status: TaskStatus) -> Result<Task, StoreError> {
        let row = self
            .api
            .update_task_status(id, StatusUpdate { status })
            .await?;
        self.replace(id, row)
    }

    /// Replace a task's fields and update it in place.
    ///
    /// Requires a non-empty `id`. The busy flag is set for the duration and
    /// cleared on every exit path. Failures are logged and returned.
    #[instrument(skip(self, form))]
    pub async fn update_task(&self, id: &TaskId, form: &TaskForm) -> Result<Task, StoreError> {
        if id.is_empty() {
            return raise(StoreOperation::Update, Err(StoreError::MissingTaskId));
        }
        let _busy = BusyGuard::set(&self.busy);
        raise(StoreOperation::Update, self.try_update(id, form).await)
    }

    async fn try_update(&self, id: &TaskId, form: &TaskForm) -> Result<Task, StoreError> {
        let row = self.api.update_task(id, form).await?;
        self.replace(id, row)
    }

    /// Delete a task and drop it from the list.
    ///
    /// Deleting an id the list does not hold still succeeds once the
    /// server agrees. Failures are logged and leave the list unchanged.
    #[instrument(skip(self))]
    pub async fn delete_task(&self, id: &TaskId) -> Outcome<()> {
        swallow(StoreOperation::Delete, self.try_delete(id).await)
    }

    async fn try_delete(&self, id: &TaskId) -> Result<(), StoreError> {
        self.api.delete_task(id).await?;
        self.tasks.write().retain(|t| &t.id != id);
        Ok(())
    }

    /// Swap the entry for `id` with the translated row.
    fn replace(&self, id: &TaskId, row: TaskRow) -> Result<Task, StoreError> {
        let task = row.into_task()?;
        let mut tasks = self.tasks.write();
        let slot = tasks
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| StoreError::NotFound { id: id.clone() })?;
        slot.clone_from(&task);
        Ok(task)
    }
}

impl std::fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskStore")
            .field("tasks", &self.len())
            .field("initialized", &self.is_initialized())
            .field("busy", &self.is_busy())
            .finish_non_exhaustive()
    }
}

/// Sets a flag on creation and clears it on drop.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn set(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn translate_all(rows: Vec<TaskRow>) -> Result<Vec<Task>, StoreError> {
    rows.into_iter()
        .map(|row| row.into_task().map_err(StoreError::from))
        .collect()
}

/// Keep the first occurrence of each id.
fn dedupe(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = std::collections::HashSet::new();
    tasks
        .into_iter()
        .filter(|t| {
            let fresh = seen.insert(t.id.clone());
            if !fresh {
                warn!(id = %t.id, "duplicate task id from server, keeping first");
            }
            fresh
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};
    use serde_json::{Value, json};
    use taskly_client::ClientError;
    use taskly_core::TaskError;
    use taskly_core::logging::capture_logs;
    use tracing::Level;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn row(id: u64, title: &str, status: &str) -> Value {
        json!({
            "id": id,
            "title": title,
            "description": "",
            "due_date": "2030-01-15",
            "status": status,
            "photo": null
        })
    }

    fn store_for(server: &MockServer) -> TaskStore {
        TaskStore::with_client(ServerClient::new(server.uri()).unwrap())
    }

    async fn mount_list(server: &MockServer, rows: Value) {
        Mock::given(method("GET"))
            .and(path("/api/tasks/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(rows))
            .mount(server)
            .await;
    }

    /// Store hydrated with tasks 1 and 2.
    async fn hydrated(server: &MockServer) -> TaskStore {
        mount_list(server, json!([row(1, "One", "TODO"), row(2, "Two", "DONE")])).await;
        let store = store_for(server);
        assert_eq!(store.fetch_tasks().await.applied(), Some(2));
        store
    }

    fn form(title: &str) -> TaskForm {
        TaskForm {
            title: title.into(),
            ..TaskForm::default()
        }
    }

    // ── fetch / initialize ──────────────────────────────────────────

    #[tokio::test]
    async fn fetch_replaces_list_and_parses_dates() {
        let server = MockServer::start().await;
        let store = hydrated(&server).await;

        let tasks = store.tasks();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id.as_str(), "1");
        assert_eq!(
            tasks[0].due_date,
            Some(Utc.with_ymd_and_hms(2030, 1, 15, 0, 0, 0).unwrap())
        );
        assert_eq!(store.tasks_with_status(TaskStatus::Done).len(), 1);
    }

    #[tokio::test]
    async fn fetch_failure_keeps_previous_list() {
        let server = MockServer::start().await;
        let store = hydrated(&server).await;

        server.reset().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (logs, _guard) = capture_logs();
        let outcome = store.fetch_tasks().await;
        assert_matches!(outcome.error(), Some(StoreError::Client(ClientError::Status { status: 500, .. })));
        assert_eq!(store.len(), 2);
        assert!(logs.has_event(Level::ERROR, "task store operation failed"));
    }

    #[tokio::test]
    async fn fetch_with_bad_due_date_keeps_previous_list() {
        let server = MockServer::start().await;
        let store = hydrated(&server).await;

        server.reset().await;
        mount_list(&server, json!([{"id": 3, "title": "x", "due_date": "soon"}])).await;

        let outcome = store.fetch_tasks().await;
        assert_matches!(
            outcome.error(),
            Some(StoreError::Task(TaskError::InvalidDueDate { .. }))
        );
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn fetch_transport_failure_is_swallowed() {
        let store = TaskStore::with_client(ServerClient::new("http://127.0.0.1:1").unwrap());
        let outcome = store.fetch_tasks().await;
        assert!(!outcome.is_applied());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn fetch_drops_duplicate_ids() {
        let server = MockServer::start().await;
        mount_list(&server, json!([row(1, "a", "TODO"), row(1, "b", "TODO")])).await;
        let store = store_for(&server);

        assert_eq!(store.fetch_tasks().await.applied(), Some(1));
        assert_eq!(store.tasks()[0].title, "a");
    }

    #[tokio::test]
    async fn initialize_fetches_exactly_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tasks/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([row(1, "a", "TODO")])))
            .expect(1)
            .mount(&server)
            .await;

        let store = store_for(&server);
        assert!(!store.is_initialized());
        let (first, second) = tokio::join!(store.initialize(), store.initialize());
        assert!(first ^ second);
        assert!(!store.initialize().await);
        assert!(store.is_initialized());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn initialize_survives_network_failure() {
        let store = TaskStore::with_client(ServerClient::new("http://127.0.0.1:1").unwrap());
        assert!(store.initialize().await);
        assert!(store.is_initialized());
        assert!(store.is_empty());
    }

    // ── create ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn create_appends_server_row() {
        let server = MockServer::start().await;
        let store = hydrated(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/tasks/"))
            .respond_with(ResponseTemplate::new(201).set_body_json(row(3, "Three", "TODO")))
            .mount(&server)
            .await;

        let created = store.create_task(&form("Three")).await.unwrap();
        assert_eq!(created.id.as_str(), "3");
        assert_eq!(store.len(), 3);
        let last = store.tasks().pop().unwrap();
        assert_eq!(last, created);
    }

    #[tokio::test]
    async fn create_returning_listed_id_replaces_entry() {
        let server = MockServer::start().await;
        let store = hydrated(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/tasks/"))
            .respond_with(ResponseTemplate::new(201).set_body_json(row(2, "Two again", "IN_PROGRESS")))
            .mount(&server)
            .await;

        let (logs, _guard) = capture_logs();
        let created = store.create_task(&form("Two again")).await.unwrap();
        assert_eq!(store.len(), 2);
        let tasks = store.tasks();
        assert_eq!(tasks[1], created);
        assert_eq!(tasks[1].title, "Two again");
        assert_eq!(tasks[1].status, TaskStatus::InProgress);
        assert_eq!(tasks[0].title, "One");
        assert!(logs.has_event(Level::WARN, "created task id already listed"));
    }

    #[tokio::test]
    async fn create_raises_on_rejection() {
        let server = MockServer::start().await;
        let store = hydrated(&server).await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("{\"title\":[\"too short\"]}"))
            .mount(&server)
            .await;

        let (logs, _guard) = capture_logs();
        let err = store.create_task(&form("x")).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(store.len(), 2);
        assert!(logs.has_event(Level::ERROR, "task store operation failed"));
    }

    #[tokio::test]
    async fn create_raises_on_transport_failure() {
        let store = TaskStore::with_client(ServerClient::new("http://127.0.0.1:1").unwrap());
        let err = store.create_task(&form("Offline")).await.unwrap_err();
        assert_matches!(err, StoreError::Client(e) if e.is_transport());
    }

    // ── update status ───────────────────────────────────────────────

    #[tokio::test]
    async fn update_status_replaces_in_place() {
        let server = MockServer::start().await;
        let store = hydrated(&server).await;
        Mock::given(method("PATCH"))
            .and(path("/api/tasks/1/"))
            .and(body_string_contains("DONE"))
            .respond_with(ResponseTemplate::new(200).set_body_json(row(1, "One", "DONE")))
            .mount(&server)
            .await;

        let updated = store
            .update_task_status(&TaskId::from("1"), TaskStatus::Done)
            .await
            .applied()
            .unwrap();
        assert_eq!(updated.status, TaskStatus::Done);
        let tasks = store.tasks();
        assert_eq!(tasks[0].id.as_str(), "1");
        assert_eq!(tasks[0].status, TaskStatus::Done);
        assert_eq!(tasks.len(), 2);
    }

    #[tokio::test]
    async fn update_status_for_vanished_task_is_not_found() {
        let server = MockServer::start().await;
        let store = hydrated(&server).await;
        Mock::given(method("DELETE"))
            .and(path("/api/tasks/1/"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/api/tasks/1/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(row(1, "One", "DONE")))
            .mount(&server)
            .await;

        let id = TaskId::from("1");
        assert!(store.delete_task(&id).await.is_applied());
        let outcome = store.update_task_status(&id, TaskStatus::Done).await;
        assert_matches!(outcome.error(), Some(StoreError::NotFound { id }) if id.as_str() == "1");
        assert_eq!(store.len(), 1);
        assert!(store.get(&id).is_none());
    }

    #[tokio::test]
    async fn update_status_failure_is_swallowed() {
        let server = MockServer::start().await;
        let store = hydrated(&server).await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let outcome = store
            .update_task_status(&TaskId::from("2"), TaskStatus::Todo)
            .await;
        assert!(!outcome.is_applied());
        assert_eq!(store.get(&TaskId::from("2")).unwrap().status, TaskStatus::Done);
    }

    // ── update ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn update_replaces_in_place_and_clears_busy() {
        let server = MockServer::start().await;
        let store = hydrated(&server).await;
        Mock::given(method("PUT"))
            .and(path("/api/tasks/2/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(row(2, "Renamed", "DONE"))
                    .set_delay(std::time::Duration::from_millis(200)),
            )
            .mount(&server)
            .await;

        let id = TaskId::from("2");
        let renamed = form("Renamed");
        let (result, busy_mid_flight) = tokio::join!(store.update_task(&id, &renamed), async {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            store.is_busy()
        });

        assert!(busy_mid_flight);
        assert!(!store.is_busy());
        assert_eq!(result.unwrap().title, "Renamed");
        assert_eq!(store.tasks()[1].title, "Renamed");
    }

    #[tokio::test]
    async fn update_failure_raises_and_clears_busy() {
        let server = MockServer::start().await;
        let store = hydrated(&server).await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = store
            .update_task(&TaskId::from("1"), &form("New"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(!store.is_busy());
        assert_eq!(store.tasks()[0].title, "One");
    }

    #[tokio::test]
    async fn update_requires_task_id() {
        let server = MockServer::start().await;
        let store = store_for(&server);

        let err = store.update_task(&TaskId::from(""), &form("x")).await.unwrap_err();
        assert_matches!(err, StoreError::MissingTaskId);
        assert!(!store.is_busy());
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_of_unlisted_task_raises_not_found() {
        let server = MockServer::start().await;
        let store = hydrated(&server).await;
        Mock::given(method("PUT"))
            .and(path("/api/tasks/99/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(row(99, "Ghost", "TODO")))
            .mount(&server)
            .await;

        let err = store
            .update_task(&TaskId::from("99"), &form("Ghost"))
            .await
            .unwrap_err();
        assert_matches!(err, StoreError::NotFound { .. });
        assert_eq!(store.len(), 2);
    }

    // ── delete ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn delete_removes_entry() {
        let server = MockServer::start().await;
        let store = hydrated(&server).await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        assert!(store.delete_task(&TaskId::from("2")).await.is_applied());
        assert_eq!(store.len(), 1);
        assert!(store.get(&TaskId::from("2")).is_none());

        assert!(store.delete_task(&TaskId::from("42")).await.is_applied());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn delete_failure_is_swallowed() {
        let server = MockServer::start().await;
        let store = hydrated(&server).await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let (logs, _guard) = capture_logs();
        let outcome = store.delete_task(&TaskId::from("1")).await;
        assert_eq!(outcome.error().and_then(StoreError::status), Some(403));
        assert_eq!(store.len(), 2);
        assert!(logs.has_event(Level::ERROR, "task store operation failed"));
    }
}
