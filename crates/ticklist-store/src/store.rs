use anyhow::Context;
use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use crate::notify::Notice;
use crate::storage::Storage;
use crate::task::{Task, TaskId, next_id};

pub const DEFAULT_STORAGE_KEY: &str = "tasks";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Create,
    Edit(TaskId),
}

/// The single input pair shared by "create" and "edit".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Form {
    pub title: String,
    pub due_date: String,
    pub mode: FormMode,
}

impl Form {
    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Add Task",
            FormMode::Edit(_) => "Update Task",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Title,
    DueDate,
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Added(TaskId),
    EditStarted(TaskId),
    Updated(TaskId),
    Deleted(TaskId),
    Toggled { id: TaskId, completed: bool },
    EditCancelled,
    Rejected(MissingField),
    NotFound(TaskId),
    NotEditing,
}

impl Outcome {
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Outcome::Added(_) => Some(Notice::success("Task added successfully!")),
            Outcome::Updated(_) => Some(Notice::success("Task updated successfully!")),
            Outcome::Deleted(_) => Some(Notice::info("Task deleted.")),
            Outcome::Toggled { completed: true, .. } => {
                Some(Notice::success("Task marked as complete."))
            }
            Outcome::Toggled {
                completed: false, ..
            } => Some(Notice::success("Task marked as incomplete.")),
            Outcome::Rejected(_) => Some(Notice::error(
                "Please enter a task title and due date.",
            )),
            Outcome::EditStarted(_)
            | Outcome::EditCancelled
            | Outcome::NotFound(_)
            | Outcome::NotEditing => None,
        }
    }
}

/// A mutation that was applied in memory but could not be written back.
/// The outcome is kept so front ends can still report what happened.
#[derive(Debug, thiserror::Error)]
#[error("task list changed but could not be saved")]
pub struct SaveFailed {
    pub outcome: Outcome,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl SaveFailed {
    pub fn outcome_of(err: &anyhow::Error) -> Option<&Outcome> {
        err.downcast_ref::<SaveFailed>().map(|failed| &failed.outcome)
    }
}

/// In-memory task list mirrored to a [`Storage`] key after every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStore<S> {
    storage: S,
    key: String,
    tasks: Vec<Task>,
    form: Form,
}

impl<S: Storage> TaskStore<S> {
    /// An empty store that has not read anything from `storage`.
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            tasks: Vec::new(),
            form: Form::default(),
        }
    }

    /// Reads the list stored under `key`. Absent or malformed data gives an
    /// empty list; only a failing backend is an error.
    #[instrument(skip(storage, key))]
    pub fn load(storage: S, key: impl Into<String>) -> anyhow::Result<Self> {
        let key = key.into();
        let raw = storage
            .get_item(&key)
            .with_context(|| format!("failed to read storage key {key}"))?;

        let tasks = match raw {
            None => {
                debug!(key = %key, "no stored tasks; starting empty");
                Vec::new()
            }
            Some(raw) => match decode_tasks(&raw) {
                Ok(tasks) => tasks,
                Err(err) => {
                    warn!(key = %key, error = %err, "stored tasks are malformed; starting empty");
                    Vec::new()
                }
            },
        };

        info!(key = %key, count = tasks.len(), "loaded task list");
        let mut store = Self::new(storage, key);
        store.tasks = tasks;
        Ok(store)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.form.title = title.into();
    }

    pub fn set_due_date(&mut self, due_date: impl Into<String>) {
        self.form.due_date = due_date.into();
    }

    /// The context-sensitive form button: adds in create-mode, commits the
    /// pending edit in edit-mode.
    pub fn submit(&mut self, now: DateTime<Utc>) -> anyhow::Result<Outcome> {
        let title = self.form.title.clone();
        let due_date = self.form.due_date.clone();
        match self.form.mode {
            FormMode::Create => self.add_task(&title, &due_date, now),
            FormMode::Edit(id) => self.commit_edit(id, &title, &due_date),
        }
    }

    #[instrument(skip(self, now))]
    pub fn add_task(
        &mut self,
        title: &str,
        due_date: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Outcome> {
        let missing = match (title.trim().is_empty(), due_date.trim().is_empty()) {
            (false, false) => None,
            (true, false) => Some(MissingField::Title),
            (false, true) => Some(MissingField::DueDate),
            (true, true) => Some(MissingField::Both),
        };
        if let Some(missing) = missing {
            debug!(?missing, "rejected add");
            return Ok(Outcome::Rejected(missing));
        }

        let id = next_id(&self.tasks, now);
        self.tasks.push(Task::new_incomplete(
            id,
            title.to_string(),
            due_date.to_string(),
        ));
        self.form = Form::default();

        info!(id, count = self.tasks.len(), "task added");
        self.saved(Outcome::Added(id))
    }

    #[instrument(skip(self))]
    pub fn start_edit(&mut self, id: TaskId) -> Outcome {
        let Some(task) = self.get(id) else {
            warn!(id, "edit requested for unknown task");
            return Outcome::NotFound(id);
        };

        let form = Form {
            title: task.title.clone(),
            due_date: task.due_date.clone(),
            mode: FormMode::Edit(id),
        };
        self.form = form;
        debug!(id, "edit started");
        Outcome::EditStarted(id)
    }

    #[instrument(skip(self))]
    pub fn commit_edit(
        &mut self,
        id: TaskId,
        title: &str,
        due_date: &str,
    ) -> anyhow::Result<Outcome> {
        self.form = Form::default();

        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            warn!(id, "edit committed for unknown task");
            return Ok(Outcome::NotFound(id));
        };
        task.title = title.to_string();
        task.due_date = due_date.to_string();

        info!(id, "task updated");
        self.saved(Outcome::Updated(id))
    }

    pub fn cancel_edit(&mut self) -> Outcome {
        if !self.form.is_editing() {
            return Outcome::NotEditing;
        }
        self.form = Form::default();
        debug!("edit cancelled");
        Outcome::EditCancelled
    }

    #[instrument(skip(self))]
    pub fn delete_task(&mut self, id: TaskId) -> anyhow::Result<Outcome> {
        let Some(idx) = self.tasks.iter().position(|task| task.id == id) else {
            warn!(id, "delete requested for unknown task");
            return Ok(Outcome::NotFound(id));
        };

        self.tasks.remove(idx);
        if self.form.mode == FormMode::Edit(id) {
            self.form = Form::default();
        }

        info!(id, count = self.tasks.len(), "task deleted");
        self.saved(Outcome::Deleted(id))
    }

    #[instrument(skip(self))]
    pub fn toggle_complete(&mut self, id: TaskId) -> anyhow::Result<Outcome> {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            warn!(id, "toggle requested for unknown task");
            return Ok(Outcome::NotFound(id));
        };

        task.is_completed = !task.is_completed;
        let completed = task.is_completed;

        info!(id, completed, "task toggled");
        self.saved(Outcome::Toggled { id, completed })
    }

    /// Overwrites the stored list wholesale.
    #[instrument(skip(self), fields(key = %self.key, count = self.tasks.len()))]
    pub fn persist(&mut self) -> anyhow::Result<()> {
        let payload = encode_tasks(&self.tasks).context("failed to encode tasks")?;
        self.storage
            .set_item(&self.key, &payload)
            .with_context(|| format!("failed to write storage key {}", self.key))?;
        debug!("persisted task list");
        Ok(())
    }

    fn saved(&mut self, outcome: Outcome) -> anyhow::Result<Outcome> {
        match self.persist() {
            Ok(()) => Ok(outcome),
            Err(err) => Err(SaveFailed {
                outcome,
                source: err.into(),
            }
            .into()),
        }
    }
}

/// The notice for a store call. A mutation whose save failed still gets the
/// notice for the change it made in memory.
pub fn notice_for(result: &anyhow::Result<Outcome>) -> Option<Notice> {
    match result {
        Ok(outcome) => outcome.notice(),
        Err(err) => SaveFailed::outcome_of(err).and_then(Outcome::notice),
    }
}

pub fn encode_tasks(tasks: &[Task]) -> serde_json::Result<String> {
    serde_json::to_string(tasks)
}

pub fn decode_tasks(raw: &str) -> serde_json::Result<Vec<Task>> {
    serde_json::from_str(raw)
}
