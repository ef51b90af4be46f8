//! Derived projections recomputed on every render.

use crate::task::{Task, TaskId};

pub const INCOMPLETE_HEADING: &str = "Tasks in Progress";
pub const COMPLETED_HEADING: &str = "Completed Tasks";
pub const INCOMPLETE_EMPTY: &str = "No task at hand";
pub const COMPLETED_EMPTY: &str = "No completed task for now";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Incomplete,
    Completed,
}

impl Section {
    pub fn heading(self) -> &'static str {
        match self {
            Section::Incomplete => INCOMPLETE_HEADING,
            Section::Completed => COMPLETED_HEADING,
        }
    }

    pub fn empty_placeholder(self) -> &'static str {
        match self {
            Section::Incomplete => INCOMPLETE_EMPTY,
            Section::Completed => COMPLETED_EMPTY,
        }
    }

    pub fn checkbox_label(self) -> &'static str {
        match self {
            Section::Incomplete => "Mark task as complete",
            Section::Completed => "Mark task as incomplete",
        }
    }
}

/// Splits `tasks` into (incomplete, completed), each in insertion order.
pub fn partition(tasks: &[Task]) -> (Vec<&Task>, Vec<&Task>) {
    tasks.iter().partition(|task| !task.is_completed)
}

/// Ids in the order rows are displayed: incomplete first, then completed.
/// Position `n` (1-based) in this list is what the CLI shows as `#n`.
pub fn display_order(tasks: &[Task]) -> Vec<TaskId> {
    let (incomplete, completed) = partition(tasks);
    incomplete
        .into_iter()
        .chain(completed)
        .map(|task| task.id)
        .collect()
}
