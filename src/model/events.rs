// File: ./src/model/events.rs
// Change notifications emitted by tasks and task lists.
use std::fmt;

/// Observable fields of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Complete,
    Priority,
    Created,
    Completed,
    Description,
    Projects,
    Contexts,
    Extensions,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Complete => "complete",
            Field::Priority => "priority",
            Field::Created => "created",
            Field::Completed => "completed",
            Field::Description => "description",
            Field::Projects => "projects",
            Field::Contexts => "contexts",
            Field::Extensions => "extensions",
        };
        f.write_str(name)
    }
}

/// One change recorded by a task mutator.
///
/// Collection deltas carry the affected items. Extensions are reported as
/// `key:value` strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskChange {
    Property(Field),
    Added(Field, Vec<String>),
    Removed(Field, Vec<String>),
}

/// Structural changes of a [`crate::model::TaskList`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListChange {
    Added { index: usize },
    /// Emitted after an insert for the task that was shifted out of `from`.
    Moved { from: usize, to: usize },
    Removed { index: usize },
    Replaced { index: usize },
    Cleared { count: usize },
}

/// Items in `after` that are missing from `before`, in `after` order.
pub(crate) fn added_items(before: &[String], after: &[String]) -> Vec<String> {
    after
        .iter()
        .filter(|item| !before.contains(item))
        .cloned()
        .collect()
}
