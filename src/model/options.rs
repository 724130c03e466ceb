// File: ./src/model/options.rs
// Processing flags that control the side effects of completing a task.
use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Flags applied when a task changes completion state.
///
/// With every flag off the task behaves as plain field storage. Setting any
/// flag enables the completion policy in [`crate::model::Task::set_complete`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOptions {
    /// Resolve "today" in UTC instead of local time.
    #[serde(default)]
    pub utc_date: bool,
    /// Leave the priority in place when a task is completed.
    #[serde(default)]
    pub keep_priority_on_complete: bool,
    /// Stash the priority in a `pri:` extension on completion and restore it
    /// when the task is reopened.
    #[serde(default)]
    pub move_priority_to_extension: bool,
    #[serde(default)]
    pub allow_completion_without_creation: bool,
    #[serde(default)]
    pub set_completion_date_on_complete: bool,
}

impl TaskOptions {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_none(&self) -> bool {
        *self == Self::default()
    }

    /// Current date, honoring `utc_date`.
    pub fn today(&self) -> NaiveDate {
        today(self.utc_date)
    }
}

/// Current calendar date, either in UTC or in the local time zone.
pub fn today(use_utc: bool) -> NaiveDate {
    if use_utc {
        Utc::now().date_naive()
    } else {
        Local::now().date_naive()
    }
}
