// Query helpers over task collections.
//
// Every filter returns borrowed tasks ordered by their canonical line, so
// results are stable regardless of file order.

use crate::error::Result;
use crate::model::item::{Task, normalize_priority};
use chrono::NaiveDate;

fn ordered<'a>(tasks: impl Iterator<Item = &'a Task>) -> Vec<&'a Task> {
    let mut found: Vec<(String, &Task)> = tasks.map(|t| (t.to_string(), t)).collect();
    found.sort_by(|a, b| a.0.cmp(&b.0));
    found.into_iter().map(|(_, t)| t).collect()
}

/// How a task date compares with a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    Before(NaiveDate),
    After(NaiveDate),
    On(NaiveDate),
}

impl DateFilter {
    pub fn matches(&self, date: Option<NaiveDate>) -> bool {
        let Some(date) = date else {
            return false;
        };
        match self {
            DateFilter::Before(reference) => date < *reference,
            DateFilter::After(reference) => date > *reference,
            DateFilter::On(reference) => date == *reference,
        }
    }
}

pub trait TaskQuery {
    fn tasks(&self) -> &[Task];

    fn matching<F>(&self, predicate: F) -> Vec<&Task>
    where
        F: Fn(&Task) -> bool,
    {
        ordered(self.tasks().iter().filter(|t| predicate(*t)))
    }

    /// Tasks with exactly this priority. Lowercase letters are accepted.
    fn with_priority(&self, priority: char) -> Result<Vec<&Task>> {
        let wanted = normalize_priority(priority)?;
        Ok(self.matching(|t| t.priority() == Some(wanted)))
    }

    /// Tasks whose priority is any of `priorities`; invalid letters are ignored.
    fn with_priorities(&self, priorities: &[char]) -> Vec<&Task> {
        let wanted: Vec<char> = priorities
            .iter()
            .filter_map(|p| normalize_priority(*p).ok())
            .collect();
        self.matching(|t| t.priority().is_some_and(|p| wanted.contains(&p)))
    }

    /// Tasks at `priority` or more urgent (closer to `A`).
    fn priority_at_or_above(&self, priority: char) -> Result<Vec<&Task>> {
        let limit = normalize_priority(priority)?;
        Ok(self.matching(|t| t.priority().is_some_and(|p| p <= limit)))
    }

    fn priority_at_or_below(&self, priority: char) -> Result<Vec<&Task>> {
        let limit = normalize_priority(priority)?;
        Ok(self.matching(|t| t.priority().is_some_and(|p| p >= limit)))
    }

    fn for_context(&self, context: &str) -> Vec<&Task> {
        self.matching(|t| t.contexts().iter().any(|c| c == context))
    }

    fn for_contexts(&self, contexts: &[&str]) -> Vec<&Task> {
        self.matching(|t| t.contexts().iter().any(|c| contexts.contains(&c.as_str())))
    }

    fn for_project(&self, project: &str) -> Vec<&Task> {
        self.matching(|t| t.projects().iter().any(|p| p == project))
    }

    fn for_projects(&self, projects: &[&str]) -> Vec<&Task> {
        self.matching(|t| t.projects().iter().any(|p| projects.contains(&p.as_str())))
    }

    fn complete(&self) -> Vec<&Task> {
        self.matching(|t| t.is_complete())
    }

    fn incomplete(&self) -> Vec<&Task> {
        self.matching(|t| !t.is_complete())
    }

    fn created(&self, filter: DateFilter) -> Vec<&Task> {
        self.matching(|t| filter.matches(t.created()))
    }

    fn completed(&self, filter: DateFilter) -> Vec<&Task> {
        self.matching(|t| t.is_complete() && filter.matches(t.completed()))
    }

    fn due(&self, filter: DateFilter) -> Vec<&Task> {
        self.matching(|t| filter.matches(t.due_date()))
    }

    fn threshold(&self, filter: DateFilter) -> Vec<&Task> {
        self.matching(|t| filter.matches(t.threshold_date()))
    }

    fn with_extension(&self, key: &str) -> Vec<&Task> {
        self.matching(|t| t.get_extension(key).is_some())
    }

    fn with_extension_value(&self, key: &str, value: &str) -> Vec<&Task> {
        self.matching(|t| t.get_extension(key) == Some(value))
    }
}

impl TaskQuery for [Task] {
    fn tasks(&self) -> &[Task] {
        self
    }
}

impl TaskQuery for Vec<Task> {
    fn tasks(&self) -> &[Task] {
        self
    }
}
