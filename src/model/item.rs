// File: ./src/model/item.rs
use crate::error::{Result, TodoError};
use crate::model::events::{Field, TaskChange, added_items};
use crate::model::options::TaskOptions;
use crate::model::recurrence::Recurrence;
use crate::model::{parser, tags};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DUE_KEY: &str = "due";
pub const THRESHOLD_KEY: &str = "t";
pub const PRIORITY_KEY: &str = "pri";
pub const ID_KEY: &str = "id";
pub const RECURRENCE_KEY: &str = "rec";

/// Parses a date written exactly as `YYYY-MM-DD`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let bytes = text.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return None;
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Accepts an uppercase ASCII letter, uppercasing a lowercase one.
pub fn normalize_priority(priority: char) -> Result<char> {
    if priority.is_ascii_uppercase() {
        Ok(priority)
    } else if priority.is_ascii_lowercase() {
        Ok(priority.to_ascii_uppercase())
    } else {
        Err(TodoError::invalid_argument(format!(
            "Invalid priority: {}",
            priority
        )))
    }
}

/// One todo.txt line.
///
/// `description` is the source of truth for projects, contexts and
/// extensions: every change to it re-derives those collections, and the tag
/// and extension mutators edit the description text.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Task {
    pub(crate) complete: bool,
    pub(crate) priority: Option<char>,
    pub(crate) created: Option<NaiveDate>,
    pub(crate) completed: Option<NaiveDate>,
    pub(crate) description: Option<String>,
    pub(crate) projects: Vec<String>,
    pub(crate) contexts: Vec<String>,
    pub(crate) extensions: BTreeMap<String, String>,
    #[serde(skip)]
    pub(crate) options: TaskOptions,
    #[serde(skip)]
    pub(crate) changes: Vec<TaskChange>,
}

impl Task {
    pub fn new(description: &str) -> Self {
        let mut task = Self::default();
        task.set_description(Some(description));
        task.changes.clear();
        task
    }

    pub fn with_priority(priority: char, description: &str) -> Result<Self> {
        let mut task = Self::new(description);
        task.set_priority(Some(priority))?;
        task.changes.clear();
        Ok(task)
    }

    /// Parses the first non-blank line of `text`.
    pub fn parse(text: &str) -> Result<Self> {
        text.lines()
            .find_map(parser::parse_line)
            .ok_or_else(|| TodoError::invalid_format("Invalid to-do: no content"))
    }

    // --- ACCESSORS ---

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn priority(&self) -> Option<char> {
        self.priority
    }

    pub fn created(&self) -> Option<NaiveDate> {
        self.created
    }

    pub fn completed(&self) -> Option<NaiveDate> {
        self.completed
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn projects(&self) -> &[String] {
        &self.projects
    }

    pub fn contexts(&self) -> &[String] {
        &self.contexts
    }

    pub fn extensions(&self) -> &BTreeMap<String, String> {
        &self.extensions
    }

    pub fn options(&self) -> TaskOptions {
        self.options
    }

    pub fn set_options(&mut self, options: TaskOptions) {
        self.options = options;
    }

    /// Drains the changes recorded since the last call.
    pub fn take_changes(&mut self) -> Vec<TaskChange> {
        std::mem::take(&mut self.changes)
    }

    // --- SCALAR FIELDS ---

    pub fn set_priority(&mut self, priority: Option<char>) -> Result<()> {
        if let Some(p) = priority
            && !p.is_ascii_uppercase()
        {
            return Err(TodoError::invalid_argument(format!("Invalid priority: {}", p)));
        }
        if self.priority != priority {
            self.priority = priority;
            self.changes.push(TaskChange::Property(Field::Priority));
        }
        Ok(())
    }

    pub fn set_created(&mut self, created: Option<NaiveDate>) {
        if self.created != created {
            self.created = created;
            self.changes.push(TaskChange::Property(Field::Created));
        }
    }

    /// Marks the task complete or open. A task that is reopened loses its
    /// completion date. With any option set, the completion policy runs on
    /// each transition.
    pub fn set_complete(&mut self, complete: bool) {
        if self.complete == complete {
            return;
        }
        self.complete = complete;
        self.changes.push(TaskChange::Property(Field::Complete));

        if complete {
            if !self.options.is_none() {
                self.on_completed();
            }
        } else {
            self.store_completed(None);
            if !self.options.is_none() {
                self.on_reopened();
            }
        }
    }

    /// Sets the completion date. A present date marks the task complete.
    pub fn set_completed(&mut self, completed: Option<NaiveDate>) {
        let opts = self.options;
        match completed {
            Some(date) => {
                if !opts.is_none()
                    && !opts.allow_completion_without_creation
                    && self.created.is_none()
                {
                    log::debug!("Rejecting completion date {} without a creation date", date);
                    return;
                }
                self.store_completed(Some(date));
                self.set_complete(true);
            }
            None => {
                self.store_completed(None);
                if !opts.is_none()
                    && self.complete
                    && opts.set_completion_date_on_complete
                    && (self.created.is_some() || opts.allow_completion_without_creation)
                {
                    self.store_completed(Some(opts.today()));
                }
            }
        }
    }

    fn store_completed(&mut self, completed: Option<NaiveDate>) {
        if self.completed != completed {
            self.completed = completed;
            self.changes.push(TaskChange::Property(Field::Completed));
        }
    }

    fn on_completed(&mut self) {
        let opts = self.options;
        if opts.set_completion_date_on_complete
            && self.completed.is_none()
            && (self.created.is_some() || opts.allow_completion_without_creation)
        {
            self.store_completed(Some(opts.today()));
        }
        if opts.move_priority_to_extension
            && let Some(p) = self.priority
            && !self.extensions.contains_key(PRIORITY_KEY)
        {
            self.push_token(&tags::format_extension(PRIORITY_KEY, &p.to_string()));
        }
        if !opts.keep_priority_on_complete && self.priority.is_some() {
            self.priority = None;
            self.changes.push(TaskChange::Property(Field::Priority));
        }
    }

    fn on_reopened(&mut self) {
        if !self.options.move_priority_to_extension || self.priority.is_some() {
            return;
        }
        let stashed = self.get_extension(PRIORITY_KEY).and_then(|value| {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_uppercase() => Some(c),
                _ => None,
            }
        });
        if let Some(p) = stashed {
            self.priority = Some(p);
            self.changes.push(TaskChange::Property(Field::Priority));
        }
    }

    pub fn increase_priority(&mut self) -> Result<()> {
        match self.priority {
            None => Ok(()),
            Some('A') => Err(TodoError::invalid_operation(
                "Priority is already at the highest level",
            )),
            Some(p) => self.set_priority(Some((p as u8 - 1) as char)),
        }
    }

    pub fn decrease_priority(&mut self) -> Result<()> {
        match self.priority {
            None => Ok(()),
            Some('Z') => Err(TodoError::invalid_operation(
                "Priority is already at the lowest level",
            )),
            Some(p) => self.set_priority(Some((p as u8 + 1) as char)),
        }
    }

    // --- DESCRIPTION ---

    /// Replaces the description and re-derives projects, contexts and
    /// extensions from it with the line parser. An empty or blank value
    /// clears the description and all three collections.
    pub fn set_description(&mut self, description: Option<&str>) {
        let next = description.filter(|d| !d.trim().is_empty());
        if self.description.as_deref() == next {
            return;
        }
        self.description = next.map(str::to_string);
        self.changes.push(TaskChange::Property(Field::Description));

        let derived = next.and_then(parser::parse_line).unwrap_or_default();
        let projects = derived.projects;
        let contexts = derived.contexts;
        let extensions = derived.extensions;

        self.replace_list(Field::Projects, projects);
        self.replace_list(Field::Contexts, contexts);

        let before = flatten_extensions(&self.extensions);
        let after = flatten_extensions(&extensions);
        self.extensions = extensions;
        self.record_delta(Field::Extensions, &before, &after);
    }

    fn replace_list(&mut self, field: Field, next: Vec<String>) {
        let slot = match field {
            Field::Projects => &mut self.projects,
            _ => &mut self.contexts,
        };
        let before = std::mem::replace(slot, next);
        let after = slot.clone();
        self.record_delta(field, &before, &after);
    }

    fn record_delta(&mut self, field: Field, before: &[String], after: &[String]) {
        let removed = added_items(after, before);
        if !removed.is_empty() {
            self.changes.push(TaskChange::Removed(field, removed));
        }
        let added = added_items(before, after);
        if !added.is_empty() {
            self.changes.push(TaskChange::Added(field, added));
        }
    }

    fn push_token(&mut self, token: &str) {
        let next = tags::append_token(self.description(), token);
        self.set_description(Some(&next));
    }

    fn drop_token(&mut self, token: &str) {
        let next = self
            .description()
            .map(|d| tags::strip_token(d, token))
            .unwrap_or_default();
        self.set_description(Some(&next));
    }

    // --- PROJECTS & CONTEXTS ---

    /// Adds `+project` to the description. Adding an existing project is a no-op.
    pub fn add_project(&mut self, project: &str) -> Result<()> {
        validate_tag(project, "project")?;
        if !self.projects.iter().any(|p| p == project) {
            self.push_token(&tags::format_project(project));
        }
        Ok(())
    }

    pub fn add_context(&mut self, context: &str) -> Result<()> {
        validate_tag(context, "context")?;
        if !self.contexts.iter().any(|c| c == context) {
            self.push_token(&tags::format_context(context));
        }
        Ok(())
    }

    /// Removes every whole `+project` token from the description.
    pub fn remove_project(&mut self, project: &str) -> Result<bool> {
        validate_tag(project, "project")?;
        if !self.projects.iter().any(|p| p == project) {
            return Ok(false);
        }
        self.drop_token(&tags::format_project(project));
        Ok(true)
    }

    pub fn remove_context(&mut self, context: &str) -> Result<bool> {
        validate_tag(context, "context")?;
        if !self.contexts.iter().any(|c| c == context) {
            return Ok(false);
        }
        self.drop_token(&tags::format_context(context));
        Ok(true)
    }

    // --- EXTENSIONS ---

    /// Appends `key:value` to the description. Returns false when the key is
    /// already present.
    pub fn add_extension(&mut self, key: &str, value: &str) -> Result<bool> {
        if !tags::is_valid_key_value(key) {
            return Err(TodoError::invalid_argument(format!("Invalid key: '{}'", key)));
        }
        if !tags::is_valid_key_value(value) {
            return Err(TodoError::invalid_argument(format!(
                "Invalid value: '{}'",
                value
            )));
        }
        if self.extensions.contains_key(key) {
            return Ok(false);
        }
        self.push_token(&tags::format_extension(key, value));
        Ok(true)
    }

    /// Removes the extension and every `key:...` token from the description.
    pub fn remove_extension(&mut self, key: &str) -> Result<bool> {
        if !tags::is_valid_key_value(key) {
            return Err(TodoError::invalid_argument(format!("Invalid key: '{}'", key)));
        }
        let Some(value) = self.extensions.get(key).cloned() else {
            return Ok(false);
        };
        let prefix = format!("{}:", key);
        let next = self
            .description()
            .map(|d| {
                d.split_whitespace()
                    .filter(|word| !word.starts_with(&prefix))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();
        self.set_description(Some(&next));
        if self.extensions.remove(key).is_some() {
            self.changes.push(TaskChange::Removed(
                Field::Extensions,
                vec![tags::format_extension(key, &value)],
            ));
        }
        Ok(true)
    }

    pub fn get_extension(&self, key: &str) -> Option<&str> {
        self.extensions.get(key).map(String::as_str)
    }

    pub fn get_extension_as_date(&self, key: &str) -> Option<NaiveDate> {
        self.get_extension(key).and_then(parse_date)
    }

    pub fn get_extension_as_int(&self, key: &str) -> Option<i64> {
        self.get_extension(key).and_then(|v| v.parse().ok())
    }

    fn replace_extension(&mut self, key: &str, value: &str) -> Result<()> {
        self.remove_extension(key)?;
        self.add_extension(key, value)?;
        Ok(())
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.get_extension_as_date(DUE_KEY)
    }

    pub fn set_due_date(&mut self, due: NaiveDate) -> Result<()> {
        self.replace_extension(DUE_KEY, &format_date(due))
    }

    pub fn threshold_date(&self) -> Option<NaiveDate> {
        self.get_extension_as_date(THRESHOLD_KEY)
    }

    pub fn set_threshold_date(&mut self, threshold: NaiveDate) -> Result<()> {
        self.replace_extension(THRESHOLD_KEY, &format_date(threshold))
    }

    pub fn id(&self) -> Option<i64> {
        self.get_extension_as_int(ID_KEY)
    }

    pub fn set_id(&mut self, id: i64) -> Result<()> {
        self.replace_extension(ID_KEY, &id.to_string())
    }

    // --- DATES ---

    pub fn is_past_due(&self) -> bool {
        self.is_past_due_on(self.options.today())
    }

    pub fn is_past_due_on(&self, today: NaiveDate) -> bool {
        self.due_date().is_some_and(|due| due <= today)
    }

    pub fn can_start(&self) -> bool {
        self.can_start_on(self.options.today())
    }

    pub fn can_start_on(&self, today: NaiveDate) -> bool {
        match self.get_extension(THRESHOLD_KEY) {
            None => true,
            Some(_) => self.threshold_date().is_some_and(|t| t >= today),
        }
    }

    /// Time from creation to completion, or zero when either date is
    /// missing or they are out of order.
    pub fn duration(&self) -> Duration {
        match (self.created, self.completed) {
            (Some(created), Some(completed)) if created <= completed => completed - created,
            _ => Duration::zero(),
        }
    }

    // --- RECURRENCE ---

    pub fn recurrence(&self) -> Option<Recurrence> {
        self.get_extension(RECURRENCE_KEY)?.parse().ok()
    }

    pub fn is_recurrent(&self) -> bool {
        self.recurrence().is_some()
    }

    /// The next open occurrence of a completed recurring task.
    pub fn next_recurrence(&self) -> Option<Task> {
        if !self.complete {
            return None;
        }
        self.recurrence()?.next_occurrence(self)
    }
}

fn validate_tag(tag: &str, what: &str) -> Result<()> {
    if tags::is_valid_tag(tag) {
        Ok(())
    } else {
        Err(TodoError::invalid_argument(format!("Invalid {}: '{}'", what, tag)))
    }
}

fn flatten_extensions(map: &BTreeMap<String, String>) -> Vec<String> {
    map.iter()
        .map(|(k, v)| tags::format_extension(k, v))
        .collect()
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.complete == other.complete
            && self.description.as_deref().unwrap_or("") == other.description.as_deref().unwrap_or("")
            && self.completed.unwrap_or_default() == other.completed.unwrap_or_default()
            && self.created.unwrap_or_default() == other.created.unwrap_or_default()
            && self.priority.unwrap_or(' ') == other.priority.unwrap_or(' ')
    }
}

impl Eq for Task {}

impl std::str::FromStr for Task {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self> {
        Task::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_requires_exact_shape() {
        assert!(parse_date("2024-01-05").is_some());
        assert!(parse_date("2024-1-5").is_none());
        assert!(parse_date("2024-13-01").is_none());
        assert!(parse_date("20240105").is_none());
    }

    #[test]
    fn normalize_priority_uppercases() {
        assert_eq!(normalize_priority('b').unwrap(), 'B');
        assert!(normalize_priority('1').is_err());
    }
}
