// File: ./src/model/list.rs
use crate::error::{Result, TodoError};
use crate::model::events::ListChange;
use crate::model::matcher::TaskQuery;
use crate::model::options::TaskOptions;
use crate::model::{Task, parser};
use crate::storage::TodoFile;
use std::fmt;
use std::io::BufRead;
use std::path::Path;

type Listener = Box<dyn FnMut(&ListChange)>;

/// How a whole list is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListRender {
    /// Every task, one line each.
    Text,
    /// `"N to-do"` / `"N to-dos"`.
    Summary,
    Completed,
    Active,
}

impl ListRender {
    /// Maps the legacy specifiers `T`/`t`, `G`/`C`, `x`/`X` and `A`/`a`.
    pub fn from_specifier(spec: &str) -> Result<Self> {
        match spec {
            "T" | "t" => Ok(ListRender::Text),
            "" | "G" | "C" => Ok(ListRender::Summary),
            "x" | "X" => Ok(ListRender::Completed),
            "A" | "a" => Ok(ListRender::Active),
            other => Err(TodoError::invalid_format(format!(
                "Invalid format string: {}",
                other
            ))),
        }
    }
}

/// Ordered tasks with change notification.
///
/// Not synchronized: callers sharing a list across threads must wrap it.
#[derive(Default)]
pub struct TaskList {
    tasks: Vec<Task>,
    options: TaskOptions,
    listeners: Vec<Listener>,
}

impl fmt::Debug for TaskList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskList")
            .field("tasks", &self.tasks)
            .field("options", &self.options)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut list = Self::new();
        list.extend(tasks);
        list
    }

    /// Parses every non-blank line of `text`.
    pub fn parse_str(text: &str) -> Self {
        Self::from_tasks(parser::parse_lines(text))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        Ok(Self::from_tasks(TodoFile::read_tasks(reader)?))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::from_tasks(TodoFile::load(path)?))
    }

    /// Writes the list sorted by description, one line per task.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let mut sorted: Vec<&Task> = self.tasks.iter().collect();
        sorted.sort_by(|a, b| {
            a.description()
                .unwrap_or_default()
                .cmp(b.description().unwrap_or_default())
        });
        TodoFile::save(path, sorted)
    }

    /// Registers an observer for structural changes.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&ListChange) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&mut self, change: ListChange) {
        for listener in self.listeners.iter_mut() {
            listener(&change);
        }
    }

    pub fn options(&self) -> TaskOptions {
        self.options
    }

    /// Applies `options` to every task, now and on later insertion.
    pub fn set_options(&mut self, options: TaskOptions) {
        self.options = options;
        for task in self.tasks.iter_mut() {
            task.set_options(options);
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    /// Mutable access to one task. Structural observers are not notified of
    /// field edits; use the task's own change buffer for those.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Task> {
        self.tasks.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn index_of(&self, task: &Task) -> Option<usize> {
        self.tasks.iter().position(|t| t == task)
    }

    pub fn contains(&self, task: &Task) -> bool {
        self.index_of(task).is_some()
    }

    pub fn push(&mut self, mut task: Task) {
        task.set_options(self.options);
        self.tasks.push(task);
        let index = self.tasks.len() - 1;
        self.notify(ListChange::Added { index });
    }

    pub fn extend(&mut self, tasks: impl IntoIterator<Item = Task>) {
        for task in tasks {
            self.push(task);
        }
    }

    /// Inserts at `index`, shifting later tasks down. Inserting at `len()`
    /// appends.
    pub fn insert(&mut self, index: usize, mut task: Task) -> Result<()> {
        if index > self.tasks.len() {
            return Err(TodoError::invalid_argument(format!(
                "Index {} out of range for {} tasks",
                index,
                self.tasks.len()
            )));
        }
        task.set_options(self.options);
        let shifted = index < self.tasks.len();
        self.tasks.insert(index, task);
        self.notify(ListChange::Added { index });
        if shifted {
            self.notify(ListChange::Moved {
                from: index,
                to: index + 1,
            });
        }
        Ok(())
    }

    /// Removes the first task equal to `task`.
    pub fn remove(&mut self, task: &Task) -> bool {
        match self.index_of(task) {
            Some(index) => self.remove_at(index).is_some(),
            None => false,
        }
    }

    pub fn remove_at(&mut self, index: usize) -> Option<Task> {
        if index >= self.tasks.len() {
            return None;
        }
        let removed = self.tasks.remove(index);
        self.notify(ListChange::Removed { index });
        Some(removed)
    }

    /// Replaces the task at `index` and returns the previous one. Observers
    /// only hear about it when the new task differs.
    pub fn replace(&mut self, index: usize, mut task: Task) -> Result<Task> {
        let Some(slot) = self.tasks.get_mut(index) else {
            return Err(TodoError::invalid_argument(format!(
                "Index {} out of range",
                index
            )));
        };
        task.set_options(self.options);
        let changed = *slot != task;
        let previous = std::mem::replace(slot, task);
        if changed {
            self.notify(ListChange::Replaced { index });
        }
        Ok(previous)
    }

    pub fn clear(&mut self) {
        let count = self.tasks.len();
        self.tasks.clear();
        self.notify(ListChange::Cleared { count });
    }

    /// Tasks matching `predicate`, ordered by description.
    pub fn filter<F>(&self, predicate: F) -> Vec<&Task>
    where
        F: Fn(&Task) -> bool,
    {
        let mut found: Vec<&Task> = self.tasks.iter().filter(|t| predicate(*t)).collect();
        found.sort_by(|a, b| {
            a.description()
                .unwrap_or_default()
                .cmp(b.description().unwrap_or_default())
        });
        found
    }

    pub fn render(&self, mode: ListRender) -> String {
        match mode {
            ListRender::Text => TodoFile::render(self.tasks.iter()),
            ListRender::Summary => {
                let count = self.tasks.len();
                format!("{} {}", count, if count == 1 { "to-do" } else { "to-dos" })
            }
            ListRender::Completed => TodoFile::render(self.tasks.iter().filter(|t| t.is_complete())),
            ListRender::Active => TodoFile::render(self.tasks.iter().filter(|t| !t.is_complete())),
        }
    }
}

impl fmt::Display for TaskList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(ListRender::Summary))
    }
}

impl TaskQuery for TaskList {
    fn tasks(&self) -> &[Task] {
        &self.tasks
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

impl std::ops::Index<usize> for TaskList {
    type Output = Task;

    fn index(&self, index: usize) -> &Task {
        &self.tasks[index]
    }
}
