// Reads and writes todo.txt files.
//
// Reads and writes take an exclusive lock on a sibling `.lock` file. Writes
// go to a `.tmp` file that is renamed over the destination, so readers never
// see a half-written list.
use crate::error::Result;
use crate::model::{Task, parser};
use crate::source::LineSource;
use fs2::FileExt;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

pub struct TodoFile;

impl TodoFile {
    fn get_lock_path(file_path: &Path) -> PathBuf {
        let mut name = file_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        file_path.with_file_name(name)
    }

    /// Runs `f` while holding an exclusive lock tied to `file_path`. The lock
    /// is released when the lock file handle drops, on every exit path.
    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        file.lock_exclusive()?;
        let result = f();
        file.unlock()?;
        result
    }

    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    /// Parses every non-blank line of `reader`. Blank lines are skipped;
    /// read failures propagate.
    pub fn read_tasks<R: BufRead>(reader: R) -> Result<Vec<Task>> {
        let mut tasks = Vec::new();
        let mut source = LineSource::new(reader);
        while let Some(line) = source.next() {
            match parser::parse_line(&line?) {
                Some(task) => tasks.push(task),
                None => log::trace!("Skipping blank line {}", source.line_no()),
            }
        }
        log::debug!("Read {} tasks from {} lines", tasks.len(), source.line_no());
        Ok(tasks)
    }

    /// Loads a todo.txt file. A missing file is an I/O error.
    pub fn load(path: &Path) -> Result<Vec<Task>> {
        let tasks = Self::with_lock(path, || {
            let file = fs::File::open(path)?;
            Self::read_tasks(BufReader::new(file))
        })?;
        log::debug!("Loaded {} tasks from {}", tasks.len(), path.display());
        Ok(tasks)
    }

    /// Loads a file, treating a missing file as an empty list.
    pub fn load_or_empty(path: &Path) -> Result<Vec<Task>> {
        if !path.exists() {
            return Ok(vec![]);
        }
        Self::load(path)
    }

    /// Renders one newline-terminated line per task.
    pub fn render<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> String {
        let mut out = String::new();
        for task in tasks {
            out.push_str(&task.to_string());
            out.push('\n');
        }
        out
    }

    /// Writes tasks in the given order, replacing the destination.
    pub fn save<'a>(path: &Path, tasks: impl IntoIterator<Item = &'a Task>) -> Result<()> {
        let contents = Self::render(tasks);
        Self::with_lock(path, || Self::atomic_write(path, &contents))?;
        log::info!("Saved {}", path.display());
        Ok(())
    }

    /// Appends tasks to the end of a file, creating it when missing.
    pub fn append<'a>(path: &Path, tasks: impl IntoIterator<Item = &'a Task>) -> Result<()> {
        let addition = Self::render(tasks);
        Self::with_lock(path, || {
            let mut contents = if path.exists() {
                fs::read_to_string(path)?
            } else {
                String::new()
            };
            if !contents.is_empty() && !contents.ends_with('\n') {
                contents.push('\n');
            }
            contents.push_str(&addition);
            Self::atomic_write(path, contents)
        })
    }
}
