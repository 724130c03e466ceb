// File: ./src/context.rs
/*! Where the command-line driver keeps its files.

`AppContext` maps the two directory kinds (`data` for todo.txt / done.txt,
`config` for config.toml) to real paths. `StandardContext` asks the OS via
`directories::ProjectDirs` unless a root was given with `--root`.
`TestContext` roots a `StandardContext` in a throwaway temp directory.

The library itself never consults a context; only `Config` and the binary do.
*/

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirKind {
    Data,
    Config,
}

impl DirKind {
    fn subdir(self) -> &'static str {
        match self {
            DirKind::Data => "data",
            DirKind::Config => "config",
        }
    }
}

pub trait AppContext: std::fmt::Debug {
    /// Resolves a directory, creating it when missing.
    fn dir(&self, kind: DirKind) -> Result<PathBuf>;

    fn get_data_dir(&self) -> Result<PathBuf> {
        self.dir(DirKind::Data)
    }

    fn get_config_dir(&self) -> Result<PathBuf> {
        self.dir(DirKind::Config)
    }

    fn get_config_file_path(&self) -> Result<PathBuf> {
        Ok(self.get_config_dir()?.join("config.toml"))
    }

    fn get_todo_path(&self) -> Result<PathBuf> {
        Ok(self.get_data_dir()?.join("todo.txt"))
    }

    fn get_done_path(&self) -> Result<PathBuf> {
        Ok(self.get_data_dir()?.join("done.txt"))
    }
}

fn ensure_dir(path: PathBuf) -> Result<PathBuf> {
    if !path.is_dir() {
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        log::debug!("Created {}", path.display());
    }
    Ok(path)
}

#[derive(Clone, Debug, Default)]
pub struct StandardContext {
    root: Option<PathBuf>,
}

impl StandardContext {
    /// With `Some(root)`, directories live at `<root>/data` and `<root>/config`.
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }
}

impl AppContext for StandardContext {
    fn dir(&self, kind: DirKind) -> Result<PathBuf> {
        if let Some(root) = &self.root {
            return ensure_dir(root.join(kind.subdir()));
        }
        let proj = ProjectDirs::from("org", "todotxt", "todotxt")
            .context("Could not determine a home directory")?;
        let path = match kind {
            DirKind::Data => proj.data_dir(),
            DirKind::Config => proj.config_dir(),
        };
        ensure_dir(path.to_path_buf())
    }
}

/// A `StandardContext` rooted in a unique temp directory, removed on drop.
#[derive(Debug)]
pub struct TestContext {
    pub root: PathBuf,
    inner: StandardContext,
}

impl TestContext {
    pub fn new() -> Self {
        let root = std::env::temp_dir().join(format!("todotxt_test_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&root).expect("failed to create TestContext temp dir");
        Self {
            inner: StandardContext::new(Some(root.clone())),
            root,
        }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AppContext for TestContext {
    fn dir(&self, kind: DirKind) -> Result<PathBuf> {
        self.inner.dir(kind)
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}
