// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::model::TaskOptions;
use crate::storage::TodoFile;
use anyhow::{Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_options() -> TaskOptions {
    TaskOptions {
        set_completion_date_on_complete: true,
        ..TaskOptions::default()
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    /// Defaults to `todo.txt` in the data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub todo_file: Option<PathBuf>,
    /// Destination of `archive`. Defaults to `done.txt` in the data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done_file: Option<PathBuf>,
    #[serde(default = "default_options")]
    pub options: TaskOptions,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            todo_file: None,
            done_file: None,
            options: default_options(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Reads the config file. A missing file yields the defaults.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;

        Ok(config)
    }

    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        let toml_str = toml::to_string_pretty(self)?;
        TodoFile::with_lock(&path, || TodoFile::atomic_write(&path, &toml_str))?;
        Ok(())
    }

    pub fn todo_path(&self, ctx: &dyn AppContext) -> Result<PathBuf> {
        match &self.todo_file {
            Some(path) => Ok(path.clone()),
            None => ctx.get_todo_path(),
        }
    }

    pub fn done_path(&self, ctx: &dyn AppContext) -> Result<PathBuf> {
        match &self.done_file {
            Some(path) => Ok(path.clone()),
            None => ctx.get_done_path(),
        }
    }

    /// Unknown level names fall back to `Warn`.
    pub fn log_level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Warn)
    }
}
