// Crate root library declaration and module exports.
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod model;
pub mod source;
pub mod storage;

pub use error::{Result, TodoError};
pub use model::{Task, TaskList};
