// File: ./src/model/mod.rs
pub mod display;
pub mod events;
pub mod item;
pub mod list;
pub mod matcher;
pub mod options;
pub mod parser;
pub mod recurrence;
pub mod tags;

pub use display::RenderMode;
pub use events::{Field, ListChange, TaskChange};
pub use item::{Task, format_date, parse_date};
pub use list::{ListRender, TaskList};
pub use matcher::{DateFilter, TaskQuery};
pub use options::TaskOptions;
pub use recurrence::{Recurrence, RecurrenceUnit, add_business_days};
