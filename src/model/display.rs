// File: ./src/model/display.rs
use crate::error::{Result, TodoError};
use crate::model::item::{Task, format_date};
use std::fmt;
use strum::EnumIter;

/// Which part of a task to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter)]
pub enum RenderMode {
    /// The canonical todo.txt line.
    #[default]
    Full,
    Description,
    Created,
    CompleteFlag,
    Completed,
    Priority,
}

impl RenderMode {
    /// Maps the single-letter specifiers used by other todo.txt tools
    /// (`G`, `D`, `C`, `x`, `X`, `P`). An empty specifier means `G`.
    pub fn from_specifier(spec: &str) -> Result<Self> {
        match spec {
            "" | "G" => Ok(RenderMode::Full),
            "D" => Ok(RenderMode::Description),
            "C" => Ok(RenderMode::Created),
            "x" => Ok(RenderMode::CompleteFlag),
            "X" => Ok(RenderMode::Completed),
            "P" => Ok(RenderMode::Priority),
            other => Err(TodoError::invalid_format(format!(
                "Invalid format string: {}",
                other
            ))),
        }
    }

    pub fn specifier(&self) -> &'static str {
        match self {
            RenderMode::Full => "G",
            RenderMode::Description => "D",
            RenderMode::Created => "C",
            RenderMode::CompleteFlag => "x",
            RenderMode::Completed => "X",
            RenderMode::Priority => "P",
        }
    }
}

impl Task {
    pub fn render(&self, mode: RenderMode) -> String {
        match mode {
            RenderMode::Full => self.to_line(),
            RenderMode::Description => self.description().unwrap_or_default().to_string(),
            RenderMode::Created => self.created().map(format_date).unwrap_or_default(),
            RenderMode::CompleteFlag => {
                if self.is_complete() {
                    "x".to_string()
                } else {
                    String::new()
                }
            }
            RenderMode::Completed => self.completed().map(format_date).unwrap_or_default(),
            RenderMode::Priority => self
                .priority()
                .map(|p| format!("({})", p))
                .unwrap_or_default(),
        }
    }

    /// Canonical line. A completion date without a creation date occupies
    /// the single date slot.
    fn to_line(&self) -> String {
        let parts = [
            self.render(RenderMode::CompleteFlag),
            self.render(RenderMode::Priority),
            self.render(RenderMode::Completed),
            self.render(RenderMode::Created),
            self.render(RenderMode::Description),
        ];
        parts
            .iter()
            .filter(|p| !p.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn specifiers_map_back_to_modes() {
        for mode in RenderMode::iter() {
            assert_eq!(RenderMode::from_specifier(mode.specifier()).unwrap(), mode);
        }
        assert!(matches!(
            RenderMode::from_specifier("Q"),
            Err(TodoError::InvalidFormat(_))
        ));
    }
}
