// File: src/model/parser.rs
//
// Line parser for the todo.txt grammar:
//
//   [x ][(P) ][COMPLETION_DATE ][CREATION_DATE ]DESCRIPTION
//
// The parser walks one trimmed line through a small state machine. Leading
// tokens (completion flag, priority, dates) are only honored in their fixed
// positions. Anything that does not fit falls through to the description,
// so a malformed leading token never raises an error.
use crate::model::item::{Task, parse_date};
use crate::model::tags;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ParseState {
    Initial,
    CompleteFlag,
    Priority,
    CreationDate,
    CompletionDate,
    Description,
    Done,
}

/// Character cursor over one line.
struct LineCursor {
    chars: Vec<char>,
    pos: usize,
}

impl LineCursor {
    fn new(line: &str) -> Self {
        Self {
            chars: line.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn skip_spaces(&mut self) {
        while self.peek(0) == Some(' ') {
            self.pos += 1;
        }
    }

    /// `x ` at the very start of the line.
    fn take_complete_flag(&mut self) -> bool {
        if self.pos == 0 && self.peek(0) == Some('x') && self.peek(1) == Some(' ') {
            self.pos += 2;
            return true;
        }
        false
    }

    /// `(X) ` where X is an uppercase ASCII letter. The trailing space is
    /// required but left in place.
    fn take_priority(&mut self) -> Option<char> {
        if self.peek(0) != Some('(') {
            return None;
        }
        let letter = self.peek(1)?;
        if letter.is_ascii_uppercase() && self.peek(2) == Some(')') && self.peek(3) == Some(' ') {
            self.pos += 3;
            return Some(letter);
        }
        None
    }

    /// A `YYYY-MM-DD` token running up to the next space.
    fn take_date(&mut self) -> Option<chrono::NaiveDate> {
        if !self.peek(0)?.is_ascii_digit() {
            return None;
        }
        let end = self.chars[self.pos..]
            .iter()
            .position(|c| *c == ' ')
            .map(|offset| self.pos + offset)
            .unwrap_or(self.chars.len());
        let token: String = self.chars[self.pos..end].iter().collect();
        let date = parse_date(&token)?;
        self.pos = end;
        Some(date)
    }

    fn rest(&self) -> String {
        self.chars[self.pos.min(self.chars.len())..].iter().collect()
    }
}

/// Parses one line into a task. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<Task> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let mut cursor = LineCursor::new(line);
    let mut task = Task::default();
    let mut state = ParseState::Initial;

    while state != ParseState::Done {
        state = match state {
            ParseState::Initial => {
                if cursor.take_complete_flag() {
                    task.complete = true;
                    ParseState::CompleteFlag
                } else if let Some(p) = cursor.take_priority() {
                    task.priority = Some(p);
                    ParseState::Priority
                } else {
                    capture_dates(&mut cursor, &mut task)
                }
            }
            ParseState::CompleteFlag => {
                cursor.skip_spaces();
                if let Some(p) = cursor.take_priority() {
                    task.priority = Some(p);
                    ParseState::Priority
                } else {
                    capture_dates(&mut cursor, &mut task)
                }
            }
            ParseState::Priority => {
                cursor.skip_spaces();
                capture_dates(&mut cursor, &mut task)
            }
            ParseState::CreationDate | ParseState::CompletionDate => ParseState::Description,
            ParseState::Description => {
                capture_description(&cursor.rest(), &mut task);
                ParseState::Done
            }
            ParseState::Done => ParseState::Done,
        };
    }

    Some(task)
}

/// Parses every non-blank line of `text`.
pub fn parse_lines(text: &str) -> Vec<Task> {
    text.lines().filter_map(parse_line).collect()
}

/// On a completed line the first date is the completion date and an
/// optional second one is the creation date. Otherwise the single date is
/// the creation date.
fn capture_dates(cursor: &mut LineCursor, task: &mut Task) -> ParseState {
    let Some(first) = cursor.take_date() else {
        return ParseState::Description;
    };
    if task.complete {
        task.completed = Some(first);
        cursor.skip_spaces();
        if let Some(second) = cursor.take_date() {
            task.created = Some(second);
        }
        ParseState::CompletionDate
    } else {
        task.created = Some(first);
        ParseState::CreationDate
    }
}

fn capture_description(rest: &str, task: &mut Task) {
    let description = rest.trim();
    if description.is_empty() {
        return;
    }
    let scanned = tags::scan_tags(description);
    task.projects = scanned.projects;
    task.contexts = scanned.contexts;
    task.extensions = tags::scan_extensions(description).into_iter().collect();
    task.description = Some(description.to_string());
}
