// File: ./src/cli.rs
//! Shared command-line interface logic: argument parsing and help text.
use crate::error::{Result, TodoError};
use std::path::PathBuf;

/// How `pri` changes a task's priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityChange {
    Set(char),
    Clear,
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Tasks with their 1-based number, narrowed by `+project`, `@context`
    /// or plain-text terms.
    List(Vec<String>),
    Pending,
    DoneList,
    Add(String),
    /// Completes task `n` (1-based).
    Do(usize),
    Priority(usize, PriorityChange),
    /// Moves completed tasks to the done file.
    Archive,
    /// Dumps the list as JSON on stdout.
    Export,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub root: Option<PathBuf>,
    pub file: Option<PathBuf>,
    pub verbose: bool,
    pub command: Command,
}

/// Parses arguments, excluding the binary name. No command means `list`.
pub fn parse_args(args: &[String]) -> Result<Invocation> {
    let mut root = None;
    let mut file = None;
    let mut verbose = false;
    let mut rest: Vec<&str> = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-r" | "--root" => {
                let value = iter
                    .next()
                    .ok_or_else(|| TodoError::invalid_argument("--root requires a path"))?;
                root = Some(PathBuf::from(value));
            }
            "-f" | "--file" => {
                let value = iter
                    .next()
                    .ok_or_else(|| TodoError::invalid_argument("--file requires a path"))?;
                file = Some(PathBuf::from(value));
            }
            "-v" | "--verbose" => verbose = true,
            "-h" | "--help" => {
                return Ok(Invocation {
                    root,
                    file,
                    verbose,
                    command: Command::Help,
                });
            }
            other => rest.push(other),
        }
    }

    let command = match rest.split_first() {
        None => Command::List(Vec::new()),
        Some((&name, params)) => parse_command(name, params)?,
    };

    Ok(Invocation {
        root,
        file,
        verbose,
        command,
    })
}

fn parse_command(name: &str, params: &[&str]) -> Result<Command> {
    match name {
        "list" | "ls" => Ok(Command::List(
            params.iter().map(|p| p.to_string()).collect(),
        )),
        "pending" => Ok(Command::Pending),
        "done-list" => Ok(Command::DoneList),
        "add" | "a" => {
            if params.is_empty() {
                return Err(TodoError::invalid_argument("add requires task text"));
            }
            Ok(Command::Add(params.join(" ")))
        }
        "do" => match params {
            [n] => Ok(Command::Do(parse_number(n)?)),
            _ => Err(TodoError::invalid_argument("usage: do <n>")),
        },
        "pri" => match params {
            [n, change] => Ok(Command::Priority(
                parse_number(n)?,
                parse_priority_change(change)?,
            )),
            _ => Err(TodoError::invalid_argument(
                "usage: pri <n> <A-Z|up|down|none>",
            )),
        },
        "archive" => Ok(Command::Archive),
        "export" => Ok(Command::Export),
        "help" => Ok(Command::Help),
        other => Err(TodoError::invalid_argument(format!(
            "Unknown command: {}",
            other
        ))),
    }
}

fn parse_number(text: &str) -> Result<usize> {
    match text.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(TodoError::invalid_argument(format!(
            "Expected a task number, got '{}'",
            text
        ))),
    }
}

fn parse_priority_change(text: &str) -> Result<PriorityChange> {
    match text {
        "up" => Ok(PriorityChange::Up),
        "down" => Ok(PriorityChange::Down),
        "none" | "-" => Ok(PriorityChange::Clear),
        _ => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphabetic() => {
                    Ok(PriorityChange::Set(c.to_ascii_uppercase()))
                }
                _ => Err(TodoError::invalid_argument(format!(
                    "Invalid priority: '{}'",
                    text
                ))),
            }
        }
    }
}

pub fn print_help(binary_name: &str) {
    println!(
        "todotxt v{} - Plain-text task lists in the todo.txt format",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [OPTIONS] [COMMAND]", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config and data.");
    println!("    -f, --file <path>     Operate on this todo.txt instead of the configured one.");
    println!("    -v, --verbose         Log debug output to stderr.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("COMMANDS:");
    println!("    list [terms...]       Show tasks with their number (default)");
    println!("                          Terms: +project, @context or plain text; all must match");
    println!("    pending               Show open tasks");
    println!("    done-list             Show completed tasks");
    println!("    add <text>            Add a task; today's date is used as creation date");
    println!("    do <n>                Complete task n, scheduling the next one if it recurs");
    println!("    pri <n> <A-Z>         Set the priority of task n");
    println!("    pri <n> up|down|none  Raise, lower or clear the priority of task n");
    println!("    archive               Move completed tasks to the done file");
    println!("    export                Print the list as JSON");
    println!();
    println!("LINE FORMAT:");
    println!("    x (A) 2024-03-02 2024-03-01 Call mom +family @phone due:2024-03-05");
    println!("    x                     Completion marker");
    println!("    (A)                   Priority, A is highest");
    println!("    +project @context     Tags");
    println!("    key:value             Extensions: due:, t: (threshold), rec: (1d, +2w, 3b)");
}
