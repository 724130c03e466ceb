use anyhow::{Context, Result, bail};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::env;
use std::path::Path;
use todotxt::cli::{self, Command, Invocation, PriorityChange};
use todotxt::config::Config;
use todotxt::context::{AppContext, StandardContext};
use todotxt::model::{ListRender, Task, TaskList};
use todotxt::storage::TodoFile;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let invocation = cli::parse_args(&args)?;

    if invocation.command == Command::Help {
        cli::print_help("todotxt");
        return Ok(());
    }

    let ctx = StandardContext::new(invocation.root.clone());
    let config = Config::load(&ctx)?;
    init_logging(&config, invocation.verbose);

    run(&ctx, &config, invocation)
}

fn init_logging(config: &Config, verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        config.log_level_filter()
    };
    let log_config = ConfigBuilder::new().set_time_level(LevelFilter::Off).build();
    // A logger may already be installed; stay quiet in that case.
    let _ = TermLogger::init(level, log_config, TerminalMode::Stderr, ColorChoice::Auto);
}

fn run(ctx: &dyn AppContext, config: &Config, invocation: Invocation) -> Result<()> {
    let todo_path = match invocation.file {
        Some(path) => path,
        None => config.todo_path(ctx)?,
    };
    log::debug!("Using {}", todo_path.display());

    let mut list = TaskList::from_tasks(TodoFile::load_or_empty(&todo_path)?);
    list.set_options(config.options);

    match invocation.command {
        Command::List(terms) => print_numbered(&list, |t| matches_terms(t, &terms)),
        Command::Pending => print_numbered(&list, |t| !t.is_complete()),
        Command::DoneList => print_numbered(&list, |t| t.is_complete()),
        Command::Add(text) => {
            let mut task = Task::parse(&text)?;
            if task.created().is_none() {
                task.set_created(Some(config.options.today()));
            }
            println!("Added: {}", task);
            list.push(task);
            list.save_to_file(&todo_path)?;
        }
        Command::Do(n) => {
            let task = task_at(&mut list, n)?;
            if task.is_complete() {
                bail!("Task {} is already complete", n);
            }
            task.set_complete(true);
            println!("Completed: {}", task);
            let next = task.next_recurrence();
            if let Some(next) = next {
                println!("Next: {}", next);
                list.push(next);
            }
            list.save_to_file(&todo_path)?;
        }
        Command::Priority(n, change) => {
            let task = task_at(&mut list, n)?;
            match change {
                PriorityChange::Set(p) => task.set_priority(Some(p))?,
                PriorityChange::Clear => task.set_priority(None)?,
                PriorityChange::Up => task.increase_priority()?,
                PriorityChange::Down => task.decrease_priority()?,
            }
            println!("{}", task);
            list.save_to_file(&todo_path)?;
        }
        Command::Archive => {
            let done_path = config.done_path(ctx)?;
            archive(&mut list, &todo_path, &done_path)?;
        }
        Command::Export => {
            let json = serde_json::to_string_pretty(list.as_slice())
                .context("Failed to serialize tasks")?;
            println!("{}", json);
        }
        Command::Help => cli::print_help("todotxt"),
    }
    Ok(())
}

fn task_at(list: &mut TaskList, n: usize) -> Result<&mut Task> {
    let count = list.len();
    list.get_mut(n - 1)
        .with_context(|| format!("No task {} (list has {})", n, count))
}

fn matches_terms(task: &Task, terms: &[String]) -> bool {
    terms.iter().all(|term| {
        if let Some(project) = term.strip_prefix('+') {
            task.projects().iter().any(|p| p == project)
        } else if let Some(context) = term.strip_prefix('@') {
            task.contexts().iter().any(|c| c == context)
        } else {
            task.description()
                .is_some_and(|d| d.to_lowercase().contains(&term.to_lowercase()))
        }
    })
}

fn print_numbered<F>(list: &TaskList, keep: F)
where
    F: Fn(&Task) -> bool,
{
    let width = list.len().to_string().len();
    let mut shown = 0;
    for (i, task) in list.iter().enumerate() {
        if keep(task) {
            println!("{:>width$} {}", i + 1, task, width = width);
            shown += 1;
        }
    }
    println!("--");
    println!("{} of {}", shown, list.render(ListRender::Summary));
}

fn archive(list: &mut TaskList, todo_path: &Path, done_path: &Path) -> Result<()> {
    let mut done = Vec::new();
    let mut index = 0;
    while index < list.len() {
        if list[index].is_complete() {
            if let Some(task) = list.remove_at(index) {
                done.push(task);
            }
        } else {
            index += 1;
        }
    }
    if done.is_empty() {
        println!("Nothing to archive");
        return Ok(());
    }
    TodoFile::append(done_path, done.iter())?;
    list.save_to_file(todo_path)?;
    println!("Archived {} tasks to {}", done.len(), done_path.display());
    Ok(())
}
