use clap::{CommandFactory, Parser};
use std::io::{self, BufRead};
use tracker_cli::cli::{Cli, Command};
use tracker_core::config::{Palette, load_config_with_fallback, palette_for_theme};
use tracker_core::error::AppError;
use tracker_core::model::Task;
use tracker_core::storage::JsonFileStore;
use tracker_core::store::TaskStore;

fn print_tasks_plain(tasks: &[Task], pending_count: usize, palette: &Palette) {
    for task in tasks {
        let marker = if task.completed { "[x]" } else { "[ ]" };
        let line = format!(
            "{} {} | {} | due {}",
            marker, task.id, task.text, task.due_date
        );
        if task.completed {
            println!("{}", palette.mutedize(&line));
        } else {
            println!("{line}");
        }
    }
    let counter = format!("You have {pending_count} pending tasks.");
    println!("{}", palette.accentize(&counter));
}

fn task_json(task: &Task) -> serde_json::Value {
    serde_json::json!({
        "id": task.id,
        "text": task.text,
        "due_date": task.due_date,
        "completed": task.completed,
        "created_at": task.created_at,
    })
}

fn print_task_json(task: &Task) {
    println!("{}", task_json(task));
}

fn print_tasks_json(tasks: &[Task]) {
    let payload = tasks.iter().map(task_json).collect();
    println!("{}", serde_json::Value::Array(payload));
}

fn report_persist(persist_error: Option<&AppError>) {
    if let Some(err) = persist_error {
        eprintln!("WARNING: change kept in memory but not saved: {err}");
    }
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_data(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(current.clone());
                current.clear();
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_data("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_command(store: &mut TaskStore, palette: &Palette, cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::Add { text, due } => {
            let text = text.unwrap_or_default();
            let outcome = store.add(&text, due.as_deref())?;
            report_persist(outcome.persist_error.as_ref());
            if cli.json {
                print_task_json(&outcome.task);
            } else {
                println!(
                    "Added task: {} ({}) due {}",
                    outcome.task.text, outcome.task.id, outcome.task.due_date
                );
            }
        }
        Command::Toggle { id } => {
            let outcome = store.toggle(&id)?;
            report_persist(outcome.persist_error.as_ref());
            if cli.json {
                print_task_json(&outcome.task);
            } else {
                let verb = if outcome.task.completed {
                    "Completed"
                } else {
                    "Reopened"
                };
                println!("{} task: {} ({})", verb, outcome.task.text, outcome.task.id);
            }
        }
        Command::Delete { id } => {
            let outcome = store.delete(&id);
            report_persist(outcome.persist_error.as_ref());
            match (cli.json, outcome.removed) {
                (true, Some(task)) => print_task_json(&task),
                (true, None) => println!("null"),
                (false, Some(task)) => println!("Deleted task: {} ({})", task.text, task.id),
                (false, None) => println!("No task with id {id}"),
            }
        }
        Command::Filter { mode } => {
            store.set_filter(mode.into());
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({ "filter": store.filter().label() })
                );
            } else {
                println!("Filter set to {}", store.filter().label());
            }
        }
        Command::List { mode } => {
            if let Some(mode) = mode {
                store.set_filter(mode.into());
            }
            let tasks = store.list_filtered();
            if cli.json {
                print_tasks_json(&tasks);
            } else {
                print_tasks_plain(&tasks, store.pending_count(), palette);
            }
        }
        Command::Count => {
            let count = store.pending_count();
            if cli.json {
                println!("{}", serde_json::json!({ "pending": count }));
            } else {
                println!("{count}");
            }
        }
    }

    Ok(())
}

fn run_interactive(store: &mut TaskStore, palette: &Palette) -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {err}");
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("tracker".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = run_command(store, palette, cli) {
            eprintln!("ERROR: {err}");
        }
    }

    Ok(())
}

fn open_session() -> Result<(TaskStore, Palette), AppError> {
    let config_load = load_config_with_fallback();
    if let Some(err) = &config_load.error {
        eprintln!("WARNING: {err}");
    }
    let palette = palette_for_theme(config_load.config.theme.as_deref());

    let adapter = JsonFileStore::from_env()?;
    let mut store = TaskStore::open(Box::new(adapter));
    if let Some(mode) = config_load.config.default_filter_mode() {
        store.set_filter(mode);
    }

    Ok((store, palette))
}

fn main() {
    env_logger::init();

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        let result = open_session()
            .and_then(|(mut store, palette)| run_interactive(&mut store, &palette));
        if let Err(err) = result {
            eprintln!("ERROR: {err}");
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if matches!(
                err.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) {
                err.exit();
            }
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    let result = open_session().and_then(|(mut store, palette)| run_command(&mut store, &palette, cli));
    if let Err(err) = result {
        eprintln!("ERROR: {err}");
        std::process::exit(1);
    }
}
