mod checklist;
mod cli;
mod dates;
mod error;
mod fallback;
mod phase;
mod state;
mod store;
mod tasks;
mod view;

use std::io::Write;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Parser;
use tokio::io::AsyncBufReadExt;

use crate::checklist::{Checklist, SortPolicy};
use crate::cli::{Birth, Cli, Command, List, Setup, SortArg, Toggle};
use crate::error::AppError;
use crate::phase::{HoldGate, LONG_PRESS_DURATION};
use crate::state::{create_initial_state, AppState, Phase};
use crate::store::Store;
use crate::tasks::{TaskSource, DEFAULT_ENDPOINT};

const ENDPOINT_ENV: &str = "PAPASAPO_ENDPOINT";
const TASKS_FILE_ENV: &str = "PAPASAPO_TASKS_FILE";

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let home = store::resolve_home(cli.home)?;
    let store = Store::new(home);
    let mut lock = store.open_lock()?;
    let _guard = lock.write()?;

    let endpoint = resolve_endpoint(cli.endpoint);
    let mut source = TaskSource::new(&endpoint, resolve_tasks_file(cli.tasks_file))?;
    let today = Local::now().date_naive();

    match cli.command {
        Command::Setup(args) => handle_setup(&store, args, today),
        Command::Status => handle_status(&store, &mut source, today).await,
        Command::List(args) => handle_list(&store, &mut source, args).await,
        Command::Toggle(args) => handle_toggle(&store, &mut source, args).await,
        Command::Next => handle_next(&store, &mut source).await,
        Command::Schedule => handle_schedule(&mut source).await,
        Command::Birth(args) => handle_birth(&store, &mut source, args, today).await,
    }
}

fn resolve_endpoint(flag: Option<String>) -> String {
    flag.or_else(|| std::env::var(ENDPOINT_ENV).ok())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
}

fn resolve_tasks_file(flag: Option<PathBuf>) -> Option<PathBuf> {
    flag.or_else(|| std::env::var(TASKS_FILE_ENV).ok().map(PathBuf::from))
}

fn require_state(store: &Store) -> Result<AppState, AppError> {
    store.load_state().ok_or_else(|| {
        AppError::NotFound("saved app state; run 'papasapo setup <YYYY-MM-DD>' first".to_string())
    })
}

async fn build_checklist(
    store: &Store,
    source: &mut TaskSource,
    state: AppState,
    policy: SortPolicy,
) -> Checklist {
    let feed = source.tasks_for_phase(state.phase).await;
    Checklist::new(store.clone(), state, feed, policy)
}

fn handle_setup(store: &Store, args: Setup, today: NaiveDate) -> Result<(), AppError> {
    if let Some(existing) = store.load_state() {
        return Err(AppError::InvalidInput(format!(
            "papasapo is already set up (phase {}, due {})",
            existing.phase.as_str(),
            existing.due_date
        )));
    }
    dates::validate_due_date(&args.due_date, today)?;
    let state = create_initial_state(&args.due_date);
    store.save_state(&state)?;

    println!("Saved due date {}.", state.due_date);
    println!(
        "{} days to go. Run 'papasapo list' to see what to prepare.",
        dates::days_until_due(&state.due_date, today)
    );
    Ok(())
}

async fn handle_status(
    store: &Store,
    source: &mut TaskSource,
    today: NaiveDate,
) -> Result<(), AppError> {
    let state = require_state(store)?;
    let phase = state.phase;
    let checklist = build_checklist(store, source, state, SortPolicy::TypeFirst).await;

    match phase {
        Phase::PreBirth => println!("{}", view::format_pre_birth_status(&checklist, today)),
        Phase::PostBirth => {
            if !store.celebration_seen() {
                println!("{}", view::format_celebration());
                println!();
                store.mark_celebration_seen();
            }
            println!("{}", view::format_post_birth_status(&checklist, today));
        }
    }
    Ok(())
}

async fn handle_list(store: &Store, source: &mut TaskSource, args: List) -> Result<(), AppError> {
    if args.pages == 0 {
        return Err(AppError::InvalidInput("--pages starts at 1".to_string()));
    }
    let state = require_state(store)?;
    let policy = match args.sort {
        Some(SortArg::Priority) => SortPolicy::PriorityFirst,
        _ => SortPolicy::TypeFirst,
    };
    let mut checklist = build_checklist(store, source, state, policy).await;
    for _ in 1..args.pages {
        if checklist.is_show_more_disabled() {
            break;
        }
        checklist.show_more();
    }

    println!(
        "{}",
        view::format_checklist(&checklist, args.completed, args.pages)
    );
    Ok(())
}

async fn handle_toggle(
    store: &Store,
    source: &mut TaskSource,
    args: Toggle,
) -> Result<(), AppError> {
    if args.ids.is_empty() {
        return Err(AppError::InvalidInput("no task ids provided".to_string()));
    }
    let state = require_state(store)?;
    let mut checklist = build_checklist(store, source, state, SortPolicy::TypeFirst).await;
    if let Some(reason) = checklist.load_error() {
        return Err(AppError::TaskSource(reason.to_string()));
    }
    for task_id in &args.ids {
        if !checklist.contains_task(*task_id) {
            return Err(AppError::NotFound(format!(
                "task id {task_id} in the current checklist"
            )));
        }
    }

    for task_id in args.ids {
        let saved = checklist.toggle(task_id);
        let source_id = task_id.to_string();
        let status = if saved.completed_todos.contains(&source_id) {
            "done"
        } else {
            "todo"
        };
        println!("Task ID: {task_id} marked {status}.");
    }
    println!("{}", view::format_progress_line(&checklist));
    Ok(())
}

async fn handle_next(store: &Store, source: &mut TaskSource) -> Result<(), AppError> {
    let state = require_state(store)?;
    let checklist = build_checklist(store, source, state, SortPolicy::TypeFirst).await;
    if let Some(reason) = checklist.load_error() {
        return Err(AppError::TaskSource(reason.to_string()));
    }

    let phase = checklist.state().phase;
    println!(
        "{}",
        view::format_important_task(checklist.pending_tasks().first().copied(), phase)
    );
    Ok(())
}

async fn handle_schedule(source: &mut TaskSource) -> Result<(), AppError> {
    let entries = source.schedule().await;
    println!("{}", view::format_schedule(&entries));
    Ok(())
}

async fn handle_birth(
    store: &Store,
    source: &mut TaskSource,
    args: Birth,
    today: NaiveDate,
) -> Result<(), AppError> {
    let state = require_state(store)?;
    if state.phase == Phase::PostBirth {
        return Err(AppError::InvalidInput(
            "already in post-birth mode".to_string(),
        ));
    }

    println!("{}", view::format_birth_dialog());
    if !args.confirm {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        print!("Type 'yes' to continue: ");
        std::io::stdout().flush()?;
        let answer = lines.next_line().await?.unwrap_or_default();
        if !answer.trim().eq_ignore_ascii_case("yes") {
            println!("Cancelled. Staying in pre-birth mode.");
            return Ok(());
        }

        let mut gate = HoldGate::new(LONG_PRESS_DURATION);
        gate.arm();
        println!("Hold steady... press Enter to cancel.");
        let mut cancelled = false;
        let mut stdin_open = true;
        tokio::select! {
            _ = gate.held() => {}
            line = lines.next_line() => match line {
                Ok(Some(_)) => cancelled = true,
                _ => stdin_open = false,
            },
        }
        if cancelled {
            gate.disarm();
            println!("Cancelled. Staying in pre-birth mode.");
            return Ok(());
        }
        // Stdin closing is not a cancel; finish the hold window.
        if !stdin_open && gate.is_armed() {
            gate.held().await;
        }
    }

    let next = phase::apply_transition(store, &state);
    println!(
        "Recorded the birth on {}. Welcome to post-birth mode!",
        dates::display_date(&next.due_date)
    );
    println!();
    if !store.celebration_seen() {
        println!("{}", view::format_celebration());
        println!();
        store.mark_celebration_seen();
    }

    let checklist = build_checklist(store, source, next, SortPolicy::TypeFirst).await;
    println!("{}", view::format_post_birth_status(&checklist, today));
    Ok(())
}
