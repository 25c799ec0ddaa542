use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "papasapo",
    version,
    about = "Checklist companion for dads, from the final weeks to the newborn days"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Data directory (default: ~/.papasapo)"
    )]
    pub home: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        value_name = "URL",
        help = "Base URL of the task service"
    )]
    pub endpoint: Option<String>,
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        help = "Read pre-birth todos from a local JSON file instead of the task service"
    )]
    pub tasks_file: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Setup(Setup),
    Status,
    List(List),
    Toggle(Toggle),
    Next,
    Schedule,
    Birth(Birth),
}

#[derive(Args, Debug)]
pub struct Setup {
    #[arg(value_name = "DUE_DATE", help = "Expected due date formatted YYYY-MM-DD")]
    pub due_date: String,
}

#[derive(Args, Debug)]
pub struct List {
    #[arg(long, default_value_t = 1, help = "How many pages of pending todos to show")]
    pub pages: usize,
    #[arg(long, help = "List completed todos as well")]
    pub completed: bool,
    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,
}

#[derive(Args, Debug)]
pub struct Toggle {
    #[arg(value_name = "ID", num_args = 1..)]
    pub ids: Vec<i64>,
}

#[derive(Args, Debug)]
pub struct Birth {
    #[arg(long, help = "Skip the interactive confirmation")]
    pub confirm: bool,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum SortArg {
    Type,
    Priority,
}
