use clap::{Parser, Subcommand, ValueEnum};
use tracker_core::model::FilterMode;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a task with a due date
    ///
    /// Example: tracker add "Buy milk" --due 2026-12-24
    Add {
        text: Option<String>,
        /// Due date (YYYY-MM-DD), today or later
        #[arg(long, value_name = "DATE")]
        due: Option<String>,
    },
    /// Flip a task between pending and completed
    ///
    /// Example: tracker toggle task-1
    Toggle {
        id: String,
    },
    /// Delete a task; succeeds even when the id is unknown
    ///
    /// Example: tracker delete task-1
    Delete {
        id: String,
    },
    /// Switch the view filter
    ///
    /// Example: tracker filter pending
    Filter {
        mode: ModeArg,
    },
    /// List tasks under a filter, ascending by due date
    ///
    /// Example: tracker list
    /// Example: tracker list completed
    List {
        mode: Option<ModeArg>,
    },
    /// Count pending tasks
    ///
    /// Example: tracker count
    Count,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    All,
    Pending,
    Completed,
}

impl From<ModeArg> for FilterMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::All => FilterMode::All,
            ModeArg::Pending => FilterMode::Pending,
            ModeArg::Completed => FilterMode::Completed,
        }
    }
}
