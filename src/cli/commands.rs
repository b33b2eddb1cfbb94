use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tg", about = concat!("taskgrid v", env!("CARGO_PKG_VERSION"), " - active and done lists in a directory"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Log debug detail to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run against a different board directory
    #[arg(short = 'C', long = "board-dir", global = true)]
    pub board_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty board in the board directory
    Init(InitArgs),
    /// List the active (or completed) tasks in board order
    List(ListArgs),
    /// Show task details
    Show(IdArg),
    /// Add a task to the active list
    Add(AddArgs),
    /// Mark a task done
    Done(IdArg),
    /// Mark a task cancelled
    Cancel(IdArg),
    /// Move a closed task back to the active list
    Reopen(IdArg),
    /// Move a task to another row of its list
    Mv(MvArgs),
    /// Add a comment to a task
    Comment(CommentArgs),
    /// Replace a task's labels
    Label(LabelArgs),
    /// Set or clear a task's deadline
    Deadline(DeadlineArgs),
    /// Epic management
    Epic(EpicCmd),
}

#[derive(Args)]
pub struct InitArgs {
    /// Board name (default: the directory name)
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// List the completed tasks instead
    #[arg(long)]
    pub done: bool,
    /// Only tasks matching this query (words, "phrases", e:EPIC, l:LABEL)
    #[arg(long, short)]
    pub filter: Option<String>,
}

#[derive(Args)]
pub struct IdArg {
    /// Task ID (or a unique prefix)
    pub id: String,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task text: first line is the summary, the rest the description
    pub text: String,
    /// Row of the active list to insert at (default: top)
    #[arg(long, default_value_t = 0)]
    pub at: usize,
}

#[derive(Args)]
pub struct MvArgs {
    /// Task ID
    pub id: String,
    /// Row the task should end up at (0 = top)
    pub row: usize,
}

#[derive(Args)]
pub struct CommentArgs {
    /// Task ID
    pub id: String,
    /// Comment text
    pub text: String,
}

#[derive(Args)]
pub struct LabelArgs {
    /// Task ID
    pub id: String,
    /// New labels (none clears them)
    pub labels: Vec<String>,
}

#[derive(Args)]
pub struct DeadlineArgs {
    /// Task ID
    pub id: String,
    /// Date as YYYY-MM-DD (omit to clear)
    pub date: Option<String>,
}

// ---------------------------------------------------------------------------
// Epic subcommands
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct EpicCmd {
    #[command(subcommand)]
    pub action: EpicAction,
}

#[derive(Subcommand)]
pub enum EpicAction {
    /// Add an epic
    Add(EpicAddArgs),
    /// List epics by name
    List,
    /// Assign a task to an epic (omit EPIC to clear)
    Set(EpicSetArgs),
}

#[derive(Args)]
pub struct EpicAddArgs {
    /// Epic name
    pub name: String,
}

#[derive(Args)]
pub struct EpicSetArgs {
    /// Task ID
    pub id: String,
    /// Epic ID
    pub epic: Option<String>,
}
