mod init;
pub use init::cmd_init;

use std::path::{Path, PathBuf};

use crate::app::App;
use crate::cli::commands::*;
use crate::cli::output::*;
use crate::grid::ListKind;
use crate::model::task::{Task, TaskStatus};
use crate::ops::task_ops;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let dir = board_dir(cli.board_dir.as_deref())?;

    match cli.command {
        Commands::Init(args) => cmd_init(&dir, args, json),
        Commands::List(args) => cmd_list(&dir, args, json),
        Commands::Show(args) => cmd_show(&dir, args, json),
        Commands::Add(args) => cmd_add(&dir, args, json),
        Commands::Done(args) => cmd_close(&dir, args, TaskStatus::Done),
        Commands::Cancel(args) => cmd_close(&dir, args, TaskStatus::Cancelled),
        Commands::Reopen(args) => cmd_reopen(&dir, args),
        Commands::Mv(args) => cmd_mv(&dir, args),
        Commands::Comment(args) => cmd_comment(&dir, args),
        Commands::Label(args) => cmd_label(&dir, args),
        Commands::Deadline(args) => cmd_deadline(&dir, args),
        Commands::Epic(cmd) => match cmd.action {
            EpicAction::Add(args) => cmd_epic_add(&dir, args, json),
            EpicAction::List => cmd_epic_list(&dir, json),
            EpicAction::Set(args) => cmd_epic_set(&dir, args),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn board_dir(flag: Option<&str>) -> Result<PathBuf, std::io::Error> {
    match flag {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => std::env::current_dir(),
    }
}

/// Open the board, apply `edit` to it, save it.
fn with_board<F>(dir: &Path, edit: F) -> Result<App, Box<dyn std::error::Error>>
where
    F: FnOnce(&mut App) -> Result<(), Box<dyn std::error::Error>>,
{
    let mut app = App::open(dir)?;
    edit(&mut app)?;
    app.save()?;
    Ok(app)
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(dir: &Path, args: ListArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::open(dir)?;
    if let Some(query) = &args.filter {
        app.set_filter(query);
    }
    let kind = if args.done {
        ListKind::Done
    } else {
        ListKind::Active
    };

    // Rows are numbered in the unfiltered list, so `mv` can use them.
    let table = app.grid(kind).table();
    let rows: Vec<(usize, &Task)> = table
        .display()
        .iter()
        .zip(table.display_index())
        .filter_map(|(slot, &row)| Some((row, app.tasks().get(slot.task_id()?)?)))
        .collect();

    if json {
        let out = TaskListJson {
            board: app.name().to_string(),
            list: kind.to_string(),
            tasks: rows
                .iter()
                .map(|(row, task)| RowJson {
                    row: *row,
                    task: task_to_json(task),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for (row, task) in rows {
            println!("{}", format_task_line(row, task));
        }
    }
    Ok(())
}

fn cmd_show(dir: &Path, args: IdArg, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let app = App::open(dir)?;
    let id = app.resolve(&args.id)?;
    let task = app.task(&id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(task))?);
    } else {
        for line in format_task_detail(task, app.epics()) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_epic_list(dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let app = App::open(dir)?;
    let epics = epics_to_json(app.epics());
    if json {
        println!("{}", serde_json::to_string_pretty(&epics)?);
    } else {
        for epic in epics {
            println!("{}  {}", epic.id, epic.name);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(dir: &Path, args: AddArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut new_id = String::new();
    let app = with_board(dir, |app| {
        new_id = app.new_task(args.at, &args.text)?;
        Ok(())
    })?;
    if json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(app.task(&new_id)?))?);
    } else {
        println!("{}", new_id);
    }
    Ok(())
}

fn cmd_close(dir: &Path, args: IdArg, status: TaskStatus) -> Result<(), Box<dyn std::error::Error>> {
    with_board(dir, |app| {
        let id = app.resolve(&args.id)?;
        app.complete(&id, status)?;
        println!("{} {}", id, status);
        Ok(())
    })?;
    Ok(())
}

fn cmd_reopen(dir: &Path, args: IdArg) -> Result<(), Box<dyn std::error::Error>> {
    with_board(dir, |app| {
        let id = app.resolve(&args.id)?;
        app.reopen(&id)?;
        println!("{} {}", id, TaskStatus::Active);
        Ok(())
    })?;
    Ok(())
}

fn cmd_mv(dir: &Path, args: MvArgs) -> Result<(), Box<dyn std::error::Error>> {
    with_board(dir, |app| {
        let id = app.resolve(&args.id)?;
        app.move_task(&id, args.row)?;
        Ok(())
    })?;
    Ok(())
}

fn cmd_comment(dir: &Path, args: CommentArgs) -> Result<(), Box<dyn std::error::Error>> {
    with_board(dir, |app| {
        let id = app.resolve(&args.id)?;
        app.add_comment(&id, &args.text)?;
        Ok(())
    })?;
    Ok(())
}

fn cmd_label(dir: &Path, args: LabelArgs) -> Result<(), Box<dyn std::error::Error>> {
    with_board(dir, |app| {
        let id = app.resolve(&args.id)?;
        app.set_labels(&id, args.labels)?;
        Ok(())
    })?;
    Ok(())
}

fn cmd_deadline(dir: &Path, args: DeadlineArgs) -> Result<(), Box<dyn std::error::Error>> {
    let deadline = args
        .date
        .as_deref()
        .map(task_ops::parse_deadline)
        .transpose()?;
    with_board(dir, |app| {
        let id = app.resolve(&args.id)?;
        app.set_deadline(&id, deadline)?;
        Ok(())
    })?;
    Ok(())
}

fn cmd_epic_add(dir: &Path, args: EpicAddArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::open(dir)?;
    let id = app.add_epic(&args.name)?;
    if json {
        println!("{}", serde_json::json!({ "id": id, "name": args.name }));
    } else {
        println!("{}", id);
    }
    Ok(())
}

fn cmd_epic_set(dir: &Path, args: EpicSetArgs) -> Result<(), Box<dyn std::error::Error>> {
    with_board(dir, |app| {
        let id = app.resolve(&args.id)?;
        app.set_epic(&id, args.epic.as_deref())?;
        Ok(())
    })?;
    Ok(())
}
