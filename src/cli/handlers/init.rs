use std::path::Path;

use crate::app::App;
use crate::cli::commands::InitArgs;

pub fn cmd_init(dir: &Path, args: InitArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let app = App::init(dir, args.name)?;
    if json {
        println!(
            "{}",
            serde_json::json!({ "board": app.name(), "dir": app.dir().display().to_string() })
        );
    } else {
        println!("Created board {} in {}", app.name(), app.dir().display());
    }
    Ok(())
}
