use std::fs;
use std::io;
use std::path::Path;

use crate::io::board_io::{BoardError, CONFIG_FILE};
use crate::io::recovery::replace_file;
use crate::model::config::BoardConfig;

/// Read `board.toml` from the board directory. A missing file gives the
/// defaults.
pub fn read_config(board_dir: &Path) -> Result<BoardConfig, BoardError> {
    let path = board_dir.join(CONFIG_FILE);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BoardConfig::default()),
        Err(e) => return Err(BoardError::ReadError { path, source: e }),
    };
    Ok(toml::from_str(&text)?)
}

/// Write `config` as `board.toml`, replacing any existing file.
pub fn write_config(board_dir: &Path, config: &BoardConfig) -> Result<(), BoardError> {
    let path = board_dir.join(CONFIG_FILE);
    let text = toml::to_string_pretty(config)?;
    replace_file(&path, text.as_bytes()).map_err(|e| BoardError::WriteError { path, source: e })
}
