use serde::{Deserialize, Serialize};

/// Configuration from board.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub board: BoardInfo,
    #[serde(default)]
    pub load: LoadConfig,
    #[serde(default)]
    pub done: DoneConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardInfo {
    /// Display name. Defaults to the board directory name.
    #[serde(default)]
    pub name: Option<String>,
}

/// How the loader treats inconsistencies between the board files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadConfig {
    #[serde(default)]
    pub unknown_epic: UnknownEpicPolicy,
    #[serde(default)]
    pub orphaned_active: OrphanPolicy,
}

/// A task record names an epic missing from epics.yaml
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownEpicPolicy {
    /// Load the task without an epic
    #[default]
    Clear,
    /// Abort the load
    Fail,
}

/// An active task is missing from active.txt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrphanPolicy {
    /// Append it to the end of the active list
    #[default]
    Append,
    /// Leave it out of the active list (it stays in the pool)
    Drop,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoneConfig {
    /// Order the completed list by close date, most recent first
    #[serde(default = "default_true")]
    pub newest_first: bool,
}

impl Default for DoneConfig {
    fn default() -> Self {
        DoneConfig { newest_first: true }
    }
}

fn default_true() -> bool {
    true
}
