//! Toolbar command declarations.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Command a host toolbar can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ToolbarCommand {
    Refresh,
    DeleteSelected,
    CycleSort,
    AddRandom,
}

impl ToolbarCommand {
    /// Stable string id used by hosts and configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Refresh => TOOLBAR_COMMAND_REFRESH,
            Self::DeleteSelected => TOOLBAR_COMMAND_DELETE_SELECTED,
            Self::CycleSort => TOOLBAR_COMMAND_CYCLE_SORT,
            Self::AddRandom => TOOLBAR_COMMAND_ADD_RANDOM,
        }
    }

    /// User-facing button label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Refresh => "Refresh",
            Self::DeleteSelected => "Delete",
            Self::CycleSort => "Sort",
            Self::AddRandom => "Add Random Quakes",
        }
    }
}

impl Display for ToolbarCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const TOOLBAR_COMMAND_REFRESH: &str = "refresh";
pub const TOOLBAR_COMMAND_DELETE_SELECTED: &str = "delete_selected";
pub const TOOLBAR_COMMAND_CYCLE_SORT: &str = "cycle_sort";
pub const TOOLBAR_COMMAND_ADD_RANDOM: &str = "add_random";

const SUPPORTED_TOOLBAR_COMMAND_STRINGS: &[&str] = &[
    TOOLBAR_COMMAND_REFRESH,
    TOOLBAR_COMMAND_DELETE_SELECTED,
    TOOLBAR_COMMAND_CYCLE_SORT,
    TOOLBAR_COMMAND_ADD_RANDOM,
];

pub fn supported_toolbar_command_strings() -> &'static [&'static str] {
    SUPPORTED_TOOLBAR_COMMAND_STRINGS
}

/// Parses one toolbar command id. Matching is exact after trimming.
pub fn parse_toolbar_command(value: &str) -> Result<ToolbarCommand, ToolbarCommandError> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(ToolbarCommandError::EmptyCommand);
    }

    match normalized {
        TOOLBAR_COMMAND_REFRESH => Ok(ToolbarCommand::Refresh),
        TOOLBAR_COMMAND_DELETE_SELECTED => Ok(ToolbarCommand::DeleteSelected),
        TOOLBAR_COMMAND_CYCLE_SORT => Ok(ToolbarCommand::CycleSort),
        TOOLBAR_COMMAND_ADD_RANDOM => Ok(ToolbarCommand::AddRandom),
        other => Err(ToolbarCommandError::UnsupportedCommand(other.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarCommandError {
    EmptyCommand,
    UnsupportedCommand(String),
}

impl Display for ToolbarCommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCommand => write!(f, "toolbar command must not be empty"),
            Self::UnsupportedCommand(value) => {
                write!(f, "toolbar command is unsupported: {value}")
            }
        }
    }
}

impl Error for ToolbarCommandError {}
