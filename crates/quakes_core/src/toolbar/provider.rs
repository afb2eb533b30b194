//! Platform-specific toolbar providers.
//!
//! # Invariants
//! - Exactly one provider is active per app instance, chosen at startup.
//! - A provider's command list is fixed for its lifetime.

use super::command::ToolbarCommand;
use serde::{Deserialize, Serialize};

/// Host platform class used to pick a toolbar provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Desktop,
    Compact,
}

impl Platform {
    /// Platform class of the build target.
    pub fn current() -> Self {
        if cfg!(any(target_os = "ios", target_os = "android")) {
            Self::Compact
        } else {
            Self::Desktop
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Compact => "compact",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "desktop" => Some(Self::Desktop),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }
}

/// Source of the toolbar commands a host should show.
pub trait ToolbarProvider {
    fn platform(&self) -> Platform;
    fn commands(&self) -> &[ToolbarCommand];

    fn supports(&self, command: ToolbarCommand) -> bool {
        self.commands().contains(&command)
    }
}

/// Wide-screen toolbar, including the bulk generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopToolbar;

const DESKTOP_COMMANDS: &[ToolbarCommand] = &[
    ToolbarCommand::Refresh,
    ToolbarCommand::CycleSort,
    ToolbarCommand::AddRandom,
    ToolbarCommand::DeleteSelected,
];

impl ToolbarProvider for DesktopToolbar {
    fn platform(&self) -> Platform {
        Platform::Desktop
    }

    fn commands(&self) -> &[ToolbarCommand] {
        DESKTOP_COMMANDS
    }
}

/// Small-screen toolbar; the bulk generator is not offered here.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompactToolbar;

const COMPACT_COMMANDS: &[ToolbarCommand] = &[
    ToolbarCommand::Refresh,
    ToolbarCommand::CycleSort,
    ToolbarCommand::DeleteSelected,
];

impl ToolbarProvider for CompactToolbar {
    fn platform(&self) -> Platform {
        Platform::Compact
    }

    fn commands(&self) -> &[ToolbarCommand] {
        COMPACT_COMMANDS
    }
}

/// Returns the provider for `platform`.
pub fn toolbar_for_platform(platform: Platform) -> Box<dyn ToolbarProvider> {
    match platform {
        Platform::Desktop => Box::new(DesktopToolbar),
        Platform::Compact => Box::new(CompactToolbar),
    }
}
