//! Core logic for the quake browser.
//! Store, query, selection and generation live here; hosts only render.

pub mod app;
pub mod config;
pub mod db;
pub mod detail;
pub mod feed;
pub mod generator;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod selection;
pub mod service;
pub mod toolbar;

pub use app::{AppError, AppResult, CommandOutcome, QuakeApp, RefreshReport, ScenePhase};
pub use config::{AppConfig, ConfigError};
pub use detail::{render_detail, DetailLayout, DetailView, DETAIL_PLACEHOLDER};
pub use feed::{FeedBatch, FeedError, JsonFileFeed, QuakeFeed, StaticFeed};
pub use generator::{QuakeGenerator, DEFAULT_RANDOM_BATCH, RANDOM_LOCATION_NAME};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::quake::{MagnitudeBand, Quake, QuakeId, QuakeLocation, QuakeValidationError};
pub use repo::quake_repo::{QuakeRepository, RepoError, RepoResult, SqliteQuakeRepository};
pub use search::query::{QuakeQuery, SortKey, SortOrder};
pub use selection::{
    SelectionChange, SelectionCoordinator, SelectionEvent, SelectionState, SelectionSurface,
};
pub use service::quake_service::{BulkInsertReport, QuakeService, QuakeSummary};
pub use toolbar::command::{parse_toolbar_command, ToolbarCommand, ToolbarCommandError};
pub use toolbar::provider::{
    toolbar_for_platform, CompactToolbar, DesktopToolbar, Platform, ToolbarProvider,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
