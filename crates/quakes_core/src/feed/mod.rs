//! Refresh sources that repopulate the quake store.
//!
//! # Responsibility
//! - Define the feed contract used by `QuakeApp::refresh`.
//! - Decode USGS GeoJSON feature collections into quakes.
//!
//! # Invariants
//! - A feed never writes to the store; the app owns persistence.
//! - Features missing magnitude, place, code or coordinates are skipped and
//!   counted, never fabricated.

mod geojson;

pub use geojson::decode_feature_collection;

use crate::model::quake::Quake;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type FeedResult<T> = Result<T, FeedError>;

#[derive(Debug)]
pub enum FeedError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Decode(serde_json::Error),
}

impl Display for FeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read feed `{}`: {source}", path.display())
            }
            Self::Decode(err) => write!(f, "invalid feature collection: {err}"),
        }
    }
}

impl Error for FeedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Decode(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value)
    }
}

/// Quakes produced by one fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedBatch {
    pub quakes: Vec<Quake>,
    /// Features dropped because required fields were missing or out of range.
    pub skipped: usize,
}

/// External data source polled by refresh.
pub trait QuakeFeed {
    /// Short name used in log lines.
    fn name(&self) -> &str;
    fn fetch(&self) -> FeedResult<FeedBatch>;
}

/// Reads a GeoJSON feature collection from disk.
#[derive(Debug, Clone)]
pub struct JsonFileFeed {
    path: PathBuf,
}

impl JsonFileFeed {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl QuakeFeed for JsonFileFeed {
    fn name(&self) -> &str {
        "json_file"
    }

    fn fetch(&self) -> FeedResult<FeedBatch> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| FeedError::Io {
            path: self.path.clone(),
            source,
        })?;
        decode_feature_collection(&text)
    }
}

/// In-memory feed serving a fixed batch.
#[derive(Debug, Clone, Default)]
pub struct StaticFeed {
    quakes: Vec<Quake>,
}

impl StaticFeed {
    pub fn new(quakes: Vec<Quake>) -> Self {
        Self { quakes }
    }
}

impl QuakeFeed for StaticFeed {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch(&self) -> FeedResult<FeedBatch> {
        Ok(FeedBatch {
            quakes: self.quakes.clone(),
            skipped: 0,
        })
    }
}
