//! Quake domain model.
//!
//! # Responsibility
//! - Define the canonical earthquake record shared by list, map and detail views.
//! - Validate coordinate and magnitude domains before persistence.
//!
//! # Invariants
//! - `code` is stable and unique within one store.
//! - Records are immutable once created; the only lifecycle exits are
//!   deletion by id and replacement by a feed refresh with the same code.
//! - `longitude` is in `[-180, 180]`, `latitude` is in `[-90, 90]`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one quake, derived from the feed `code` field.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuakeId(String);

impl QuakeId {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Generates a fresh identifier for locally synthesized records.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for QuakeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuakeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Named epicenter position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuakeLocation {
    pub name: String,
    pub longitude: f64,
    pub latitude: f64,
}

impl QuakeLocation {
    pub fn new(name: impl Into<String>, longitude: f64, latitude: f64) -> Self {
        Self {
            name: name.into(),
            longitude,
            latitude,
        }
    }
}

/// One earthquake observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quake {
    pub code: QuakeId,
    pub magnitude: f64,
    pub time: DateTime<Utc>,
    pub location: QuakeLocation,
}

/// Coarse magnitude classification used for list decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MagnitudeBand {
    /// Below 3.0.
    Minor,
    /// 3.0 up to 5.0.
    Light,
    /// 5.0 up to 7.0.
    Moderate,
    /// 7.0 and above.
    Strong,
}

impl MagnitudeBand {
    pub fn classify(magnitude: f64) -> Self {
        if magnitude < 3.0 {
            Self::Minor
        } else if magnitude < 5.0 {
            Self::Light
        } else if magnitude < 7.0 {
            Self::Moderate
        } else {
            Self::Strong
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Strong => "strong",
        }
    }
}

impl Quake {
    pub fn new(
        code: QuakeId,
        magnitude: f64,
        time: DateTime<Utc>,
        location: QuakeLocation,
    ) -> Self {
        Self {
            code,
            magnitude,
            time,
            location,
        }
    }

    /// Validates domain constraints.
    ///
    /// Magnitude is otherwise unconstrained, but must be a finite number so it
    /// can be ordered and persisted.
    pub fn validate(&self) -> Result<(), QuakeValidationError> {
        if self.code.as_str().trim().is_empty() {
            return Err(QuakeValidationError::EmptyCode);
        }
        if !self.magnitude.is_finite() {
            return Err(QuakeValidationError::NonFiniteMagnitude);
        }
        if !(-180.0..=180.0).contains(&self.location.longitude) {
            return Err(QuakeValidationError::LongitudeOutOfRange(
                self.location.longitude,
            ));
        }
        if !(-90.0..=90.0).contains(&self.location.latitude) {
            return Err(QuakeValidationError::LatitudeOutOfRange(
                self.location.latitude,
            ));
        }
        Ok(())
    }

    /// Magnitude rendered with one decimal place, e.g. `7.5`.
    pub fn magnitude_label(&self) -> String {
        format!("{:.1}", self.magnitude)
    }

    pub fn magnitude_band(&self) -> MagnitudeBand {
        MagnitudeBand::classify(self.magnitude)
    }

    /// Full UTC timestamp, e.g. `2024-03-01 08:15:00 UTC`.
    pub fn full_date_label(&self) -> String {
        self.time.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    }

    /// RFC 3339 timestamp for machine-readable output.
    pub fn time_rfc3339(&self) -> String {
        self.time.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Domain validation errors for quake records.
#[derive(Debug, Clone, PartialEq)]
pub enum QuakeValidationError {
    EmptyCode,
    NonFiniteMagnitude,
    LongitudeOutOfRange(f64),
    LatitudeOutOfRange(f64),
}

impl Display for QuakeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCode => write!(f, "quake code must not be empty"),
            Self::NonFiniteMagnitude => write!(f, "quake magnitude must be finite"),
            Self::LongitudeOutOfRange(value) => {
                write!(f, "longitude {value} is outside [-180, 180]")
            }
            Self::LatitudeOutOfRange(value) => {
                write!(f, "latitude {value} is outside [-90, 90]")
            }
        }
    }
}

impl Error for QuakeValidationError {}
