//! Synthetic quake generation for demo and load runs.
//!
//! # Invariants
//! - Magnitude is sampled uniformly from `[0, 10]`.
//! - Longitude is in `[-180, 180]`, latitude is in `[-90, 90]`.
//! - Each generated code is a fresh UUID v4 drawn from the generator's RNG.
//! - Generation has no side effects; persisting is the caller's job.

use crate::model::quake::{Quake, QuakeId, QuakeLocation};
use chrono::Utc;
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use uuid::Builder;

/// Location name given to every synthesized quake.
pub const RANDOM_LOCATION_NAME: &str = "Random";
/// Record count used by the "add random" toolbar action.
pub const DEFAULT_RANDOM_BATCH: usize = 10_000;

/// Produces quakes with randomized magnitude and epicenter.
pub struct QuakeGenerator<R: Rng> {
    rng: R,
}

impl QuakeGenerator<ThreadRng> {
    /// Generator backed by the thread-local RNG.
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for QuakeGenerator<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl QuakeGenerator<StdRng> {
    /// Reproducible generator; equal seeds yield equal sequences of fields.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Owned generator seeded from the operating system.
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl<R: Rng> QuakeGenerator<R> {
    /// Builds one random quake timestamped now.
    pub fn generate(&mut self) -> Quake {
        let code = Builder::from_random_bytes(self.rng.random()).into_uuid();
        Quake::new(
            QuakeId::new(code.to_string()),
            self.rng.random_range(0.0..=10.0),
            Utc::now(),
            QuakeLocation::new(
                RANDOM_LOCATION_NAME,
                self.rng.random_range(-180.0..=180.0),
                self.rng.random_range(-90.0..=90.0),
            ),
        )
    }
}

impl<R: Rng> Iterator for QuakeGenerator<R> {
    type Item = Quake;

    fn next(&mut self) -> Option<Quake> {
        Some(self.generate())
    }
}
