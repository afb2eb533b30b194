//! Quake use-case service.
//!
//! # Responsibility
//! - Provide list/insert/delete entry points over a `QuakeRepository`.
//! - Run bulk generation and feed ingestion as sequential per-row writes.
//! - Derive the aggregate summary shown next to the list.
//!
//! # Invariants
//! - Per-row insert failures are logged and counted, never returned.
//! - Bulk writes are not wrapped in a transaction: rows written before a
//!   failure stay committed.

use crate::generator::QuakeGenerator;
use crate::model::quake::{Quake, QuakeId};
use crate::repo::quake_repo::{QuakeRepository, RepoResult};
use crate::search::query::QuakeQuery;
use chrono::{DateTime, Utc};
use log::{info, warn};
use rand::Rng;
use std::time::Instant;

/// Outcome of a sequential bulk write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkInsertReport {
    pub inserted: usize,
    pub failed: usize,
}

impl BulkInsertReport {
    fn record(&mut self, ok: bool) {
        if ok {
            self.inserted += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// Store-wide aggregates re-derived on recompute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuakeSummary {
    pub total: u64,
    pub earliest: Option<DateTime<Utc>>,
    pub latest: Option<DateTime<Utc>>,
}

/// Use-case service wrapper for quake storage.
pub struct QuakeService<R: QuakeRepository> {
    repo: R,
}

impl<R: QuakeRepository> QuakeService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a quake, returning repository errors unchanged.
    pub fn create_quake(&self, quake: &Quake) -> RepoResult<QuakeId> {
        self.repo.create_quake(quake)
    }

    /// Inserts a quake, swallowing store rejections.
    ///
    /// Returns whether the row was written. Failures are logged at `warn`
    /// and not retried.
    pub fn insert_quake(&self, quake: &Quake) -> bool {
        match self.repo.create_quake(quake) {
            Ok(_) => true,
            Err(err) => {
                warn!(
                    "event=quake_insert module=service status=error code={} error={}",
                    quake.code, err
                );
                false
            }
        }
    }

    pub fn get_quake(&self, id: &QuakeId) -> RepoResult<Option<Quake>> {
        self.repo.get_quake(id)
    }

    /// Lists quakes matching `query` in the requested order.
    pub fn list_quakes(&self, query: &QuakeQuery) -> RepoResult<Vec<Quake>> {
        self.repo.list_quakes(query)
    }

    pub fn delete_quake(&self, id: &QuakeId) -> RepoResult<()> {
        self.repo.delete_quake(id)?;
        info!("event=quake_delete module=service status=ok code={id}");
        Ok(())
    }

    /// Generates and inserts `count` quakes one at a time.
    pub fn add_random<G: Rng>(
        &self,
        count: usize,
        generator: &mut QuakeGenerator<G>,
    ) -> BulkInsertReport {
        let started_at = Instant::now();
        let mut report = BulkInsertReport::default();

        for _ in 0..count {
            let quake = generator.generate();
            report.record(self.insert_quake(&quake));
        }

        info!(
            "event=quake_add_random module=service status=ok requested={} inserted={} failed={} duration_ms={}",
            count,
            report.inserted,
            report.failed,
            started_at.elapsed().as_millis()
        );
        report
    }

    /// Upserts fetched quakes one at a time; re-fetched codes replace rows.
    pub fn ingest(&self, quakes: &[Quake]) -> BulkInsertReport {
        let mut report = BulkInsertReport::default();

        for quake in quakes {
            let ok = match self.repo.upsert_quake(quake) {
                Ok(()) => true,
                Err(err) => {
                    warn!(
                        "event=quake_ingest module=service status=error code={} error={}",
                        quake.code, err
                    );
                    false
                }
            };
            report.record(ok);
        }

        report
    }

    /// Re-derives store-wide aggregates.
    pub fn summary(&self) -> RepoResult<QuakeSummary> {
        let total = self.repo.count_quakes()?;
        let range = self.repo.time_range()?;
        Ok(QuakeSummary {
            total,
            earliest: range.map(|(earliest, _)| earliest),
            latest: range.map(|(_, latest)| latest),
        })
    }
}
