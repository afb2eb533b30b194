//! Earthquake domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by store, selection and views.
//!
//! # Invariants
//! - Every record is identified by a stable `QuakeId`.
//! - Deletion is a hard delete by id; there are no tombstones.

pub mod quake;
