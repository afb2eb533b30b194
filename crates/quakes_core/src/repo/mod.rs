//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the record-store contract consumed by services and the app.
//! - Isolate SQLite query details from orchestration code.
//!
//! # Invariants
//! - Repository writes must enforce `Quake::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `Duplicate`) in
//!   addition to DB transport errors.

pub mod quake_repo;
