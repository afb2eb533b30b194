//! List search and sort parameters.
//!
//! # Responsibility
//! - Carry the list view's search/sort state as one explicit value.
//! - Translate calendar-day filters into store-level time bounds.

pub mod query;
