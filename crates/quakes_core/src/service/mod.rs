//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Own the insert-failure policy so hosts never see per-row store errors.

pub mod quake_service;
