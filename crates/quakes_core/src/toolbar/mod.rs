//! Toolbar command surface.
//!
//! # Responsibility
//! - Declare the zero-argument commands a host can trigger.
//! - Select one platform-specific command set at startup.

pub mod command;
pub mod provider;
