//! Contact Directory Library
//!
//! This library exposes modules for testing and external use.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod config;
/// Contact records, storage and seeding
pub mod contacts;
pub mod error;
pub mod router;
