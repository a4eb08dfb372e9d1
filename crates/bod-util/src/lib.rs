//! Shared utilities for the bod build-on-demand resolver.
//!
//! This crate provides cross-cutting concerns used by all other bod crates:
//! error types, filesystem helpers, process spawning, and terminal progress
//! indicators.

pub mod errors;
pub mod fs;
pub mod process;
pub mod progress;
