//! Core data types for the bod build-on-demand resolver: artifact keys,
//! build candidates, and build/rewrite configuration.

pub mod artifact;
pub mod config;
pub mod project;
