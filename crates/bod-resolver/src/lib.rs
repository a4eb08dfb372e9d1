//! Build-on-demand dependency resolution.
//!
//! Discovers missing dependencies of a Maven project, orders them so that
//! every project is built after its dependencies and its parent POM, builds
//! them out of process, and tracks completed builds in a build cache.

pub mod binary;
pub mod builder;
pub mod cache;
pub mod candidates;
pub mod graph;
pub mod invoker;
pub mod manager;
pub mod report;
pub mod request;

pub use cache::BuildCache;
pub use manager::ResolutionManager;
pub use request::{ResolutionMode, ResolutionRequest};
