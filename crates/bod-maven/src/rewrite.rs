//! POM rewrite seam applied to a project's POM before it is built.

use std::path::Path;

use bod_core::config::PomRewriteConfiguration;
use tracing::debug;

/// Rewrites a POM file on disk according to a rewrite configuration.
///
/// Implementations report per-file problems by pushing messages onto
/// `errors` rather than aborting, so one bad POM cannot take down the
/// whole build loop.
pub trait PomRewriter {
    fn rewrite_on_disk(
        &self,
        pom_file: &Path,
        config: &PomRewriteConfiguration,
        errors: &mut Vec<String>,
    );
}

/// Rewriter that leaves POMs untouched.
#[derive(Debug, Default)]
pub struct NoopRewriter;

impl PomRewriter for NoopRewriter {
    fn rewrite_on_disk(
        &self,
        pom_file: &Path,
        config: &PomRewriteConfiguration,
        _errors: &mut Vec<String>,
    ) {
        if !config.is_empty() {
            debug!(
                pom = %pom_file.display(),
                "rewrite configuration present but no rewriter is installed"
            );
        }
    }
}
