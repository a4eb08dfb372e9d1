//! Resolution request: mode, project, build prototype, rewrite
//! configuration, repository handle, cache.

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use bod_core::artifact::ArtifactKey;
use bod_core::config::{BuildConfiguration, PomRewriteConfiguration};
use bod_maven::repository::LocalRepository;
use bod_util::errors::BodError;

use crate::cache::BuildCache;

/// How missing dependencies may be satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionMode {
    /// Prefer installed binaries, build the rest from source.
    #[default]
    BuildOnDemand,
    /// Only installed binaries count; nothing is built.
    BinaryOnly,
    /// Build everything from source, even when a binary is installed.
    SourceOnly,
}

impl ResolutionMode {
    pub fn parse(s: &str) -> Result<Self, BodError> {
        match s {
            "build-on-demand" => Ok(Self::BuildOnDemand),
            "binary-only" => Ok(Self::BinaryOnly),
            "source-only" => Ok(Self::SourceOnly),
            other => Err(BodError::InvalidMode {
                mode: other.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BuildOnDemand => "build-on-demand",
            Self::BinaryOnly => "binary-only",
            Self::SourceOnly => "source-only",
        }
    }

    /// Whether an installed binary satisfies a candidate.
    pub fn allows_binary(&self) -> bool {
        matches!(self, Self::BuildOnDemand | Self::BinaryOnly)
    }

    /// Whether unsatisfied candidates may be built from source.
    pub fn allows_source(&self) -> bool {
        matches!(self, Self::BuildOnDemand | Self::SourceOnly)
    }
}

impl fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One resolution run: which project to satisfy, how to build, and where.
///
/// Immutable after construction apart from the cache, which nested
/// operations add completed builds to.
pub struct ResolutionRequest {
    pub mode: ResolutionMode,
    /// POM of the project whose dependencies are being resolved.
    pub project_pom: PathBuf,
    /// Keys of sibling projects the surrounding invocation is already
    /// building; these are never build candidates here.
    pub in_progress: HashSet<ArtifactKey>,
    pub local_repository: LocalRepository,
    /// Prototype configuration cloned per project by the builder.
    pub build_prototype: BuildConfiguration,
    pub rewrite: PomRewriteConfiguration,
    /// Directory under which per-project work directories are created.
    pub work_directory: PathBuf,
    pub cache: Arc<BuildCache>,
}

impl ResolutionRequest {
    /// Request with default mode, default build configuration, no sibling
    /// set, and a fresh request-scoped cache.
    pub fn new(
        project_pom: impl Into<PathBuf>,
        local_repository: LocalRepository,
        work_directory: impl Into<PathBuf>,
    ) -> Self {
        Self {
            mode: ResolutionMode::default(),
            project_pom: project_pom.into(),
            in_progress: HashSet::new(),
            local_repository,
            build_prototype: BuildConfiguration::default(),
            rewrite: PomRewriteConfiguration::default(),
            work_directory: work_directory.into(),
            cache: BuildCache::request_scoped(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_modes() {
        assert_eq!(
            ResolutionMode::parse("build-on-demand").unwrap(),
            ResolutionMode::BuildOnDemand
        );
        assert_eq!(
            ResolutionMode::parse("binary-only").unwrap(),
            ResolutionMode::BinaryOnly
        );
        assert_eq!(
            ResolutionMode::parse("source-only").unwrap(),
            ResolutionMode::SourceOnly
        );
    }

    #[test]
    fn parse_invalid_mode_lists_valid_values() {
        let err = ResolutionMode::parse("fastest").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("'fastest'"));
        assert!(message.contains("'build-on-demand'"));
        assert!(message.contains("'binary-only'"));
        assert!(message.contains("'source-only'"));
    }

    #[test]
    fn mode_predicates() {
        assert!(ResolutionMode::BuildOnDemand.allows_binary());
        assert!(ResolutionMode::BuildOnDemand.allows_source());
        assert!(ResolutionMode::BinaryOnly.allows_binary());
        assert!(!ResolutionMode::BinaryOnly.allows_source());
        assert!(!ResolutionMode::SourceOnly.allows_binary());
        assert!(ResolutionMode::SourceOnly.allows_source());
    }

    #[test]
    fn default_request() {
        let request = ResolutionRequest::new(
            "/project/pom.xml",
            LocalRepository::new("/repo"),
            "/tmp/work",
        );
        assert_eq!(request.mode, ResolutionMode::BuildOnDemand);
        assert_eq!(request.build_prototype.goals, vec!["install"]);
        assert!(request.in_progress.is_empty());
        assert!(request.cache.is_empty());
    }
}
