use std::path::PathBuf;

use crate::artifact::ArtifactKey;

/// A project determined to be a missing dependency that must be satisfied
/// by binary lookup or source build.
///
/// Produced by the POM resolver, consumed read-only by the graph builder
/// and the project builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateProject {
    pub key: ArtifactKey,
    pub version: String,
    /// Packaging of the project's artifact (`jar`, `pom`, ...).
    pub packaging: String,
    /// Parent POM's key, when the project declares one.
    pub parent: Option<ArtifactKey>,
    /// Versionless keys of the project's declared dependencies.
    pub dependencies: Vec<ArtifactKey>,
    /// Location of the resolved POM backing this candidate, when known.
    pub pom_file: Option<PathBuf>,
}

impl CandidateProject {
    pub fn new(key: ArtifactKey, version: impl Into<String>) -> Self {
        Self {
            key,
            version: version.into(),
            packaging: "jar".to_string(),
            parent: None,
            dependencies: Vec::new(),
            pom_file: None,
        }
    }

    /// Full `group:artifact:version` identifier, used in reports.
    pub fn id(&self) -> String {
        format!("{}:{}", self.key, self.version)
    }
}
