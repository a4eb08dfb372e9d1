//! Local Maven repository layout and binary availability checks.

use std::path::{Path, PathBuf};

use bod_core::project::CandidateProject;

/// A local Maven repository (usually `~/.m2/repository`) laid out in the
/// standard `group/artifact/version` structure.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    basedir: PathBuf,
}

impl LocalRepository {
    pub fn new(basedir: impl Into<PathBuf>) -> Self {
        Self {
            basedir: basedir.into(),
        }
    }

    pub fn basedir(&self) -> &Path {
        &self.basedir
    }

    /// Directory holding all files of one version of an artifact.
    pub fn version_dir(&self, group: &str, artifact: &str, version: &str) -> PathBuf {
        self.basedir
            .join(group.replace('.', "/"))
            .join(artifact)
            .join(version)
    }

    /// Path of a repository file for the given coordinate and extension.
    pub fn path_of(&self, group: &str, artifact: &str, version: &str, extension: &str) -> PathBuf {
        self.version_dir(group, artifact, version)
            .join(format!("{artifact}-{version}.{extension}"))
    }

    /// Path of the installed POM for a coordinate.
    pub fn pom_path(&self, group: &str, artifact: &str, version: &str) -> PathBuf {
        self.path_of(group, artifact, version, "pom")
    }

    /// Path of the binary artifact a candidate project would install.
    pub fn artifact_path(&self, project: &CandidateProject) -> PathBuf {
        self.path_of(
            project.key.group_id(),
            project.key.artifact_id(),
            &project.version,
            extension_for(&project.packaging),
        )
    }

    /// Whether the binary artifact for this candidate is already installed.
    ///
    /// For `pom` packaging the POM itself is the artifact, so an installed
    /// POM counts as a binary.
    pub fn has_binary(&self, project: &CandidateProject) -> bool {
        self.artifact_path(project).is_file()
    }
}

/// File extension installed for a given packaging.
fn extension_for(packaging: &str) -> &str {
    match packaging {
        "pom" => "pom",
        "maven-plugin" | "ejb" | "bundle" => "jar",
        other => other,
    }
}
