//! Binary availability checks against a local repository.

use bod_core::project::CandidateProject;
use bod_maven::repository::LocalRepository;

/// Answers whether a candidate is already satisfied by an installed binary.
pub trait BinaryAvailabilityChecker {
    fn has_binary(&self, project: &CandidateProject, repository: &LocalRepository) -> bool;
}

/// Checker backed by the standard local Maven repository layout.
#[derive(Debug, Default)]
pub struct LocalRepositoryBinaryChecker;

impl BinaryAvailabilityChecker for LocalRepositoryBinaryChecker {
    fn has_binary(&self, project: &CandidateProject, repository: &LocalRepository) -> bool {
        repository.has_binary(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bod_core::artifact::ArtifactKey;

    #[test]
    fn checker_follows_repository_state() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = LocalRepository::new(tmp.path());
        let project = CandidateProject::new(ArtifactKey::new("org.example", "widget"), "1.0");

        assert!(!LocalRepositoryBinaryChecker.has_binary(&project, &repo));

        let jar = repo.artifact_path(&project);
        std::fs::create_dir_all(jar.parent().unwrap()).unwrap();
        std::fs::write(&jar, b"jar").unwrap();
        assert!(LocalRepositoryBinaryChecker.has_binary(&project, &repo));
    }
}
