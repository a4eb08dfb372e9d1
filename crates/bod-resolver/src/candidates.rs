//! Build-candidate discovery: walk a project's dependency POMs in the
//! local repository and collect the projects that may need building.

use std::collections::{HashSet, VecDeque};

use bod_core::artifact::ArtifactKey;
use bod_core::project::CandidateProject;
use bod_maven::pom::{load_pom, Pom};
use bod_util::errors::BodError;
use tracing::debug;

use crate::report::FailureReport;
use crate::request::ResolutionRequest;

/// Produces the set of candidate projects for a resolution run.
pub trait DependencyPomResolver {
    /// Collect candidates reachable from the request's project POM,
    /// excluding the project itself, in-progress siblings, and anything
    /// already recorded in the cache. Consults the cache, never mutates it.
    fn resolve_build_candidates(
        &self,
        request: &ResolutionRequest,
    ) -> miette::Result<Vec<CandidateProject>>;
}

/// Resolver that follows dependency and parent references through POMs
/// installed in the local repository.
///
/// A coordinate whose POM is not installed cannot become a build candidate
/// and is skipped; a POM that is installed but unreadable is a collected
/// error. Problems accumulate and surface as one aggregate error so a
/// single bad POM does not hide the rest.
#[derive(Debug, Default)]
pub struct LocalRepoPomResolver;

impl LocalRepoPomResolver {
    fn candidate_from(&self, key: ArtifactKey, version: &str, pom: &Pom) -> CandidateProject {
        let mut project = CandidateProject::new(key, version);
        project.packaging = pom.effective_packaging().to_string();
        project.parent = pom.parent.as_ref().map(|p| p.key());
        project.dependencies = pom
            .dependencies
            .iter()
            .filter(|d| d.is_resolvable())
            .map(|d| d.key())
            .collect();
        project
    }
}

impl DependencyPomResolver for LocalRepoPomResolver {
    fn resolve_build_candidates(
        &self,
        request: &ResolutionRequest,
    ) -> miette::Result<Vec<CandidateProject>> {
        let root = load_pom(&request.project_pom)?;
        let root_key = root.key().ok_or_else(|| BodError::Pom {
            message: format!(
                "POM {} is missing groupId or artifactId",
                request.project_pom.display()
            ),
        })?;

        let mut queue: VecDeque<(ArtifactKey, String)> = VecDeque::new();
        let mut visited: HashSet<ArtifactKey> = HashSet::new();
        let mut candidates = Vec::new();
        let mut errors = FailureReport::new();

        enqueue_references(&root, &mut queue);

        while let Some((key, version)) = queue.pop_front() {
            if key == root_key || request.in_progress.contains(&key) {
                continue;
            }
            if !visited.insert(key.clone()) {
                continue;
            }
            if request.cache.contains(&key) {
                debug!(%key, "skipping candidate already satisfied by a previous build");
                continue;
            }

            let pom_path =
                request
                    .local_repository
                    .pom_path(key.group_id(), key.artifact_id(), &version);
            if !pom_path.is_file() {
                debug!(%key, %version, "no installed POM, not a build candidate");
                continue;
            }

            let pom = match load_pom(&pom_path) {
                Ok(pom) => pom,
                Err(e) => {
                    errors.add(format!("{key}:{version}"), e.to_string());
                    continue;
                }
            };

            let mut candidate = self.candidate_from(key, &version, &pom);
            candidate.pom_file = Some(pom_path);
            enqueue_references(&pom, &mut queue);
            candidates.push(candidate);
        }

        if !errors.is_empty() {
            return Err(errors
                .into_resolution_error("While collecting build candidates:")
                .into());
        }
        Ok(candidates)
    }
}

/// Queue a POM's parent and versioned resolvable dependencies for visiting.
fn enqueue_references(pom: &Pom, queue: &mut VecDeque<(ArtifactKey, String)>) {
    if let Some(ref parent) = pom.parent {
        queue.push_back((parent.key(), parent.version.clone()));
    }
    for dep in &pom.dependencies {
        if !dep.is_resolvable() {
            continue;
        }
        match dep.version {
            Some(ref version) => queue.push_back((dep.key(), version.clone())),
            None => debug!(key = %dep.key(), "dependency without version, skipping"),
        }
    }
}
