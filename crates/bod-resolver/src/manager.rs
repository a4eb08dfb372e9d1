//! Resolution manager: end-to-end build-on-demand flow.

use bod_maven::rewrite::{NoopRewriter, PomRewriter};
use bod_util::errors::BodError;
use bod_util::progress::status_info;
use tracing::debug;

use crate::binary::{BinaryAvailabilityChecker, LocalRepositoryBinaryChecker};
use crate::builder::build_dependencies;
use crate::candidates::{DependencyPomResolver, LocalRepoPomResolver};
use crate::graph::order_dependency_projects;
use crate::invoker::{BuildInvoker, MavenInvoker};
use crate::request::ResolutionRequest;

/// Orchestrates one resolution run: discover candidates, order them, drop
/// those satisfied by installed binaries, build the rest, and verify
/// nothing was left unresolved.
pub struct ResolutionManager {
    pom_resolver: Box<dyn DependencyPomResolver>,
    binary_checker: Box<dyn BinaryAvailabilityChecker>,
    rewriter: Box<dyn PomRewriter>,
    invoker: Box<dyn BuildInvoker>,
}

impl ResolutionManager {
    pub fn new(
        pom_resolver: Box<dyn DependencyPomResolver>,
        binary_checker: Box<dyn BinaryAvailabilityChecker>,
        rewriter: Box<dyn PomRewriter>,
        invoker: Box<dyn BuildInvoker>,
    ) -> Self {
        Self {
            pom_resolver,
            binary_checker,
            rewriter,
            invoker,
        }
    }

    /// Resolve the missing dependencies described by `request`.
    pub fn resolve_dependencies(&self, request: &ResolutionRequest) -> miette::Result<()> {
        let candidates = self.pom_resolver.resolve_build_candidates(request)?;
        if candidates.is_empty() {
            debug!("no build candidates, nothing to resolve");
            return Ok(());
        }
        status_info(
            "Resolving",
            &format!(
                "{} candidate project(s), mode {}",
                candidates.len(),
                request.mode
            ),
        );

        // Order the full candidate set first: duplicate keys and cycles are
        // hard errors even among projects a binary would satisfy.
        let ordered = order_dependency_projects(&candidates)?;

        let to_build: Vec<_> = ordered
            .into_iter()
            .filter(|project| {
                if request.mode.allows_binary()
                    && self
                        .binary_checker
                        .has_binary(project, &request.local_repository)
                {
                    debug!(id = %project.id(), "satisfied by installed binary");
                    return false;
                }
                true
            })
            .collect();

        if request.mode.allows_source() && !to_build.is_empty() {
            build_dependencies(
                request,
                &to_build,
                self.rewriter.as_ref(),
                self.invoker.as_ref(),
            )?;
        }

        let leftover: Vec<_> = to_build
            .iter()
            .filter(|project| !request.cache.contains(&project.key))
            .collect();
        if !leftover.is_empty() {
            let noun = if leftover.len() == 1 { "project" } else { "projects" };
            let mut message = format!("Failed to resolve {} {noun}:", leftover.len());
            for project in &leftover {
                message.push_str(&format!("\n- {}", project.id()));
            }
            return Err(BodError::Resolution { message }.into());
        }
        Ok(())
    }
}

impl Default for ResolutionManager {
    fn default() -> Self {
        Self::new(
            Box::new(LocalRepoPomResolver),
            Box::new(LocalRepositoryBinaryChecker),
            Box::new(NoopRewriter),
            Box::new(MavenInvoker::default()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    use bod_core::artifact::ArtifactKey;
    use bod_core::config::BuildConfiguration;
    use bod_core::project::CandidateProject;
    use bod_maven::repository::LocalRepository;

    use crate::invoker::InvocationResult;
    use crate::request::ResolutionMode;

    struct FixedResolver {
        candidates: Vec<CandidateProject>,
    }

    impl DependencyPomResolver for FixedResolver {
        fn resolve_build_candidates(
            &self,
            request: &ResolutionRequest,
        ) -> miette::Result<Vec<CandidateProject>> {
            Ok(self
                .candidates
                .iter()
                .filter(|c| !request.cache.contains(&c.key))
                .cloned()
                .collect())
        }
    }

    struct SetChecker {
        with_binary: HashSet<ArtifactKey>,
    }

    impl BinaryAvailabilityChecker for SetChecker {
        fn has_binary(&self, project: &CandidateProject, _repository: &LocalRepository) -> bool {
            self.with_binary.contains(&project.key)
        }
    }

    #[derive(Clone, Default)]
    struct RecordingInvoker {
        invoked: Arc<Mutex<Vec<PathBuf>>>,
        fail_dirs_containing: Vec<String>,
    }

    impl RecordingInvoker {
        fn new() -> Self {
            Self::default()
        }

        fn failing_on(dir_fragment: &str) -> Self {
            Self {
                invoked: Arc::default(),
                fail_dirs_containing: vec![dir_fragment.to_string()],
            }
        }

        fn invocations(&self) -> Vec<String> {
            self.invoked
                .lock()
                .unwrap()
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect()
        }
    }

    impl BuildInvoker for RecordingInvoker {
        fn invoke(&self, config: &BuildConfiguration) -> InvocationResult {
            let dir = config.base_directory.clone().unwrap();
            self.invoked.lock().unwrap().push(dir.clone());
            let name = dir.to_string_lossy().to_string();
            if self
                .fail_dirs_containing
                .iter()
                .any(|s| name.contains(s.as_str()))
            {
                return InvocationResult::exited(1);
            }
            InvocationResult::exited(0)
        }
    }

    fn candidate(tmp: &Path, artifact: &str, deps: &[&str]) -> CandidateProject {
        let pom = tmp.join(format!("{artifact}.pom"));
        std::fs::write(&pom, "<project/>").unwrap();
        let mut p = CandidateProject::new(ArtifactKey::new("g", artifact), "1.0");
        p.pom_file = Some(pom);
        p.dependencies = deps.iter().map(|d| ArtifactKey::new("g", *d)).collect();
        p
    }

    fn manager_with(
        candidates: Vec<CandidateProject>,
        with_binary: &[&str],
        invoker: RecordingInvoker,
    ) -> ResolutionManager {
        ResolutionManager::new(
            Box::new(FixedResolver { candidates }),
            Box::new(SetChecker {
                with_binary: with_binary
                    .iter()
                    .map(|a| ArtifactKey::new("g", *a))
                    .collect(),
            }),
            Box::new(NoopRewriter),
            Box::new(invoker),
        )
    }

    struct Fixture {
        tmp: tempfile::TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                tmp: tempfile::tempdir().unwrap(),
            }
        }

        fn request(&self, mode: ResolutionMode) -> ResolutionRequest {
            let mut request = ResolutionRequest::new(
                self.tmp.path().join("pom.xml"),
                LocalRepository::new(self.tmp.path().join("repository")),
                self.tmp.path().join("work"),
            );
            request.mode = mode;
            request
        }
    }

    #[test]
    fn no_candidates_is_a_no_op() {
        let fixture = Fixture::new();
        let invoker = RecordingInvoker::new();
        let manager = manager_with(Vec::new(), &[], invoker.clone());
        let request = fixture.request(ResolutionMode::BuildOnDemand);

        manager.resolve_dependencies(&request).unwrap();
        assert!(invoker.invocations().is_empty());
    }

    #[test]
    fn binaries_satisfy_candidates_in_build_on_demand_mode() {
        let fixture = Fixture::new();
        let candidates = vec![
            candidate(fixture.tmp.path(), "a", &[]),
            candidate(fixture.tmp.path(), "b", &[]),
        ];
        let invoker = RecordingInvoker::new();
        let manager = manager_with(candidates, &["a"], invoker.clone());
        let request = fixture.request(ResolutionMode::BuildOnDemand);

        manager.resolve_dependencies(&request).unwrap();

        let invoked = invoker.invocations();
        assert_eq!(invoked.len(), 1);
        assert!(invoked[0].contains("b-1.0"));
    }

    #[test]
    fn binary_only_mode_never_builds() {
        let fixture = Fixture::new();
        let candidates = vec![
            candidate(fixture.tmp.path(), "a", &[]),
            candidate(fixture.tmp.path(), "b", &[]),
        ];
        let invoker = RecordingInvoker::new();
        let manager = manager_with(candidates, &["a"], invoker.clone());
        let request = fixture.request(ResolutionMode::BinaryOnly);

        let err = manager.resolve_dependencies(&request).unwrap_err();

        assert!(invoker.invocations().is_empty());
        let message = err.to_string();
        assert!(message.contains("Failed to resolve 1 project:"));
        assert!(message.contains("- g:b:1.0"));
    }

    #[test]
    fn leftover_heading_pluralizes() {
        let fixture = Fixture::new();
        let candidates = vec![
            candidate(fixture.tmp.path(), "a", &[]),
            candidate(fixture.tmp.path(), "b", &[]),
        ];
        let manager = manager_with(candidates, &[], RecordingInvoker::new());
        let request = fixture.request(ResolutionMode::BinaryOnly);

        let err = manager.resolve_dependencies(&request).unwrap_err();
        assert!(err.to_string().contains("Failed to resolve 2 projects:"));
    }

    #[test]
    fn binary_only_mode_succeeds_when_everything_is_installed() {
        let fixture = Fixture::new();
        let candidates = vec![candidate(fixture.tmp.path(), "a", &[])];
        let invoker = RecordingInvoker::new();
        let manager = manager_with(candidates, &["a"], invoker.clone());
        let request = fixture.request(ResolutionMode::BinaryOnly);

        manager.resolve_dependencies(&request).unwrap();
        assert!(invoker.invocations().is_empty());
    }

    #[test]
    fn source_only_mode_ignores_installed_binaries() {
        let fixture = Fixture::new();
        let candidates = vec![
            candidate(fixture.tmp.path(), "a", &[]),
            candidate(fixture.tmp.path(), "b", &[]),
        ];
        let invoker = RecordingInvoker::new();
        let manager = manager_with(candidates, &["a", "b"], invoker.clone());
        let request = fixture.request(ResolutionMode::SourceOnly);

        manager.resolve_dependencies(&request).unwrap();
        assert_eq!(invoker.invocations().len(), 2);
    }

    #[test]
    fn builds_run_in_dependency_order() {
        let fixture = Fixture::new();
        // app depends on lib depends on util, declared out of order
        let candidates = vec![
            candidate(fixture.tmp.path(), "app", &["lib"]),
            candidate(fixture.tmp.path(), "lib", &["util"]),
            candidate(fixture.tmp.path(), "util", &[]),
        ];
        let invoker = RecordingInvoker::new();
        let manager = manager_with(candidates, &[], invoker.clone());
        let request = fixture.request(ResolutionMode::BuildOnDemand);

        manager.resolve_dependencies(&request).unwrap();

        let invoked = invoker.invocations();
        let pos = |needle: &str| invoked.iter().position(|d| d.contains(needle)).unwrap();
        assert!(pos("util-1.0") < pos("lib-1.0"));
        assert!(pos("lib-1.0") < pos("app-1.0"));
    }

    #[test]
    fn build_failures_propagate_as_aggregate_error() {
        let fixture = Fixture::new();
        let candidates = vec![
            candidate(fixture.tmp.path(), "a", &[]),
            candidate(fixture.tmp.path(), "b", &[]),
        ];
        let invoker = RecordingInvoker::failing_on("a-1.0");
        let manager = manager_with(candidates, &[], invoker.clone());
        let request = fixture.request(ResolutionMode::BuildOnDemand);

        let err = manager.resolve_dependencies(&request).unwrap_err();

        // both were attempted, the failure is aggregated afterwards
        assert_eq!(invoker.invocations().len(), 2);
        let message = err.to_string();
        assert!(message.contains("While building missing dependencies:"));
        assert!(message.contains("g:a:1.0"));
    }

    #[test]
    fn second_run_with_same_cache_rebuilds_nothing() {
        let fixture = Fixture::new();
        let candidates = vec![candidate(fixture.tmp.path(), "a", &[])];
        let invoker = RecordingInvoker::new();
        let manager = manager_with(candidates, &[], invoker.clone());
        let request = fixture.request(ResolutionMode::BuildOnDemand);

        manager.resolve_dependencies(&request).unwrap();
        manager.resolve_dependencies(&request).unwrap();
        assert_eq!(invoker.invocations().len(), 1);
    }

    #[test]
    fn duplicate_candidates_fail_before_any_build() {
        let fixture = Fixture::new();
        let mut dup = candidate(fixture.tmp.path(), "a", &[]);
        dup.version = "2.0".to_string();
        let candidates = vec![candidate(fixture.tmp.path(), "a", &[]), dup];
        let invoker = RecordingInvoker::new();
        let manager = manager_with(candidates, &[], invoker.clone());
        let request = fixture.request(ResolutionMode::BuildOnDemand);

        let err = manager.resolve_dependencies(&request).unwrap_err();
        assert!(invoker.invocations().is_empty());
        assert!(err.to_string().contains("'g:a' is duplicated"));
    }

    #[test]
    fn end_to_end_build_on_demand_scenario() {
        // A has no deps, B depends on A, no binaries installed: build
        // sequence is [A, B], cache ends with both, no error.
        let fixture = Fixture::new();
        let candidates = vec![
            candidate(fixture.tmp.path(), "b", &["a"]),
            candidate(fixture.tmp.path(), "a", &[]),
        ];
        let invoker = RecordingInvoker::new();
        let manager = manager_with(candidates, &[], invoker.clone());
        let request = fixture.request(ResolutionMode::BuildOnDemand);

        manager.resolve_dependencies(&request).unwrap();

        let invoked = invoker.invocations();
        assert_eq!(invoked.len(), 2);
        assert!(invoked[0].contains("a-1.0"));
        assert!(invoked[1].contains("b-1.0"));
        assert!(request.cache.contains(&ArtifactKey::new("g", "a")));
        assert!(request.cache.contains(&ArtifactKey::new("g", "b")));
    }
}
