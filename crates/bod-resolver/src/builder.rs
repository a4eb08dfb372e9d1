//! Source build loop over ordered candidate projects.

use std::path::PathBuf;

use bod_core::project::CandidateProject;
use bod_maven::rewrite::PomRewriter;
use bod_util::fs::ensure_dir;
use bod_util::progress::status;
use tracing::debug;

use crate::invoker::BuildInvoker;
use crate::report::FailureReport;
use crate::request::ResolutionRequest;

/// Build each project in order, recording completions in the request's
/// cache.
///
/// One project failing never stops the loop; later projects may still
/// build successfully, and everything that went wrong is raised as a
/// single aggregate error afterwards.
pub fn build_dependencies(
    request: &ResolutionRequest,
    projects: &[CandidateProject],
    rewriter: &dyn PomRewriter,
    invoker: &dyn BuildInvoker,
) -> miette::Result<()> {
    let mut report = FailureReport::new();

    for project in projects {
        if request.cache.contains(&project.key) {
            debug!(key = %project.key, "already built, skipping");
            continue;
        }

        status("Building", &project.id());
        match build_one(request, project, rewriter, invoker) {
            Ok(()) => {
                request.cache.insert(project.key.clone());
            }
            Err(detail) => report.add(project.id(), detail),
        }
    }

    if !report.is_empty() {
        return Err(report
            .into_resolution_error("While building missing dependencies:")
            .into());
    }
    Ok(())
}

/// Stage and build one project. Returns a failure detail on any problem.
fn build_one(
    request: &ResolutionRequest,
    project: &CandidateProject,
    rewriter: &dyn PomRewriter,
    invoker: &dyn BuildInvoker,
) -> Result<(), String> {
    let Some(ref pom_source) = project.pom_file else {
        return Err("no POM available to build from".to_string());
    };

    let work_dir = work_directory(request, project);
    ensure_dir(&work_dir)
        .map_err(|e| format!("failed to create work directory {}: {e}", work_dir.display()))?;

    let pom_target = work_dir.join(request.build_prototype.pom_file_name());
    std::fs::copy(pom_source, &pom_target)
        .map_err(|e| format!("failed to stage POM into {}: {e}", work_dir.display()))?;

    let mut rewrite_errors = Vec::new();
    rewriter.rewrite_on_disk(&pom_target, &request.rewrite, &mut rewrite_errors);
    if !rewrite_errors.is_empty() {
        return Err(format!("POM rewrite failed: {}", rewrite_errors.join("; ")));
    }

    let config = request.build_prototype.with_base_directory(&work_dir);
    let result = invoker.invoke(&config);
    if let Some(error) = result.execution_error {
        return Err(format!("failed to launch build: {error}"));
    }
    if result.exit_code != 0 {
        return Err(format!("build exited with code {}", result.exit_code));
    }
    Ok(())
}

/// Per-project work directory: `<work>/<artifactId>-<version>`.
fn work_directory(request: &ResolutionRequest, project: &CandidateProject) -> PathBuf {
    request
        .work_directory
        .join(format!("{}-{}", project.key.artifact_id(), project.version))
}
