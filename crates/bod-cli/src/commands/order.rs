//! `bod order`: print the build order without building anything.

use std::path::{Path, PathBuf};

use bod_resolver::candidates::{DependencyPomResolver, LocalRepoPomResolver};
use bod_resolver::graph::order_dependency_projects;
use bod_resolver::ResolutionRequest;
use bod_util::progress::status_info;
use miette::Result;

pub fn exec(pom: &Path, local_repository: Option<PathBuf>) -> Result<()> {
    let repository = super::local_repository(local_repository)?;
    let work_dir = pom.parent().unwrap_or(Path::new(".")).join("target").join("bod");
    let request = ResolutionRequest::new(pom, repository, work_dir);

    let candidates = LocalRepoPomResolver.resolve_build_candidates(&request)?;
    if candidates.is_empty() {
        status_info("Order", "no missing dependency projects");
        return Ok(());
    }

    let ordered = order_dependency_projects(&candidates)?;
    status_info("Order", &format!("{} project(s)", ordered.len()));
    for (i, project) in ordered.iter().enumerate() {
        println!("{}. {}", i + 1, project.id());
    }
    Ok(())
}
