//! `bod resolve`: end-to-end build-on-demand resolution.

use std::path::{Path, PathBuf};

use bod_core::config::{BodConfig, CONFIG_FILE_NAME};
use bod_resolver::{BuildCache, ResolutionManager, ResolutionMode, ResolutionRequest};
use bod_util::fs::find_ancestor_with;
use bod_util::progress::status;
use miette::Result;
use tracing::debug;

pub struct ResolveArgs {
    pub pom: PathBuf,
    pub mode: Option<String>,
    pub local_repository: Option<PathBuf>,
    pub work_dir: Option<PathBuf>,
    pub shared_cache: bool,
    pub goals: Vec<String>,
    pub offline: bool,
    pub profiles: Vec<String>,
    pub verbose: bool,
}

pub fn exec(args: ResolveArgs) -> Result<()> {
    let config = load_config(&args.pom)?;

    // Fail fast on a bad mode, before touching any POM.
    let mode_name = args.mode.as_deref().or(config.mode.as_deref());
    let mode = match mode_name {
        Some(name) => ResolutionMode::parse(name)?,
        None => ResolutionMode::default(),
    };

    let work_dir = work_directory(&args);
    let repository = super::local_repository(args.local_repository.clone())?;
    let mut request = ResolutionRequest::new(args.pom.clone(), repository, work_dir);
    request.mode = mode;
    request.build_prototype = config.build.clone();
    request.rewrite = config.rewrite.clone();
    if !args.goals.is_empty() {
        request.build_prototype.goals = args.goals.clone();
    }
    if args.offline {
        request.build_prototype.offline = true;
    }
    if args.verbose {
        request.build_prototype.debug = true;
    }
    if !args.profiles.is_empty() {
        request.build_prototype.profiles = args.profiles.clone();
    }
    if args.shared_cache {
        request.cache = BuildCache::shared();
    }

    let manager = ResolutionManager::default();
    manager.resolve_dependencies(&request)?;

    status("Resolved", &format!("{} project(s) built", request.cache.len()));
    Ok(())
}

/// Load `Bod.toml` from the POM's directory or any ancestor.
fn load_config(pom: &Path) -> Result<BodConfig> {
    let start = pom.parent().unwrap_or(Path::new("."));
    match find_ancestor_with(start, CONFIG_FILE_NAME) {
        Some(dir) => BodConfig::load(&dir.join(CONFIG_FILE_NAME)),
        None => {
            debug!("no {CONFIG_FILE_NAME} found, using defaults");
            Ok(BodConfig::default())
        }
    }
}

fn work_directory(args: &ResolveArgs) -> PathBuf {
    match args.work_dir {
        Some(ref dir) => dir.clone(),
        None => args
            .pom
            .parent()
            .unwrap_or(Path::new("."))
            .join("target")
            .join("bod"),
    }
}
