//! Command dispatch and handler modules.

mod order;
mod resolve;

use std::path::{Path, PathBuf};

use bod_maven::repository::LocalRepository;
use bod_util::errors::BodError;
use miette::Result;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Resolve {
            pom,
            mode,
            local_repository,
            work_dir,
            shared_cache,
            goals,
            offline,
            profiles,
        } => resolve::exec(resolve::ResolveArgs {
            pom,
            mode,
            local_repository,
            work_dir,
            shared_cache,
            goals,
            offline,
            profiles,
            verbose: cli.verbose,
        }),
        Command::Order {
            pom,
            local_repository,
        } => order::exec(&pom, local_repository),
    }
}

/// Local repository from an explicit flag or the conventional
/// `~/.m2/repository` location.
pub(crate) fn local_repository(explicit: Option<PathBuf>) -> Result<LocalRepository> {
    if let Some(path) = explicit {
        return Ok(LocalRepository::new(path));
    }
    let home = std::env::var_os("HOME").ok_or_else(|| BodError::Config {
        message: "cannot locate the local repository: HOME is not set \
                  (use --local-repository)"
            .to_string(),
    })?;
    Ok(LocalRepository::new(
        Path::new(&home).join(".m2").join("repository"),
    ))
}
