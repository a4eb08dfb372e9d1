//! CLI argument definitions for bod.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "bod",
    version,
    about = "Build missing Maven dependencies on demand",
    long_about = "Bod resolves the missing dependencies of a Maven project: it finds \
                  dependency projects whose binaries are not installed, orders them so \
                  that dependencies and parent POMs come first, and builds them from \
                  the POMs in the local repository."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve missing dependencies, building them where needed
    Resolve {
        /// Path to the project POM
        #[arg(long, default_value = "pom.xml")]
        pom: PathBuf,
        /// Resolution mode: build-on-demand, binary-only, source-only
        #[arg(short, long)]
        mode: Option<String>,
        /// Local Maven repository (defaults to ~/.m2/repository)
        #[arg(long)]
        local_repository: Option<PathBuf>,
        /// Directory for per-project build staging
        #[arg(long)]
        work_dir: Option<PathBuf>,
        /// Share the build cache with other resolutions in this process
        #[arg(long)]
        shared_cache: bool,
        /// Maven goal to run per build (repeatable, overrides Bod.toml)
        #[arg(long = "goal")]
        goals: Vec<String>,
        /// Run builds offline
        #[arg(long)]
        offline: bool,
        /// Maven profile to activate per build (repeatable)
        #[arg(long = "profile")]
        profiles: Vec<String>,
    },

    /// Print the build order of missing dependencies without building
    Order {
        /// Path to the project POM
        #[arg(long, default_value = "pom.xml")]
        pom: PathBuf,
        /// Local Maven repository (defaults to ~/.m2/repository)
        #[arg(long)]
        local_repository: Option<PathBuf>,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
