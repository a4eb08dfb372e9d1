use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all bod operations.
#[derive(Debug, Error, Diagnostic)]
pub enum BodError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unrecognized resolution mode string.
    #[error("Invalid build-on-demand resolution mode: '{mode}' (must be one of: 'build-on-demand', 'binary-only', 'source-only')")]
    #[diagnostic(help("Check the --mode flag or the mode setting in Bod.toml"))]
    InvalidMode { mode: String },

    /// Two build candidates share the same versionless key.
    ///
    /// Usually the result of version-range resolution producing more than
    /// one version of the same project; there is no safe way to pick one.
    #[error("Project '{key}' is duplicated in build-candidate set")]
    DuplicateProject { key: String },

    /// A genuine dependency cycle among build candidates.
    #[error("Cycle detected with dependency: {dependency} of project: {project}\n\nCycle: {}", cycle.join(" -> "))]
    CycleDetected {
        project: String,
        dependency: String,
        cycle: Vec<String>,
    },

    /// A cycle surfaced where the construction rules make one impossible.
    /// Signals a defect in the graph builder, not bad user data.
    #[error("Internal invariant violated: {message}")]
    InternalInvariant { message: String },

    /// POM file could not be read or parsed.
    #[error("POM error: {message}")]
    Pom { message: String },

    /// Malformed `Bod.toml`.
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Check the syntax of Bod.toml"))]
    Config { message: String },

    /// The external build tool could not be launched at all.
    #[error("Build invocation failed: {message}")]
    Invocation { message: String },

    /// One or more candidate projects remained unsatisfied, or their
    /// builds failed. Carries the aggregated, pre-formatted report.
    #[error("Dependency resolution failed: {message}")]
    Resolution { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type BodResult<T> = miette::Result<T>;
