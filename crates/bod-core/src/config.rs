use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bod_util::errors::{BodError, BodResult};
use serde::Deserialize;

/// Name of the optional project-level configuration file.
pub const CONFIG_FILE_NAME: &str = "Bod.toml";

fn default_goals() -> Vec<String> {
    vec!["install".to_string()]
}

/// How to invoke Maven when a missing dependency must be built from source.
///
/// A prototype configuration is carried on the resolution request; the
/// builder clones it per project and points it at the project's work
/// directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct BuildConfiguration {
    /// Goals to run for each source build.
    #[serde(default = "default_goals")]
    pub goals: Vec<String>,
    /// Directory the build is invoked in. Set per project by the builder.
    #[serde(default)]
    pub base_directory: Option<PathBuf>,
    /// POM file name inside the base directory. Defaults to `pom.xml`.
    #[serde(default)]
    pub pom_file_name: Option<String>,
    /// Pass `-o` to Maven.
    #[serde(default)]
    pub offline: bool,
    /// Pass `-X` to Maven.
    #[serde(default)]
    pub debug: bool,
    /// Profiles activated with `-P`.
    #[serde(default)]
    pub profiles: Vec<String>,
    /// System properties passed as `-Dkey=value`.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl Default for BuildConfiguration {
    fn default() -> Self {
        Self {
            goals: default_goals(),
            base_directory: None,
            pom_file_name: None,
            offline: false,
            debug: false,
            profiles: Vec::new(),
            properties: BTreeMap::new(),
        }
    }
}

impl BuildConfiguration {
    /// Clone of this configuration rooted at `dir`, leaving the prototype
    /// untouched.
    pub fn with_base_directory(&self, dir: impl Into<PathBuf>) -> Self {
        let mut copy = self.clone();
        copy.base_directory = Some(dir.into());
        copy
    }

    /// Effective POM file name inside the base directory.
    pub fn pom_file_name(&self) -> &str {
        self.pom_file_name.as_deref().unwrap_or("pom.xml")
    }
}

/// Declarative POM adjustments applied to a project's POM before building it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PomRewriteConfiguration {
    /// Property values to inject or override.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    /// Modules to keep when rewriting an aggregator POM.
    #[serde(default)]
    pub includes: Vec<String>,
    /// Modules to drop when rewriting an aggregator POM.
    #[serde(default)]
    pub excludes: Vec<String>,
}

impl PomRewriteConfiguration {
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.includes.is_empty() && self.excludes.is_empty()
    }
}

/// Project-level configuration loaded from `Bod.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct BodConfig {
    /// Resolution mode name, overridable from the command line.
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub build: BuildConfiguration,
    #[serde(default)]
    pub rewrite: PomRewriteConfiguration,
}

impl BodConfig {
    pub fn parse_toml(content: &str) -> BodResult<Self> {
        let config: BodConfig = toml::from_str(content).map_err(|e| BodError::Config {
            message: format!("Failed to parse {CONFIG_FILE_NAME}: {e}"),
        })?;
        Ok(config)
    }

    pub fn load(path: &Path) -> BodResult<Self> {
        let content = std::fs::read_to_string(path).map_err(BodError::Io)?;
        Self::parse_toml(&content)
    }
}
