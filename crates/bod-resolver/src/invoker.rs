//! Out-of-process Maven invocation.

use bod_core::config::BuildConfiguration;
use bod_util::process::CommandBuilder;
use tracing::debug;

/// Outcome of one build invocation.
///
/// `execution_error` is set when the build tool could not be launched at
/// all; a build that ran but failed reports only through `exit_code`.
#[derive(Debug, Clone)]
pub struct InvocationResult {
    pub execution_error: Option<String>,
    pub exit_code: i32,
}

impl InvocationResult {
    pub fn launch_failure(message: impl Into<String>) -> Self {
        Self {
            execution_error: Some(message.into()),
            exit_code: -1,
        }
    }

    pub fn exited(code: i32) -> Self {
        Self {
            execution_error: None,
            exit_code: code,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.execution_error.is_none() && self.exit_code == 0
    }
}

/// Runs a build for one project work directory.
pub trait BuildInvoker {
    fn invoke(&self, config: &BuildConfiguration) -> InvocationResult;
}

/// Invoker that shells out to the Maven CLI.
#[derive(Debug)]
pub struct MavenInvoker {
    executable: String,
}

impl MavenInvoker {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Command-line arguments for a configuration, goals last.
    fn arguments(config: &BuildConfiguration) -> Vec<String> {
        let mut args = vec!["-B".to_string()];
        if let Some(ref dir) = config.base_directory {
            args.push("-f".to_string());
            args.push(dir.join(config.pom_file_name()).to_string_lossy().into_owned());
        }
        if config.offline {
            args.push("-o".to_string());
        }
        if config.debug {
            args.push("-X".to_string());
        }
        if !config.profiles.is_empty() {
            args.push(format!("-P{}", config.profiles.join(",")));
        }
        for (k, v) in &config.properties {
            args.push(format!("-D{k}={v}"));
        }
        args.extend(config.goals.iter().cloned());
        args
    }
}

impl Default for MavenInvoker {
    fn default() -> Self {
        Self::new("mvn")
    }
}

impl BuildInvoker for MavenInvoker {
    fn invoke(&self, config: &BuildConfiguration) -> InvocationResult {
        let Some(ref base_dir) = config.base_directory else {
            return InvocationResult::launch_failure("no base directory configured");
        };

        let command = CommandBuilder::new(&self.executable)
            .args(Self::arguments(config))
            .cwd(base_dir.to_string_lossy());

        match command.exec() {
            Ok(output) => {
                let code = output.status.code().unwrap_or(-1);
                if code != 0 {
                    debug!(
                        exit_code = code,
                        stderr = %String::from_utf8_lossy(&output.stderr),
                        "build exited with failure"
                    );
                }
                InvocationResult::exited(code)
            }
            Err(e) => InvocationResult::launch_failure(e.to_string()),
        }
    }
}
