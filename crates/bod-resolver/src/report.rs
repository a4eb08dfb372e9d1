//! Aggregated per-project failure reporting.

use std::fmt;

use bod_util::errors::BodError;

/// A report of all project failures encountered during a build loop.
///
/// The loop never aborts on a single failure; every problem lands here and
/// is raised as one aggregate error at the end.
#[derive(Debug, Default)]
pub struct FailureReport {
    failures: Vec<ProjectFailure>,
}

/// One failed project and what went wrong with it.
#[derive(Debug, Clone)]
pub struct ProjectFailure {
    pub id: String,
    pub detail: String,
}

impl FailureReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: impl Into<String>, detail: impl Into<String>) {
        self.failures.push(ProjectFailure {
            id: id.into(),
            detail: detail.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn failures(&self) -> &[ProjectFailure] {
        &self.failures
    }

    /// Collapse the report into a single resolution error under `heading`.
    pub fn into_resolution_error(self, heading: &str) -> BodError {
        BodError::Resolution {
            message: format!("{heading}\n\n{self}"),
        }
    }
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "- {}: {}", failure.id, failure.detail)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report() {
        let report = FailureReport::new();
        assert!(report.is_empty());
        assert_eq!(report.to_string(), "");
    }

    #[test]
    fn report_renders_one_line_per_failure() {
        let mut report = FailureReport::new();
        report.add("g:a:1.0", "exited with code 1");
        report.add("g:b:2.0", "launch failed");
        assert_eq!(report.len(), 2);
        assert_eq!(
            report.to_string(),
            "- g:a:1.0: exited with code 1\n- g:b:2.0: launch failed"
        );
    }

    #[test]
    fn into_resolution_error_carries_heading() {
        let mut report = FailureReport::new();
        report.add("g:a:1.0", "exited with code 1");
        let err = report.into_resolution_error("While building missing dependencies:");
        let message = err.to_string();
        assert!(message.contains("While building missing dependencies:"));
        assert!(message.contains("- g:a:1.0: exited with code 1"));
    }
}
