use std::fmt;

/// Versionless identity of a Maven project: `(group_id, artifact_id)`.
///
/// Used as graph vertex identity and build-cache membership key. The version
/// is deliberately absent: the resolver tracks whether a module has been
/// satisfied in this run, independent of which version was requested.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactKey {
    group_id: String,
    artifact_id: String,
}

impl ArtifactKey {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }

    /// Parse `"group:artifact"` into a key.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(g), Some(a), None) if !g.is_empty() && !a.is_empty() => Some(Self::new(g, a)),
            _ => None,
        }
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}
