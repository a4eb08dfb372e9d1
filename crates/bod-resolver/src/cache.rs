//! Build cache tracking which projects have already been built.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use bod_core::artifact::ArtifactKey;

static SHARED: OnceLock<Arc<BuildCache>> = OnceLock::new();

/// Set of versionless keys whose projects have been built in this run.
///
/// Callers choose the scope: [`BuildCache::request_scoped`] isolates one
/// resolution, [`BuildCache::shared`] hands out a process-wide singleton so
/// concurrent resolutions never rebuild the same project.
#[derive(Debug, Default)]
pub struct BuildCache {
    entries: Mutex<HashSet<ArtifactKey>>,
}

impl BuildCache {
    /// A fresh cache private to one resolution request.
    pub fn request_scoped() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The process-wide cache, created lazily on first use.
    pub fn shared() -> Arc<Self> {
        Arc::clone(SHARED.get_or_init(|| Arc::new(Self::default())))
    }

    fn entries(&self) -> MutexGuard<'_, HashSet<ArtifactKey>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record a completed build. Returns `false` if the key was already
    /// present.
    pub fn insert(&self, key: ArtifactKey) -> bool {
        self.entries().insert(key)
    }

    pub fn contains(&self, key: &ArtifactKey) -> bool {
        self.entries().contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}
