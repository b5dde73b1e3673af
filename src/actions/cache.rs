use std::collections::BTreeSet;
use std::sync::Mutex;

use tracing::info;

/// Marks rendered pages as stale so they are rebuilt on next view
pub trait CacheInvalidator: Send + Sync {
    fn revalidate_path(&self, path: &str);
}

/// In-process record of invalidated paths
#[derive(Debug, Default)]
pub struct StalePaths {
    paths: Mutex<BTreeSet<String>>,
}

impl StalePaths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain the stale set, returning paths in sorted order
    pub fn take_stale(&self) -> Vec<String> {
        let mut paths = self.paths.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *paths).into_iter().collect()
    }
}

impl CacheInvalidator for StalePaths {
    fn revalidate_path(&self, path: &str) {
        info!(path, "revalidating cached path");
        self.paths
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.to_string());
    }
}
