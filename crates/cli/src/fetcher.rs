//! Resolves deferred script locations against a built site directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use searchlight_core::error::LoadError;
use searchlight_core::loader::ScriptFetcher;
use searchlight_core::types::Dependency;
use tracing::debug;

pub struct FsScriptFetcher {
    site_root: PathBuf,
}

impl FsScriptFetcher {
    pub fn new(site_root: PathBuf) -> Self {
        Self { site_root }
    }

    pub fn resolve(&self, location: &str) -> PathBuf {
        self.site_root.join(location.trim_start_matches('/'))
    }
}

async fn check_script(path: &Path) -> Result<u64, String> {
    let meta = tokio::fs::metadata(path).await.map_err(|e| format!("{}: {e}", path.display()))?;
    if !meta.is_file() {
        return Err(format!("{} is not a file", path.display()));
    }
    if meta.len() == 0 {
        return Err(format!("{} is empty", path.display()));
    }
    Ok(meta.len())
}

#[async_trait]
impl ScriptFetcher for FsScriptFetcher {
    async fn fetch(&self, dependency: Dependency) -> Result<(), LoadError> {
        let path = self.resolve(dependency.location());
        let bytes = check_script(&path).await.map_err(|reason| LoadError::new(dependency, reason))?;
        debug!(%dependency, path = %path.display(), bytes, "Script available");
        Ok(())
    }
}
