use std::fs;
use std::path::PathBuf;

use crate::domain::AppError;
use crate::ports::{TemplateFile, TemplateSource};

/// Loads templates from a directory on disk, re-reading on every call.
#[derive(Debug, Clone)]
pub struct FilesystemTemplateSource {
    root: PathBuf,
}

impl FilesystemTemplateSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Source rooted at the process working directory.
    pub fn current() -> Result<Self, AppError> {
        let cwd = std::env::current_dir()?;
        Ok(Self::new(cwd))
    }

    fn resolve(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl TemplateSource for FilesystemTemplateSource {
    fn load(&self, name: &str) -> Result<TemplateFile, AppError> {
        let path = self.resolve(name);
        let content = fs::read_to_string(&path).map_err(|err| AppError::TemplateLoad {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        Ok(TemplateFile { path: path.display().to_string(), content })
    }
}
