//! Service configuration loaded from an optional TOML file.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::AppError;

/// Image tag compiled into the binary; set `PX_IMAGE_TAG` at build time to override.
pub const DEFAULT_IMAGE_TAG: &str = match option_env!("PX_IMAGE_TAG") {
    Some(tag) => tag,
    None => "1.2.11.10",
};

/// Startup configuration for the manifest service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Address the HTTP listener binds to.
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,
    /// Reject requests carrying unrecognized parameters.
    #[serde(default)]
    pub strict: bool,
    /// Directory templates and the form are resolved against; defaults to the working directory.
    #[serde(default)]
    pub root: Option<PathBuf>,
    /// Manifest template, relative to `root`.
    #[serde(default = "default_template")]
    pub template: String,
    /// HTML form served on empty requests, relative to `root`.
    #[serde(default = "default_form")]
    pub form: String,
    /// Tag appended to the selected Portworx image.
    #[serde(default = "default_image_tag")]
    pub image_tag: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            strict: false,
            root: None,
            template: default_template(),
            form: default_form(),
            image_tag: default_image_tag(),
        }
    }
}

impl ServiceConfig {
    /// Read and validate a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).map_err(|err| {
            AppError::config_error(format!("Failed to read config {}: {}", path.display(), err))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, AppError> {
        let config: ServiceConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.template.trim().is_empty() {
            return Err(AppError::config_error("template must not be empty"));
        }
        if self.form.trim().is_empty() {
            return Err(AppError::config_error("form must not be empty"));
        }
        if self.image_tag.is_empty() || self.image_tag.contains(char::is_whitespace) {
            return Err(AppError::config_error(format!(
                "image_tag must be a non-empty tag without whitespace, got {:?}",
                self.image_tag
            )));
        }
        Ok(())
    }

    /// Directory templates are resolved against.
    pub fn resolve_root(&self) -> Result<PathBuf, AppError> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_template() -> String {
    "assets/etcd.yaml.j2".to_string()
}

fn default_form() -> String {
    "assets/form.html".to_string()
}

fn default_image_tag() -> String {
    DEFAULT_IMAGE_TAG.to_string()
}
