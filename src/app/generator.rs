//! Manifest generation: template load, field derivation, substitution.

use tracing::{debug, info};

use crate::domain::{AppError, Params, derive};
use crate::ports::{TemplateRenderer, TemplateSource};

/// Renders manifests for decoded requests.
///
/// Holds no per-request state; one instance serves every request concurrently.
pub struct ManifestGenerator<S: TemplateSource, R: TemplateRenderer> {
    source: S,
    renderer: R,
    image_tag: String,
}

impl<S: TemplateSource, R: TemplateRenderer> ManifestGenerator<S, R> {
    pub fn new(source: S, renderer: R, image_tag: impl Into<String>) -> Self {
        Self { source, renderer, image_tag: image_tag.into() }
    }

    /// Render `template_name` for `params`.
    ///
    /// The template is read on every call. Nothing is returned on failure.
    pub fn generate(&self, template_name: &str, params: &Params) -> Result<String, AppError> {
        let template = self.source.load(template_name)?;
        let context = derive(params, &self.image_tag)?;
        debug!(
            template = %template.path,
            kube_version = %context.kube_version,
            rbac = context.rbac_auth_version.as_str(),
            image = %context.px_image,
            "derived manifest fields"
        );

        let rendered = self.renderer.render(&template.content, &context, template_name)?;
        info!(template = %template_name, bytes = rendered.len(), "rendered manifest");
        Ok(rendered)
    }
}
