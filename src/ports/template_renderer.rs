use crate::domain::{AppError, ManifestContext};

/// Trait for rendering templates.
///
/// Keeps the template engine out of the domain layer. Implementations must
/// perform substitution only: no file access, no host callbacks.
pub trait TemplateRenderer {
    /// Render `template` against `context`.
    ///
    /// * `template_name` - A name for the template (for error reporting).
    fn render(
        &self,
        template: &str,
        context: &ManifestContext,
        template_name: &str,
    ) -> Result<String, AppError>;
}
