use crate::domain::AppError;

/// A template loaded from a [`TemplateSource`].
#[derive(Debug, Clone)]
pub struct TemplateFile {
    /// Resolved location, used in error messages.
    pub path: String,
    /// Template text as UTF-8.
    pub content: String,
}

/// Port for locating manifest templates by name.
pub trait TemplateSource {
    /// Load the template called `name`.
    ///
    /// Fails with [`AppError::TemplateLoad`] when it is missing or unreadable.
    fn load(&self, name: &str) -> Result<TemplateFile, AppError>;
}
