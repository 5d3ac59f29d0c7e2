use std::collections::HashMap;

use crate::domain::AppError;
use crate::ports::{TemplateFile, TemplateSource};

/// In-memory template source for testing.
#[derive(Default)]
pub struct MemoryTemplateSource {
    templates: HashMap<String, String>,
}

impl MemoryTemplateSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, name: &str, content: &str) -> Self {
        self.templates.insert(name.to_string(), content.to_string());
        self
    }
}

impl TemplateSource for MemoryTemplateSource {
    fn load(&self, name: &str) -> Result<TemplateFile, AppError> {
        self.templates
            .get(name)
            .map(|content| TemplateFile { path: name.to_string(), content: content.clone() })
            .ok_or_else(|| AppError::TemplateLoad {
                path: name.to_string(),
                reason: "not found".to_string(),
            })
    }
}
