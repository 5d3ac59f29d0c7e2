mod template_renderer;
mod template_source;

pub use template_renderer::TemplateRenderer;
pub use template_source::{TemplateFile, TemplateSource};
