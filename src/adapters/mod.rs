pub mod template;
pub mod template_filesystem;

pub use template::MinijinjaTemplateRenderer;
pub use template_filesystem::FilesystemTemplateSource;
