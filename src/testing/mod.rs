mod memory_template_source;

pub use memory_template_source::MemoryTemplateSource;
