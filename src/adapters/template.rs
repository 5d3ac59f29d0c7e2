use minijinja::{AutoEscape, Environment, UndefinedBehavior};

use crate::domain::{AppError, ManifestContext};
use crate::ports::TemplateRenderer;

/// Template renderer using Minijinja.
///
/// The environment has no loader and no custom functions, so templates can
/// only read the context they are given.
#[derive(Debug, Default, Clone, Copy)]
pub struct MinijinjaTemplateRenderer;

impl MinijinjaTemplateRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateRenderer for MinijinjaTemplateRenderer {
    fn render(
        &self,
        template: &str,
        context: &ManifestContext,
        template_name: &str,
    ) -> Result<String, AppError> {
        let env = environment();
        let compiled = env.template_from_named_str(template_name, template).map_err(|err| {
            AppError::TemplateLoad { path: template_name.to_string(), reason: err.to_string() }
        })?;

        compiled.render(context).map_err(|err| AppError::Substitution {
            template: template_name.to_string(),
            reason: err.to_string(),
        })
    }
}

fn environment<'source>() -> Environment<'source> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_keep_trailing_newline(true);
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env
}
