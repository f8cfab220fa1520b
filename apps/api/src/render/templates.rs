use std::io::ErrorKind;
use std::path::PathBuf;

use handlebars::Handlebars;
use serde::Serialize;

use crate::render::{DocType, RenderError};

/// Renders `<root>/<template_id>/<resume|cover>.hbs` against a JSON context.
///
/// Templates are read from disk on every call. Double-stash expressions are
/// HTML-escaped; a template opts into raw output with `{{{ ... }}}`.
pub struct TemplateRenderer {
    root: PathBuf,
    engine: Handlebars<'static>,
}

impl TemplateRenderer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            engine: Handlebars::new(),
        }
    }

    pub fn template_path(&self, template_id: &str, doc_type: DocType) -> PathBuf {
        self.root
            .join(template_id)
            .join(format!("{}.hbs", doc_type.template_name()))
    }

    pub async fn render<C: Serialize>(
        &self,
        template_id: &str,
        doc_type: DocType,
        context: &C,
    ) -> Result<String, RenderError> {
        let path = self.template_path(template_id, doc_type);
        let source = match tokio::fs::read_to_string(&path).await {
            Ok(source) => source,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(RenderError::TemplateNotFound {
                    template_id: template_id.to_string(),
                    name: doc_type.template_name().to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        };
        Ok(self.engine.render_template(&source, context)?)
    }
}
