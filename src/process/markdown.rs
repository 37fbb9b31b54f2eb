//! Markdown interpretation - renders `markdown` content-type nodes.
//!
//! The renderer itself is pluggable; documents carry markup in string
//! nodes and the interpreter swaps the source for the rendered form.

use std::sync::Arc;

use crate::core::RelativePath;
use crate::schema::{ContentType, Schema};
use crate::value::Value;

use super::context::ProcessContext;
use super::error::InterpretError;
use super::walker::Interpreter;

/// Markup-to-output rendering backend.
pub trait MarkupRenderer: Send + Sync {
    fn render(
        &self,
        source: &str,
        file: &RelativePath,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

pub struct MarkdownInterpreter {
    renderer: Arc<dyn MarkupRenderer>,
}

impl MarkdownInterpreter {
    pub fn new(renderer: Arc<dyn MarkupRenderer>) -> Self {
        Self { renderer }
    }
}

impl Interpreter for MarkdownInterpreter {
    fn can_interpret(&self, schema: &Schema) -> bool {
        schema.content_type == ContentType::Markdown
    }

    fn interpret(
        &self,
        _schema: &Schema,
        value: Value,
        ctx: &ProcessContext<'_>,
        path: &str,
    ) -> Result<Value, InterpretError> {
        let source = match &value {
            Value::String(s) => s.as_str(),
            other => {
                return Err(InterpretError::TypeContract {
                    path: path.to_string(),
                    content_type: ContentType::Markdown,
                    actual: other.type_name(),
                });
            }
        };

        match self.renderer.render(source, &ctx.current_file) {
            Ok(rendered) => Ok(Value::String(rendered)),
            Err(err) => Err(InterpretError::Markup {
                file: ctx.current_file.clone(),
                message: err.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::context::BuildContext;

    struct Upper;

    impl MarkupRenderer for Upper {
        fn render(
            &self,
            source: &str,
            _file: &RelativePath,
        ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
            Ok(source.to_uppercase())
        }
    }

    struct Broken;

    impl MarkupRenderer for Broken {
        fn render(
            &self,
            _source: &str,
            _file: &RelativePath,
        ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
            Err("backend offline".into())
        }
    }

    fn ctx(build: &BuildContext) -> ProcessContext<'_> {
        ProcessContext::new(build, RelativePath::try_parse("docs/index.md").unwrap())
    }

    #[test]
    fn test_renders_string_nodes() {
        let interpreter = MarkdownInterpreter::new(Arc::new(Upper));
        let build = BuildContext::without_file_map();

        let out = interpreter
            .interpret(
                &Schema::of(ContentType::Markdown),
                Value::from("hello"),
                &ctx(&build),
                "/body",
            )
            .unwrap();
        assert_eq!(out, Value::from("HELLO"));
    }

    #[test]
    fn test_renderer_failure_is_recoverable() {
        let interpreter = MarkdownInterpreter::new(Arc::new(Broken));
        let build = BuildContext::without_file_map();

        let err = interpreter
            .interpret(
                &Schema::of(ContentType::Markdown),
                Value::from("hello"),
                &ctx(&build),
                "/body",
            )
            .unwrap_err();
        assert!(matches!(err, InterpretError::Markup { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_non_string_value_is_type_contract() {
        let interpreter = MarkdownInterpreter::new(Arc::new(Upper));
        let build = BuildContext::without_file_map();

        let err = interpreter
            .interpret(
                &Schema::of(ContentType::Markdown),
                Value::Bool(true),
                &ctx(&build),
                "/body",
            )
            .unwrap_err();
        assert!(matches!(err, InterpretError::TypeContract { .. }));
    }
}
