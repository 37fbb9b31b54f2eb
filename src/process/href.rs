//! Href interpretation - link recording and output-relative rewriting.
//!
//! Runs on every node whose schema declares the `href` content type;
//! the type contract, reference validation and live-host stripping
//! always apply. Two orthogonal switches add to that: link export
//! appends a [`LinkSourceInfo`] record for each resolvable file link,
//! value updating rewrites the link text so it stays valid from the
//! file's final output location.

use crate::core::{LinkSourceInfo, RelativePath, uri};
use crate::schema::{ContentType, Schema};
use crate::value::Value;

use super::context::ProcessContext;
use super::error::InterpretError;
use super::walker::Interpreter;

pub struct HrefInterpreter {
    export_file_link: bool,
    update_value: bool,
    live_site_host_name: Option<String>,
}

impl HrefInterpreter {
    pub fn new(export_file_link: bool, update_value: bool) -> Self {
        Self {
            export_file_link,
            update_value,
            live_site_host_name: None,
        }
    }

    /// Treat absolute links on this host as links into the site itself.
    pub fn with_live_site_host_name(mut self, host: impl Into<String>) -> Self {
        self.live_site_host_name = Some(host.into());
        self
    }
}

impl Interpreter for HrefInterpreter {
    fn can_interpret(&self, schema: &Schema) -> bool {
        schema.content_type == ContentType::Href
    }

    fn interpret(
        &self,
        _schema: &Schema,
        value: Value,
        ctx: &ProcessContext<'_>,
        path: &str,
    ) -> Result<Value, InterpretError> {
        let raw = match &value {
            Value::String(s) => s.as_str(),
            other => {
                return Err(InterpretError::TypeContract {
                    path: path.to_string(),
                    content_type: ContentType::Href,
                    actual: other.type_name(),
                });
            }
        };

        // Scheme-ful and rooted links may point back into the site via
        // the configured live hostname; anything else stays untouched.
        if uri::is_absolute(raw) || raw.starts_with('/') {
            let stripped = uri::remove_host_name(raw, self.live_site_host_name.as_deref());
            return Ok(Value::String(stripped));
        }

        if !uri::is_valid_reference(raw) {
            return Err(InterpretError::InvalidHref {
                value: raw.to_string(),
                file: ctx.current_file.clone(),
            });
        }

        let file_path = uri::path_of(raw);
        let suffix = uri::query_and_fragment(raw);

        // Fragment-only and query-only links have no file component
        let Some(rel) = RelativePath::try_parse(file_path) else {
            return Ok(value);
        };
        let resolved = rel.url_decode().resolve_from(&ctx.current_file);

        if self.export_file_link {
            ctx.build.add_link_source(LinkSourceInfo {
                target: resolved.clone(),
                anchor: uri::fragment_of(raw).map(str::to_owned),
                source_file: ctx.current_file.clone(),
            });
        }

        if self.update_value && ctx.build.has_file_map() {
            if let (Some(target_out), Some(current_out)) = (
                ctx.build.output_for(&resolved),
                ctx.build.output_for(&ctx.current_file),
            ) {
                let rewritten = target_out.make_relative_to(current_out);
                return Ok(Value::String(format!("{}{suffix}", rewritten.encoded())));
            }
        }

        Ok(value)
    }
}
