//! Interpreter dispatch - walks a value graph against its schema.
//!
//! Interpreters are tried in registration order; the first whose
//! predicate accepts the node runs, and at most one interpreter runs
//! per node per pass. Layered transforms are separate passes with
//! different interpreter sets, never chaining within one pass.

use rustc_hash::FxHashMap;
use tracing::error;

use crate::schema::Schema;
use crate::value::Value;

use super::context::{DocumentError, ProcessContext};
use super::error::InterpretError;

/// A polymorphic per-node transformation.
pub trait Interpreter: Send + Sync {
    /// Whether this interpreter handles nodes with the given schema.
    fn can_interpret(&self, schema: &Schema) -> bool;

    /// Transform the node's value. `path` locates the node within the
    /// document, for diagnostics.
    fn interpret(
        &self,
        schema: &Schema,
        value: Value,
        ctx: &ProcessContext<'_>,
        path: &str,
    ) -> Result<Value, InterpretError>;
}

/// Ordered interpreter registry plus the schema-paired tree walk.
pub struct SchemaWalker {
    interpreters: Vec<Box<dyn Interpreter>>,
}

impl SchemaWalker {
    /// Registration order is dispatch order; callers relying on an
    /// earlier interpreter shadowing a later one get exactly that.
    pub fn new(interpreters: Vec<Box<dyn Interpreter>>) -> Self {
        Self { interpreters }
    }

    /// Interpret one document's value graph in place.
    pub fn interpret_document(
        &self,
        schema: &Schema,
        value: Value,
        ctx: &ProcessContext<'_>,
    ) -> Result<Value, InterpretError> {
        self.walk(schema, value, ctx, "")
    }

    /// Depth-first: children first (schema children paired key-wise for
    /// mappings, element-wise for sequences), then this node's own
    /// interpretation. Keys without a declared child schema pass
    /// through untouched.
    fn walk(
        &self,
        schema: &Schema,
        value: Value,
        ctx: &ProcessContext<'_>,
        path: &str,
    ) -> Result<Value, InterpretError> {
        // Absent values short-circuit regardless of schema
        if value.is_null() {
            return Ok(value);
        }

        let value = match value {
            Value::Seq(items) => {
                if let Some(item_schema) = &schema.items {
                    let mut out = Vec::with_capacity(items.len());
                    for (idx, item) in items.into_iter().enumerate() {
                        out.push(self.walk(item_schema, item, ctx, &format!("{path}/{idx}"))?);
                    }
                    Value::Seq(out)
                } else {
                    Value::Seq(items)
                }
            }
            Value::Map(entries) => {
                let mut out = FxHashMap::default();
                for (key, item) in entries {
                    match schema.properties.get(&key) {
                        Some(child) => {
                            let walked = self.walk(child, item, ctx, &format!("{path}/{key}"))?;
                            out.insert(key, walked);
                        }
                        None => {
                            out.insert(key, item);
                        }
                    }
                }
                Value::Map(out)
            }
            other => other,
        };

        self.dispatch(schema, value, ctx, path)
    }

    fn dispatch(
        &self,
        schema: &Schema,
        value: Value,
        ctx: &ProcessContext<'_>,
        path: &str,
    ) -> Result<Value, InterpretError> {
        for interpreter in &self.interpreters {
            if !interpreter.can_interpret(schema) {
                continue;
            }
            let snapshot = value.clone();
            return match interpreter.interpret(schema, value, ctx, path) {
                Ok(resolved) => Ok(resolved),
                Err(err) if err.is_recoverable() => {
                    error!(
                        file = %ctx.current_file,
                        path,
                        %err,
                        "document-level interpretation error"
                    );
                    ctx.build.report(DocumentError {
                        file: ctx.current_file.clone(),
                        path: path.to_string(),
                        message: err.to_string(),
                    });
                    Ok(snapshot)
                }
                Err(err) => Err(err),
            };
        }
        Ok(value)
    }
}
