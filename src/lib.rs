//! Docset - schema-driven document build core.
//!
//! Two cooperating halves:
//! - [`de`] turns an anchored token stream (YAML out of the box) into a
//!   dynamic [`Value`] graph, resolving aliases including forward
//!   references via value promises.
//! - [`process`] walks each graph against a content-type [`Schema`],
//!   dispatching interpreters that record link sources and rewrite
//!   values for their final output locations.

pub mod core;
pub mod de;
pub mod process;
pub mod schema;
pub mod value;

pub use crate::core::{LinkSourceInfo, RelativePath};
pub use crate::de::{DeError, GraphDeserializer, from_yaml_str};
pub use crate::process::{
    BuildContext, BuildFailure, HrefInterpreter, InterpretError, Interpreter,
    MarkdownInterpreter, MarkupRenderer, ProcessContext, SchemaWalker, interpret_documents,
};
pub use crate::schema::{ContentType, Schema};
pub use crate::value::Value;
