//! Generic structural deserialization - token stream to document graph.
//!
//! The pipeline's first half: a [`TokenSource`] feeds the
//! [`GraphDeserializer`], which resolves anchors and aliases (forward
//! references via [`Promise`]) and produces the [`crate::value::Value`]
//! graph the interpretation pass consumes. The deserializer never looks
//! at content-type schemas; those belong to the later pass.

mod collection;
mod error;
mod event;
mod graph;
mod promise;
pub mod yaml;

pub use collection::{Collection, FromValue};
pub use error::DeError;
pub use event::{AnchorId, Event, EventKind, Position, Spanned, TokenSource, VecTokens};
pub use graph::{GraphDeserializer, deserialize_document, deserialize_sequence};
pub use promise::Promise;

use crate::value::Value;

/// Deserialize the first YAML document of `input` into a value graph.
pub fn from_yaml_str(input: &str) -> Result<Value, DeError> {
    let mut src = yaml::parse_document(input)?;
    deserialize_document(&mut src)
}
