//! Deserialization error types.

use thiserror::Error;
use yaml_rust2::scanner::ScanError;

use super::event::{EventKind, Position};

/// Errors raised while turning a token stream into a document graph.
///
/// All variants are fatal to the current document; none corrupts sibling
/// documents.
#[derive(Debug, Error)]
pub enum DeError {
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("unexpected {found} (expected {expected}) at {pos}")]
    UnexpectedEvent {
        expected: EventKind,
        found: EventKind,
        pos: Position,
    },

    #[error("expected a node, found {found} at {pos}")]
    ExpectedNode { found: EventKind, pos: Position },

    #[error("unexpected end of token stream")]
    UnexpectedEof,

    #[error(
        "forward alias references are not allowed because `{container}` \
         does not support indexed overwrite (at {pos})"
    )]
    ForwardAnchorNotSupported {
        container: &'static str,
        pos: Position,
    },

    #[error("alias at {pos} refers to an anchor that is never defined")]
    DanglingAlias { pos: Position },

    #[error("alias cycle detected while materializing the document graph")]
    CyclicAlias,

    #[error("mapping key at {pos} must be a scalar")]
    NonScalarKey { pos: Position },

    #[error("forward alias cannot be used as a mapping key (at {pos})")]
    AliasKey { pos: Position },

    #[error("cannot convert {from} to {to}")]
    Coerce {
        from: &'static str,
        to: &'static str,
    },

    #[error("value promise resolved twice")]
    PromiseAlreadyResolved,

    #[error("collection is still shared after document end")]
    CollectionShared,
}
