//! Cross-document link provenance records.

use serde::Serialize;

use crate::core::RelativePath;

/// One discovered cross-document reference: `source_file` links to
/// `target`, optionally at `anchor`.
///
/// Accumulated during interpretation; the final collection is an
/// order-independent set harvested by the dependency-graph consumer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LinkSourceInfo {
    /// Resolved target path, expressed against the working folder.
    pub target: RelativePath,
    /// Fragment of the original link, without the leading `#`.
    pub anchor: Option<String>,
    /// Document the link was written in.
    pub source_file: RelativePath,
}
