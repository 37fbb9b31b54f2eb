//! Build-pass and per-document context.
//!
//! One [`BuildContext`] lives for a whole build pass and is shared by
//! every document worker: the file map is read-only, the link-source
//! accumulator supports concurrent append with set semantics, and
//! document-level errors collect for one collective report at the end.

use std::fmt;

use dashmap::DashSet;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::core::{LinkSourceInfo, RelativePath};

/// One recoverable, document-attributed error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentError {
    pub file: RelativePath,
    /// Node path within the document (`/properties/href` style).
    pub path: String,
    pub message: String,
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.file, self.message, self.path)
    }
}

/// Shared state of one build pass.
pub struct BuildContext {
    /// Original content file -> final output location. Assumed fully
    /// populated before any value-updating interpreter runs.
    file_map: FxHashMap<RelativePath, RelativePath>,
    link_sources: DashSet<LinkSourceInfo>,
    errors: Mutex<Vec<DocumentError>>,
}

impl BuildContext {
    pub fn new(file_map: FxHashMap<RelativePath, RelativePath>) -> Self {
        Self {
            file_map,
            link_sources: DashSet::new(),
            errors: Mutex::new(Vec::new()),
        }
    }

    /// A context with no output mapping (link export only).
    pub fn without_file_map() -> Self {
        Self::new(FxHashMap::default())
    }

    pub fn has_file_map(&self) -> bool {
        !self.file_map.is_empty()
    }

    /// Querying an unmapped path is "not found", never an error.
    pub fn output_for(&self, file: &RelativePath) -> Option<&RelativePath> {
        self.file_map.get(file)
    }

    pub fn add_link_source(&self, link: LinkSourceInfo) {
        self.link_sources.insert(link);
    }

    /// Snapshot of the accumulated link sources, in no particular order.
    pub fn link_sources(&self) -> Vec<LinkSourceInfo> {
        self.link_sources.iter().map(|r| r.key().clone()).collect()
    }

    pub fn report(&self, error: DocumentError) {
        self.errors.lock().push(error);
    }

    pub fn error_count(&self) -> usize {
        self.errors.lock().len()
    }

    /// End the build pass: harvest the link sources, or fail with every
    /// document error collected along the way.
    pub fn finish(self) -> Result<Vec<LinkSourceInfo>, BuildFailure> {
        let errors = self.errors.into_inner();
        if !errors.is_empty() {
            return Err(BuildFailure { errors });
        }
        Ok(self.link_sources.into_iter().collect())
    }
}

/// The collective report for a failed build pass.
#[derive(Debug, thiserror::Error)]
#[error("build failed with {} document error(s)", .errors.len())]
pub struct BuildFailure {
    pub errors: Vec<DocumentError>,
}

/// Per-document view of the build pass.
pub struct ProcessContext<'a> {
    pub build: &'a BuildContext,
    /// Path of the document currently being interpreted, expressed
    /// against the working folder.
    pub current_file: RelativePath,
}

impl<'a> ProcessContext<'a> {
    pub fn new(build: &'a BuildContext, current_file: RelativePath) -> Self {
        Self {
            build,
            current_file,
        }
    }
}
