//! Core types - pure path and link abstractions shared across the codebase.

mod link;
mod relpath;
pub mod uri;

pub use link::LinkSourceInfo;
pub use relpath::RelativePath;
