//! Relative path type for type-safe link resolution.
//!
//! - Internal representation: always decoded, always normalized
//! - Percent-encoding boundary: decode on input, encode on output

use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};

/// Characters escaped when a segment is rendered back into a URL.
/// Everything except ASCII alphanumerics and the RFC 3986 unreserved marks.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Normalized filesystem-relative logical path.
///
/// Invariants:
/// - No `.` segments, no interior `..` segments (collapsed at parse time)
/// - Forward slashes only
/// - Equality and hashing are structural, so two spellings of the same
///   path (`a/./b`, `a//b`) compare equal
///
/// Paths that climb above their starting point keep the surplus `..`
/// steps in `ups`; a path with `ups > 0` escapes the working folder and
/// will simply never match a file-map entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath {
    ups: usize,
    segments: Vec<String>,
}

impl RelativePath {
    /// Parse a relative path, normalizing `.`/`..` segments.
    ///
    /// Returns `None` for strings that are not relative paths: the empty
    /// string, rooted paths (`/a/b`) and anything carrying a URL scheme.
    pub fn try_parse(input: &str) -> Option<Self> {
        if input.is_empty() || input.starts_with('/') || super::uri::is_external_link(input) {
            return None;
        }

        let normalized = input.replace('\\', "/");
        let mut ups = 0usize;
        let mut segments: Vec<String> = Vec::new();
        for part in normalized.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    if segments.pop().is_none() {
                        ups += 1;
                    }
                }
                seg => segments.push(seg.to_string()),
            }
        }

        Some(Self { ups, segments })
    }

    /// Whether this path has no steps at all (spelled `.`).
    pub fn is_empty(&self) -> bool {
        self.ups == 0 && self.segments.is_empty()
    }

    /// Whether the path climbs above the working folder.
    pub fn escapes_root(&self) -> bool {
        self.ups > 0
    }

    /// Final segment, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Path with the final segment removed (the containing folder).
    pub fn directory(&self) -> Self {
        let mut dir = self.clone();
        dir.segments.pop();
        dir
    }

    /// Resolve this path against the *file* it was written in.
    ///
    /// `a/b.md` resolved from `docs/index.md` yields `docs/a/b.md`; the
    /// result is expressed against the same root as `base_file`.
    pub fn resolve_from(&self, base_file: &RelativePath) -> Self {
        let mut out = base_file.directory();
        for _ in 0..self.ups {
            if out.segments.pop().is_none() {
                out.ups += 1;
            }
        }
        out.segments.extend(self.segments.iter().cloned());
        out
    }

    /// Express this path relative to another file's folder.
    ///
    /// `out/a-b-c.html` made relative to `out/index.html` yields
    /// `a-b-c.html`. Only defined for paths anchored at the same root;
    /// when either side escapes the root the path is returned as-is.
    pub fn make_relative_to(&self, other_file: &RelativePath) -> Self {
        if self.ups > 0 || other_file.ups > 0 {
            return self.clone();
        }

        let base = &other_file.segments[..other_file.segments.len().saturating_sub(1)];
        let common = base
            .iter()
            .zip(self.segments.iter())
            .take_while(|(a, b)| a == b)
            .count();

        Self {
            ups: base.len() - common,
            segments: self.segments[common..].to_vec(),
        }
    }

    /// Percent-decode every segment (link targets may arrive encoded).
    pub fn url_decode(&self) -> Self {
        let segments = self
            .segments
            .iter()
            .map(|seg| {
                percent_decode_str(seg)
                    .decode_utf8()
                    .map(|s| s.into_owned())
                    .unwrap_or_else(|_| seg.clone())
            })
            .collect();
        Self {
            ups: self.ups,
            segments,
        }
    }

    /// Render with every segment percent-encoded.
    pub fn encoded(&self) -> String {
        if self.is_empty() {
            return ".".to_string();
        }
        let mut out = "../".repeat(self.ups);
        let encoded: Vec<String> = self
            .segments
            .iter()
            .map(|seg| utf8_percent_encode(seg, SEGMENT).to_string())
            .collect();
        out.push_str(&encoded.join("/"));
        out
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, ".");
        }
        for _ in 0..self.ups {
            write!(f, "../")?;
        }
        write!(f, "{}", self.segments.join("/"))
    }
}

impl PartialEq<str> for RelativePath {
    fn eq(&self, other: &str) -> bool {
        self.to_string() == other
    }
}

impl PartialEq<&str> for RelativePath {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for RelativePath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RelativePath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::try_parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("`{s}` is not a relative path")))
    }
}
