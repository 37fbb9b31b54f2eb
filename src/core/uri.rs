//! URI reference helpers.
//!
//! Provides consistent link-string handling across the codebase:
//! - Path vs query/fragment splitting (the suffix is never re-encoded)
//! - External/absolute link detection
//! - Live-site hostname stripping for self-referential links

use std::sync::OnceLock;

use url::Url;

/// Check if a link is external (has a URL scheme like http:, mailto:, etc.)
///
/// A valid scheme must:
/// - Have at least 1 character before the colon
/// - Only contain ASCII alphanumeric or `+`, `-`, `.`
pub fn is_external_link(link: &str) -> bool {
    link.find(':').is_some_and(|pos| {
        pos > 0
            && link[..pos]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Check if a link is an absolute URI (scheme-shaped and well-formed).
pub fn is_absolute(link: &str) -> bool {
    is_external_link(link) && Url::parse(link).is_ok()
}

/// Check if a link is a well-formed URI reference.
///
/// Scheme-shaped strings must parse as absolute URIs (`https://` with an
/// empty host is rejected); everything else is validated as a relative
/// reference against a dummy base.
pub fn is_valid_reference(link: &str) -> bool {
    if is_external_link(link) {
        return Url::parse(link).is_ok();
    }
    base().join(link).is_ok()
}

fn base() -> &'static Url {
    static BASE: OnceLock<Url> = OnceLock::new();
    BASE.get_or_init(|| Url::parse("http://x").unwrap())
}

/// The file-path component of a link: everything before `?` or `#`.
#[inline]
pub fn path_of(link: &str) -> &str {
    link.split(['?', '#']).next().unwrap_or(link)
}

/// The query-string-plus-fragment suffix, starting at the first `?` or
/// `#`. Empty when neither is present. Passed through byte-for-byte.
#[inline]
pub fn query_and_fragment(link: &str) -> &str {
    match link.find(['?', '#']) {
        Some(idx) => &link[idx..],
        None => "",
    }
}

/// The fragment without its `#`, or `None` when absent or empty.
#[inline]
pub fn fragment_of(link: &str) -> Option<&str> {
    link.split_once('#').map(|(_, f)| f).filter(|f| !f.is_empty())
}

/// Strip a configured live-site hostname from a self-referential link.
///
/// `https://example.com/x` with host `example.com` becomes `/x`; any
/// other host, scheme or unparsable value is returned untouched.
pub fn remove_host_name(value: &str, host: Option<&str>) -> String {
    let Some(host) = host else {
        return value.to_string();
    };
    let Ok(url) = Url::parse(value) else {
        return value.to_string();
    };
    if !matches!(url.scheme(), "http" | "https") || url.host_str() != Some(host) {
        return value.to_string();
    }

    let mut out = url.path().to_string();
    if let Some(query) = url.query() {
        out.push('?');
        out.push_str(query);
    }
    if let Some(fragment) = url.fragment() {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_external_link() {
        assert!(is_external_link("https://example.com"));
        assert!(is_external_link("mailto:user@example.com"));
        assert!(is_external_link("tel:+1234567890"));
        assert!(!is_external_link("/about"));
        assert!(!is_external_link("./file.txt"));
        assert!(!is_external_link("#section"));
        assert!(!is_external_link("a/b/c?x=1#frag"));
    }

    #[test]
    fn test_is_absolute() {
        assert!(is_absolute("https://example.com/x"));
        assert!(is_absolute("mailto:user@example.com"));
        assert!(!is_absolute("https://")); // scheme-shaped but malformed
        assert!(!is_absolute("a/b/c"));
        assert!(!is_absolute("/rooted"));
    }

    #[test]
    fn test_is_valid_reference() {
        assert!(is_valid_reference("a/b/c?x=1#frag"));
        assert!(is_valid_reference("#frag"));
        assert!(is_valid_reference("https://example.com/x"));
        assert!(!is_valid_reference("https://"));
    }

    #[test]
    fn test_path_of() {
        assert_eq!(path_of("a/b/c?x=1#frag"), "a/b/c");
        assert_eq!(path_of("a/b#frag"), "a/b");
        assert_eq!(path_of("a/b"), "a/b");
        assert_eq!(path_of("#frag"), "");
        assert_eq!(path_of("?x=1"), "");
    }

    #[test]
    fn test_query_and_fragment() {
        assert_eq!(query_and_fragment("a/b/c?x=1#frag"), "?x=1#frag");
        assert_eq!(query_and_fragment("a/b#frag"), "#frag");
        assert_eq!(query_and_fragment("a/b"), "");
    }

    #[test]
    fn test_fragment_of() {
        assert_eq!(fragment_of("a/b/c?x=1#frag"), Some("frag"));
        assert_eq!(fragment_of("a/b"), None);
        assert_eq!(fragment_of("a/b#"), None);
    }

    #[test]
    fn test_remove_host_name_self_link() {
        assert_eq!(
            remove_host_name("https://example.com/x", Some("example.com")),
            "/x"
        );
        assert_eq!(
            remove_host_name("https://example.com/x?v=1#frag", Some("example.com")),
            "/x?v=1#frag"
        );
    }

    #[test]
    fn test_remove_host_name_other_host_untouched() {
        assert_eq!(
            remove_host_name("https://other.com/x", Some("example.com")),
            "https://other.com/x"
        );
    }

    #[test]
    fn test_remove_host_name_non_http_untouched() {
        assert_eq!(
            remove_host_name("ftp://example.com/x", Some("example.com")),
            "ftp://example.com/x"
        );
        assert_eq!(
            remove_host_name("mailto:user@example.com", Some("example.com")),
            "mailto:user@example.com"
        );
    }

    #[test]
    fn test_remove_host_name_without_config() {
        assert_eq!(remove_host_name("https://example.com/x", None), "https://example.com/x");
        assert_eq!(remove_host_name("/", None), "/");
    }
}
