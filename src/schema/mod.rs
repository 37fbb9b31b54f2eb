//! Content-type schema - metadata describing how each node of a
//! document must be interpreted.
//!
//! Loaded once from JSON, validated upstream, then shared read-only
//! across every document processed against it.

use rustc_hash::FxHashMap;
use serde::Deserialize;

/// Semantic role of a node's value, driving interpreter dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Default,
    Uid,
    Xref,
    Href,
    File,
    Markdown,
}

/// One node of the schema tree.
///
/// `properties` describes mapping children by key, `items` describes
/// sequence elements. Keys a document carries beyond `properties` are
/// extensible members and pass through interpretation untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Schema {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub schema_type: Option<String>,
    pub content_type: ContentType,
    pub properties: FxHashMap<String, Schema>,
    pub items: Option<Box<Schema>>,
}

impl Schema {
    /// Load a schema tree from its JSON form.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// Leaf schema with the given content type.
    pub fn of(content_type: ContentType) -> Self {
        Self {
            content_type,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let schema = Schema::from_json(
            r#"{
                "title": "Page",
                "type": "object",
                "properties": {
                    "href": { "type": "string", "contentType": "href" },
                    "body": { "type": "string", "contentType": "markdown" },
                    "children": {
                        "type": "array",
                        "items": { "contentType": "href" }
                    }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(schema.title.as_deref(), Some("Page"));
        assert_eq!(
            schema.properties["href"].content_type,
            ContentType::Href
        );
        assert_eq!(
            schema.properties["body"].content_type,
            ContentType::Markdown
        );
        let items = schema.properties["children"].items.as_ref().unwrap();
        assert_eq!(items.content_type, ContentType::Href);
    }

    #[test]
    fn test_missing_content_type_defaults() {
        let schema = Schema::from_json(r#"{ "type": "string" }"#).unwrap();
        assert_eq!(schema.content_type, ContentType::Default);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let schema =
            Schema::from_json(r#"{ "contentType": "href", "xrefProperties": ["uid"] }"#).unwrap();
        assert_eq!(schema.content_type, ContentType::Href);
    }
}
