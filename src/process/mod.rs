//! Schema-driven interpretation - the pipeline's second half.
//!
//! Deserialized value graphs are walked against their content-type
//! schema; interpreters transform the nodes they claim, recording link
//! sources and document errors into the shared [`BuildContext`].

mod context;
mod error;
mod href;
mod markdown;
mod walker;

pub use context::{BuildContext, BuildFailure, DocumentError, ProcessContext};
pub use error::InterpretError;
pub use href::HrefInterpreter;
pub use markdown::{MarkdownInterpreter, MarkupRenderer};
pub use walker::{Interpreter, SchemaWalker};

use rayon::prelude::*;

use crate::core::RelativePath;
use crate::schema::Schema;
use crate::value::Value;

/// Interpret a batch of documents against one schema, in parallel.
///
/// Results come back in input order. Recoverable errors land in the
/// build context as usual; only fatal errors surface per document.
pub fn interpret_documents(
    walker: &SchemaWalker,
    schema: &Schema,
    build: &BuildContext,
    documents: Vec<(RelativePath, Value)>,
) -> Vec<(RelativePath, Result<Value, InterpretError>)> {
    documents
        .into_par_iter()
        .map(|(file, value)| {
            let ctx = ProcessContext::new(build, file.clone());
            let result = walker.interpret_document(schema, value, &ctx);
            (file, result)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rustc_hash::FxHashMap;

    use super::*;
    use crate::de::from_yaml_str;
    use crate::schema::ContentType;

    fn rel(s: &str) -> RelativePath {
        RelativePath::try_parse(s).unwrap()
    }

    fn href_schema() -> Schema {
        let mut properties = FxHashMap::default();
        properties.insert("href".to_string(), Schema::of(ContentType::Href));
        properties.insert(
            "links".to_string(),
            Schema {
                items: Some(Box::new(Schema::of(ContentType::Href))),
                ..Schema::default()
            },
        );
        Schema {
            properties,
            ..Schema::default()
        }
    }

    #[test]
    fn test_parallel_batch_accumulates_all_links() {
        let walker = SchemaWalker::new(vec![Box::new(HrefInterpreter::new(true, false))]);
        let build = BuildContext::without_file_map();
        let schema = href_schema();

        let documents: Vec<(RelativePath, Value)> = (0..32)
            .map(|i| {
                let mut map = FxHashMap::default();
                map.insert("href".to_string(), Value::from(format!("target-{i}.md")));
                (rel(&format!("docs/page-{i}.md")), Value::Map(map))
            })
            .collect();

        let results = interpret_documents(&walker, &schema, &build, documents);
        assert_eq!(results.len(), 32);
        assert!(results.iter().all(|(_, r)| r.is_ok()));
        // Input order survives the parallel map
        assert_eq!(results[7].0, rel("docs/page-7.md"));

        let links = build.finish().unwrap();
        assert_eq!(links.len(), 32);
        assert!(links.iter().any(|l| l.target == rel("docs/target-7.md")));
    }

    #[test]
    fn test_yaml_to_links_end_to_end() {
        let value = from_yaml_str(
            "href: &main a/b/c?x=1#frag\nlinks:\n  - *main\n  - other.md\n",
        )
        .unwrap();

        let walker = SchemaWalker::new(vec![Box::new(HrefInterpreter::new(true, true))]);
        let mut map = FxHashMap::default();
        map.insert(rel("docs/index.md"), rel("out/index.html"));
        map.insert(rel("docs/a/b/c"), rel("out/a-b-c.html"));
        let build = BuildContext::new(map);
        let ctx = ProcessContext::new(&build, rel("docs/index.md"));

        let out = walker
            .interpret_document(&href_schema(), value, &ctx)
            .unwrap();
        assert_eq!(out.get("href"), Some(&Value::from("a-b-c.html?x=1#frag")));
        // The alias shares the target, so both spots rewrite identically
        assert_eq!(
            out.get("links").unwrap().at(0),
            Some(&Value::from("a-b-c.html?x=1#frag"))
        );
        // Unmapped target keeps its original spelling
        assert_eq!(out.get("links").unwrap().at(1), Some(&Value::from("other.md")));

        let links = build.finish().unwrap();
        assert_eq!(links.len(), 2);
    }
}
