//! YAML token source - adapts the `yaml-rust2` event stream (anchors,
//! aliases, markers) to the [`TokenSource`] layer.
//!
//! Plain-style scalars resolve to null/bool/int/float per YAML core
//! rules; quoted and block scalars always stay strings.

use yaml_rust2::parser::{Event as YamlEvent, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, TScalarStyle};

use crate::value::Value;

use super::error::DeError;
use super::event::{Event, Position, Spanned, VecTokens};

/// Parse the first YAML document of `input` into a token source.
pub fn parse_document(input: &str) -> Result<VecTokens, DeError> {
    let mut parser = Parser::new(input.chars());
    let mut collector = Collector::default();
    parser.load(&mut collector, false)?;

    // An empty input produces no node events at all
    if !collector.saw_document_end {
        collector
            .events
            .push(Spanned::new(Event::DocumentEnd, Position::default()));
    }
    Ok(VecTokens::new(collector.events))
}

#[derive(Default)]
struct Collector {
    events: Vec<Spanned>,
    saw_document_end: bool,
}

impl MarkedEventReceiver for Collector {
    fn on_event(&mut self, ev: YamlEvent, mark: Marker) {
        let pos = Position::new(mark.index(), mark.line(), mark.col());
        let event = match ev {
            YamlEvent::Scalar(text, style, anchor_id, tag) => Event::Scalar {
                value: scalar_value(text, style, tag.as_ref()),
                anchor: anchor(anchor_id),
            },
            YamlEvent::SequenceStart(anchor_id, _) => Event::SequenceStart {
                anchor: anchor(anchor_id),
            },
            YamlEvent::SequenceEnd => Event::SequenceEnd,
            YamlEvent::MappingStart(anchor_id, _) => Event::MappingStart {
                anchor: anchor(anchor_id),
            },
            YamlEvent::MappingEnd => Event::MappingEnd,
            YamlEvent::Alias(anchor_id) => Event::Alias { anchor: anchor_id },
            YamlEvent::DocumentEnd => {
                self.saw_document_end = true;
                Event::DocumentEnd
            }
            // Stream and document-start markers carry no node content
            _ => return,
        };
        self.events.push(Spanned::new(event, pos));
    }
}

/// Anchor id 0 means "no anchor" in yaml-rust2.
fn anchor(id: usize) -> Option<usize> {
    (id != 0).then_some(id)
}

fn scalar_value(text: String, style: TScalarStyle, tag: Option<&Tag>) -> Value {
    if style != TScalarStyle::Plain {
        return Value::String(text);
    }
    if let Some(tag) = tag {
        if tag.suffix == "str" {
            return Value::String(text);
        }
    }
    resolve_plain(text)
}

fn resolve_plain(text: String) -> Value {
    match text.as_str() {
        "" | "~" | "null" | "Null" | "NULL" => return Value::Null,
        "true" | "True" | "TRUE" => return Value::Bool(true),
        "false" | "False" | "FALSE" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(n) = text.parse::<i64>() {
        return Value::Int(n);
    }
    if let Ok(n) = text.parse::<f64>() {
        return Value::Float(n);
    }
    Value::String(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::de::graph::deserialize_document;
    use crate::value::Value;

    fn load(input: &str) -> Value {
        let mut src = parse_document(input).unwrap();
        deserialize_document(&mut src).unwrap()
    }

    #[test]
    fn test_scalar_typing() {
        let value = load("a: 1\nb: 2.5\nc: true\nd: ~\ne: '1'\nf: hello");
        assert_eq!(value.get("a"), Some(&Value::Int(1)));
        assert_eq!(value.get("b"), Some(&Value::Float(2.5)));
        assert_eq!(value.get("c"), Some(&Value::Bool(true)));
        assert_eq!(value.get("d"), Some(&Value::Null));
        assert_eq!(value.get("e"), Some(&Value::from("1")));
        assert_eq!(value.get("f"), Some(&Value::from("hello")));
    }

    #[test]
    fn test_nested_containers() {
        let value = load("items:\n  - x: 1\n  - x: 2");
        let items = value.get("items").unwrap();
        assert_eq!(items.at(0).unwrap().get("x"), Some(&Value::Int(1)));
        assert_eq!(items.at(1).unwrap().get("x"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_backward_alias() {
        let value = load("a: &x shared\nb: *x");
        assert_eq!(value.get("a"), Some(&Value::from("shared")));
        assert_eq!(value.get("b"), Some(&Value::from("shared")));
    }

    #[test]
    fn test_anchored_sequence_alias() {
        let value = load("a: &s [1, 2]\nb: *s");
        let expected = Value::Seq(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(value.get("a"), Some(&expected));
        assert_eq!(value.get("b"), Some(&expected));
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(load(""), Value::Null);
    }

    #[test]
    fn test_malformed_input_is_scan_error() {
        let result = parse_document("a: [1, 2");
        assert!(matches!(result, Err(DeError::Scan(_))));
    }
}
