//! Generic structural deserializer.
//!
//! Drives a [`TokenSource`] and produces a fully populated [`Value`]
//! graph, or a typed collection. Containers are built through shared
//! cells so that a forward alias can reserve a slot now and have a
//! promise writer overwrite it in place once the anchor is defined;
//! every promise must resolve before the top-level call returns.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::value::Value;

use super::collection::{Collection, FromValue, ShapeCache};
use super::error::DeError;
use super::event::{AnchorId, Event, EventKind, Position, TokenSource};
use super::promise::Promise;

/// Document node under construction. Sequences and mappings stay behind
/// cells until the document ends, so pending promise writers can patch
/// reserved slots after the frame that created them has returned.
#[derive(Clone)]
pub(crate) enum Node {
    Leaf(Value),
    Seq(Rc<RefCell<Vec<Node>>>),
    Map(Rc<RefCell<FxHashMap<String, Node>>>),
}

/// Result of deserializing one node.
pub(crate) enum Outcome {
    Ready(Node),
    /// The node is an alias to a not-yet-defined anchor.
    Deferred { promise: Promise<Node>, pos: Position },
}

/// Structural deserializer: anchor table, promise registry and the
/// collection shape memo. Anchor state is scoped to one document and
/// cleared on entry, so an instance can read documents back to back;
/// workers processing independent documents each hold their own
/// instance, so no state is shared across threads.
#[derive(Default)]
pub struct GraphDeserializer {
    anchors: FxHashMap<AnchorId, Node>,
    pending: FxHashMap<AnchorId, (Promise<Node>, Position)>,
    shapes: ShapeCache,
}

impl GraphDeserializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deserialize a whole document into a dynamic value graph.
    pub fn read_document(&mut self, src: &mut dyn TokenSource) -> Result<Value, DeError> {
        self.reset();
        if src.peek()?.event.kind() == EventKind::DocumentEnd {
            src.next_event()?;
            return Ok(Value::Null);
        }

        let outcome = self.read_node(src)?;
        src.consume(EventKind::DocumentEnd)?;
        self.finish()?;

        match outcome {
            Outcome::Ready(node) => materialize(&node),
            // A root-level alias can never acquire an anchor
            Outcome::Deferred { pos, .. } => Err(DeError::DanglingAlias { pos }),
        }
    }

    /// Deserialize a document whose root is a sequence into a typed
    /// collection. Elements stay in node form until every promise has
    /// resolved; coercion runs once at document end, so a forward alias
    /// anywhere inside an element's subtree never leaks a placeholder
    /// into the collection. Append-only containers cannot hold a
    /// deferred element in place and fail at the alias, leaving no
    /// partial collection visible to the caller.
    pub fn read_document_sequence<C: Collection>(
        &mut self,
        src: &mut dyn TokenSource,
    ) -> Result<C, DeError> {
        self.reset();
        let shape = self.shapes.lookup::<C>();
        src.consume(EventKind::SequenceStart)?;
        let cell = Rc::new(RefCell::new(Vec::new()));

        loop {
            if src.peek()?.event.kind() == EventKind::SequenceEnd {
                src.next_event()?;
                break;
            }
            match self.read_node(src)? {
                Outcome::Ready(node) => cell.borrow_mut().push(node),
                Outcome::Deferred { promise, pos } => {
                    if !shape.supports_overwrite {
                        return Err(DeError::ForwardAnchorNotSupported {
                            container: shape.container,
                            pos,
                        });
                    }
                    let slot = {
                        let mut items = cell.borrow_mut();
                        items.push(Node::Leaf(Value::Null));
                        items.len() - 1
                    };
                    let target = Rc::clone(&cell);
                    promise.subscribe(move |node| {
                        target.borrow_mut()[slot] = node.clone();
                        Ok(())
                    })?;
                }
            }
        }
        src.consume(EventKind::DocumentEnd)?;
        self.finish()?;

        let nodes = match Rc::try_unwrap(cell) {
            Ok(cell) => cell.into_inner(),
            Err(_) => return Err(DeError::CollectionShared),
        };
        let mut out = C::default();
        for node in &nodes {
            out.push_item(C::Item::from_value(materialize(node)?)?);
        }
        Ok(out)
    }

    /// Discard per-document state so one instance can read several
    /// documents in turn without anchors bleeding between them.
    fn reset(&mut self) {
        self.anchors.clear();
        self.pending.clear();
    }

    /// Fail if any alias is still waiting on an anchor.
    fn finish(&mut self) -> Result<(), DeError> {
        if let Some((_, (_, pos))) = self.pending.drain().next() {
            return Err(DeError::DanglingAlias { pos });
        }
        Ok(())
    }

    pub(crate) fn read_node(&mut self, src: &mut dyn TokenSource) -> Result<Outcome, DeError> {
        let spanned = src.peek()?.clone();
        match spanned.event {
            Event::Scalar { value, anchor } => {
                src.next_event()?;
                let node = Node::Leaf(value);
                if let Some(id) = anchor {
                    self.define_anchor(id, &node)?;
                }
                Ok(Outcome::Ready(node))
            }
            Event::SequenceStart { anchor } => {
                src.next_event()?;
                let cell = Rc::new(RefCell::new(Vec::new()));
                loop {
                    if src.peek()?.event.kind() == EventKind::SequenceEnd {
                        src.next_event()?;
                        break;
                    }
                    match self.read_node(src)? {
                        Outcome::Ready(node) => cell.borrow_mut().push(node),
                        Outcome::Deferred { promise, .. } => {
                            let slot = {
                                let mut items = cell.borrow_mut();
                                items.push(Node::Leaf(Value::Null));
                                items.len() - 1
                            };
                            let target = Rc::clone(&cell);
                            promise.subscribe(move |node| {
                                target.borrow_mut()[slot] = node.clone();
                                Ok(())
                            })?;
                        }
                    }
                }
                let node = Node::Seq(cell);
                if let Some(id) = anchor {
                    self.define_anchor(id, &node)?;
                }
                Ok(Outcome::Ready(node))
            }
            Event::MappingStart { anchor } => {
                src.next_event()?;
                let cell = Rc::new(RefCell::new(FxHashMap::default()));
                loop {
                    let key_pos = src.peek()?.pos;
                    if src.peek()?.event.kind() == EventKind::MappingEnd {
                        src.next_event()?;
                        break;
                    }
                    let key = match self.read_node(src)? {
                        Outcome::Ready(Node::Leaf(value)) => scalar_key(value, key_pos)?,
                        Outcome::Ready(_) => return Err(DeError::NonScalarKey { pos: key_pos }),
                        Outcome::Deferred { pos, .. } => return Err(DeError::AliasKey { pos }),
                    };
                    match self.read_node(src)? {
                        Outcome::Ready(node) => {
                            cell.borrow_mut().insert(key, node);
                        }
                        Outcome::Deferred { promise, .. } => {
                            cell.borrow_mut().insert(key.clone(), Node::Leaf(Value::Null));
                            let target = Rc::clone(&cell);
                            promise.subscribe(move |node| {
                                target.borrow_mut().insert(key, node.clone());
                                Ok(())
                            })?;
                        }
                    }
                }
                let node = Node::Map(cell);
                if let Some(id) = anchor {
                    self.define_anchor(id, &node)?;
                }
                Ok(Outcome::Ready(node))
            }
            Event::Alias { anchor } => {
                src.next_event()?;
                if let Some(node) = self.anchors.get(&anchor) {
                    return Ok(Outcome::Ready(node.clone()));
                }
                trace!(anchor, pos = %spanned.pos, "forward alias, creating promise");
                let (promise, _) = self
                    .pending
                    .entry(anchor)
                    .or_insert_with(|| (Promise::new(), spanned.pos));
                Ok(Outcome::Deferred {
                    promise: promise.clone(),
                    pos: spanned.pos,
                })
            }
            Event::SequenceEnd | Event::MappingEnd | Event::DocumentEnd => {
                Err(DeError::ExpectedNode {
                    found: spanned.event.kind(),
                    pos: spanned.pos,
                })
            }
        }
    }

    fn define_anchor(&mut self, id: AnchorId, node: &Node) -> Result<(), DeError> {
        self.anchors.insert(id, node.clone());
        if let Some((promise, _)) = self.pending.remove(&id) {
            promise.resolve(node.clone())?;
        }
        Ok(())
    }
}

/// Convert a finished node graph into an owned [`Value`] tree.
///
/// The value model has tree semantics: backward aliases become copies,
/// and an alias inside its own anchor's subtree is a cycle the tree
/// cannot represent.
pub(crate) fn materialize(node: &Node) -> Result<Value, DeError> {
    let mut visiting = Vec::new();
    materialize_inner(node, &mut visiting)
}

fn materialize_inner(node: &Node, visiting: &mut Vec<usize>) -> Result<Value, DeError> {
    match node {
        Node::Leaf(value) => Ok(value.clone()),
        Node::Seq(cell) => {
            let key = Rc::as_ptr(cell) as usize;
            if visiting.contains(&key) {
                return Err(DeError::CyclicAlias);
            }
            visiting.push(key);
            let items = cell.borrow();
            let mut out = Vec::with_capacity(items.len());
            for item in items.iter() {
                out.push(materialize_inner(item, visiting)?);
            }
            drop(items);
            visiting.pop();
            Ok(Value::Seq(out))
        }
        Node::Map(cell) => {
            let key = Rc::as_ptr(cell) as usize;
            if visiting.contains(&key) {
                return Err(DeError::CyclicAlias);
            }
            visiting.push(key);
            let entries = cell.borrow();
            let mut out = FxHashMap::default();
            for (name, item) in entries.iter() {
                out.insert(name.clone(), materialize_inner(item, visiting)?);
            }
            drop(entries);
            visiting.pop();
            Ok(Value::Map(out))
        }
    }
}

fn scalar_key(value: Value, pos: Position) -> Result<String, DeError> {
    match value {
        Value::String(s) => Ok(s),
        Value::Int(n) => Ok(n.to_string()),
        Value::Float(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok("null".to_string()),
        Value::Seq(_) | Value::Map(_) => Err(DeError::NonScalarKey { pos }),
    }
}

/// Convenience: one document from a token source into a value graph.
pub fn deserialize_document(src: &mut dyn TokenSource) -> Result<Value, DeError> {
    GraphDeserializer::new().read_document(src)
}

/// Convenience: one sequence-rooted document into a typed collection.
pub fn deserialize_sequence<C: Collection>(src: &mut dyn TokenSource) -> Result<C, DeError> {
    GraphDeserializer::new().read_document_sequence(src)
}
