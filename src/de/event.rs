//! Token layer - the pull-style cursor the deserializer consumes.
//!
//! The concrete syntax is an external concern: any producer of [`Event`]
//! streams works. [`crate::de::yaml`] adapts a YAML parser; tests build
//! [`VecTokens`] by hand (which is also the only way to express forward
//! aliases, since strict YAML allows backward aliases only).

use std::fmt;

use crate::value::Value;

use super::error::DeError;

/// Identifier of an anchor within one document.
pub type AnchorId = usize;

/// Position of a token in the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub index: usize,
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(index: usize, line: usize, col: usize) -> Self {
        Self { index, line, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.col)
    }
}

/// One node-level token.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A concrete scalar, already resolved to its value type.
    Scalar {
        value: Value,
        anchor: Option<AnchorId>,
    },
    SequenceStart {
        anchor: Option<AnchorId>,
    },
    SequenceEnd,
    MappingStart {
        anchor: Option<AnchorId>,
    },
    MappingEnd,
    /// A reference to anchor `anchor`, which may not be defined yet.
    Alias {
        anchor: AnchorId,
    },
    DocumentEnd,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Scalar { .. } => EventKind::Scalar,
            Event::SequenceStart { .. } => EventKind::SequenceStart,
            Event::SequenceEnd => EventKind::SequenceEnd,
            Event::MappingStart { .. } => EventKind::MappingStart,
            Event::MappingEnd => EventKind::MappingEnd,
            Event::Alias { .. } => EventKind::Alias,
            Event::DocumentEnd => EventKind::DocumentEnd,
        }
    }
}

/// Discriminant of [`Event`], for peeking and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Scalar,
    SequenceStart,
    SequenceEnd,
    MappingStart,
    MappingEnd,
    Alias,
    DocumentEnd,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Scalar => "scalar",
            EventKind::SequenceStart => "sequence start",
            EventKind::SequenceEnd => "sequence end",
            EventKind::MappingStart => "mapping start",
            EventKind::MappingEnd => "mapping end",
            EventKind::Alias => "alias",
            EventKind::DocumentEnd => "document end",
        };
        write!(f, "{name}")
    }
}

/// An event with its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub event: Event,
    pub pos: Position,
}

impl Spanned {
    pub fn new(event: Event, pos: Position) -> Self {
        Self { event, pos }
    }
}

/// Pull-style token cursor.
pub trait TokenSource {
    /// Look at the next token without consuming it.
    fn peek(&mut self) -> Result<&Spanned, DeError>;

    /// Consume and return the next token.
    fn next_event(&mut self) -> Result<Spanned, DeError>;

    /// Consume the next token, failing unless it has the expected kind.
    fn consume(&mut self, expected: EventKind) -> Result<Spanned, DeError> {
        let got = self.next_event()?;
        if got.event.kind() != expected {
            return Err(DeError::UnexpectedEvent {
                expected,
                found: got.event.kind(),
                pos: got.pos,
            });
        }
        Ok(got)
    }
}

/// In-memory token source over a pre-collected event list.
#[derive(Debug, Clone)]
pub struct VecTokens {
    events: Vec<Spanned>,
    cursor: usize,
}

impl VecTokens {
    pub fn new(events: Vec<Spanned>) -> Self {
        Self { events, cursor: 0 }
    }

    /// Build a source from bare events, with zeroed positions.
    pub fn plain(events: Vec<Event>) -> Self {
        Self::new(
            events
                .into_iter()
                .map(|event| Spanned::new(event, Position::default()))
                .collect(),
        )
    }
}

impl TokenSource for VecTokens {
    fn peek(&mut self) -> Result<&Spanned, DeError> {
        self.events.get(self.cursor).ok_or(DeError::UnexpectedEof)
    }

    fn next_event(&mut self) -> Result<Spanned, DeError> {
        let got = self
            .events
            .get(self.cursor)
            .cloned()
            .ok_or(DeError::UnexpectedEof)?;
        self.cursor += 1;
        Ok(got)
    }
}
