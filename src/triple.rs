//! Triple data model.
//!
//! [`RawTriple`]s are the already-parsed input graph: subject and predicate IRIs plus an
//! object that is either a literal or a reference to another resource. The filter
//! pipeline turns every raw triple into zero or more [`Fact`]s whose object is a
//! [`Value`]: a scalar literal or a link to another entity.

use serde::{Deserialize, Serialize};

/// Object position of an input triple.
///
/// The derived ordering (literals before IRIs, then by text) is part of the
/// deterministic total order the entity assembler sorts by.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RawObject {
    /// A literal with its lexical form.
    Literal(String),
    /// A reference to another resource (IRI or blank node).
    Iri(String),
}

impl RawObject {
    /// Lexical text of the object, regardless of kind.
    pub fn text(&self) -> &str {
        match self {
            Self::Literal(s) | Self::Iri(s) => s,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }
}

/// One subject-predicate-object fact, as read from the graph.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RawTriple {
    pub subject: String,
    pub predicate: String,
    pub object: RawObject,
}

impl RawTriple {
    pub fn literal(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: RawObject::Literal(value.into()),
        }
    }

    pub fn link(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: RawObject::Iri(target.into()),
        }
    }
}

/// A processed object value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    /// Scalar value, stored as text until type inference.
    Literal(String),
    /// Reference to another entity by its (prefix-stripped) name.
    Link(String),
}

impl Value {
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    pub fn is_link(&self) -> bool {
        matches!(self, Self::Link(_))
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(s) => Some(s),
            Self::Link(_) => None,
        }
    }

    pub fn as_link(&self) -> Option<&str> {
        match self {
            Self::Link(s) => Some(s),
            Self::Literal(_) => None,
        }
    }
}

/// A (predicate, value) pair emitted by the filter pipeline for one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fact {
    pub predicate: String,
    pub value: Value,
}

impl Fact {
    pub fn new(predicate: impl Into<String>, value: Value) -> Self {
        Self {
            predicate: predicate.into(),
            value,
        }
    }

    pub fn literal(predicate: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(predicate, Value::Literal(value.into()))
    }
}
