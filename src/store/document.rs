//! Document and request/response shapes exchanged with a store

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::selector::Selector;

/// A schema-flexible document addressed by id.
///
/// Serialized flat, with the id and revision under the reserved `_id` and
/// `_rev` keys next to the body fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: String,

    /// Opaque revision token, `None` for a document never written
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,

    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl Document {
    /// Create an empty document with no revision
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rev: None,
            body: Map::new(),
        }
    }

    /// Builder-style field setter
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.insert(field.into(), value.into());
        self
    }

    /// Builder-style revision setter
    pub fn with_rev(mut self, rev: impl Into<String>) -> Self {
        self.rev = Some(rev.into());
        self
    }

    /// Look up a body field. `_id` resolves to the document id.
    pub fn field(&self, name: &str) -> Option<Value> {
        if name == "_id" {
            return Some(Value::String(self.id.clone()));
        }
        self.body.get(name).cloned()
    }
}

/// Acknowledgment returned by `put` and `remove`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteAck {
    pub ok: bool,
    pub id: String,
    pub rev: String,
}

/// Revision tokens have the form `<generation>-<random>`
pub(crate) fn next_revision(previous: Option<&str>) -> String {
    let generation = previous.and_then(revision_generation).unwrap_or(0) + 1;
    format!("{}-{}", generation, Uuid::new_v4().simple())
}

/// Parse the generation prefix of a revision token
pub fn revision_generation(rev: &str) -> Option<u64> {
    rev.split('-').next()?.parse().ok()
}

/// A `find` query
#[derive(Debug, Clone)]
pub struct FindRequest {
    pub selector: Selector,
}

impl FindRequest {
    pub fn new(selector: Selector) -> Self {
        Self { selector }
    }
}

/// Result of a `find` query
#[derive(Debug, Clone, Default)]
pub struct FindResponse {
    pub docs: Vec<Document>,

    /// Advisory message, e.g. when no declared index covers the selector
    pub warning: Option<String>,
}

/// A declared query index over one or more fields
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexSpec {
    pub fields: Vec<String>,
}

impl IndexSpec {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Deterministic index name derived from the field list
    pub fn name(&self) -> String {
        format!("idx-{}", self.fields.join("-"))
    }

    /// An index is usable for a selector when every indexed field is constrained
    pub fn covers(&self, selector: &Selector) -> bool {
        !self.fields.is_empty() && self.fields.iter().all(|f| selector.constrains(f))
    }
}

/// Whether `create_index` made a new index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexOutcome {
    Created,
    Exists,
}

impl IndexOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexOutcome::Created => "created",
            IndexOutcome::Exists => "exists",
        }
    }
}

/// Acknowledgment returned by `create_index`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexAck {
    pub name: String,
    pub result: IndexOutcome,
}
