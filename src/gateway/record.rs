//! Record model
//!
//! Records share one collection with the sequence counter. They are told
//! apart by the `kind` discriminator, which decodes into the closed [`Kind`]
//! enum at the store boundary.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{GatewayError, GatewayResult};
use crate::store::Document;

/// Discriminator field name
pub const KIND_FIELD: &str = "kind";

/// Name field
pub const NAME_FIELD: &str = "name";

/// Entity kinds stored in the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Record,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Record => "record",
        }
    }
}

/// A record to be created; the id is assigned by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    pub name: String,
}

impl NewRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A stored record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub name: String,
    pub kind: Kind,

    /// Store revision, required to update or delete
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
}

impl Record {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: Kind::Record,
            rev: None,
        }
    }

    /// Encode for the store
    pub fn to_document(&self) -> Document {
        Document {
            id: self.id.clone(),
            rev: self.rev.clone(),
            body: Default::default(),
        }
        .with_field(NAME_FIELD, self.name.clone())
        .with_field(KIND_FIELD, self.kind.as_str())
    }

    /// Decode a stored document, rejecting anything that is not a record
    pub fn from_document(doc: Document) -> GatewayResult<Self> {
        let kind = match doc.body.get(KIND_FIELD) {
            Some(v) => serde_json::from_value::<Kind>(v.clone())
                .map_err(|e| GatewayError::schema(&doc.id, e.to_string()))?,
            None => return Err(GatewayError::schema(&doc.id, "missing kind")),
        };

        let name = match doc.body.get(NAME_FIELD) {
            Some(Value::String(s)) => s.clone(),
            Some(_) => return Err(GatewayError::schema(&doc.id, "name is not a string")),
            None => return Err(GatewayError::schema(&doc.id, "missing name")),
        };

        Ok(Self {
            id: doc.id,
            name,
            kind,
            rev: doc.rev,
        })
    }
}

/// Target of a delete: a record or a bare id
#[derive(Debug, Clone, Copy)]
pub enum RecordRef<'a> {
    Id(&'a str),
    Record(&'a Record),
}

impl<'a> RecordRef<'a> {
    pub fn id(&self) -> &'a str {
        match *self {
            RecordRef::Id(id) => id,
            RecordRef::Record(r) => &r.id,
        }
    }
}

impl<'a> From<&'a str> for RecordRef<'a> {
    fn from(id: &'a str) -> Self {
        RecordRef::Id(id)
    }
}

impl<'a> From<&'a String> for RecordRef<'a> {
    fn from(id: &'a String) -> Self {
        RecordRef::Id(id)
    }
}

impl<'a> From<&'a Record> for RecordRef<'a> {
    fn from(record: &'a Record) -> Self {
        RecordRef::Record(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_shape() {
        let doc = Record::new("1", "Spark").to_document();
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({ "_id": "1", "kind": "record", "name": "Spark" })
        );
    }

    #[test]
    fn test_decode_roundtrip_keeps_rev() {
        let mut record = Record::new("3", "Glow");
        record.rev = Some("2-abc".into());
        let back = Record::from_document(record.to_document()).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_counter_is_not_a_record() {
        let counter = Document::new("seq").with_field("value", 4);
        let err = Record::from_document(counter).unwrap_err();
        assert_eq!(err.code(), "DOCGATE_SCHEMA_MISMATCH");
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let doc = Document::new("9")
            .with_field("kind", "villain")
            .with_field("name", "x");
        assert!(Record::from_document(doc).is_err());
    }

    #[test]
    fn test_non_string_name_rejected() {
        let doc = Document::new("9")
            .with_field("kind", "record")
            .with_field("name", 5);
        assert!(Record::from_document(doc).is_err());
    }

    #[test]
    fn test_record_ref_id() {
        let record = Record::new("5", "x");
        assert_eq!(RecordRef::from(&record).id(), "5");
        assert_eq!(RecordRef::from("6").id(), "6");
        let owned = String::from("7");
        assert_eq!(RecordRef::from(&owned).id(), "7");
    }
}
