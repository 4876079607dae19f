//! Collection field schema
//!
//! Field data on the wire is a tagged union keyed by field type
//! (`{"type": "enum", "value": "Draft"}`). Reconciliation never interprets
//! it; only enum resolution and field setup look inside.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field type tag as reported by the remote service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    Boolean,
    Color,
    Number,
    String,
    FormattedText,
    Image,
    File,
    Link,
    Date,
    Enum,
    CollectionReference,
    MultiCollectionReference,
    Array,
    Divider,
    #[serde(other)]
    Unsupported,
}

/// One option of an enum field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumCase {
    pub id: String,
    pub name: String,
}

/// A field of a collection schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Only populated for enum fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cases: Vec<EnumCase>,
}

/// Enum value on an item mapped back to its case id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumCaseResolution {
    pub field_name: String,
    pub case_name: String,
    pub case_id: String,
}

/// Caller-supplied definition of a field to create.
///
/// Everything except the name is forwarded untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// Unwrap a field data entry to the value it carries.
///
/// Entries shaped `{"type": .., "value": ..}` yield `value`; anything else is
/// returned as is.
pub fn raw_field_value(entry: &Value) -> &Value {
    match entry {
        Value::Object(map) => map.get("value").unwrap_or(entry),
        _ => entry,
    }
}
