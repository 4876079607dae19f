//! Parsing of caller-supplied item batches

use framesync_domain::{DesiredItem, FieldData, FramesyncError, Result, SyncMode};
use serde_json::{Map, Value};

use super::hints::SyncHints;

/// A desired item plus the metadata echoed on its sync record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestedItem {
    pub desired: DesiredItem,
    pub hints: SyncHints,
}

impl From<DesiredItem> for RequestedItem {
    fn from(desired: DesiredItem) -> Self {
        Self { desired, hints: SyncHints::default() }
    }
}

/// One reconciliation call
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileRequest {
    pub collection_id: String,
    pub items: Vec<RequestedItem>,
    pub mode: SyncMode,
}

impl ReconcileRequest {
    pub fn new(collection_id: impl Into<String>, items: Vec<DesiredItem>, mode: SyncMode) -> Self {
        Self {
            collection_id: collection_id.into(),
            items: items.into_iter().map(RequestedItem::from).collect(),
            mode,
        }
    }

    /// Build a request from a JSON batch.
    ///
    /// `host_input` is the record that triggered the call; its metadata
    /// keys back-fill item hints.
    ///
    /// # Errors
    /// `FramesyncError::Precondition` when `items` is not an array or holds
    /// a non-object entry.
    pub fn from_json(
        collection_id: impl Into<String>,
        items: &Value,
        mode: SyncMode,
        host_input: &Value,
    ) -> Result<Self> {
        let Value::Array(entries) = items else {
            return Err(FramesyncError::Precondition("Items JSON must be a JSON array".into()));
        };
        let host = host_input.as_object();

        let items = entries
            .iter()
            .enumerate()
            .map(|(position, entry)| match entry {
                Value::Object(source) => Ok(RequestedItem {
                    desired: desired_item(source),
                    hints: SyncHints::collect(source, host),
                }),
                _ => Err(FramesyncError::Precondition(format!(
                    "Items JSON entry {position} must be an object"
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { collection_id: collection_id.into(), items, mode })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn desired_item(source: &Map<String, Value>) -> DesiredItem {
    DesiredItem {
        id: identity_text(source.get("id")),
        slug: identity_text(source.get("slug")),
        draft: source.get("draft").and_then(Value::as_bool),
        field_data: match source.get("fieldData") {
            Some(Value::Object(field_data)) => field_data.clone(),
            _ => FieldData::new(),
        },
    }
}

// Ids and slugs may arrive as numbers; blank strings count as absent.
fn identity_text(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}
