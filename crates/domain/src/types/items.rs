//! Collection item records
//!
//! All records here are immutable per-request values. The remote service is
//! the only durable source of truth.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field values keyed by field id. Treated as opaque JSON by reconciliation.
pub type FieldData = Map<String, Value>;

/// One item the caller wants the remote collection to contain.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesiredItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
    #[serde(default)]
    pub field_data: FieldData,
}

/// A collection item as the remote service returns it.
///
/// Unknown attributes are kept in `extra` so raw reads can hand the item
/// back untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionItem {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
    #[serde(default)]
    pub field_data: FieldData,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Normalized read model of a remote item.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteItemSummary {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub field_data: FieldData,
}

impl From<&CollectionItem> for RemoteItemSummary {
    fn from(item: &CollectionItem) -> Self {
        Self {
            id: item.id.clone(),
            slug: item.slug.clone(),
            draft: item.draft == Some(true),
            field_data: item.field_data.clone(),
        }
    }
}

impl From<CollectionItem> for RemoteItemSummary {
    fn from(item: CollectionItem) -> Self {
        Self {
            id: item.id,
            slug: item.slug,
            draft: item.draft == Some(true),
            field_data: item.field_data,
        }
    }
}

/// Minimal write payload for one item.
///
/// `field_data`, when present, only holds fields that differ from the
/// matched remote item.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_data: Option<FieldData>,
}

impl ChangeSet {
    /// True when the payload carries nothing at all.
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.slug.is_none()
            && self.draft.is_none()
            && self.field_data.as_ref().map_or(true, Map::is_empty)
    }
}

/// How desired items are turned into write payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SyncMode {
    /// Send only fields whose value changed; unchanged items are skipped.
    #[default]
    DiffChangedOnly,
    /// Send every desired item with its full field data.
    ReplaceFull,
}

impl SyncMode {
    pub fn from_changed_fields_only(changed_only: bool) -> Self {
        if changed_only {
            Self::DiffChangedOnly
        } else {
            Self::ReplaceFull
        }
    }
}

/// Per-item outcome of a reconciliation, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRecord {
    pub notion_page_id: String,
    pub framer_item_id: String,
    pub last_sync_hash: String,
    pub content_hash: String,
    pub has_framer_id: bool,
    pub is_changed: bool,
    pub name: String,
}
