//! Caller metadata carried alongside each desired item
//!
//! Upstream pipelines tag items with their source-system identifiers and
//! content hashes. These are echoed back on the sync records. Item-level
//! keys win; the host input record is the fallback. Empty strings, zero,
//! `false` and `null` count as absent.

use serde_json::{Map, Value};

/// Metadata hints for one item
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncHints {
    pub notion_page_id: Option<String>,
    pub framer_item_id: Option<String>,
    pub last_sync_hash: Option<String>,
    pub content_hash: Option<String>,
    pub name: Option<String>,
    /// Explicit override, only when the item carries a JSON boolean.
    pub has_framer_id: Option<bool>,
    /// Explicit override, only when the item carries a JSON boolean.
    pub is_changed: Option<bool>,
}

impl SyncHints {
    pub fn collect(item: &Map<String, Value>, host: Option<&Map<String, Value>>) -> Self {
        let empty = Map::new();
        let host = host.unwrap_or(&empty);

        Self {
            notion_page_id: first_text(item, &["notionPageId", "notionId"])
                .or_else(|| first_text(host, &["notionPageId", "notionId", "id"])),
            framer_item_id: first_text(item, &["framerItemId", "framer_item_id"])
                .or_else(|| first_text(host, &["framerItemId", "framer_item_id"])),
            last_sync_hash: first_text(item, &["lastSyncHash", "last_sync_hash"])
                .or_else(|| first_text(host, &["lastSyncHash", "last_sync_hash"])),
            content_hash: first_text(item, &["contentHash", "content_hash"])
                .or_else(|| first_text(host, &["contentHash", "content_hash"])),
            name: first_text(item, &["name", "title", "slug"])
                .or_else(|| first_text(host, &["name", "title", "property_title"])),
            has_framer_id: item.get("hasFramerId").and_then(Value::as_bool),
            is_changed: item.get("isChanged").and_then(Value::as_bool),
        }
    }
}

fn first_text(source: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| source.get(*key).and_then(truthy_text))
}

fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) if number.as_f64().is_some_and(|n| n != 0.0) => {
            Some(number.to_string())
        }
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}
