//! Shared test helpers for `framesync-core` integration tests.
//!
//! The fake session keeps a tiny in-memory Framer project so tests can
//! script write confirmations, eventual visibility and transport failures.

#![allow(dead_code)]

pub mod session;

use framesync_domain::{CollectionItem, DesiredItem, FieldData};
use serde_json::Value;

pub use session::{FakeConnector, FakeSession, WriteMode};

pub fn fields(value: Value) -> FieldData {
    value.as_object().cloned().unwrap_or_default()
}

pub fn remote_item(id: &str, slug: &str, field_data: Value) -> CollectionItem {
    CollectionItem {
        id: id.into(),
        slug: Some(slug.into()),
        draft: Some(false),
        field_data: fields(field_data),
        ..CollectionItem::default()
    }
}

pub fn desired(id: Option<&str>, slug: Option<&str>, field_data: Value) -> DesiredItem {
    DesiredItem {
        id: id.map(Into::into),
        slug: slug.map(Into::into),
        draft: None,
        field_data: fields(field_data),
    }
}
