//! JSON envelopes exchanged with the Framer API

use framesync_domain::{ChangeSet, CollectionItem, FieldInput};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSessionRequest<'a> {
    pub project_url: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSessionResponse {
    #[serde(default)]
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct CreateCollectionRequest<'a> {
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct AddItemsRequest<'a> {
    pub items: &'a [ChangeSet],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveItemsRequest<'a> {
    pub item_ids: &'a [String],
}

#[derive(Debug, Serialize)]
pub struct AddFieldsRequest<'a> {
    pub fields: &'a [FieldInput],
}

/// `{ items }` wrapper used by both item endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ItemsEnvelope {
    #[serde(default)]
    pub items: Vec<CollectionItem>,
}
