//! Collection service - item reads, reconciliation, removal and field setup

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use framesync_common::time::Sleeper;
use framesync_domain::{
    CollectionItem, CollectionSummary, EnumCaseResolution, FieldData, FieldInput, FieldType,
    FramesyncError, Result,
};
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::enum_cases::EnumCaseResolver;
use crate::reconcile::{ReconcileReport, ReconcileRequest, ResolutionPolicy, SyncCoordinator};
use crate::session::FramerSession;

/// Shape of items returned by [`CollectionService::items`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemsView {
    /// Return items exactly as the remote service sent them
    pub raw: bool,
    /// Attach enum case ids resolved from the collection's fields
    pub include_enum_case_ids: bool,
}

/// Remote item as received, plus resolved enum case ids
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    #[serde(flatten)]
    pub item: CollectionItem,
    pub enum_case_ids: BTreeMap<String, EnumCaseResolution>,
}

/// Normalized item plus resolved enum case ids
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappedItem {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub draft: bool,
    pub field_data: FieldData,
    pub enum_case_ids: BTreeMap<String, EnumCaseResolution>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ItemView {
    Raw(RawItem),
    Mapped(MappedItem),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalReport {
    pub collection_id: String,
    pub removed_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedField {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSetupReport {
    pub collection_id: String,
    pub requested_count: usize,
    pub created_count: usize,
    pub skipped_count: usize,
    pub skipped_field_names: Vec<String>,
    pub created_fields: Vec<CreatedField>,
}

/// Operations scoped to one collection of an open session
pub struct CollectionService {
    session: Arc<dyn FramerSession>,
    sleeper: Arc<dyn Sleeper>,
    policy: ResolutionPolicy,
}

impl CollectionService {
    pub fn new(session: Arc<dyn FramerSession>, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { session, sleeper, policy: ResolutionPolicy::default() }
    }

    /// Override post-write resolution bounds
    pub fn with_policy(mut self, policy: ResolutionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Read every item of a collection.
    pub async fn items(&self, collection_id: &str, view: ItemsView) -> Result<Vec<ItemView>> {
        let collection_id = require_collection_id(collection_id, "Get Collection Items")?;
        self.require_collection(collection_id).await?;

        let resolver = if view.include_enum_case_ids {
            EnumCaseResolver::new(&self.session.fields(collection_id).await?)
        } else {
            EnumCaseResolver::default()
        };

        let items = self.session.collection_items(collection_id).await?;
        debug!(collection_id, count = items.len(), raw = view.raw, "collection items fetched");

        Ok(items
            .into_iter()
            .map(|item| {
                let enum_case_ids = resolver.resolve(&item.field_data);
                if view.raw {
                    ItemView::Raw(RawItem { item, enum_case_ids })
                } else {
                    ItemView::Mapped(MappedItem {
                        id: item.id,
                        slug: item.slug,
                        draft: item.draft == Some(true),
                        field_data: item.field_data,
                        enum_case_ids,
                    })
                }
            })
            .collect())
    }

    /// Reconcile the collection against a desired item batch.
    pub async fn upsert_items(
        &self,
        request: &ReconcileRequest,
        cancel: &CancellationToken,
    ) -> Result<ReconcileReport> {
        let collection_id = require_collection_id(&request.collection_id, "Upsert Collection Items")?;
        self.require_collection(collection_id).await?;

        let report = SyncCoordinator::new(Arc::clone(&self.session), Arc::clone(&self.sleeper))
            .with_policy(self.policy)
            .reconcile(request, cancel)
            .await?;
        info!(
            collection_id,
            requested = request.len(),
            written = report.written,
            skipped = report.skipped,
            unresolved = report.unresolved.len(),
            attempts = report.resolution_attempts,
            "collection items reconciled"
        );
        Ok(report)
    }

    /// Delete items by id. `item_ids` must be a JSON array.
    pub async fn remove_items(&self, collection_id: &str, item_ids: &Value) -> Result<RemovalReport> {
        let collection_id = require_collection_id(collection_id, "Remove Collection Items")?;
        let Value::Array(entries) = item_ids else {
            return Err(FramesyncError::Precondition(
                "Item IDs JSON must be a JSON array of strings".into(),
            ));
        };
        let ids: Vec<String> = entries
            .iter()
            .map(|entry| match entry {
                Value::String(id) => id.clone(),
                other => other.to_string(),
            })
            .collect();

        self.require_collection(collection_id).await?;
        self.session.remove_items(collection_id, &ids).await?;
        info!(collection_id, removed = ids.len(), "collection items removed");

        Ok(RemovalReport { collection_id: collection_id.to_string(), removed_count: ids.len() })
    }

    /// Create fields, optionally skipping names that already exist.
    pub async fn setup_fields(
        &self,
        collection_id: &str,
        fields: &Value,
        skip_existing: bool,
    ) -> Result<FieldSetupReport> {
        let collection_id = require_collection_id(collection_id, "Setup Collection Fields")?;
        let requested = field_inputs(fields)?;
        self.require_collection(collection_id).await?;

        let mut skipped_field_names = Vec::new();
        let to_create: Vec<FieldInput> = if skip_existing {
            let existing: HashSet<String> = self
                .session
                .fields(collection_id)
                .await?
                .iter()
                .map(|field| normalize_name(&field.name))
                .filter(|name| !name.is_empty())
                .collect();

            requested
                .iter()
                .filter(|field| {
                    let name = field.name.as_deref().unwrap_or_default();
                    let exists = existing.contains(&normalize_name(name));
                    if exists {
                        skipped_field_names.push(name.to_string());
                    }
                    !exists
                })
                .cloned()
                .collect()
        } else {
            requested.clone()
        };

        let created =
            if to_create.is_empty() { Vec::new() } else { self.session.add_fields(collection_id, &to_create).await? };
        info!(
            collection_id,
            requested = requested.len(),
            created = created.len(),
            skipped = skipped_field_names.len(),
            "collection fields set up"
        );

        Ok(FieldSetupReport {
            collection_id: collection_id.to_string(),
            requested_count: requested.len(),
            created_count: created.len(),
            skipped_count: skipped_field_names.len(),
            skipped_field_names,
            created_fields: created
                .into_iter()
                .map(|field| CreatedField { id: field.id, name: field.name, field_type: field.field_type })
                .collect(),
        })
    }

    async fn require_collection(&self, collection_id: &str) -> Result<CollectionSummary> {
        self.session.collection(collection_id).await?.ok_or_else(|| {
            FramesyncError::NotFound(format!("Collection not found for ID: {collection_id}"))
        })
    }
}

/// Trimmed collection id, or the precondition error `operation` reports.
pub fn require_collection_id<'a>(collection_id: &'a str, operation: &str) -> Result<&'a str> {
    let trimmed = collection_id.trim();
    if trimmed.is_empty() {
        return Err(FramesyncError::Precondition(format!(
            "Collection ID is required for {operation} operation"
        )));
    }
    Ok(trimmed)
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

fn field_inputs(fields: &Value) -> Result<Vec<FieldInput>> {
    let Value::Array(entries) = fields else {
        return Err(FramesyncError::Precondition("Fields JSON must be a JSON array".into()));
    };

    entries
        .iter()
        .enumerate()
        .map(|(position, entry)| {
            let Value::Object(attributes) = entry else {
                return Err(FramesyncError::Precondition(format!(
                    "Fields JSON entry {position} must be an object"
                )));
            };
            let mut attributes = attributes.clone();
            let name = match attributes.remove("name") {
                Some(Value::String(name)) => Some(name),
                Some(Value::Number(number)) => Some(number.to_string()),
                _ => None,
            };
            Ok(FieldInput { name, attributes })
        })
        .collect()
}
