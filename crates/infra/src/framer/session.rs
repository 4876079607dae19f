//! `FramerSession` over HTTP

use async_trait::async_trait;
use framesync_core::session::FramerSession;
use framesync_domain::{
    ChangeSet, ChangedPaths, CollectionItem, CollectionSummary, FieldDefinition, FieldInput,
    FramesyncError, Hostname, ProjectInfo, PublishResult, Result,
};
use reqwest::Method;
use tracing::{debug, info};

use super::api::{FramerApi, NO_BODY};
use super::wire::{
    AddFieldsRequest, AddItemsRequest, CreateCollectionRequest, ItemsEnvelope, RemoveItemsRequest,
};

/// One open Framer session
#[derive(Debug)]
pub struct HttpFramerSession {
    api: FramerApi,
    session_id: String,
}

impl HttpFramerSession {
    pub fn new(api: FramerApi, session_id: impl Into<String>) -> Self {
        Self { api, session_id: session_id.into() }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    async fn get<R: serde::de::DeserializeOwned>(&self, segments: &[&str]) -> Result<R> {
        let response =
            self.api.send(Method::GET, segments, &[], NO_BODY, Some(&self.session_id)).await?;
        FramerApi::read(response).await
    }

    async fn post<B, R>(&self, segments: &[&str], body: Option<&B>) -> Result<R>
    where
        B: serde::Serialize + ?Sized,
        R: serde::de::DeserializeOwned,
    {
        let response =
            self.api.send(Method::POST, segments, &[], body, Some(&self.session_id)).await?;
        FramerApi::read(response).await
    }
}

#[async_trait]
impl FramerSession for HttpFramerSession {
    async fn project_info(&self) -> Result<ProjectInfo> {
        self.get(&["v1", "project"]).await
    }

    async fn changed_paths(&self) -> Result<ChangedPaths> {
        self.get(&["v1", "project", "changed-paths"]).await
    }

    async fn change_contributors(
        &self,
        from_version: Option<u64>,
        to_version: Option<u64>,
    ) -> Result<Vec<String>> {
        let mut query = Vec::new();
        if let Some(version) = from_version {
            query.push(("fromVersion", version.to_string()));
        }
        if let Some(version) = to_version {
            query.push(("toVersion", version.to_string()));
        }
        let response = self
            .api
            .send(
                Method::GET,
                &["v1", "project", "change-contributors"],
                &query,
                NO_BODY,
                Some(&self.session_id),
            )
            .await?;
        FramerApi::read(response).await
    }

    async fn publish(&self) -> Result<PublishResult> {
        self.post(&["v1", "project", "publish"], NO_BODY).await
    }

    async fn deploy(&self, deployment_id: &str) -> Result<Vec<Hostname>> {
        self.post(&["v1", "deployments", deployment_id, "deploy"], NO_BODY).await
    }

    async fn create_managed_collection(&self, name: &str) -> Result<CollectionSummary> {
        self.post(&["v1", "collections"], Some(&CreateCollectionRequest { name })).await
    }

    async fn collections(&self) -> Result<Vec<CollectionSummary>> {
        self.get(&["v1", "collections"]).await
    }

    async fn collection(&self, collection_id: &str) -> Result<Option<CollectionSummary>> {
        match self.get(&["v1", "collections", collection_id]).await {
            Ok(collection) => Ok(Some(collection)),
            Err(FramesyncError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn collection_items(&self, collection_id: &str) -> Result<Vec<CollectionItem>> {
        let envelope: ItemsEnvelope = self.get(&["v1", "collections", collection_id, "items"]).await?;
        Ok(envelope.items)
    }

    async fn add_items(&self, collection_id: &str, items: &[ChangeSet]) -> Result<Vec<CollectionItem>> {
        let response = self
            .api
            .send(
                Method::POST,
                &["v1", "collections", collection_id, "items"],
                &[],
                Some(&AddItemsRequest { items }),
                Some(&self.session_id),
            )
            .await?;
        let confirmed = FramerApi::read_optional::<ItemsEnvelope>(response)
            .await?
            .map(|envelope| envelope.items)
            .unwrap_or_default();
        debug!(collection_id, sent = items.len(), confirmed = confirmed.len(), "items written");
        Ok(confirmed)
    }

    async fn remove_items(&self, collection_id: &str, item_ids: &[String]) -> Result<()> {
        self.api
            .send(
                Method::POST,
                &["v1", "collections", collection_id, "items", "remove"],
                &[],
                Some(&RemoveItemsRequest { item_ids }),
                Some(&self.session_id),
            )
            .await?;
        Ok(())
    }

    async fn fields(&self, collection_id: &str) -> Result<Vec<FieldDefinition>> {
        self.get(&["v1", "collections", collection_id, "fields"]).await
    }

    async fn add_fields(
        &self,
        collection_id: &str,
        fields: &[FieldInput],
    ) -> Result<Vec<FieldDefinition>> {
        self.post(&["v1", "collections", collection_id, "fields"], Some(&AddFieldsRequest { fields }))
            .await
    }

    async fn disconnect(&self) -> Result<()> {
        let outcome = self
            .api
            .send(Method::DELETE, &["v1", "sessions", self.session_id.as_str()], &[], NO_BODY, None)
            .await;
        match outcome {
            Ok(_) | Err(FramesyncError::NotFound(_)) => {
                info!(session_id = %self.session_id, "Framer session closed");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}
