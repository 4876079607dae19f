//! Project service - metadata, publishing and collection management

use std::sync::Arc;

use framesync_domain::{
    ChangedPaths, CollectionSummary, FramesyncError, Hostname, ProductionRelease, ProjectInfo,
    PublishResult, Result,
};
use tracing::info;

use crate::session::FramerSession;

/// Project operations over an open session
pub struct ProjectService {
    session: Arc<dyn FramerSession>,
}

impl ProjectService {
    pub fn new(session: Arc<dyn FramerSession>) -> Self {
        Self { session }
    }

    pub async fn project_info(&self) -> Result<ProjectInfo> {
        self.session.project_info().await
    }

    pub async fn changed_paths(&self) -> Result<ChangedPaths> {
        self.session.changed_paths().await
    }

    /// Contributors between two versions; `0` leaves a bound open.
    pub async fn change_contributors(&self, from_version: u64, to_version: u64) -> Result<Vec<String>> {
        let bound = |version: u64| (version > 0).then_some(version);
        self.session.change_contributors(bound(from_version), bound(to_version)).await
    }

    pub async fn publish(&self) -> Result<PublishResult> {
        let result = self.session.publish().await?;
        info!(deployment_id = result.deployment_id().unwrap_or_default(), "project published");
        Ok(result)
    }

    pub async fn deploy(&self, deployment_id: &str) -> Result<Vec<Hostname>> {
        let deployment_id = deployment_id.trim();
        if deployment_id.is_empty() {
            return Err(FramesyncError::Precondition(
                "Deployment ID is required for Deploy operation".into(),
            ));
        }
        let hostnames = self.session.deploy(deployment_id).await?;
        info!(deployment_id, hostnames = hostnames.len(), "deployment promoted");
        Ok(hostnames)
    }

    /// Publish, then deploy the resulting deployment.
    ///
    /// # Errors
    /// `FramesyncError::Internal` when the publish returns no deployment id;
    /// nothing is deployed in that case.
    pub async fn publish_to_production(&self) -> Result<ProductionRelease> {
        let publish = self.publish().await?;
        let Some(deployment_id) = publish.deployment_id().map(str::to_string) else {
            return Err(FramesyncError::Internal(
                "Publish did not return a deployment ID, cannot deploy to production".into(),
            ));
        };
        let deploy = self.deploy(&deployment_id).await?;
        Ok(ProductionRelease { publish, deploy })
    }

    pub async fn create_managed_collection(&self, name: &str) -> Result<CollectionSummary> {
        if name.trim().is_empty() {
            return Err(FramesyncError::Precondition(
                "Collection Name is required for Create Managed Collection operation".into(),
            ));
        }
        let collection = self.session.create_managed_collection(name).await?;
        info!(collection_id = %collection.id, name, "managed collection created");
        Ok(collection)
    }

    pub async fn collections(&self) -> Result<Vec<CollectionSummary>> {
        self.session.collections().await
    }
}
