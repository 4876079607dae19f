//! Port interfaces for the remote Framer project

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use framesync_domain::{
    ChangeSet, ChangedPaths, CollectionItem, CollectionSummary, FieldDefinition, FieldInput,
    FramesyncError, Hostname, ProjectInfo, PublishResult, Result,
};

/// Project and credentials a session is opened against
#[derive(Clone, PartialEq, Eq)]
pub struct ProjectTarget {
    pub project_url: String,
    pub api_key: String,
}

impl ProjectTarget {
    /// Validate and trim connection inputs.
    ///
    /// # Errors
    /// Returns `FramesyncError::Config` when either value is blank.
    pub fn new(project_url: &str, api_key: &str) -> Result<Self> {
        let project_url = project_url.trim();
        if project_url.is_empty() {
            return Err(FramesyncError::Config(
                "Framer URL is empty. Set it in credentials or custom URL".into(),
            ));
        }
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(FramesyncError::Config("Framer API Key is empty in credentials".into()));
        }
        Ok(Self { project_url: project_url.to_string(), api_key: api_key.to_string() })
    }
}

impl fmt::Debug for ProjectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectTarget")
            .field("project_url", &self.project_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// An open connection to one Framer project
///
/// Item writes are not guaranteed to echo every written item back; callers
/// must not rely on the cardinality of `add_items` results.
#[async_trait]
pub trait FramerSession: Send + Sync {
    /// Fetch project metadata
    async fn project_info(&self) -> Result<ProjectInfo>;

    /// Paths changed since the last publish
    async fn changed_paths(&self) -> Result<ChangedPaths>;

    /// Users who contributed changes between two versions
    async fn change_contributors(
        &self,
        from_version: Option<u64>,
        to_version: Option<u64>,
    ) -> Result<Vec<String>>;

    /// Publish a preview deployment
    async fn publish(&self) -> Result<PublishResult>;

    /// Promote a deployment to the project's hostnames
    async fn deploy(&self, deployment_id: &str) -> Result<Vec<Hostname>>;

    /// Create a collection managed by this integration
    async fn create_managed_collection(&self, name: &str) -> Result<CollectionSummary>;

    /// List all collections in the project
    async fn collections(&self) -> Result<Vec<CollectionSummary>>;

    /// Look up one collection; `None` when it does not exist
    async fn collection(&self, collection_id: &str) -> Result<Option<CollectionSummary>>;

    /// Fetch every item of a collection
    async fn collection_items(&self, collection_id: &str) -> Result<Vec<CollectionItem>>;

    /// Create or update items in one batch
    async fn add_items(
        &self,
        collection_id: &str,
        items: &[ChangeSet],
    ) -> Result<Vec<CollectionItem>>;

    /// Delete items by id
    async fn remove_items(&self, collection_id: &str, item_ids: &[String]) -> Result<()>;

    /// Fetch the field schema of a collection
    async fn fields(&self, collection_id: &str) -> Result<Vec<FieldDefinition>>;

    /// Create fields on a collection
    async fn add_fields(
        &self,
        collection_id: &str,
        fields: &[FieldInput],
    ) -> Result<Vec<FieldDefinition>>;

    /// Close the session on the remote side
    async fn disconnect(&self) -> Result<()>;
}

/// Opens sessions against a project
#[async_trait]
pub trait SessionConnector: Send + Sync {
    /// Authenticate and open a session
    async fn connect(&self, target: &ProjectTarget) -> Result<Arc<dyn FramerSession>>;
}
