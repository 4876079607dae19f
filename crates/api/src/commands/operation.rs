//! Operation model shared by the CLI and library callers

use std::fmt;

use framesync_domain::FramesyncError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Every operation the host can run against a Framer project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    GetProjectInfo,
    GetChangedPaths,
    GetChangeContributors,
    Publish,
    Deploy,
    PublishToProduction,
    CreateManagedCollection,
    GetCollections,
    GetCollectionItems,
    UpsertCollectionItems,
    RemoveCollectionItems,
    SetupCollectionFields,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GetProjectInfo => "getProjectInfo",
            Self::GetChangedPaths => "getChangedPaths",
            Self::GetChangeContributors => "getChangeContributors",
            Self::Publish => "publish",
            Self::Deploy => "deploy",
            Self::PublishToProduction => "publishToProduction",
            Self::CreateManagedCollection => "createManagedCollection",
            Self::GetCollections => "getCollections",
            Self::GetCollectionItems => "getCollectionItems",
            Self::UpsertCollectionItems => "upsertCollectionItems",
            Self::RemoveCollectionItems => "removeCollectionItems",
            Self::SetupCollectionFields => "setupCollectionFields",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One operation and its parameters.
///
/// `items`, `item_ids` and `fields` hold JSON text; it is parsed when the
/// request is prepared so syntax errors surface before any remote call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRequest {
    pub operation: Operation,
    /// Project URL replacing the configured one for this request only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_url: Option<String>,
    #[serde(default)]
    pub collection_id: String,
    #[serde(default = "empty_json_array")]
    pub items: String,
    /// `None` falls back to the configured sync mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_changed_fields_only: Option<bool>,
    #[serde(default = "empty_json_array")]
    pub item_ids: String,
    #[serde(default = "empty_json_array")]
    pub fields: String,
    #[serde(default = "default_true")]
    pub skip_existing_fields: bool,
    #[serde(default)]
    pub deployment_id: String,
    #[serde(default)]
    pub collection_name: String,
    /// `0` means unbounded
    #[serde(default)]
    pub from_version: u64,
    /// `0` means unbounded
    #[serde(default)]
    pub to_version: u64,
    #[serde(default)]
    pub return_raw_item: bool,
    #[serde(default)]
    pub include_enum_case_ids: bool,
    /// Host record that triggered the request; its metadata back-fills
    /// sync records
    #[serde(default)]
    pub input: Value,
}

impl OperationRequest {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            custom_url: None,
            collection_id: String::new(),
            items: empty_json_array(),
            update_changed_fields_only: None,
            item_ids: empty_json_array(),
            fields: empty_json_array(),
            skip_existing_fields: true,
            deployment_id: String::new(),
            collection_name: String::new(),
            from_version: 0,
            to_version: 0,
            return_raw_item: false,
            include_enum_case_ids: false,
            input: Value::Null,
        }
    }
}

fn empty_json_array() -> String {
    "[]".to_string()
}

fn default_true() -> bool {
    true
}

/// Successful operation result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationOutput {
    pub operation: Operation,
    pub success: bool,
    pub result: Value,
}

impl OperationOutput {
    pub fn completed(operation: Operation, result: Value) -> Self {
        Self { operation, success: true, result }
    }
}

/// Failure recorded in place of a result when the batch continues on failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedOperation {
    pub success: bool,
    pub error: String,
}

impl From<&FramesyncError> for FailedOperation {
    fn from(error: &FramesyncError) -> Self {
        Self { success: false, error: error.to_string() }
    }
}

/// One entry of a batch run, in request order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BatchEntry {
    Completed(OperationOutput),
    Failed(FailedOperation),
}

impl BatchEntry {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}
