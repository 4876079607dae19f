//! Project, publish and deployment records

use serde::{Deserialize, Serialize};

/// Basic project metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version1_id: Option<String>,
}

/// Paths changed since the last publish
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangedPaths {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub modified: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Deployment {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A hostname a deployment is (or can be) served from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hostname {
    pub hostname: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub deployment_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PublishResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment: Option<Deployment>,
    #[serde(default)]
    pub hostnames: Vec<Hostname>,
}

impl PublishResult {
    /// Deployment id, if the publish produced a usable one.
    pub fn deployment_id(&self) -> Option<&str> {
        self.deployment.as_ref().map(|d| d.id.trim()).filter(|id| !id.is_empty())
    }
}

/// Publish followed by promotion to production
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionRelease {
    pub publish: PublishResult,
    pub deploy: Vec<Hostname>,
}

/// Collection listing entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    pub id: String,
    pub name: String,
    #[serde(default = "default_managed_by")]
    pub managed_by: String,
}

fn default_managed_by() -> String {
    "user".to_string()
}
