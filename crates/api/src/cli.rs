//! Command-line surface of the `framesync` binary
//!
//! JSON-valued arguments take inline JSON or `@path` to read a file.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use framesync_domain::{FramesyncError, Result};
use serde_json::Value;

use crate::commands::{Operation, OperationRequest};
use crate::utils::LogFormat;

#[derive(Debug, Parser)]
#[command(name = "framesync", version, about = "Sync JSON item batches into Framer CMS collections")]
pub struct Cli {
    /// Configuration file (JSON or TOML). Without it the environment is
    /// tried first, then probed config files.
    #[arg(long, global = true, env = "FRAMESYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Project URL to use instead of the configured one
    #[arg(long, global = true)]
    pub custom_url: Option<String>,

    /// Record failures in the output and keep going
    #[arg(long, global = true)]
    pub continue_on_fail: bool,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Host input record(s). An array runs the operation once per element.
    #[arg(long, global = true)]
    pub input_json: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show project name and id
    GetProjectInfo,
    /// List paths added, removed and modified since the last publish
    GetChangedPaths,
    /// List contributors between two versions (0 leaves a bound open)
    GetChangeContributors {
        #[arg(long, default_value_t = 0)]
        from_version: u64,
        #[arg(long, default_value_t = 0)]
        to_version: u64,
    },
    /// Publish a preview deployment
    Publish,
    /// Promote a deployment to production
    Deploy {
        #[arg(long)]
        deployment_id: String,
    },
    /// Publish, then deploy the new deployment
    PublishToProduction,
    CreateManagedCollection {
        #[arg(long)]
        name: String,
    },
    GetCollections,
    GetCollectionItems {
        #[arg(long)]
        collection_id: String,
        /// Return items exactly as Framer sent them
        #[arg(long)]
        raw: bool,
        #[arg(long)]
        include_enum_case_ids: bool,
    },
    /// Reconcile a collection against a desired item batch
    UpsertCollectionItems {
        #[arg(long)]
        collection_id: String,
        /// JSON array of items, or @path
        #[arg(long, default_value = "[]")]
        items: String,
        /// Send only changed fields (defaults to the configured mode)
        #[arg(long)]
        changed_fields_only: Option<bool>,
    },
    RemoveCollectionItems {
        #[arg(long)]
        collection_id: String,
        /// JSON array of item ids, or @path
        #[arg(long, default_value = "[]")]
        item_ids: String,
    },
    SetupCollectionFields {
        #[arg(long)]
        collection_id: String,
        /// JSON array of field definitions, or @path
        #[arg(long, default_value = "[]")]
        fields: String,
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        skip_existing: bool,
    },
}

impl Cli {
    /// Requests to run, one per host input record.
    ///
    /// # Errors
    /// `Precondition` when an `@path` cannot be read or `--input-json` is
    /// not valid JSON.
    pub fn requests(&self) -> Result<Vec<OperationRequest>> {
        let mut template = self.command.to_request()?;
        template.custom_url.clone_from(&self.custom_url);

        let inputs = match &self.input_json {
            None => vec![Value::Null],
            Some(arg) => {
                let text = read_arg(arg)?;
                match serde_json::from_str(&text).map_err(|err| {
                    FramesyncError::Precondition(format!("Input JSON is invalid: {err}"))
                })? {
                    Value::Array(records) => records,
                    record => vec![record],
                }
            }
        };

        Ok(inputs.into_iter().map(|input| OperationRequest { input, ..template.clone() }).collect())
    }
}

impl Command {
    pub fn operation(&self) -> Operation {
        match self {
            Self::GetProjectInfo => Operation::GetProjectInfo,
            Self::GetChangedPaths => Operation::GetChangedPaths,
            Self::GetChangeContributors { .. } => Operation::GetChangeContributors,
            Self::Publish => Operation::Publish,
            Self::Deploy { .. } => Operation::Deploy,
            Self::PublishToProduction => Operation::PublishToProduction,
            Self::CreateManagedCollection { .. } => Operation::CreateManagedCollection,
            Self::GetCollections => Operation::GetCollections,
            Self::GetCollectionItems { .. } => Operation::GetCollectionItems,
            Self::UpsertCollectionItems { .. } => Operation::UpsertCollectionItems,
            Self::RemoveCollectionItems { .. } => Operation::RemoveCollectionItems,
            Self::SetupCollectionFields { .. } => Operation::SetupCollectionFields,
        }
    }

    fn to_request(&self) -> Result<OperationRequest> {
        let mut request = OperationRequest::new(self.operation());
        match self {
            Self::GetChangeContributors { from_version, to_version } => {
                request.from_version = *from_version;
                request.to_version = *to_version;
            }
            Self::Deploy { deployment_id } => request.deployment_id.clone_from(deployment_id),
            Self::CreateManagedCollection { name } => request.collection_name.clone_from(name),
            Self::GetCollectionItems { collection_id, raw, include_enum_case_ids } => {
                request.collection_id.clone_from(collection_id);
                request.return_raw_item = *raw;
                request.include_enum_case_ids = *include_enum_case_ids;
            }
            Self::UpsertCollectionItems { collection_id, items, changed_fields_only } => {
                request.collection_id.clone_from(collection_id);
                request.items = read_arg(items)?;
                request.update_changed_fields_only = *changed_fields_only;
            }
            Self::RemoveCollectionItems { collection_id, item_ids } => {
                request.collection_id.clone_from(collection_id);
                request.item_ids = read_arg(item_ids)?;
            }
            Self::SetupCollectionFields { collection_id, fields, skip_existing } => {
                request.collection_id.clone_from(collection_id);
                request.fields = read_arg(fields)?;
                request.skip_existing_fields = *skip_existing;
            }
            Self::GetProjectInfo
            | Self::GetChangedPaths
            | Self::Publish
            | Self::PublishToProduction
            | Self::GetCollections => {}
        }
        Ok(request)
    }
}

fn read_arg(arg: &str) -> Result<String> {
    match arg.strip_prefix('@') {
        Some(path) => fs::read_to_string(path)
            .map_err(|err| FramesyncError::Precondition(format!("Failed to read {path}: {err}"))),
        None => Ok(arg.to_string()),
    }
}
