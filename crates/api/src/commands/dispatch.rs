//! Operation dispatch
//!
//! Every request is validated before a session is opened, then runs inside
//! [`with_session`] so the session is released whatever the outcome.

use std::sync::Arc;

use framesync_core::{
    require_collection_id, with_session, CollectionService, FramerSession, ItemsView,
    ProjectService, ReconcileRequest,
};
use framesync_domain::{FramesyncError, Result, SyncMode};
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{info_span, warn, Instrument};
use uuid::Uuid;

use super::operation::{BatchEntry, FailedOperation, Operation, OperationOutput, OperationRequest};
use crate::context::AppContext;
use crate::utils::execute_with_logging;

/// Run one operation against the configured project.
///
/// # Errors
/// `Config` for a blank project URL or API key, `Precondition` for
/// malformed parameters (both raised before connecting), or whatever the
/// remote call fails with.
pub async fn execute(
    ctx: &AppContext,
    request: &OperationRequest,
    cancel: &CancellationToken,
) -> Result<OperationOutput> {
    let operation = request.operation;
    let operation_id = Uuid::now_v7();
    let span = info_span!("operation", %operation_id, operation = operation.as_str());

    async {
        let result =
            execute_with_logging(operation.as_str(), || run(ctx, request, cancel)).await?;
        Ok::<_, FramesyncError>(OperationOutput::completed(operation, result))
    }
    .instrument(span)
    .await
}

/// Run requests in order.
///
/// With `continue_on_fail` a failing request becomes a
/// [`FailedOperation`] entry and the batch goes on; otherwise the first
/// error aborts the batch. Cancellation always stops the batch before the
/// next request starts.
pub async fn execute_batch(
    ctx: &AppContext,
    requests: &[OperationRequest],
    continue_on_fail: bool,
    cancel: &CancellationToken,
) -> Result<Vec<BatchEntry>> {
    let mut entries = Vec::with_capacity(requests.len());

    for (index, request) in requests.iter().enumerate() {
        if cancel.is_cancelled() {
            return Err(FramesyncError::Cancelled(format!(
                "batch cancelled before request {index}"
            )));
        }

        match execute(ctx, request, cancel).await {
            Ok(output) => entries.push(BatchEntry::Completed(output)),
            Err(err) if continue_on_fail => {
                warn!(index, operation = %request.operation, error = %err, "operation failed, continuing");
                entries.push(BatchEntry::Failed(FailedOperation::from(&err)));
            }
            Err(err) => return Err(err),
        }
    }

    Ok(entries)
}

async fn run(ctx: &AppContext, request: &OperationRequest, cancel: &CancellationToken) -> Result<Value> {
    let target = ctx.target(request.custom_url.as_deref())?;
    let prepared = Prepared::from_request(ctx, request)?;

    with_session(ctx.connector.as_ref(), &target, |session| prepared.run(ctx, session, cancel)).await
}

/// A request with its parameters validated and parsed
#[derive(Debug)]
enum Prepared {
    ProjectInfo,
    ChangedPaths,
    ChangeContributors { from_version: u64, to_version: u64 },
    Publish,
    Deploy { deployment_id: String },
    PublishToProduction,
    CreateManagedCollection { name: String },
    Collections,
    Items { collection_id: String, view: ItemsView },
    Upsert(ReconcileRequest),
    Remove { collection_id: String, item_ids: Value },
    SetupFields { collection_id: String, fields: Value, skip_existing: bool },
}

impl Prepared {
    fn from_request(ctx: &AppContext, request: &OperationRequest) -> Result<Self> {
        let prepared = match request.operation {
            Operation::GetProjectInfo => Self::ProjectInfo,
            Operation::GetChangedPaths => Self::ChangedPaths,
            Operation::GetChangeContributors => Self::ChangeContributors {
                from_version: request.from_version,
                to_version: request.to_version,
            },
            Operation::Publish => Self::Publish,
            Operation::Deploy => Self::Deploy { deployment_id: request.deployment_id.clone() },
            Operation::PublishToProduction => Self::PublishToProduction,
            Operation::CreateManagedCollection => {
                Self::CreateManagedCollection { name: request.collection_name.clone() }
            }
            Operation::GetCollections => Self::Collections,
            Operation::GetCollectionItems => Self::Items {
                collection_id: require_collection_id(&request.collection_id, "Get Collection Items")?
                    .to_string(),
                view: ItemsView {
                    raw: request.return_raw_item,
                    include_enum_case_ids: request.include_enum_case_ids,
                },
            },
            Operation::UpsertCollectionItems => {
                let collection_id =
                    require_collection_id(&request.collection_id, "Upsert Collection Items")?;
                let items = parse_json(&request.items, "Items")?;
                let mode = request
                    .update_changed_fields_only
                    .map_or_else(|| ctx.default_mode(), SyncMode::from_changed_fields_only);
                Self::Upsert(ReconcileRequest::from_json(collection_id, &items, mode, &request.input)?)
            }
            Operation::RemoveCollectionItems => Self::Remove {
                collection_id: require_collection_id(
                    &request.collection_id,
                    "Remove Collection Items",
                )?
                .to_string(),
                item_ids: parse_json(&request.item_ids, "Item IDs")?,
            },
            Operation::SetupCollectionFields => Self::SetupFields {
                collection_id: require_collection_id(
                    &request.collection_id,
                    "Setup Collection Fields",
                )?
                .to_string(),
                fields: parse_json(&request.fields, "Fields")?,
                skip_existing: request.skip_existing_fields,
            },
        };
        Ok(prepared)
    }

    async fn run(
        self,
        ctx: &AppContext,
        session: Arc<dyn FramerSession>,
        cancel: &CancellationToken,
    ) -> Result<Value> {
        match self {
            Self::ProjectInfo => to_result(&ProjectService::new(session).project_info().await?),
            Self::ChangedPaths => to_result(&ProjectService::new(session).changed_paths().await?),
            Self::ChangeContributors { from_version, to_version } => to_result(
                &ProjectService::new(session).change_contributors(from_version, to_version).await?,
            ),
            Self::Publish => to_result(&ProjectService::new(session).publish().await?),
            Self::Deploy { deployment_id } => {
                to_result(&ProjectService::new(session).deploy(&deployment_id).await?)
            }
            Self::PublishToProduction => {
                to_result(&ProjectService::new(session).publish_to_production().await?)
            }
            Self::CreateManagedCollection { name } => {
                to_result(&ProjectService::new(session).create_managed_collection(&name).await?)
            }
            Self::Collections => to_result(&ProjectService::new(session).collections().await?),
            Self::Items { collection_id, view } => {
                to_result(&collections(ctx, session).items(&collection_id, view).await?)
            }
            Self::Upsert(request) => {
                let report = collections(ctx, session).upsert_items(&request, cancel).await?;
                if report.cancelled {
                    warn!(
                        unresolved = report.unresolved.len(),
                        "resolution cancelled, returning records resolved so far"
                    );
                }
                to_result(&report.records)
            }
            Self::Remove { collection_id, item_ids } => {
                to_result(&collections(ctx, session).remove_items(&collection_id, &item_ids).await?)
            }
            Self::SetupFields { collection_id, fields, skip_existing } => to_result(
                &collections(ctx, session).setup_fields(&collection_id, &fields, skip_existing).await?,
            ),
        }
    }
}

fn collections(ctx: &AppContext, session: Arc<dyn FramerSession>) -> CollectionService {
    CollectionService::new(session, Arc::clone(&ctx.sleeper)).with_policy(ctx.policy)
}

fn parse_json(text: &str, label: &str) -> Result<Value> {
    serde_json::from_str(text)
        .map_err(|err| FramesyncError::Precondition(format!("{label} JSON is invalid: {err}")))
}

fn to_result<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|err| FramesyncError::Internal(format!("failed to encode result: {err}")))
}
