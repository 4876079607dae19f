//! Command execution helpers
//!
//! Wraps an operation with timing and the structured outcome log line.

use std::future::Future;
use std::time::Instant;

use framesync_domain::Result as DomainResult;

use crate::utils::logging::{error_label, log_command_execution};

/// Execute a command with automatic timing and logging
///
/// # Example
///
/// ```rust,ignore
/// let info = execute_with_logging("getProjectInfo", || async {
///     ProjectService::new(session).project_info().await
/// })
/// .await?;
/// ```
pub async fn execute_with_logging<F, Fut, T>(command_name: &str, command_fn: F) -> DomainResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = DomainResult<T>>,
{
    let start = Instant::now();

    let result = command_fn().await;

    let error_type = result.as_ref().err().map(error_label);
    log_command_execution(command_name, start.elapsed(), error_type);

    result
}
