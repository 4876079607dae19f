//! Host utilities: structured logging and command wrappers

pub mod command_helpers;
pub mod logging;

pub use command_helpers::execute_with_logging;
pub use logging::{error_label, init_tracing, log_command_execution, LogFormat};
