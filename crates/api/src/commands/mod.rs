//! Operations the host runs against a Framer project

pub mod dispatch;
pub mod operation;

pub use dispatch::{execute, execute_batch};
pub use operation::{BatchEntry, FailedOperation, Operation, OperationOutput, OperationRequest};
