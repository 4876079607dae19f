//! # Framesync App
//!
//! Host layer - operation dispatch, CLI surface and main entry point.
//!
//! This crate contains:
//! - Operation model and dispatcher (validate, connect, run, disconnect)
//! - Application context (dependency injection)
//! - Structured command logging
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - Provides the `framesync` command-line binary

pub mod cli;
pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::{
    execute, execute_batch, BatchEntry, FailedOperation, Operation, OperationOutput,
    OperationRequest,
};
pub use context::AppContext;
