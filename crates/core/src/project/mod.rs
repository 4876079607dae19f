//! Project-level pass-through operations

pub mod service;

pub use service::ProjectService;
