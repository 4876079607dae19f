//! # Framesync Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces for the remote Framer session
//! - The collection item reconciliation engine
//! - Collection and project services
//!
//! ## Architecture Principles
//! - Only depends on `framesync-common` and `framesync-domain`
//! - No HTTP or platform code
//! - All external dependencies via traits
//! - Time and cancellation injected, so every path is testable

pub mod collections;
pub mod project;
pub mod reconcile;
pub mod session;

// Re-export specific items to avoid ambiguity
pub use collections::{require_collection_id, CollectionService, EnumCaseResolver, ItemView, ItemsView};
pub use project::ProjectService;
pub use reconcile::{
    IdentityIndex, ReconcileReport, ReconcileRequest, ResolutionPolicy, SyncCoordinator, SyncHints,
};
pub use session::{with_session, FramerSession, ProjectTarget, SessionConnector, SessionGuard};
