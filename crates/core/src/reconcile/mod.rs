//! Collection item reconciliation
//!
//! Takes a desired list of items and makes a remote collection match it:
//! - [`stable`]: key-order independent encoding used for equality
//! - [`identity`]: id/slug lookup over a collection snapshot
//! - [`change_set`]: minimal write payload per item
//! - [`hints`] and [`request`]: parsing of caller batches and metadata
//! - [`coordinator`]: the diff, write and resolve state machine

pub mod change_set;
pub mod coordinator;
pub mod hints;
pub mod identity;
pub mod request;
pub mod stable;

pub use coordinator::{ReconcileReport, ResolutionPolicy, SyncCoordinator};
pub use hints::SyncHints;
pub use identity::IdentityIndex;
pub use request::{ReconcileRequest, RequestedItem};
