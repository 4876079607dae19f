//! Remote session ports and scoped session lifetime

pub mod guard;
pub mod ports;

pub use guard::{with_session, SessionGuard};
pub use ports::{FramerSession, ProjectTarget, SessionConnector};
