//! Framer HTTP adapter
//!
//! Implements the session ports of `framesync-core` over the Framer JSON API:
//! - [`api`]: authenticated request building and status mapping
//! - [`wire`]: request and response envelopes
//! - [`session`]: the per-session [`FramerSession`] implementation
//! - [`connector`]: opens sessions for a project target
//!
//! [`FramerSession`]: framesync_core::session::FramerSession

pub mod api;
pub mod connector;
pub mod session;
pub mod wire;

pub use api::FramerApi;
pub use connector::HttpSessionConnector;
pub use session::HttpFramerSession;
