//! Registry upstream subsystem.
//!
//! # Data Flow
//! ```text
//! handler
//!     → session.rs (acquire scoped session, enforce deadline)
//!     → client.rs (RegistryClient: build URL, send, decode)
//!     → types.rs (classify answer into UpstreamPayload)
//!     → back to handler for shaping
//! ```
//!
//! # Design Decisions
//! - The client sits behind a trait so handlers never see HTTP details
//! - One session per request; released by Drop on every path
//! - Calls are described by `calls.rs`, never by ad-hoc strings

pub mod calls;
pub mod client;
pub mod session;
pub mod types;

pub use calls::{UnknownCategory, UpstreamCall, VisualizationCategory};
pub use client::{ClientBuildError, HttpRegistryClient, RegistryClient};
pub use session::{UpstreamPool, UpstreamSession};
pub use types::{is_truthy, EmptyShape, UpstreamError, UpstreamPayload, UpstreamResult};
