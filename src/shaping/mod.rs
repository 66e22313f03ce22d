//! Response shaping subsystem.
//!
//! # Data Flow
//! ```text
//! UpstreamPayload(s)
//!     → normalize.rs (search answers → {"data": [...]})
//!     → merge.rs (several answers → one flat object)
//!     → envelope.rs ({success, message|error, data})
//! ```
//!
//! # Design Decisions
//! - Pure functions only; no I/O, no logging
//! - Record contents are never inspected beyond the keys being merged

pub mod envelope;
pub mod merge;
pub mod normalize;

pub use envelope::Envelope;
pub use merge::{merge, Extract, MergeField};
pub use normalize::{json_len, normalize};
