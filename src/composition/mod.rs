//! # Assembly Pipeline
//!
//! The assembly engine coordinates asset discovery, segment synthesis,
//! timeline construction and the final presenter overlay into one batch run.

pub mod engine;
pub mod timeline;
pub mod workspace;

// Re-exports for convenience
pub use engine::{AssemblyEngine, Mode};
pub use timeline::{Span, SpanKind, Timeline};
pub use workspace::Workspace;
