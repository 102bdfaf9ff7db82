//! # Clip Synthesis
//!
//! Produces the clips the timeline is assembled from: per-segment slideshows
//! (flat or template-composited), the normalized transition, and the prepared
//! presenter overlay.

pub mod overlay;
pub mod segment;
pub mod transition;

pub use segment::{BuiltSegment, SegmentBuilder};
pub use transition::NormalizedTransition;
