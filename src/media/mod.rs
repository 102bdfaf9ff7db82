//! # Media Engine Boundary
//!
//! Everything that touches the external transcoding engine lives here: the
//! deterministic filter-string builders, the pure argument-vector builders for
//! each transcode job, and the `FfmpegEngine` that actually runs them.

pub mod engine;
pub mod filters;
pub mod jobs;

pub use engine::FfmpegEngine;
