//! # Newsreel
//!
//! Assemble a finished news video from a folder of per-segment audio tracks,
//! numbered image folders, and optional overlay assets: a color-keyed
//! template frame, anchor footage, a transition clip, and a looping presenter
//! clip.
//!
//! Pixel work is delegated to an external FFmpeg installation; this library
//! derives the declarative filter graphs, does the duration bookkeeping, and
//! drives the batch pipeline.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use newsreel::{
//!     composition::{AssemblyEngine, Mode},
//!     config::Config,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let engine = AssemblyEngine::new(Config::default());
//! let output = engine
//!     .create_final_video("my_project/".as_ref(), Mode::Template)
//!     .await?;
//! println!("Wrote {:?}", output);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`assets`] - Asset discovery and numeric ordering
//! - [`template`] - Key-color region detection in template frames
//! - [`media`] - Filter construction and the external transcoder boundary
//! - [`video`] - Segment, transition and presenter clip synthesis
//! - [`composition`] - Timeline assembly and the orchestrating engine
//!
//! ## Project layout convention
//!
//! Audio tracks sit directly in the project folder; each one pairs with the
//! image folder holding the same position in numeric order. `output/` and
//! `temp/` are reserved for the engine. `template.png`, `anchor.mp4`,
//! `transition.mp4` and `record.mp4` are recognized by name when present.

pub mod assets;
pub mod composition;
pub mod config;
pub mod error;
pub mod media;
pub mod template;
pub mod video;

// Re-export commonly used types for convenience
pub use crate::{
    composition::{AssemblyEngine, Mode},
    config::Config,
    error::{AssemblyError, Result},
    template::{Region, TemplateRegions},
};
