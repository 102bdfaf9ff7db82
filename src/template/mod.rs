//! # Template Analysis
//!
//! Detects the two color-keyed placeholder regions in a template frame: the
//! main screen (largest blob) and the anchor window (second largest).

pub mod detector;

pub use detector::{detect_regions, detect_regions_in, Region, TemplateRegions};
