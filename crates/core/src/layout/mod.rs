//! The timeline layout engine.
//!
//! [`LayoutEngine::compute`] turns an unordered activity snapshot plus the
//! width the presentation layer can offer into x positions, lanes and a
//! scroll-vs-scale decision. [`placement`] derives the vertical geometry
//! (markers, connectors, boxes) from that result for a given mode.

pub mod cache;
pub mod config;
pub mod engine;
pub mod placement;

pub use cache::{CacheStats, LayoutCache};
pub use config::{InvalidConfigError, LayoutConfig, LayoutMode, UnknownModeError};
pub use engine::{
    Lane, LayoutEngine, LayoutPosition, LayoutResult, NaturalLayout, ValidationError,
    compute_layout, natural_positions,
};
pub use placement::{Placement, place, required_height};
