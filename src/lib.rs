//! timeline-rs: time-axis and row virtualization engine for zoomable,
//! hierarchical timelines.
//!
//! The engine converts between wall-clock time and pixels at any zoom,
//! derives the calendar header cells of every level, and computes which rows
//! and items of a nested row tree fall inside the vertical viewport. Drawing
//! is left to a [`render::Renderer`].

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod render;
pub mod telemetry;

pub use api::{ConfigUpdate, TimelineConfig, TimelineEngine};
pub use error::{TimelineError, TimelineResult};
