//! Observer hooks for hosts that react to timeline state changes.

pub mod plugins;

pub use plugins::{PluginContext, TimelineEvent, TimelinePlugin};
