mod config_update;
mod engine;
mod engine_accessors;
mod engine_config;
mod engine_core;
mod engine_init;
mod engine_snapshot;
mod json_contract;
mod plugin_dispatch;
mod recalculation_trigger;
mod recompute_latch;
mod render_coordinator;
mod time_controller;
mod time_window_calculator;
mod tree_controller;
mod update_topics;
mod validation;

pub use config_update::ConfigUpdate;
pub use engine::TimelineEngine;
pub use engine_config::{ListConfig, ScrollConfig, TimeConfig, TimelineConfig};
pub use engine_snapshot::EngineSnapshot;
pub use json_contract::{ENGINE_SNAPSHOT_JSON_SCHEMA_V1, EngineSnapshotJsonContractV1};
pub use recalculation_trigger::{RecalculationReason, RecalculationTrigger, TriggerSnapshot};
pub use recompute_latch::RecomputeLatch;
pub use time_controller::RecomputeOutcome;
pub use time_window_calculator::{
    ItemBounds, SkipReason, TimeWindowCalculator, TimeWindowInput, TimeWindowOutcome,
    WindowCalculation,
};
pub use update_topics::{UpdateTopic, UpdateTopics};

pub use crate::extensions::{PluginContext, TimelineEvent, TimelinePlugin};
