//! # VendorReach Core
//!
//! Shared building blocks for the outreach planner and its stores:
//! the vendor/log/sequence data model, the per-agent settings map,
//! the planning clock, the error type and the TOML configuration.

pub mod clock;
pub mod config;
pub mod error;
pub mod settings;
pub mod types;

pub use clock::Clock;
pub use config::{ReachConfig, SkipPolicy};
pub use error::{ReachError, Result};
pub use settings::{SettingKey, Settings};
pub use types::{
    Channel, ChannelStatus, LogAction, LogEntry, OverallStatus, PerChannel, Sequence,
    SequenceStep, StepChannel, StepKind, Vendor,
};
