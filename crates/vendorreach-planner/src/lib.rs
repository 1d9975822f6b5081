//! # VendorReach Planner
//!
//! Daily outreach planning engine. Takes the vendor roster, outreach log,
//! stored sequences and settings and returns one agent's prioritized,
//! budget-capped task queue for today.
//!
//! ## Design Principles
//! - Pure and synchronous: no I/O, no hidden clock, never fails
//! - One captured [`Clock`](vendorreach_core::Clock) per plan
//! - Agents split the roster by vendor-id hash, no coordination needed
//!
//! ## Architecture
//! ```text
//! PlanInputs ─► Budget (today / week / safety ceilings)
//!            ─► Evaluator: per vendor, stored or derived sequence ─► candidates
//!                   └── priority score
//!            ─► allocate: sort ─► own shard ─► per-channel budget
//!            ─► sessions (overdue / follow-ups / outreach)
//!            ─► performance (yesterday, this week, hot leads)
//!            = DailyPlan
//! ```

pub mod budget;
pub mod catalog;
pub mod engine;
pub mod evaluator;
pub mod partition;
pub mod performance;
pub mod priority;
pub mod safety;
pub mod sessions;
pub mod tasks;

#[cfg(test)]
mod fixtures;

pub use budget::{Budget, ChannelProgress, DoneToday};
pub use catalog::SequenceTier;
pub use engine::{DailyPlan, PlanInputs, PlanOptions, build_daily_plan};
pub use evaluator::{Cursor, DueStep, SequenceState};
pub use partition::{Partition, shard_for};
pub use performance::{PerformanceSnapshot, TimeRecommendation};
pub use safety::{AccountAge, SafetyLimit};
pub use sessions::{Session, SessionChannel, SessionType};
pub use tasks::{DailyTask, TaskKind};
