//! # VendorReach Store
//!
//! SQLite persistence for the planner's inputs and the outreach workflow
//! that mutates them.
//!
//! - [`ReachDb`]: vendors, outreach log, sequences, settings
//! - [`outreach`]: sent / skip / revert / response operations, one transaction each
//! - [`snapshot`]: JSON import and export in the `PlanInputs` layout

pub mod db;
pub mod outreach;
pub mod snapshot;

pub use db::ReachDb;
pub use snapshot::{ImportSummary, read_snapshot, write_snapshot};
