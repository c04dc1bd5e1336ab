// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Turn costs: classification of turns by the change of heading at a junction,
//! and sparse storage of per-turn costs computed during import.
//!
//! Costs are expressed in seconds, with [f64::INFINITY] marking forbidden turns.

mod classifier;
mod config;
mod storage;

pub use classifier::{
    classify, to_millis, CombinedTurnCostProvider, DefaultTurnCostProvider, DrivingSide,
    StoredTurnCostProvider, TurnClass, TurnCostProvider,
};
pub use config::TurnCostConfig;
pub use storage::{TurnCostEntry, TurnCostStorage, TurnKey};
