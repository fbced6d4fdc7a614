//! Round-based simulation of a linear production chain under random daily
//! capacity, the "factory dice game".
//!
//! A chain is a raw-material source followed by FIFO stations. Each round
//! every station rolls a capacity and moves `min(queue, capacity)` units one
//! step downstream. [`Game`] plays a configured number of rounds and
//! [`compare_alternatives`] replays the game under what-if configurations.

pub mod core;

// Re-export commonly used types
pub use crate::core::capacity::{CapacitySource, DiceRoller, ScriptedRolls};
pub use crate::core::errors::SimError;
pub use crate::core::execution::{
    choose_alternative, compare_alternatives, run_scenario, run_scenario_with, Alternative,
    AlternativeResult, ComparisonConfig, ComparisonReport, ConcurrencyMode, Game, GameConfig,
    RoundObserver, ScenarioOutcome,
};
pub use crate::core::round::{advance, InboundBuffers, RoundAccumulators, RoundRecord};
pub use crate::core::station::{initialize, Chain, Station, DEFAULT_STATION_COUNT};
pub use crate::core::tracker::{UnitLifetime, UnitTracker};
pub use crate::core::types::{CapacityRange, FinishedUnit, UnitId, WipLevel, WorkUnit};
