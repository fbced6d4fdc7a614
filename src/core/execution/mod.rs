pub mod config;
pub mod game;
pub mod scenario;

// Re-export commonly used types
pub use config::{ComparisonConfig, ConcurrencyMode, GameConfig};
pub use game::{Game, RoundObserver};
pub use scenario::{
    choose_alternative, compare_alternatives, run_scenario, run_scenario_with, Alternative,
    AlternativeResult, ComparisonReport, ScenarioOutcome,
};
