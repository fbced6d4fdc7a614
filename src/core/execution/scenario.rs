use super::config::{ComparisonConfig, ConcurrencyMode, GameConfig};
use super::game::Game;
use crate::core::capacity::{CapacitySource, DiceRoller};
use crate::core::errors::SimError;
use crate::core::types::CapacityRange;
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Aggregate KPIs of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub total_output: usize,
    pub total_end_wip: u32,
    pub avg_cycle_time: f64,
}

/// Run a standard-length chain for `num_rounds` rounds with fresh dice
pub fn run_scenario(
    capacity: CapacityRange,
    start_wip: u32,
    num_rounds: u32,
) -> Result<ScenarioOutcome, SimError> {
    let config = GameConfig::new()
        .with_capacity(capacity)
        .with_start_wip(start_wip)
        .with_rounds(num_rounds);
    run_scenario_with(&config, DiceRoller::from_entropy())
}

/// Run `config` to completion on a fresh chain using `dice`
pub fn run_scenario_with<C: CapacitySource>(
    config: &GameConfig,
    dice: C,
) -> Result<ScenarioOutcome, SimError> {
    let mut game = Game::with_source(config.clone(), dice)?;
    let outcome = game.run_to_end()?;
    debug!(
        "Scenario {} / start WIP {} finished: {:?}",
        config.capacity, config.start_wip, outcome
    );
    Ok(outcome)
}

/// A named what-if configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub name: String,
    pub description: String,
    pub capacity: CapacityRange,
    pub start_wip: u32,
}

impl Alternative {
    pub fn new(name: impl Into<String>, capacity: CapacityRange, start_wip: u32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            capacity,
            start_wip,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// The three classic options: more peak capacity, less variability, more WIP
    pub fn standard_set() -> Result<Vec<Alternative>, SimError> {
        Ok(vec![
            Alternative::new("A", CapacityRange::new(1, 7)?, 4)
                .with_description("Increase peak machine capacity to 1..7"),
            Alternative::new("B", CapacityRange::new(2, 5)?, 4)
                .with_description("Reduce capacity variability to 2..5"),
            Alternative::new("C", CapacityRange::new(1, 6)?, 5)
                .with_description("Increase start WIP at each step to 5"),
        ])
    }

    /// `base` with this alternative's dice and starting WIP
    pub fn config(&self, base: &GameConfig) -> GameConfig {
        base.clone()
            .with_capacity(self.capacity)
            .with_start_wip(self.start_wip)
    }
}

/// Outcome of one alternative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeResult {
    pub alternative: Alternative,
    pub outcome: ScenarioOutcome,
}

/// Side-by-side results of a batch comparison
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// The game the operator actually played, if any
    pub baseline: Option<ScenarioOutcome>,
    pub results: Vec<AlternativeResult>,
}

impl ComparisonReport {
    pub fn with_baseline(mut self, baseline: ScenarioOutcome) -> Self {
        self.baseline = Some(baseline);
        self
    }

    pub fn get(&self, name: &str) -> Result<&AlternativeResult, SimError> {
        self.results
            .iter()
            .find(|r| r.alternative.name == name)
            .ok_or_else(|| SimError::UnknownAlternative(name.to_string()))
    }

    /// Highest output; ties go to the lower average cycle time, then to the
    /// earlier alternative
    pub fn best_by_output(&self) -> Option<&AlternativeResult> {
        self.results.iter().reduce(|best, r| {
            let better = r.outcome.total_output > best.outcome.total_output
                || (r.outcome.total_output == best.outcome.total_output
                    && r.outcome.avg_cycle_time < best.outcome.avg_cycle_time);
            if better {
                r
            } else {
                best
            }
        })
    }
}

/// Simulate every alternative to completion, each on its own fresh chain
pub fn compare_alternatives(
    base: &GameConfig,
    alternatives: &[Alternative],
    comparison: &ComparisonConfig,
) -> Result<ComparisonReport, SimError> {
    let configs: Vec<GameConfig> = alternatives.iter().map(|a| a.config(base)).collect();
    for config in &configs {
        config.validate()?;
    }

    let run = |(alternative, config): (&Alternative, &GameConfig)| {
        run_scenario_with(config, DiceRoller::from_entropy()).map(|outcome| AlternativeResult {
            alternative: alternative.clone(),
            outcome,
        })
    };

    let results = match comparison.concurrency_mode {
        ConcurrencyMode::Sequential => alternatives
            .iter()
            .zip(&configs)
            .map(run)
            .collect::<Result<Vec<_>, _>>()?,
        ConcurrencyMode::Rayon => {
            let par_run = || {
                alternatives
                    .par_iter()
                    .zip(configs.par_iter())
                    .map(run)
                    .collect::<Result<Vec<_>, _>>()
            };
            match comparison.thread_pool_size {
                Some(size) => rayon::ThreadPoolBuilder::new()
                    .num_threads(size)
                    .build()
                    .map_err(|e| SimError::ThreadPool(e.to_string()))?
                    .install(par_run)?,
                None => par_run()?,
            }
        }
    };

    for r in &results {
        info!(
            "Alternative {} ({} / start WIP {}): output {}, end WIP {}, avg cycle time {:.2}",
            r.alternative.name,
            r.alternative.capacity,
            r.alternative.start_wip,
            r.outcome.total_output,
            r.outcome.total_end_wip,
            r.outcome.avg_cycle_time
        );
    }

    Ok(ComparisonReport {
        baseline: None,
        results,
    })
}

/// Pick the alternative ranked first.
///
/// `priorities[i]` is the rank of `alternatives[i]`; ranks must be a
/// permutation of `1..=alternatives.len()`.
pub fn choose_alternative<'a>(
    alternatives: &'a [Alternative],
    priorities: &[u8],
) -> Result<&'a Alternative, SimError> {
    if priorities.len() != alternatives.len() {
        return Err(SimError::InvalidPriorities(format!(
            "expected {} ranks, got {}",
            alternatives.len(),
            priorities.len()
        )));
    }
    let mut sorted = priorities.to_vec();
    sorted.sort_unstable();
    if sorted.iter().enumerate().any(|(i, &p)| p as usize != i + 1) {
        return Err(SimError::InvalidPriorities(format!(
            "ranks {:?} are not a permutation of 1..={}",
            priorities,
            alternatives.len()
        )));
    }
    priorities
        .iter()
        .position(|&p| p == 1)
        .map(|i| &alternatives[i])
        .ok_or_else(|| SimError::InvalidPriorities("no alternative ranked first".to_string()))
}
