use super::config::GameConfig;
use super::scenario::ScenarioOutcome;
use crate::core::capacity::{CapacitySource, DiceRoller};
use crate::core::errors::SimError;
use crate::core::round::{advance, InboundBuffers, RoundAccumulators, RoundRecord};
use crate::core::station::Chain;
use crate::core::tracker::UnitTracker;
use crate::core::types::FinishedUnit;
use log::{info, warn};

/// Observer trait for game progress
pub trait RoundObserver {
    /// Called after every completed round
    fn on_round_complete(&mut self, record: &RoundRecord);

    /// Called once, after the final round
    fn on_game_complete(&mut self, _outcome: &ScenarioOutcome) {}
}

/// A game played round by round.
///
/// Owns its chain, inbound lanes, accumulators and round history, so several
/// games can run side by side without sharing anything.
pub struct Game<C = DiceRoller> {
    config: GameConfig,
    chain: Chain,
    inbound: InboundBuffers,
    acc: RoundAccumulators,
    history: Vec<RoundRecord>,
    dice: C,
    observers: Vec<Box<dyn RoundObserver>>,
}

impl<C> std::fmt::Debug for Game<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("config", &self.config)
            .field("rounds_played", &self.history.len())
            .field("total_output", &self.acc.finished_units.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Game<DiceRoller> {
    /// Create a game rolling dice seeded from entropy
    pub fn new(config: GameConfig) -> Result<Self, SimError> {
        Self::with_source(config, DiceRoller::from_entropy())
    }
}

impl<C: CapacitySource> Game<C> {
    /// Create a game with an explicit capacity source
    ///
    /// # Arguments
    /// * `config` - Chain length, game length, dice range and starting WIP
    /// * `dice` - Source of the per-round capacity rolls
    ///
    /// # Returns
    /// A game positioned before round 1, or the configuration error
    pub fn with_source(config: GameConfig, dice: C) -> Result<Self, SimError> {
        if let Err(e) = config.validate() {
            warn!("Rejected game configuration {:?}: {}", config, e);
            return Err(e);
        }
        let chain = Chain::initialize(config.station_count, config.start_wip)?;
        let inbound = InboundBuffers::new(config.station_count);
        Ok(Self {
            config,
            chain,
            inbound,
            acc: RoundAccumulators::new(),
            history: Vec::new(),
            dice,
            observers: Vec::new(),
        })
    }

    pub fn add_observer(&mut self, observer: Box<dyn RoundObserver>) {
        self.observers.push(observer);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Rounds played so far
    pub fn rounds_played(&self) -> u32 {
        self.history.len() as u32
    }

    pub fn rounds_remaining(&self) -> u32 {
        self.config.rounds - self.rounds_played()
    }

    pub fn is_finished(&self) -> bool {
        self.rounds_played() >= self.config.rounds
    }

    /// Play the next round
    ///
    /// # Returns
    /// The record of the round just played
    ///
    /// # Errors
    /// `GameFinished` once every configured round has been played; the game
    /// state is left untouched
    pub fn step(&mut self) -> Result<&RoundRecord, SimError> {
        if self.is_finished() {
            return Err(SimError::GameFinished {
                rounds: self.config.rounds,
            });
        }
        let round = self.rounds_played() + 1;
        let record = advance(
            &mut self.chain,
            &mut self.inbound,
            self.config.capacity,
            round,
            &mut self.acc,
            &mut self.dice,
        )?;

        for observer in &mut self.observers {
            observer.on_round_complete(&record);
        }
        self.history.push(record);

        if self.is_finished() {
            let outcome = self.outcome();
            info!(
                "Game over after {} rounds: output {}, end WIP {}, avg cycle time {:.2}",
                self.config.rounds, outcome.total_output, outcome.total_end_wip, outcome.avg_cycle_time
            );
            for observer in &mut self.observers {
                observer.on_game_complete(&outcome);
            }
        }

        let last = self.history.len() - 1;
        Ok(&self.history[last])
    }

    /// Play `count` more rounds in one go.
    ///
    /// Ends in the same state as calling `step` `count` times.
    ///
    /// # Arguments
    /// * `count` - Number of rounds to play from the current position
    ///
    /// # Returns
    /// The records of the rounds played by this call
    ///
    /// # Errors
    /// `GameFinished`, without playing anything, if fewer than `count` rounds
    /// remain
    pub fn run_rounds(&mut self, count: u32) -> Result<&[RoundRecord], SimError> {
        if count > self.rounds_remaining() {
            return Err(SimError::GameFinished {
                rounds: self.config.rounds,
            });
        }
        let first = self.history.len();
        for _ in 0..count {
            self.step()?;
        }
        Ok(&self.history[first..])
    }

    /// Play every remaining round and report the outcome
    pub fn run_to_end(&mut self) -> Result<ScenarioOutcome, SimError> {
        self.run_rounds(self.rounds_remaining())?;
        Ok(self.outcome())
    }

    /// KPIs as of the latest round
    pub fn outcome(&self) -> ScenarioOutcome {
        ScenarioOutcome {
            total_output: self.total_output(),
            total_end_wip: self.current_total_wip(),
            avg_cycle_time: self.average_cycle_time(),
        }
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn inbound(&self) -> &InboundBuffers {
        &self.inbound
    }

    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }

    pub fn tracker(&self) -> &UnitTracker {
        &self.acc.tracker
    }

    pub fn finished_units(&self) -> &[FinishedUnit] {
        &self.acc.finished_units
    }

    pub fn cycle_lengths(&self) -> &[u32] {
        &self.acc.cycle_lengths
    }

    /// Units finished per round
    pub fn round_outputs(&self) -> Vec<usize> {
        self.history.iter().map(RoundRecord::output).collect()
    }

    pub fn total_output(&self) -> usize {
        self.acc.finished_units.len()
    }

    /// Total WIP after the latest round, or the starting WIP before round 1
    pub fn current_total_wip(&self) -> u32 {
        match self.history.last() {
            Some(record) => record.total_wip,
            None => self.chain.total_wip(),
        }
    }

    pub fn average_cycle_time(&self) -> f64 {
        self.acc.tracker.average_cycle_time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::capacity::ScriptedRolls;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Counter {
        rounds: Vec<u32>,
        completed: usize,
    }

    struct CountingObserver(Rc<RefCell<Counter>>);

    impl RoundObserver for CountingObserver {
        fn on_round_complete(&mut self, record: &RoundRecord) {
            self.0.borrow_mut().rounds.push(record.round);
        }

        fn on_game_complete(&mut self, _outcome: &ScenarioOutcome) {
            self.0.borrow_mut().completed += 1;
        }
    }

    #[test]
    fn test_step_until_finished() {
        let config = GameConfig::new().with_rounds(3);
        let mut game = Game::with_source(config, ScriptedRolls::constant(2)).unwrap();
        assert_eq!(game.current_total_wip(), 36);

        for expected in 1..=3 {
            let record = game.step().unwrap();
            assert_eq!(record.round, expected);
        }
        assert!(game.is_finished());
        assert_eq!(
            game.step().unwrap_err(),
            SimError::GameFinished { rounds: 3 }
        );
        assert_eq!(game.history().len(), 3);
    }

    #[test]
    fn test_observers_see_every_round() {
        let counter = Rc::new(RefCell::new(Counter::default()));
        let config = GameConfig::new().with_rounds(4);
        let mut game = Game::with_source(config, ScriptedRolls::constant(3)).unwrap();
        game.add_observer(Box::new(CountingObserver(Rc::clone(&counter))));

        game.run_to_end().unwrap();

        assert_eq!(counter.borrow().rounds, vec![1, 2, 3, 4]);
        assert_eq!(counter.borrow().completed, 1);
    }

    #[test]
    fn test_run_rounds_rejects_overrun_without_playing() {
        let config = GameConfig::new().with_rounds(5);
        let mut game = Game::with_source(config, ScriptedRolls::constant(3)).unwrap();
        game.run_rounds(3).unwrap();
        assert!(game.run_rounds(3).is_err());
        assert_eq!(game.rounds_played(), 3);
        assert_eq!(game.run_rounds(2).unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GameConfig::new().with_rounds(0);
        let err = Game::with_source(config, ScriptedRolls::constant(1)).unwrap_err();
        assert_eq!(err, SimError::InvalidRoundCount(0));
    }

    #[test]
    fn test_debug_summarises_progress() {
        let config = GameConfig::new().with_rounds(2);
        let mut game = Game::with_source(config, ScriptedRolls::constant(2)).unwrap();
        game.step().unwrap();
        let shown = format!("{:?}", game);
        assert!(shown.starts_with("Game"));
        assert!(shown.contains("rounds_played: 1"));
        assert!(shown.contains("total_output: 2"));
    }

    #[test]
    fn test_outputs_sum_to_total() {
        let mut game = Game::with_source(GameConfig::new(), DiceRoller::seeded(3)).unwrap();
        let outcome = game.run_to_end().unwrap();
        let summed: usize = game.round_outputs().iter().sum();
        assert_eq!(summed, outcome.total_output);
        assert_eq!(outcome.total_end_wip, game.history().last().unwrap().total_wip);
    }
}
