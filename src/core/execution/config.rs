//! Configuration for flow-simulation runs
//!
//! `GameConfig` describes one game (chain length, game length, dice and
//! starting WIP). `ComparisonConfig` controls how a batch of alternatives is
//! executed.
use crate::core::errors::SimError;
use crate::core::station::DEFAULT_STATION_COUNT;
use crate::core::types::CapacityRange;
use serde::{Deserialize, Serialize};

/// Rounds in a standard game
pub const DEFAULT_ROUNDS: u32 = 20;
/// Units pre-filled at every real station
pub const DEFAULT_START_WIP: u32 = 4;

/// Parameters of a single game or scenario run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Positions in the chain, raw-material source included
    pub station_count: usize,
    /// Rounds played before the game ends
    pub rounds: u32,
    /// Range each station's capacity is rolled from
    pub capacity: CapacityRange,
    /// Placeholder units pre-filled at every real station
    pub start_wip: u32,
}

impl GameConfig {
    /// Standard game: 10 stations, 20 rounds, a six-sided die, 4 WIP
    pub fn new() -> Self {
        Self {
            station_count: DEFAULT_STATION_COUNT,
            rounds: DEFAULT_ROUNDS,
            capacity: CapacityRange::default(),
            start_wip: DEFAULT_START_WIP,
        }
    }

    /// Set the station count of the game
    ///
    /// # Arguments
    /// * `station_count` - Positions in the chain, raw-material source included
    ///
    /// # Returns
    /// A new configuration with the value replaced
    pub fn with_station_count(mut self, station_count: usize) -> Self {
        self.station_count = station_count;
        self
    }

    /// Set the rounds of the game
    ///
    /// # Arguments
    /// * `rounds` - Number of rounds before the game ends
    ///
    /// # Returns
    /// A new configuration with the value replaced
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    /// Set the capacity of the game
    ///
    /// # Arguments
    /// * `capacity` - Range each station's capacity is rolled from
    ///
    /// # Returns
    /// A new configuration with the value replaced
    pub fn with_capacity(mut self, capacity: CapacityRange) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the start wip of the game
    ///
    /// # Arguments
    /// * `start_wip` - Placeholder units pre-filled at every real station
    ///
    /// # Returns
    /// A new configuration with the value replaced
    pub fn with_start_wip(mut self, start_wip: u32) -> Self {
        self.start_wip = start_wip;
        self
    }

    /// Check the configuration before any chain is built
    ///
    /// # Returns
    /// `Ok(())`, or the first configuration error found: an inverted capacity
    /// range, fewer than two stations, or zero rounds
    pub fn validate(&self) -> Result<(), SimError> {
        self.capacity.validate()?;
        if self.station_count <= 1 {
            return Err(SimError::InvalidStationCount(self.station_count));
        }
        if self.rounds == 0 {
            return Err(SimError::InvalidRoundCount(self.rounds));
        }
        Ok(())
    }

    /// Minimum rounds a released unit needs to leave the chain
    pub fn raw_process_time(&self) -> u32 {
        self.station_count as u32
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Enumeration of supported concurrency modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConcurrencyMode {
    /// Alternatives are simulated one after another on the calling thread
    #[default]
    Sequential,
    /// Alternatives are simulated in parallel with Rayon
    Rayon,
}

/// How a batch of alternatives is executed
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComparisonConfig {
    pub concurrency_mode: ConcurrencyMode,
    /// Size of a dedicated thread pool; only used in Rayon mode.
    /// `None` runs on the global pool.
    pub thread_pool_size: Option<usize>,
}

impl ComparisonConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the concurrency mode for the comparison
    ///
    /// # Arguments
    /// * `mode` - The concurrency mode to use
    ///
    /// # Returns
    /// A new configuration with the specified concurrency mode
    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = mode;
        self
    }

    /// Set the thread pool size for parallel comparison
    ///
    /// # Arguments
    /// * `size` - The number of threads in the dedicated pool
    ///
    /// # Returns
    /// A new configuration with the specified thread pool size
    ///
    /// # Note
    /// This setting only affects execution when concurrency_mode is Rayon
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }
}
