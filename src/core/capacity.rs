use super::types::CapacityRange;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};

/// Produces the per-station capacity rolls for one round
pub trait CapacitySource {
    /// Roll one capacity per station, each within `range`.
    ///
    /// An inverted `range` (only reachable through deserialization) yields
    /// `range.lo()` for every station instead of panicking; `advance`
    /// rejects such a range before it rolls.
    fn roll(&mut self, stations: usize, range: CapacityRange) -> Vec<u32>;
}

/// Uniform dice backed by any `rand` generator
#[derive(Debug, Clone)]
pub struct DiceRoller<R = StdRng> {
    rng: R,
}

impl DiceRoller<StdRng> {
    /// Dice seeded from OS entropy, for live play
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible dice
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> DiceRoller<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> CapacitySource for DiceRoller<R> {
    fn roll(&mut self, stations: usize, range: CapacityRange) -> Vec<u32> {
        if range.validate().is_err() {
            return vec![range.lo(); stations];
        }
        let die = Uniform::new_inclusive(range.lo(), range.hi());
        (0..stations).map(|_| die.sample(&mut self.rng)).collect()
    }
}

/// Replays a recorded sequence of rolls, e.g. from physical dice.
///
/// Rows are consumed one per round and the script wraps around when it runs
/// out. A row shorter than the chain is padded by repeating its last value.
/// Rows are not checked against the range here; the round processor rejects
/// out-of-range rolls before it mutates anything.
#[derive(Debug, Clone)]
pub struct ScriptedRolls {
    rows: Vec<Vec<u32>>,
    cursor: usize,
}

impl ScriptedRolls {
    pub fn new(rows: Vec<Vec<u32>>) -> Self {
        Self { rows, cursor: 0 }
    }

    /// Every station rolls `value` every round
    pub fn constant(value: u32) -> Self {
        Self::new(vec![vec![value]])
    }
}

impl CapacitySource for ScriptedRolls {
    fn roll(&mut self, stations: usize, range: CapacityRange) -> Vec<u32> {
        if self.rows.is_empty() {
            return vec![range.lo(); stations];
        }
        let row = &self.rows[self.cursor % self.rows.len()];
        self.cursor += 1;
        let fill = row.last().copied().unwrap_or(range.lo());
        (0..stations)
            .map(|i| row.get(i).copied().unwrap_or(fill))
            .collect()
    }
}
