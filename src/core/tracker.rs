use super::types::UnitId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Entry and exit rounds of one tracked unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitLifetime {
    pub entry: u32,
    pub exit: Option<u32>,
}

impl UnitLifetime {
    pub fn cycle_time(&self) -> Option<u32> {
        self.exit.and_then(|exit| exit.checked_sub(self.entry))
    }
}

/// Tracks units released by the source so their cycle time can be measured.
/// Pre-filled placeholder units are never registered.
#[derive(Debug, Clone, Default)]
pub struct UnitTracker {
    units: HashMap<UnitId, UnitLifetime>,
}

impl UnitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: UnitId, entry: u32) {
        self.units.insert(id, UnitLifetime { entry, exit: None });
    }

    /// Record the exit round of a tracked unit.
    ///
    /// Returns false if the unit is untracked, has already exited, or
    /// `round` precedes its entry; an exit is never overwritten.
    pub fn record_exit(&mut self, id: UnitId, round: u32) -> bool {
        match self.units.get_mut(&id) {
            Some(lifetime) if lifetime.exit.is_none() && round >= lifetime.entry => {
                lifetime.exit = Some(round);
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, id: &UnitId) -> bool {
        self.units.contains_key(id)
    }

    pub fn get(&self, id: &UnitId) -> Option<&UnitLifetime> {
        self.units.get(id)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Number of tracked units that have exited the chain
    pub fn completed(&self) -> usize {
        self.units.values().filter(|l| l.exit.is_some()).count()
    }

    /// Mean of `exit - entry` over completed units, 0 if none completed
    pub fn average_cycle_time(&self) -> f64 {
        let (sum, count) = self
            .units
            .values()
            .filter_map(UnitLifetime::cycle_time)
            .fold((0u64, 0u64), |(sum, count), ct| (sum + ct as u64, count + 1));
        if count == 0 {
            0.0
        } else {
            sum as f64 / count as f64
        }
    }
}
