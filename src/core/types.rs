use super::errors::SimError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of a work unit travelling through the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(Uuid);

impl UnitId {
    /// Create a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UnitId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One in-process item.
///
/// Units are never cloned: a unit sits in exactly one station queue (or one
/// inbound lane) at a time and moves between them by value.
#[derive(Debug, PartialEq, Eq)]
pub struct WorkUnit {
    id: UnitId,
    birth_round: u32,
}

impl WorkUnit {
    /// Create a unit entering the chain in `birth_round`
    pub(crate) fn new(birth_round: u32) -> Self {
        Self {
            id: UnitId::new(),
            birth_round,
        }
    }

    /// Create a pre-filled unit that was already in the chain before round 1
    pub(crate) fn placeholder() -> Self {
        Self::new(0)
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn birth_round(&self) -> u32 {
        self.birth_round
    }

    pub fn is_placeholder(&self) -> bool {
        self.birth_round == 0
    }
}

/// A unit that has left the last station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishedUnit {
    pub id: UnitId,
    pub birth_round: u32,
    pub completed_round: u32,
}

impl FinishedUnit {
    /// Rounds spent in the chain, or `None` for pre-filled units and for
    /// records that complete before they were born
    pub fn cycle_time(&self) -> Option<u32> {
        if self.birth_round == 0 {
            None
        } else {
            self.completed_round.checked_sub(self.birth_round)
        }
    }
}

/// Work-in-process level of a station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WipLevel {
    Finite(u32),
    /// The raw-material source never runs dry
    Unbounded,
}

impl WipLevel {
    pub fn finite(&self) -> Option<u32> {
        match self {
            WipLevel::Finite(n) => Some(*n),
            WipLevel::Unbounded => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, WipLevel::Unbounded)
    }
}

impl std::fmt::Display for WipLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WipLevel::Finite(n) => write!(f, "{}", n),
            WipLevel::Unbounded => write!(f, "∞"),
        }
    }
}

/// Inclusive range a station's capacity is rolled from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityRange {
    lo: u32,
    hi: u32,
}

impl CapacityRange {
    /// Create a validated range `[lo, hi]`
    pub fn new(lo: u32, hi: u32) -> Result<Self, SimError> {
        let range = Self { lo, hi };
        range.validate()?;
        Ok(range)
    }

    /// Check the range is not degenerate.
    ///
    /// Needed on top of `new` because deserialized ranges bypass it.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.lo > self.hi {
            return Err(SimError::InvalidCapacityRange {
                lo: self.lo,
                hi: self.hi,
            });
        }
        Ok(())
    }

    pub fn lo(&self) -> u32 {
        self.lo
    }

    pub fn hi(&self) -> u32 {
        self.hi
    }

    pub fn contains(&self, value: u32) -> bool {
        self.lo <= value && value <= self.hi
    }

    /// Expected value of a single uniform roll
    pub fn mean(&self) -> f64 {
        (self.lo as f64 + self.hi as f64) / 2.0
    }
}

impl Default for CapacityRange {
    /// A six-sided die
    fn default() -> Self {
        Self { lo: 1, hi: 6 }
    }
}

impl std::fmt::Display for CapacityRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}
