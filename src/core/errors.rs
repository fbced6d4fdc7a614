/// Errors raised by the flow simulation.
///
/// Configuration errors are reported before any state is touched.
/// `InvariantViolation` means the round processor itself is broken.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    InvalidCapacityRange { lo: u32, hi: u32 },
    InvalidStationCount(usize),
    InvalidRoundCount(u32),
    InvalidRoundNumber(u32),
    BufferMismatch { expected: usize, actual: usize },
    InvariantViolation(String),
    GameFinished { rounds: u32 },
    UnknownAlternative(String),
    InvalidPriorities(String),
    ThreadPool(String),
}

impl SimError {
    /// Whether the error comes from caller-supplied configuration
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SimError::InvalidCapacityRange { .. }
                | SimError::InvalidStationCount(_)
                | SimError::InvalidRoundCount(_)
                | SimError::InvalidRoundNumber(_)
                | SimError::BufferMismatch { .. }
                | SimError::UnknownAlternative(_)
                | SimError::InvalidPriorities(_)
        )
    }
}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimError::InvalidCapacityRange { lo, hi } => {
                write!(f, "Invalid capacity range: lower bound {} exceeds upper bound {}", lo, hi)
            }
            SimError::InvalidStationCount(n) => {
                write!(f, "Invalid station count {}: a chain needs the source plus at least one station", n)
            }
            SimError::InvalidRoundCount(n) => write!(f, "Invalid round count: {}", n),
            SimError::InvalidRoundNumber(n) => {
                write!(f, "Invalid round number {}: rounds are numbered from 1", n)
            }
            SimError::BufferMismatch { expected, actual } => write!(
                f,
                "Inbound buffer has {} lanes but the chain has {} stations",
                actual, expected
            ),
            SimError::InvariantViolation(msg) => write!(f, "Invariant violation: {}", msg),
            SimError::GameFinished { rounds } => {
                write!(f, "Game already finished after {} rounds", rounds)
            }
            SimError::UnknownAlternative(name) => write!(f, "Unknown alternative: {}", name),
            SimError::InvalidPriorities(msg) => write!(f, "Invalid priorities: {}", msg),
            SimError::ThreadPool(msg) => write!(f, "Thread pool error: {}", msg),
        }
    }
}

impl std::error::Error for SimError {}
