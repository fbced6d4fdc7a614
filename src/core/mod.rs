pub mod capacity;
pub mod errors;
pub mod execution;
pub mod round;
pub mod station;
pub mod tracker;
pub mod types;

#[cfg(test)]
mod tests;
