use super::errors::SimError;
use super::types::{WipLevel, WorkUnit};
use std::collections::VecDeque;

/// Number of positions in the standard chain, source included
pub const DEFAULT_STATION_COUNT: usize = 10;

/// One process step of the chain.
///
/// Position 0 is the raw-material source: its queue stays empty and its WIP
/// is `Unbounded`. Every other station works its queue strictly FIFO.
#[derive(Debug)]
pub struct Station {
    position: usize,
    queue: VecDeque<WorkUnit>,
    capacity: u32,
    throughput: u32,
    wip: WipLevel,
}

impl Station {
    /// Create the unlimited raw-material source
    pub fn source() -> Self {
        Self {
            position: 0,
            queue: VecDeque::new(),
            capacity: 0,
            throughput: 0,
            wip: WipLevel::Unbounded,
        }
    }

    /// Create a station pre-filled with `start_wip` placeholder units
    pub fn with_placeholders(position: usize, start_wip: u32) -> Self {
        let queue = (0..start_wip).map(|_| WorkUnit::placeholder()).collect();
        Self {
            position,
            queue,
            capacity: 0,
            throughput: 0,
            wip: WipLevel::Finite(start_wip),
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_source(&self) -> bool {
        self.position == 0
    }

    /// Capacity rolled in the latest round
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Units moved out in the latest round
    pub fn throughput(&self) -> u32 {
        self.throughput
    }

    /// WIP at the end of the latest round, units in transit toward this
    /// station included
    pub fn wip(&self) -> WipLevel {
        self.wip
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Queued units, head first
    pub fn queued_units(&self) -> impl Iterator<Item = &WorkUnit> {
        self.queue.iter()
    }

    pub(crate) fn set_roll(&mut self, capacity: u32, throughput: u32) {
        self.capacity = capacity;
        self.throughput = throughput;
    }

    pub(crate) fn set_wip(&mut self, wip: WipLevel) {
        self.wip = wip;
    }

    /// Append arrivals at the tail in arrival order
    pub(crate) fn enqueue(&mut self, arrivals: Vec<WorkUnit>) {
        self.queue.extend(arrivals);
    }

    /// Remove `count` units from the head
    pub(crate) fn dequeue(&mut self, count: usize) -> Result<Vec<WorkUnit>, SimError> {
        if count > self.queue.len() {
            return Err(SimError::InvariantViolation(format!(
                "station {} asked to move {} units but only {} are queued",
                self.position,
                count,
                self.queue.len()
            )));
        }
        Ok(self.queue.drain(..count).collect())
    }
}

/// The ordered list of stations, source first
#[derive(Debug)]
pub struct Chain {
    stations: Vec<Station>,
}

impl Chain {
    /// Build a fresh chain of `station_count` positions.
    ///
    /// Every real station starts with `start_wip` placeholder units born in
    /// round 0.
    pub fn initialize(station_count: usize, start_wip: u32) -> Result<Self, SimError> {
        if station_count <= 1 {
            return Err(SimError::InvalidStationCount(station_count));
        }
        Ok(Self::build(station_count, start_wip))
    }

    // Callers guarantee station_count > 1
    fn build(station_count: usize, start_wip: u32) -> Self {
        let mut stations = Vec::with_capacity(station_count);
        stations.push(Station::source());
        for position in 1..station_count {
            stations.push(Station::with_placeholders(position, start_wip));
        }
        Self { stations }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Always false, a chain holds at least the source and one station
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn station(&self, position: usize) -> Option<&Station> {
        self.stations.get(position)
    }

    pub(crate) fn station_mut(&mut self, position: usize) -> &mut Station {
        &mut self.stations[position]
    }

    /// Index of the final station
    pub fn last_position(&self) -> usize {
        self.stations.len() - 1
    }

    /// Units sitting in queues across all real stations
    pub fn total_queued(&self) -> usize {
        self.stations.iter().map(Station::queue_len).sum()
    }

    /// Sum of finite end-of-round WIP across real stations
    pub fn total_wip(&self) -> u32 {
        self.stations.iter().filter_map(|s| s.wip().finite()).sum()
    }
}

/// Build the standard ten-position chain
pub fn initialize(start_wip: u32) -> Chain {
    Chain::build(DEFAULT_STATION_COUNT, start_wip)
}
