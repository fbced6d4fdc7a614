use super::capacity::CapacitySource;
use super::errors::SimError;
use super::station::Chain;
use super::tracker::UnitTracker;
use super::types::{CapacityRange, FinishedUnit, WipLevel, WorkUnit};
use log::debug;
use serde::{Deserialize, Serialize};

/// Units moved out of station `i - 1` last round, waiting to join station `i`.
///
/// Lane 0 is always empty since nothing flows into the source.
#[derive(Debug)]
pub struct InboundBuffers {
    lanes: Vec<Vec<WorkUnit>>,
}

impl InboundBuffers {
    /// Empty lanes for a chain of `station_count` positions
    pub fn new(station_count: usize) -> Self {
        Self {
            lanes: (0..station_count).map(|_| Vec::new()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    pub fn lane(&self, position: usize) -> &[WorkUnit] {
        self.lanes.get(position).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Units currently between stations
    pub fn in_transit(&self) -> usize {
        self.lanes.iter().map(Vec::len).sum()
    }

    fn take(&mut self, position: usize) -> Vec<WorkUnit> {
        std::mem::take(&mut self.lanes[position])
    }
}

/// Results that accumulate over the whole run
#[derive(Debug, Default)]
pub struct RoundAccumulators {
    pub finished_units: Vec<FinishedUnit>,
    /// Cycle lengths of finished units released by the source
    pub cycle_lengths: Vec<u32>,
    pub tracker: UnitTracker,
}

impl RoundAccumulators {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Snapshot of one processed round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: u32,
    pub capacities: Vec<u32>,
    pub throughputs: Vec<u32>,
    pub start_wip: Vec<WipLevel>,
    pub end_wip: Vec<WipLevel>,
    /// Finite end WIP summed over real stations
    pub total_wip: u32,
    pub finished: Vec<FinishedUnit>,
    /// Units finished across all rounds so far
    pub total_finished: usize,
    /// Cycle lengths completed across all rounds so far
    pub cycle_lengths: Vec<u32>,
}

impl RoundRecord {
    /// Units that left the last station this round
    pub fn output(&self) -> usize {
        self.finished.len()
    }
}

/// Advance the chain by exactly one round.
///
/// `inbound` holds what the previous round moved toward each station; on
/// success it is replaced by what this round moved. All configuration checks
/// and the capacity roll happen before any state is touched.
pub fn advance(
    chain: &mut Chain,
    inbound: &mut InboundBuffers,
    range: CapacityRange,
    round: u32,
    acc: &mut RoundAccumulators,
    dice: &mut dyn CapacitySource,
) -> Result<RoundRecord, SimError> {
    range.validate()?;
    let n = chain.len();
    if n <= 1 {
        return Err(SimError::InvalidStationCount(n));
    }
    if inbound.len() != n {
        return Err(SimError::BufferMismatch {
            expected: n,
            actual: inbound.len(),
        });
    }
    if round == 0 {
        return Err(SimError::InvalidRoundNumber(round));
    }

    let capacities = dice.roll(n, range);
    if capacities.len() != n {
        return Err(SimError::InvariantViolation(format!(
            "rolled {} capacities for {} stations",
            capacities.len(),
            n
        )));
    }
    if let Some(bad) = capacities.iter().find(|&&c| !range.contains(c)) {
        return Err(SimError::InvariantViolation(format!(
            "rolled capacity {} outside {}",
            bad, range
        )));
    }

    let start_wip: Vec<WipLevel> = chain
        .stations()
        .iter()
        .map(|s| {
            if s.is_source() {
                WipLevel::Unbounded
            } else {
                WipLevel::Finite((s.queue_len() + inbound.lane(s.position()).len()) as u32)
            }
        })
        .collect();

    let mut next = InboundBuffers::new(n);
    let mut throughputs = vec![0u32; n];
    let mut finished = Vec::new();
    let last = chain.last_position();

    // Source releases as many new units as it rolled
    throughputs[0] = capacities[0];
    chain.station_mut(0).set_roll(capacities[0], capacities[0]);
    for _ in 0..capacities[0] {
        let unit = WorkUnit::new(round);
        acc.tracker.register(unit.id(), round);
        next.lanes[1].push(unit);
    }

    for i in 1..n {
        let arrivals = inbound.take(i);
        let station = chain.station_mut(i);
        station.enqueue(arrivals);

        let throughput = (station.queue_len() as u32).min(capacities[i]);
        station.set_roll(capacities[i], throughput);
        throughputs[i] = throughput;
        let moved = station.dequeue(throughput as usize)?;

        if i < last {
            next.lanes[i + 1] = moved;
            continue;
        }

        let completed_round = round + 1;
        for unit in moved {
            let done = FinishedUnit {
                id: unit.id(),
                birth_round: unit.birth_round(),
                completed_round,
            };
            acc.tracker.record_exit(done.id, completed_round);
            if acc.tracker.contains(&done.id) {
                if let Some(cycle) = done.cycle_time() {
                    acc.cycle_lengths.push(cycle);
                }
            }
            acc.finished_units.push(done);
            finished.push(done);
        }
    }

    let mut end_wip = Vec::with_capacity(n);
    end_wip.push(WipLevel::Unbounded);
    for i in 1..n {
        let start = start_wip[i].finite().unwrap_or(0);
        let end = (start + throughputs[i - 1]).saturating_sub(throughputs[i]);
        let level = WipLevel::Finite(end);
        chain.station_mut(i).set_wip(level);
        end_wip.push(level);
    }
    let total_wip = end_wip.iter().filter_map(WipLevel::finite).sum();

    *inbound = next;

    debug!(
        "Round {}: capacities {:?}, throughputs {:?}, output {}, total WIP {}",
        round,
        capacities,
        throughputs,
        finished.len(),
        total_wip
    );

    Ok(RoundRecord {
        round,
        capacities,
        throughputs,
        start_wip,
        end_wip,
        total_wip,
        finished,
        total_finished: acc.finished_units.len(),
        cycle_lengths: acc.cycle_lengths.clone(),
    })
}
