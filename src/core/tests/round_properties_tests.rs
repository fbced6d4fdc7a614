use crate::core::capacity::DiceRoller;
use crate::core::execution::{Game, GameConfig};
use crate::core::types::{CapacityRange, UnitId, WipLevel};
use std::collections::HashSet;

fn seeded_game(seed: u64, config: GameConfig) -> Game<DiceRoller> {
    Game::with_source(config, DiceRoller::seeded(seed)).unwrap()
}

#[test]
fn test_throughput_bounded_by_capacity_and_queue() {
    for seed in 0..20 {
        let mut game = seeded_game(seed, GameConfig::default());
        for _ in 0..20 {
            let record = game.step().unwrap();
            for i in 1..record.capacities.len() {
                let available = record.start_wip[i].finite().unwrap();
                assert!(record.throughputs[i] <= record.capacities[i]);
                assert!(record.throughputs[i] <= available);
            }
            // The source is never starved
            assert_eq!(record.throughputs[0], record.capacities[0]);
            assert_eq!(record.start_wip[0], WipLevel::Unbounded);
            assert_eq!(record.end_wip[0], WipLevel::Unbounded);
        }
    }
}

#[test]
fn test_wip_conservation() {
    for seed in 0..20 {
        let mut game = seeded_game(seed, GameConfig::default());
        for _ in 0..20 {
            let record = game.step().unwrap();
            for i in 1..record.capacities.len() {
                let start = record.start_wip[i].finite().unwrap();
                let expected = (start + record.throughputs[i - 1]).saturating_sub(record.throughputs[i]);
                assert_eq!(record.end_wip[i], WipLevel::Finite(expected));
            }
            let total: u32 = record.end_wip.iter().filter_map(WipLevel::finite).sum();
            assert_eq!(record.total_wip, total);
        }
    }
}

#[test]
fn test_end_wip_matches_queued_plus_in_transit() {
    let mut game = seeded_game(11, GameConfig::default());
    for _ in 0..20 {
        game.step().unwrap();
        for station in &game.chain().stations()[1..] {
            let p = station.position();
            let held = (station.queue_len() + game.inbound().lane(p).len()) as u32;
            assert_eq!(station.wip(), WipLevel::Finite(held));
        }
    }
}

#[test]
fn test_no_unit_lost_or_duplicated() {
    let config = GameConfig::default();
    let placeholders = (config.station_count as u32 - 1) * config.start_wip;
    let mut game = seeded_game(5, config);
    let mut released = 0u32;

    for _ in 0..20 {
        released += game.step().unwrap().throughputs[0];

        let mut ids: HashSet<UnitId> = HashSet::new();
        let mut count = 0usize;
        for station in game.chain().stations() {
            for unit in station.queued_units() {
                ids.insert(unit.id());
                count += 1;
            }
            for unit in game.inbound().lane(station.position()) {
                ids.insert(unit.id());
                count += 1;
            }
        }
        for unit in game.finished_units() {
            ids.insert(unit.id);
            count += 1;
        }

        assert_eq!(count, ids.len());
        assert_eq!(count as u32, placeholders + released);
    }
}

#[test]
fn test_cycle_time_at_least_raw_process_time() {
    for seed in 0..10 {
        let config = GameConfig::default().with_rounds(40);
        let raw = config.raw_process_time();
        let mut game = seeded_game(seed, config);
        game.run_to_end().unwrap();

        for unit in game.finished_units() {
            if let Some(cycle) = unit.cycle_time() {
                assert!(unit.birth_round > 0);
                assert!(cycle >= raw - 1);
                assert!(cycle >= raw);
            }
        }
        for &cycle in game.cycle_lengths() {
            assert!(cycle >= raw);
        }
    }
}

#[test]
fn test_exit_recorded_once_per_tracked_unit() {
    let config = GameConfig::default().with_rounds(40);
    let mut game = seeded_game(8, config);
    game.run_to_end().unwrap();

    let tracked_finished: Vec<_> = game
        .finished_units()
        .iter()
        .filter(|u| game.tracker().contains(&u.id))
        .collect();
    assert_eq!(tracked_finished.len(), game.tracker().completed());
    assert_eq!(tracked_finished.len(), game.cycle_lengths().len());
    for unit in tracked_finished {
        let lifetime = game.tracker().get(&unit.id).unwrap();
        assert_eq!(lifetime.entry, unit.birth_round);
        assert_eq!(lifetime.exit, Some(unit.completed_round));
    }
}

#[test]
fn test_average_cycle_time_inspection_is_idempotent() {
    let mut game = seeded_game(2, GameConfig::default().with_rounds(30));
    game.run_to_end().unwrap();
    let tracked = game.tracker().len();
    let first = game.average_cycle_time();
    let second = game.average_cycle_time();
    assert_eq!(first, second);
    assert_eq!(game.tracker().len(), tracked);
}

#[test]
fn test_placeholders_leave_before_released_units() {
    let mut game = seeded_game(13, GameConfig::default().with_rounds(40));
    game.run_to_end().unwrap();
    let births: Vec<u32> = game.finished_units().iter().map(|u| u.birth_round).collect();
    // FIFO order through a single chain never lets a later unit overtake
    let mut sorted = births.clone();
    sorted.sort_unstable();
    assert_eq!(births, sorted);
}

#[test]
fn test_narrow_range_first_round_never_starved() {
    let range = CapacityRange::new(2, 5).unwrap();
    for seed in 0..50 {
        let config = GameConfig::default().with_capacity(range).with_rounds(1);
        let mut game = seeded_game(seed, config);
        let record = game.step().unwrap();
        for i in 1..record.capacities.len() {
            assert_eq!(record.throughputs[i], record.capacities[i].min(4));
            assert!(record.throughputs[i] >= 2);
        }
    }
}
