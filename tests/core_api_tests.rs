use flowsim::{
    advance, choose_alternative, compare_alternatives, initialize, run_scenario, Alternative,
    CapacityRange, ComparisonConfig, ConcurrencyMode, DiceRoller, Game, GameConfig,
    InboundBuffers, RoundAccumulators, ScriptedRolls, SimError, WipLevel, DEFAULT_STATION_COUNT,
};

/// Drive the round processor directly, the way an external game loop would
#[test]
fn test_manual_round_loop() {
    let mut chain = initialize(4);
    let mut inbound = InboundBuffers::new(chain.len());
    let mut acc = RoundAccumulators::new();
    let mut dice = DiceRoller::seeded(77);
    let range = CapacityRange::default();

    let mut outputs = Vec::new();
    for round in 1..=20 {
        let record = advance(&mut chain, &mut inbound, range, round, &mut acc, &mut dice).unwrap();
        assert_eq!(record.round, round);
        assert_eq!(record.end_wip.len(), DEFAULT_STATION_COUNT);
        assert!(record.end_wip[0].is_unbounded());
        outputs.push(record.output());
    }

    assert_eq!(outputs.iter().sum::<usize>(), acc.finished_units.len());
    assert_eq!(chain.total_wip() as usize, chain.total_queued() + inbound.in_transit());
}

#[test]
fn test_bad_range_surfaces_configuration_error() {
    let err = CapacityRange::new(5, 2).unwrap_err();
    assert!(err.is_configuration());
    assert_eq!(err, SimError::InvalidCapacityRange { lo: 5, hi: 2 });
}

#[test]
fn test_single_station_chain_rejected() {
    let config = GameConfig::new().with_station_count(1);
    let err = Game::with_source(config, ScriptedRolls::constant(3)).unwrap_err();
    assert_eq!(err, SimError::InvalidStationCount(1));
}

#[test]
fn test_first_round_wip_snapshot() {
    let mut game = Game::with_source(GameConfig::default(), ScriptedRolls::constant(3)).unwrap();
    let record = game.step().unwrap();
    assert_eq!(record.start_wip[0], WipLevel::Unbounded);
    assert!(record.start_wip[1..].iter().all(|w| *w == WipLevel::Finite(4)));
    // Every station passes 3 on and receives 3, station 1 from the source
    assert!(record.end_wip[1..].iter().all(|w| *w == WipLevel::Finite(4)));
    assert_eq!(record.output(), 3);
}

#[test]
fn test_baseline_then_chosen_alternative() {
    let base = GameConfig::default();

    let mut baseline = Game::new(base.clone()).unwrap();
    while !baseline.is_finished() {
        baseline.step().unwrap();
    }
    let baseline_outcome = baseline.outcome();
    assert_eq!(baseline.round_outputs().len(), 20);

    let set = Alternative::standard_set().unwrap();
    let comparison = ComparisonConfig::new().with_concurrency(ConcurrencyMode::Rayon);
    let report = compare_alternatives(&base, &set, &comparison)
        .unwrap()
        .with_baseline(baseline_outcome);
    assert_eq!(report.baseline, Some(baseline_outcome));
    assert!(report.get("C").is_ok());

    let chosen = choose_alternative(&set, &[3, 1, 2]).unwrap();
    assert_eq!(chosen.name, "B");
    let mut second = Game::new(chosen.config(&base)).unwrap();
    let outcome = second.run_to_end().unwrap();
    assert!(outcome.total_output <= 20 * 5);
    assert!(second.history().iter().all(|r| r.capacities.iter().all(|&c| (2..=5).contains(&c))));
}

#[test]
fn test_run_scenario_kpis_are_plausible() {
    let a = run_scenario(CapacityRange::default(), 4, 20).unwrap();
    let b = run_scenario(CapacityRange::default(), 4, 20).unwrap();
    for outcome in [a, b] {
        assert!((1..=120).contains(&outcome.total_output));
        assert!(outcome.avg_cycle_time == 0.0 || outcome.avg_cycle_time >= 10.0);
    }
}
