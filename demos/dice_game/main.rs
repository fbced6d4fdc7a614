use flowsim::{
    choose_alternative, compare_alternatives, Alternative, ComparisonConfig, ConcurrencyMode,
    Game, GameConfig, RoundObserver, RoundRecord, ScenarioOutcome, SimError,
};

/// Prints each round as a one-line board
struct BoardPrinter;

impl RoundObserver for BoardPrinter {
    fn on_round_complete(&mut self, record: &RoundRecord) {
        let wip: Vec<String> = record.end_wip.iter().map(|w| w.to_string()).collect();
        println!(
            "Round {:>2} | dice {:?} | moved {:?} | WIP [{}] | output {}",
            record.round,
            record.capacities,
            record.throughputs,
            wip.join(", "),
            record.output()
        );
    }

    fn on_game_complete(&mut self, outcome: &ScenarioOutcome) {
        print_outcome("GAME END", outcome);
    }
}

fn print_outcome(label: &str, outcome: &ScenarioOutcome) {
    println!("{}", label);
    println!("  Total Output:           {}", outcome.total_output);
    println!("  End WIP:                {}", outcome.total_end_wip);
    println!("  Tracked AVG Cycle Time: {:.2}", outcome.avg_cycle_time);
}

/// Usage: dice_game [rank_A rank_B rank_C]
///
/// Ranks pick the alternative replayed as the second game; without them the
/// alternative with the best simulated output is replayed.
fn main() -> Result<(), SimError> {
    env_logger::init();

    let ranks: Vec<u8> = std::env::args()
        .skip(1)
        .map(|a| {
            a.parse()
                .map_err(|_| SimError::InvalidPriorities(format!("not a rank: {}", a)))
        })
        .collect::<Result<_, _>>()?;

    let base = GameConfig::default();
    println!("🎲 Factory Dice Game: {} stations, {} rounds", base.station_count, base.rounds);
    println!(
        "   capacity {} per round (expected {:.1}), start WIP {}",
        base.capacity,
        base.capacity.mean(),
        base.start_wip
    );
    println!("   raw process time {} rounds\n", base.raw_process_time());

    let mut game = Game::new(base.clone())?;
    game.add_observer(Box::new(BoardPrinter));
    let baseline = game.run_to_end()?;

    let alternatives = Alternative::standard_set()?;
    let comparison = ComparisonConfig::new().with_concurrency(ConcurrencyMode::Rayon);
    let report = compare_alternatives(&base, &alternatives, &comparison)?.with_baseline(baseline);

    println!("\nAlternative          | Output | End WIP | AVG Cycle Time");
    println!(
        "Original             | {:>6} | {:>7} | {:>14.2}",
        baseline.total_output, baseline.total_end_wip, baseline.avg_cycle_time
    );
    for r in &report.results {
        println!(
            "{:<20} | {:>6} | {:>7} | {:>14.2}",
            format!("{} {}/{}", r.alternative.name, r.alternative.capacity, r.alternative.start_wip),
            r.outcome.total_output,
            r.outcome.total_end_wip,
            r.outcome.avg_cycle_time
        );
    }

    let chosen = if ranks.is_empty() {
        match report.best_by_output() {
            Some(best) => &best.alternative,
            None => return Ok(()),
        }
    } else {
        choose_alternative(&alternatives, &ranks)?
    };

    println!("\nSecond game with {}: {}\n", chosen.name, chosen.description);
    let mut second = Game::new(chosen.config(&base))?;
    second.add_observer(Box::new(BoardPrinter));
    second.run_to_end()?;

    Ok(())
}
