//! Runs one simulation per pool thread and merges their batches into shared
//! totals until the target iteration count is reached.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::cards::{Card, StartingHand};
use crate::error::{EvalError, EvalResult};
use crate::hand_ranks::RankTable;
use crate::simulation::{BatchSink, Simulation, SimulationResult, DEFAULT_BATCH_SIZE};

pub const DEFAULT_ITERATIONS: u64 = 100_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquityConfig {
    pub iterations: u64,
    pub threads: usize,
    pub batch_size: u64,
}

impl Default for EquityConfig {
    fn default() -> Self {
        EquityConfig {
            iterations: DEFAULT_ITERATIONS,
            threads: default_threads(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl EquityConfig {
    pub fn validate(&self) -> EvalResult<()> {
        if self.iterations == 0 {
            return Err(EvalError::InvalidConfiguration(
                "iterations must be positive".to_string(),
            ));
        }
        if self.threads == 0 {
            return Err(EvalError::InvalidConfiguration(
                "threads must be positive".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(EvalError::InvalidConfiguration(
                "batch size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// One less than the available parallelism, at least one.
pub fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1))
        .unwrap_or(1)
        .max(1)
}

struct Totals {
    results: Vec<SimulationResult>,
    iterations: u64,
}

/// Totals shared by every worker of a run, guarded by a single lock.
pub struct Aggregate {
    hands: Vec<StartingHand>,
    target: u64,
    totals: Mutex<Totals>,
    stop: AtomicBool,
}

impl Aggregate {
    pub fn new(players: &[StartingHand], target: u64) -> Aggregate {
        Aggregate {
            hands: players.to_vec(),
            target,
            totals: Mutex::new(Totals {
                results: vec![SimulationResult::default(); players.len()],
                iterations: 0,
            }),
            stop: AtomicBool::new(false),
        }
    }

    fn totals(&self) -> MutexGuard<'_, Totals> {
        self.totals.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds one worker's batch and tells it whether to keep going.
    pub fn merge(&self, batch: &[SimulationResult], batch_size: u64) -> bool {
        let mut totals = self.totals();
        for (total, result) in totals.results.iter_mut().zip(batch) {
            total.merge(result);
        }
        totals.iterations += batch_size;
        let running = !self.stop_requested() && totals.iterations < self.target;
        if !running && totals.iterations >= self.target {
            log::info!("target of {} iterations reached", self.target);
        }
        running
    }

    /// Asks every worker to stop at its next batch boundary.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn iterations(&self) -> u64 {
        self.totals().iterations
    }

    pub fn results(&self) -> Vec<SimulationResult> {
        self.totals().results.clone()
    }

    pub fn snapshot(&self) -> EquityReport {
        let totals = self.totals();
        EquityReport::new(&self.hands, &totals.results, totals.iterations)
    }
}

/// A worker's view of the shared [`Aggregate`].
struct WorkerSink<'a> {
    aggregate: &'a Aggregate,
    batch_size: u64,
}

impl BatchSink for WorkerSink<'_> {
    fn report(&mut self, batch: &[SimulationResult]) -> bool {
        self.aggregate.merge(batch, self.batch_size)
    }
}

/// Runs a single iteration to surface table or setup errors before
/// committing a thread pool.
pub fn sanity_check<T: RankTable + ?Sized>(
    table: &T,
    players: &[StartingHand],
    board: &[Card],
) -> EvalResult<()> {
    let probe = Simulation::new(players, board, 1)?;
    probe.run(
        table,
        &mut SmallRng::from_entropy(),
        &mut |_: &[SimulationResult]| false,
    )?;
    log::debug!("sanity iteration passed");
    Ok(())
}

/// Runs `simulation` on `threads` pool threads, each with its own generator,
/// merging into `aggregate` until it reports the target reached or a stop.
///
/// The total may overshoot the target by up to `(threads - 1) * batch_size`.
pub fn run_parallel<T: RankTable + ?Sized>(
    table: &T,
    simulation: &Simulation,
    threads: usize,
    aggregate: &Aggregate,
) -> EvalResult<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("simulate-{}", i))
        .build()?;

    let outcomes = pool.broadcast(|ctx| {
        let mut rng = SmallRng::from_entropy();
        let mut sink = WorkerSink {
            aggregate,
            batch_size: simulation.batch_size(),
        };
        log::debug!("worker {} started", ctx.index());
        let outcome = simulation.run(table, &mut rng, &mut sink);
        match &outcome {
            Ok(iterations) => log::debug!("worker {} ran {} iterations", ctx.index(), iterations),
            Err(e) => {
                log::warn!("worker {} failed: {}", ctx.index(), e);
                aggregate.request_stop();
            }
        }
        outcome
    });

    outcomes.into_iter().try_for_each(|outcome| outcome.map(|_| ()))
}

/// Estimates every player's equity: validates, runs the sanity iteration,
/// then the parallel simulation, and returns the final totals.
pub fn equity<T: RankTable + ?Sized>(
    table: &T,
    players: &[StartingHand],
    board: &[Card],
    config: &EquityConfig,
) -> EvalResult<EquityReport> {
    config.validate()?;
    let simulation = Simulation::new(players, board, config.batch_size)?;
    sanity_check(table, players, board)?;

    let aggregate = Aggregate::new(players, config.iterations);
    run_parallel(table, &simulation, config.threads, &aggregate)?;
    let report = aggregate.snapshot();
    log::info!(
        "{:<32}{} iterations on {} threads",
        "simulation finished",
        report.iterations,
        config.threads
    );
    Ok(report)
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerEquity {
    pub hand: String,
    pub wins: u64,
    pub tied_pots: f64,
    pub equity: f64,
    pub win_rate: f64,
    pub tie_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EquityReport {
    pub iterations: u64,
    pub players: Vec<PlayerEquity>,
}

impl EquityReport {
    pub fn new(hands: &[StartingHand], results: &[SimulationResult], iterations: u64) -> Self {
        let total = iterations.max(1) as f64;
        let players = hands
            .iter()
            .zip(results)
            .map(|(hand, result)| {
                let tied_pots = result.tied.pots();
                PlayerEquity {
                    hand: hand.to_string(),
                    wins: result.wins,
                    tied_pots,
                    equity: result.pots() / total,
                    win_rate: result.wins as f64 / total,
                    tie_rate: tied_pots / total,
                }
            })
            .collect();
        EquityReport {
            iterations,
            players,
        }
    }

    pub fn to_json(&self) -> EvalResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for EquityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in &self.players {
            writeln!(
                f,
                "{}: equity {:.3}% | win {:.3}% | tie {:.3}%",
                p.hand,
                p.equity * 100.0,
                p.win_rate * 100.0,
                p.tie_rate * 100.0
            )?;
        }
        write!(f, "{} iterations", self.iterations)
    }
}
