use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use colored::Colorize;

use crate::cards::{parse_board, parse_starting_hand, StartingHand};
use crate::display::{
    board_display, print_error, print_progress, report_table, throughput_line,
};
use crate::equity::{
    default_threads, run_parallel, sanity_check, Aggregate, EquityConfig, DEFAULT_ITERATIONS,
};
use crate::error::EvalResult;
use crate::hand_ranks::{resolve_table_path, HandRankTable};
use crate::simulation::{Simulation, DEFAULT_BATCH_SIZE};

const REFRESH: Duration = Duration::from_millis(500);

#[derive(Parser)]
#[command(
    name = "eval-hands",
    version = "1.0.0",
    about = "Estimate Texas Hold'em equities by Monte Carlo simulation."
)]
struct Cli {
    /// The hands of the players (e.g., AhKd JsJc)
    #[arg(required = true, value_name = "HANDS")]
    hands: Vec<String>,
    /// Number of iterations
    #[arg(short, long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: u64,
    /// The board cards (e.g., Ac3d7h)
    #[arg(short, long)]
    board: Option<String>,
    /// Number of threads
    #[arg(short, long, default_value_t = default_threads())]
    threads: usize,
    /// Iterations each thread runs between merges
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: u64,
    /// Hand rank table file (defaults to $HANDRANKS_PATH, then HandRanks.dat next to the binary)
    #[arg(long, value_name = "PATH")]
    table: Option<PathBuf>,
    /// Print the final report as JSON
    #[arg(long)]
    json: bool,
}

pub fn run() {
    let cli = Cli::parse();
    dispatch(cli);
}

fn dispatch(cli: Cli) {
    init_logging();
    if let Err(e) = cmd_simulate(cli) {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("warn");
    env_logger::Builder::from_env(env).init();
}

fn cmd_simulate(cli: Cli) -> EvalResult<()> {
    let players: Vec<StartingHand> = cli
        .hands
        .iter()
        .map(|h| parse_starting_hand(h))
        .collect::<EvalResult<_>>()?;
    let board = parse_board(cli.board.as_deref().unwrap_or(""))?;
    let config = EquityConfig {
        iterations: cli.iterations,
        threads: cli.threads,
        batch_size: cli.batch_size,
    };
    config.validate()?;
    let simulation = Simulation::new(&players, &board, config.batch_size)?;

    let table = HandRankTable::load(resolve_table_path(cli.table))?;
    sanity_check(&table, &players, &board)?;

    if !cli.json {
        println!(
            "\n  {}",
            format!(
                "Simulating ~{} hands using {} threads.",
                config.iterations, config.threads
            )
            .bold()
            .bright_blue()
        );
        println!("  Board: {}\n", board_display(&board));
    }

    let aggregate = Aggregate::new(&players, config.iterations);
    let started = Instant::now();
    thread::scope(|scope| {
        let worker = scope.spawn(|| run_parallel(&table, &simulation, config.threads, &aggregate));
        while !worker.is_finished() {
            thread::sleep(REFRESH);
            if !cli.json {
                print_progress(aggregate.iterations(), aggregate.target());
            }
        }
        worker
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
    })?;
    let elapsed = started.elapsed();

    let report = aggregate.snapshot();
    if cli.json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    eprintln!();
    println!("{}", report_table(&players, &report));
    println!(
        "\n  {}\n",
        throughput_line(report.iterations, elapsed).yellow().bold()
    );
    Ok(())
}
