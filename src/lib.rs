//! Monte Carlo equity estimation for Texas Hold'em starting hands.
//!
//! Cards are parsed into a compact 1..=52 encoding, unknown board cards are
//! drawn at random, and every seven-card hand is scored by walking a
//! precomputed hand rank table. Many simulations run in parallel and merge
//! their batches into shared totals.
//!
//! ```no_run
//! use eval_hands::cards::{parse_board, parse_starting_hand};
//! use eval_hands::equity::{equity, EquityConfig};
//! use eval_hands::hand_ranks::HandRankTable;
//!
//! let table = HandRankTable::load("HandRanks.dat")?;
//! let players = vec![parse_starting_hand("AhAd")?, parse_starting_hand("KsKd")?];
//! let board = parse_board("")?;
//! let config = EquityConfig { iterations: 1_000_000, ..EquityConfig::default() };
//! let report = equity(&table, &players, &board, &config)?;
//! println!("{}", report);
//! # Ok::<(), eval_hands::error::EvalError>(())
//! ```

pub mod cards;
pub mod cli;
pub mod display;
pub mod equity;
pub mod error;
pub mod hand_evaluator;
pub mod hand_ranks;
pub mod simulation;
