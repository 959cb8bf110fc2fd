use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::cards::Card;

/// Which part of the input a duplicated card was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardOrigin {
    Players,
    Board,
}

impl fmt::Display for CardOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardOrigin::Players => write!(f, "players"),
            CardOrigin::Board => write!(f, "board"),
        }
    }
}

#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Invalid card: '{0}'")]
    InvalidCard(String),

    #[error("Invalid board: '{0}'")]
    InvalidBoard(String),

    #[error("Invalid hand: '{0}'")]
    InvalidHand(String),

    #[error("Duplicate card '{card}' in {origin}")]
    DuplicateCard { card: Card, origin: CardOrigin },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Corrupt evaluation table: {0}")]
    CorruptEvaluationTable(String),

    #[error("Cannot read hand rank table {path}: {source}")]
    TableIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Hand rank table {path} holds {found} bytes, expected {expected}")]
    TableSize {
        path: PathBuf,
        expected: u64,
        found: u64,
    },

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type EvalResult<T> = Result<T, EvalError>;
