//! Monte Carlo showdowns: complete the board at random, score every player,
//! credit the pot, and hand a batch of results to a [`BatchSink`] every
//! `batch_size` iterations until the sink says stop.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use rand::distributions::{Distribution, Uniform};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::cards::{Card, DeckMask, Rank, StartingHand, Suit, BOARD_CARDS, DECK_SIZE};
use crate::error::{CardOrigin, EvalError, EvalResult};
use crate::hand_evaluator::{EvaluatedHand, HandEvaluator};
use crate::hand_ranks::RankTable;

pub const MAX_PLAYERS: usize = 10;
pub const DEFAULT_BATCH_SIZE: u64 = 100_000;

/// Fractional pots, counted exactly in units of 1/2520.
///
/// 2520 is divisible by every player count from 1 to 10, so each split is an
/// integer number of units and sums never drift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SplitShare(u64);

impl SplitShare {
    pub const UNITS_PER_POT: u64 = 2520;

    pub fn from_units(units: u64) -> SplitShare {
        SplitShare(units)
    }

    /// One pot divided `ways` ways. `ways` must be in `1..=10`.
    pub fn of_pot(ways: usize) -> SplitShare {
        debug_assert!((1..=MAX_PLAYERS).contains(&ways));
        SplitShare(Self::UNITS_PER_POT / ways as u64)
    }

    pub fn units(self) -> u64 {
        self.0
    }

    pub fn pots(self) -> f64 {
        self.0 as f64 / Self::UNITS_PER_POT as f64
    }
}

impl Add for SplitShare {
    type Output = SplitShare;

    fn add(self, other: SplitShare) -> SplitShare {
        SplitShare(self.0 + other.0)
    }
}

impl AddAssign for SplitShare {
    fn add_assign(&mut self, other: SplitShare) {
        self.0 += other.0;
    }
}

impl Sum for SplitShare {
    fn sum<I: Iterator<Item = SplitShare>>(iter: I) -> SplitShare {
        iter.fold(SplitShare::default(), Add::add)
    }
}

/// Per-player tally of pots won outright and shares of split pots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationResult {
    pub wins: u64,
    pub tied: SplitShare,
}

impl SimulationResult {
    pub fn merge(&mut self, other: &SimulationResult) {
        self.wins += other.wins;
        self.tied += other.tied;
    }

    /// Pots credited to the player, whole and split.
    pub fn pots(&self) -> f64 {
        self.wins as f64 + self.tied.pots()
    }
}

/// Receives each finished batch and decides whether the run continues.
pub trait BatchSink {
    /// Returns `false` to stop the simulation.
    fn report(&mut self, batch: &[SimulationResult]) -> bool;
}

impl<F> BatchSink for F
where
    F: FnMut(&[SimulationResult]) -> bool,
{
    fn report(&mut self, batch: &[SimulationResult]) -> bool {
        self(batch)
    }
}

/// Seats sharing the best hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TieSet(u16);

impl TieSet {
    fn insert(&mut self, seat: usize) {
        self.0 |= 1 << seat;
    }

    pub fn contains(self, seat: usize) -> bool {
        self.0 & (1 << seat) != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn seats(self) -> impl Iterator<Item = usize> {
        (0..MAX_PLAYERS).filter(move |&seat| self.contains(seat))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Winner(usize),
    Split(TieSet),
}

/// Running winner determination over the seats of one showdown.
#[derive(Debug, Default)]
struct Showdown {
    best: Option<EvaluatedHand>,
    winner: Option<usize>,
    ties: TieSet,
}

impl Showdown {
    fn add(&mut self, seat: usize, hand: EvaluatedHand) {
        match self.best {
            Some(best) if hand < best => {}
            Some(best) if hand == best => {
                if let Some(winner) = self.winner.take() {
                    self.ties.insert(winner);
                }
                self.ties.insert(seat);
            }
            _ => {
                self.best = Some(hand);
                self.winner = Some(seat);
                self.ties = TieSet::default();
            }
        }
    }

    fn outcome(&self) -> Option<Outcome> {
        match self.winner {
            Some(seat) => Some(Outcome::Winner(seat)),
            None if !self.ties.is_empty() => Some(Outcome::Split(self.ties)),
            None => None,
        }
    }

    fn credit(&self, results: &mut [SimulationResult]) {
        match self.outcome() {
            Some(Outcome::Winner(seat)) => results[seat].wins += 1,
            Some(Outcome::Split(ties)) => {
                let share = SplitShare::of_pot(ties.len());
                for seat in ties.seats() {
                    results[seat].tied += share;
                }
            }
            None => {}
        }
    }
}

/// Decides who takes the pot given each seat's hand. `None` when `hands` is empty.
pub fn showdown(hands: &[EvaluatedHand]) -> Option<Outcome> {
    let mut showdown = Showdown::default();
    for (seat, &hand) in hands.iter().enumerate() {
        showdown.add(seat, hand);
    }
    showdown.outcome()
}

/// A validated simulation setup: distinct hole cards, a partial board and
/// the mask of every card already dealt.
#[derive(Debug, Clone)]
pub struct Simulation {
    players: Vec<StartingHand>,
    board: Vec<Card>,
    dead: DeckMask,
    batch_size: u64,
}

impl Simulation {
    pub fn new(
        players: &[StartingHand],
        board: &[Card],
        batch_size: u64,
    ) -> EvalResult<Simulation> {
        if batch_size == 0 {
            return Err(EvalError::InvalidConfiguration(
                "batch size must be positive".to_string(),
            ));
        }
        if players.is_empty() || players.len() > MAX_PLAYERS {
            return Err(EvalError::InvalidConfiguration(format!(
                "the number of players must be between 1 and {}, got {}",
                MAX_PLAYERS,
                players.len()
            )));
        }
        if board.len() > BOARD_CARDS {
            return Err(EvalError::InvalidConfiguration(format!(
                "the number of board cards must be between 0 and {}, got {}",
                BOARD_CARDS,
                board.len()
            )));
        }

        let mut dead = DeckMask::new();
        let hole_cards = players.iter().flat_map(|p| p.cards());
        for (card, origin) in hole_cards
            .map(|c| (c, CardOrigin::Players))
            .chain(board.iter().map(|&c| (c, CardOrigin::Board)))
        {
            if dead.is_used(card) {
                return Err(EvalError::DuplicateCard { card, origin });
            }
            dead = dead.mark_used(card);
        }

        Ok(Simulation {
            players: players.to_vec(),
            board: board.to_vec(),
            dead,
            batch_size,
        })
    }

    pub fn players(&self) -> &[StartingHand] {
        &self.players
    }

    pub fn board(&self) -> &[Card] {
        &self.board
    }

    pub fn dead_cards(&self) -> DeckMask {
        self.dead
    }

    pub fn batch_size(&self) -> u64 {
        self.batch_size
    }

    /// Number of community cards drawn per iteration.
    pub fn deals(&self) -> usize {
        BOARD_CARDS - self.board.len()
    }

    /// Runs iterations until `sink` returns `false` and reports how many ran.
    ///
    /// The only error past validation is a corrupt table, which aborts the run.
    pub fn run<T, R, S>(&self, table: &T, rng: &mut R, sink: &mut S) -> EvalResult<u64>
    where
        T: RankTable + ?Sized,
        R: Rng + ?Sized,
        S: BatchSink + ?Sized,
    {
        let evaluator = HandEvaluator::new(table);
        let draw = Uniform::from(1..=DECK_SIZE);
        let seats = self.players.len();

        let mut community = [Card::new(Rank::Two, Suit::Clubs); BOARD_CARDS];
        community[..self.board.len()].copy_from_slice(&self.board);
        let mut batch = [SimulationResult::default(); MAX_PLAYERS];

        let mut iterations = 0u64;
        let mut pending = 0u64;
        loop {
            let mut used = self.dead;
            let mut slot = self.board.len();
            while slot < BOARD_CARDS {
                match Card::from_value(draw.sample(rng)) {
                    Some(card) if !used.is_used(card) => {
                        used = used.mark_used(card);
                        community[slot] = card;
                        slot += 1;
                    }
                    _ => {}
                }
            }

            let mut showdown = Showdown::default();
            for (seat, player) in self.players.iter().enumerate() {
                showdown.add(seat, evaluator.evaluate_hand(player.cards(), &community)?);
            }
            showdown.credit(&mut batch[..seats]);

            iterations += 1;
            pending += 1;
            if pending == self.batch_size {
                if !sink.report(&batch[..seats]) {
                    log::debug!("simulation stopped after {} iterations", iterations);
                    return Ok(iterations);
                }
                batch = [SimulationResult::default(); MAX_PLAYERS];
                pending = 0;
            }
        }
    }
}

/// Validates the setup and runs it with a freshly seeded generator.
pub fn simulate<T, S>(
    table: &T,
    players: &[StartingHand],
    board: &[Card],
    sink: &mut S,
    batch_size: u64,
) -> EvalResult<u64>
where
    T: RankTable + ?Sized,
    S: BatchSink + ?Sized,
{
    let simulation = Simulation::new(players, board, batch_size)?;
    simulation.run(table, &mut SmallRng::from_entropy(), sink)
}
