//! Shared test support: card helpers and a substitute hand rank table.
#![allow(dead_code)]

use once_cell::sync::Lazy;

use eval_hands::cards::{parse_board, parse_card, parse_starting_hand, Card, StartingHand};
use eval_hands::hand_evaluator::BASE_OFFSET;
use eval_hands::hand_ranks::{HandRankTable, RankTable, TABLE_PATH_ENV};

pub fn c(notation: &str) -> Card {
    parse_card(notation).unwrap()
}

pub fn hand(notation: &str) -> StartingHand {
    parse_starting_hand(notation).unwrap()
}

pub fn hands(notations: &[&str]) -> Vec<StartingHand> {
    notations.iter().map(|n| hand(n)).collect()
}

pub fn board(notation: &str) -> Vec<Card> {
    parse_board(notation).unwrap()
}

/// Hole cards followed by a five-card board, e.g. `seven("AsKs", "QsJsTs2h3d")`.
pub fn seven(hole: &str, community: &str) -> [Card; 7] {
    let h = hand(hole).cards();
    let b = board(community);
    [h[0], h[1], b[0], b[1], b[2], b[3], b[4]]
}

/// The real table, loaded once per test binary when `HANDRANKS_PATH` is set.
pub static REAL_TABLE: Lazy<Option<HandRankTable>> = Lazy::new(|| {
    std::env::var_os(TABLE_PATH_ENV)
        .map(|path| HandRankTable::load(path).expect("HANDRANKS_PATH must name a valid table"))
});

/// Every entry holds the same value.
pub struct ConstantTable(pub i32);

impl RankTable for ConstantTable {
    fn entry(&self, _index: usize) -> Option<i32> {
        Some(self.0)
    }
}

/// Has no entries at all.
pub struct EmptyTable;

impl RankTable for EmptyTable {
    fn entry(&self, _index: usize) -> Option<i32> {
        None
    }
}

const STRIDE: usize = 64;
const FIRST_STATE: usize = 2;
const MAX_HELD: usize = 6;

/// A stand-in for the 130 MB asset that honours the same walk: base offset
/// 53, `next = table[value + card]`, and a final `category << 12 | rank`.
///
/// Intermediate values are `(state + 2) * 64`, where `state` ranks the set of
/// cards seen so far among all 1..=6 card subsets. Entries are computed on
/// demand instead of stored.
pub struct SyntheticRanks {
    binom: [[usize; 8]; 53],
    offsets: [usize; 8],
}

impl Default for SyntheticRanks {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticRanks {
    pub fn new() -> Self {
        let mut binom = [[0usize; 8]; 53];
        for n in 0..53 {
            binom[n][0] = 1;
            for k in 1..8 {
                if n > 0 {
                    binom[n][k] = binom[n - 1][k - 1] + binom[n - 1][k];
                }
            }
        }
        let mut offsets = [0usize; 8];
        for k in 2..8 {
            offsets[k] = offsets[k - 1] + binom[52][k - 1];
        }
        SyntheticRanks { binom, offsets }
    }

    /// `held` holds zero-based card ids in ascending order.
    fn state_index(&self, held: &[u8]) -> usize {
        let rank: usize = held
            .iter()
            .enumerate()
            .map(|(i, &x)| self.binom[usize::from(x)][i + 1])
            .sum();
        (self.offsets[held.len()] + rank + FIRST_STATE) * STRIDE
    }

    fn unrank(&self, state: usize, out: &mut [u8; 7]) -> Option<usize> {
        if state >= self.offsets[MAX_HELD + 1] {
            return None;
        }
        let held = (1..=MAX_HELD).rev().find(|&k| self.offsets[k] <= state)?;
        let mut rest = state - self.offsets[held];
        let mut upper = 52;
        for i in (1..=held).rev() {
            let x = (i - 1..upper).rev().find(|&x| self.binom[x][i] <= rest)?;
            out[i - 1] = x as u8;
            rest -= self.binom[x][i];
            upper = x;
        }
        Some(held)
    }
}

impl RankTable for SyntheticRanks {
    fn entry(&self, index: usize) -> Option<i32> {
        let mut cards = [0u8; 7];
        let (held, card) = if (BASE_OFFSET + 1..=BASE_OFFSET + 52).contains(&index) {
            (0, index - BASE_OFFSET)
        } else {
            let state = index / STRIDE;
            let card = index % STRIDE;
            if state < FIRST_STATE || !(1..=52).contains(&card) {
                return None;
            }
            (self.unrank(state - FIRST_STATE, &mut cards)?, card)
        };

        let id = (card - 1) as u8;
        if cards[..held].contains(&id) {
            return Some(0);
        }
        cards[held] = id;
        let held = held + 1;
        cards[..held].sort_unstable();
        if held == 7 {
            Some(score(&cards))
        } else {
            Some(self.state_index(&cards[..held]) as i32)
        }
    }
}

fn choose(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

/// Dense rank of a set of distinct ranks, increasing with the descending
/// lexicographic order of the set.
fn colex(ranks: &[usize]) -> usize {
    let mut sorted = ranks.to_vec();
    sorted.sort_unstable();
    sorted
        .iter()
        .enumerate()
        .map(|(i, &r)| choose(r, i + 1))
        .sum()
}

fn straight_high(mask: u16) -> Option<usize> {
    (4..=12)
        .rev()
        .find(|&high| (mask >> (high - 4)) & 0x1F == 0x1F)
        .or_else(|| (mask & 0x100F == 0x100F).then_some(3))
}

fn top(mask: u16, n: usize) -> Vec<usize> {
    (0..13).rev().filter(|&r| mask & (1 << r) != 0).take(n).collect()
}

/// Reference seven-card score: `category << 12 | rank`, rank dense within
/// the category. Card ids are zero-based, rank = id / 4, suit = id % 4.
pub fn score(cards: &[u8; 7]) -> i32 {
    let mut counts = [0u8; 13];
    let mut suits = [0u16; 4];
    for &card in cards {
        counts[usize::from(card / 4)] += 1;
        suits[usize::from(card % 4)] |= 1 << (card / 4);
    }
    let mask = (0..13)
        .filter(|&r| counts[r] > 0)
        .fold(0u16, |m, r| m | (1 << r));
    let with = |n: u8| -> Vec<usize> { (0..13).rev().filter(|&r| counts[r] >= n).collect() };
    let flush = suits.iter().copied().find(|s| s.count_ones() >= 5);
    let trips = with(3);
    let pairs = with(2);
    let full_pair = trips
        .first()
        .and_then(|&t| pairs.iter().copied().find(|&p| p != t));

    let (category, rank) = if let Some(high) = flush.and_then(straight_high) {
        (9, high)
    } else if let Some(&quad) = with(4).first() {
        (8, quad * 13 + top(mask & !(1 << quad), 1)[0])
    } else if let (Some(&t), Some(p)) = (trips.first(), full_pair) {
        (7, t * 13 + p)
    } else if let Some(suited) = flush {
        (6, colex(&top(suited, 5)))
    } else if let Some(high) = straight_high(mask) {
        (5, high)
    } else if let Some(&t) = trips.first() {
        (4, t * 78 + colex(&top(mask & !(1 << t), 2)))
    } else if pairs.len() >= 2 {
        let (hi, lo) = (pairs[0], pairs[1]);
        (3, hi * 169 + lo * 13 + top(mask & !(1 << hi) & !(1 << lo), 1)[0])
    } else if let Some(&p) = pairs.first() {
        (2, p * 286 + colex(&top(mask & !(1 << p), 3)))
    } else {
        (1, colex(&top(mask, 5)))
    };
    ((category << 12) | rank) as i32
}
