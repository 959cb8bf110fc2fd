use std::fmt;

use crate::cards::Card;
use crate::error::{EvalError, EvalResult};
use crate::hand_ranks::RankTable;

/// Index of the first lookup; the first card's value is added to it.
pub const BASE_OFFSET: usize = 53;

const CATEGORY_SHIFT: u32 = 12;
const RANK_MASK: i32 = 0x0FFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandCategory {
    HighCard = 1,
    OnePair = 2,
    TwoPair = 3,
    ThreeOfAKind = 4,
    Straight = 5,
    Flush = 6,
    FullHouse = 7,
    FourOfAKind = 8,
    StraightFlush = 9,
}

impl HandCategory {
    pub fn from_code(code: i32) -> Option<HandCategory> {
        match code {
            1 => Some(HandCategory::HighCard),
            2 => Some(HandCategory::OnePair),
            3 => Some(HandCategory::TwoPair),
            4 => Some(HandCategory::ThreeOfAKind),
            5 => Some(HandCategory::Straight),
            6 => Some(HandCategory::Flush),
            7 => Some(HandCategory::FullHouse),
            8 => Some(HandCategory::FourOfAKind),
            9 => Some(HandCategory::StraightFlush),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandCategory::HighCard => write!(f, "High Card"),
            HandCategory::OnePair => write!(f, "One Pair"),
            HandCategory::TwoPair => write!(f, "Two Pair"),
            HandCategory::ThreeOfAKind => write!(f, "Three of a Kind"),
            HandCategory::Straight => write!(f, "Straight"),
            HandCategory::Flush => write!(f, "Flush"),
            HandCategory::FullHouse => write!(f, "Full House"),
            HandCategory::FourOfAKind => write!(f, "Four of a Kind"),
            HandCategory::StraightFlush => write!(f, "Straight Flush"),
        }
    }
}

/// Strength of a seven-card hand. Ordered by category, then rank; equal
/// values split the pot.
///
/// Only the evaluator produces these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EvaluatedHand {
    category: HandCategory,
    rank: u16,
}

impl EvaluatedHand {
    fn decode(value: i32) -> EvalResult<EvaluatedHand> {
        let code = value >> CATEGORY_SHIFT;
        let category = HandCategory::from_code(code).ok_or_else(|| {
            EvalError::CorruptEvaluationTable(format!(
                "final value {} decodes to category {}",
                value, code
            ))
        })?;
        Ok(EvaluatedHand {
            category,
            rank: (value & RANK_MASK) as u16,
        })
    }

    pub fn category(&self) -> HandCategory {
        self.category
    }

    /// Position within the category; higher is stronger.
    pub fn rank(&self) -> u16 {
        self.rank
    }
}

impl fmt::Display for EvaluatedHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.category, self.rank)
    }
}

/// Walks a [`RankTable`] to score seven-card hands.
pub struct HandEvaluator<'t, T: RankTable + ?Sized> {
    table: &'t T,
}

impl<'t, T: RankTable + ?Sized> Clone for HandEvaluator<'t, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'t, T: RankTable + ?Sized> Copy for HandEvaluator<'t, T> {}

impl<'t, T: RankTable + ?Sized> HandEvaluator<'t, T> {
    pub fn new(table: &'t T) -> Self {
        HandEvaluator { table }
    }

    /// Scores seven cards. Card order does not matter.
    ///
    /// Fails with `CorruptEvaluationTable` when a lookup leaves the table,
    /// lands on a non-positive entry or ends on an unknown category.
    #[inline]
    pub fn evaluate(&self, cards: &[Card; 7]) -> EvalResult<EvaluatedHand> {
        let mut value = self.lookup(BASE_OFFSET + usize::from(cards[0].value()))?;
        for card in &cards[1..] {
            value = self.lookup(value as usize + usize::from(card.value()))?;
        }
        EvaluatedHand::decode(value)
    }

    /// Scores two hole cards against a complete five-card board.
    #[inline]
    pub fn evaluate_hand(&self, hole: [Card; 2], board: &[Card; 5]) -> EvalResult<EvaluatedHand> {
        self.evaluate(&[
            hole[0], hole[1], board[0], board[1], board[2], board[3], board[4],
        ])
    }

    #[inline]
    fn lookup(&self, index: usize) -> EvalResult<i32> {
        match self.table.entry(index) {
            Some(value) if value > 0 => Ok(value),
            Some(value) => Err(EvalError::CorruptEvaluationTable(format!(
                "entry {} holds {}",
                index, value
            ))),
            None => Err(EvalError::CorruptEvaluationTable(format!(
                "index {} is outside the table",
                index
            ))),
        }
    }
}
