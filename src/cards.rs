use std::fmt;
use std::str::FromStr;

use crate::error::{EvalError, EvalResult};

pub const RANKS_STR: &str = "23456789TJQKA";
pub const SUITS_STR: &str = "cdhs";

/// Number of distinct cards; card values run `1..=DECK_SIZE`.
pub const DECK_SIZE: u8 = 52;
/// Maximum number of community cards.
pub const BOARD_CARDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
    Ace = 14,
}

impl Rank {
    pub fn from_char(c: char) -> Option<Rank> {
        match c {
            '2' => Some(Rank::Two),
            '3' => Some(Rank::Three),
            '4' => Some(Rank::Four),
            '5' => Some(Rank::Five),
            '6' => Some(Rank::Six),
            '7' => Some(Rank::Seven),
            '8' => Some(Rank::Eight),
            '9' => Some(Rank::Nine),
            'T' => Some(Rank::Ten),
            'J' => Some(Rank::Jack),
            'Q' => Some(Rank::Queen),
            'K' => Some(Rank::King),
            'A' => Some(Rank::Ace),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }

    /// Zero-based position, deuce = 0 through ace = 12.
    fn ordinal(self) -> u8 {
        self as u8 - Rank::Two as u8
    }
}

pub const ALL_RANKS: [Rank; 13] = [
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
    Rank::Ace,
];

/// Suits in encoding order: within a rank, clubs take the lowest value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub fn from_char(c: char) -> Option<Suit> {
        match c {
            'c' => Some(Suit::Clubs),
            'd' => Some(Suit::Diamonds),
            'h' => Some(Suit::Hearts),
            's' => Some(Suit::Spades),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Suit::Clubs => 'c',
            Suit::Diamonds => 'd',
            Suit::Hearts => 'h',
            Suit::Spades => 's',
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Suit::Spades => "\u{2660}",
            Suit::Hearts => "\u{2665}",
            Suit::Diamonds => "\u{2666}",
            Suit::Clubs => "\u{2663}",
        }
    }
}

pub const ALL_SUITS: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

/// A playing card encoded as `4 * rank_ordinal + suit + 1`, so `2c` is 1 and `As` is 52.
///
/// The encoding is the one the hand rank table is indexed with; a value is
/// never 0 and never above 52.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card(u8);

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Card(rank.ordinal() * 4 + suit as u8 + 1)
    }

    /// Returns the card with the given encoded value, if it is in `1..=52`.
    pub fn from_value(value: u8) -> Option<Card> {
        (1..=DECK_SIZE).contains(&value).then_some(Card(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn rank(self) -> Rank {
        ALL_RANKS[usize::from((self.0 - 1) / 4)]
    }

    pub fn suit(self) -> Suit {
        ALL_SUITS[usize::from((self.0 - 1) % 4)]
    }

    pub fn pretty(self) -> String {
        format!("{}{}", self.rank().to_char(), self.suit().symbol())
    }

    /// Iterates all 52 cards in encoding order.
    pub fn all() -> impl Iterator<Item = Card> {
        (1..=DECK_SIZE).map(Card)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank().to_char(), self.suit().to_char())
    }
}

impl FromStr for Card {
    type Err = EvalError;

    fn from_str(s: &str) -> EvalResult<Card> {
        parse_card(s)
    }
}

/// Set of assigned cards; bit `v` is set when the card with value `v` is taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DeckMask(u64);

impl DeckMask {
    pub fn new() -> DeckMask {
        DeckMask(0)
    }

    pub fn is_used(self, card: Card) -> bool {
        self.0 & (1u64 << card.value()) != 0
    }

    #[must_use]
    pub fn mark_used(self, card: Card) -> DeckMask {
        DeckMask(self.0 | (1u64 << card.value()))
    }

    pub fn len(self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn bits(self) -> u64 {
        self.0
    }
}

/// The two hole cards dealt to one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StartingHand {
    cards: [Card; 2],
}

impl StartingHand {
    /// Pairs two distinct cards into a hand.
    pub fn new(first: Card, second: Card) -> EvalResult<StartingHand> {
        if first == second {
            return Err(EvalError::InvalidHand(format!("{}{}", first, second)));
        }
        Ok(StartingHand {
            cards: [first, second],
        })
    }

    pub fn first(&self) -> Card {
        self.cards[0]
    }

    pub fn second(&self) -> Card {
        self.cards[1]
    }

    pub fn cards(&self) -> [Card; 2] {
        self.cards
    }
}

impl fmt::Display for StartingHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.cards[0], self.cards[1])
    }
}

impl FromStr for StartingHand {
    type Err = EvalError;

    fn from_str(s: &str) -> EvalResult<StartingHand> {
        parse_starting_hand(s)
    }
}

/// Parses one of the 52 two-character tokens, e.g. `Ah` or `Tc`.
///
/// Ranks are upper case, suits lower case; nothing else is accepted.
pub fn parse_card(notation: &str) -> EvalResult<Card> {
    let invalid = || EvalError::InvalidCard(notation.to_string());
    let mut chars = notation.chars();
    let (Some(r), Some(s), None) = (chars.next(), chars.next(), chars.next()) else {
        return Err(invalid());
    };
    let rank = Rank::from_char(r).ok_or_else(invalid)?;
    let suit = Suit::from_char(s).ok_or_else(invalid)?;
    Ok(Card::new(rank, suit))
}

/// Parses up to five concatenated cards, e.g. `Ac3d7h`. A blank string is an
/// empty board. Duplicates are not checked here.
pub fn parse_board(notation: &str) -> EvalResult<Vec<Card>> {
    if notation.trim().is_empty() {
        return Ok(Vec::new());
    }
    let invalid = || EvalError::InvalidBoard(notation.to_string());
    if !notation.is_ascii() || notation.len() % 2 != 0 || notation.len() > 2 * BOARD_CARDS {
        return Err(invalid());
    }
    (0..notation.len())
        .step_by(2)
        .map(|i| parse_card(&notation[i..i + 2]).map_err(|_| invalid()))
        .collect()
}

/// Parses a four-character hand such as `AhKd`.
pub fn parse_starting_hand(notation: &str) -> EvalResult<StartingHand> {
    if !notation.is_ascii() || notation.len() != 4 {
        return Err(EvalError::InvalidHand(notation.to_string()));
    }
    let first = parse_card(&notation[..2])?;
    let second = parse_card(&notation[2..])?;
    StartingHand::new(first, second)
}
