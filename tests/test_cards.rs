mod common;

use common::c;
use eval_hands::cards::*;
use eval_hands::error::EvalError;

#[test]
fn test_card_encoding() {
    assert_eq!(c("2c").value(), 1);
    assert_eq!(c("2d").value(), 2);
    assert_eq!(c("2h").value(), 3);
    assert_eq!(c("2s").value(), 4);
    assert_eq!(c("3c").value(), 5);
    assert_eq!(c("Ac").value(), 49);
    assert_eq!(c("As").value(), 52);
}

#[test]
fn test_card_rank_and_suit() {
    let card = Card::new(Rank::King, Suit::Diamonds);
    assert_eq!(card.rank(), Rank::King);
    assert_eq!(card.suit(), Suit::Diamonds);
    assert_eq!(card.rank().value(), 13);
    assert_eq!(format!("{}", card), "Kd");
}

#[test]
fn test_card_pretty() {
    assert_eq!(c("As").pretty(), "A\u{2660}");
}

#[test]
fn test_every_token_round_trips() {
    let mut seen = std::collections::HashSet::new();
    for r in RANKS_STR.chars() {
        for s in SUITS_STR.chars() {
            let token = format!("{}{}", r, s);
            let card = parse_card(&token).unwrap();
            assert_eq!(card.to_string(), token);
            assert_eq!(parse_card(&card.to_string()).unwrap(), card);
            assert!((1..=52).contains(&card.value()));
            seen.insert(card.value());
        }
    }
    assert_eq!(seen.len(), 52);
}

#[test]
fn test_all_cards_match_values() {
    let all: Vec<Card> = Card::all().collect();
    assert_eq!(all.len(), 52);
    for (i, card) in all.iter().enumerate() {
        assert_eq!(usize::from(card.value()), i + 1);
        assert_eq!(Card::from_value(card.value()), Some(*card));
    }
}

#[test]
fn test_from_value_out_of_range() {
    assert_eq!(Card::from_value(0), None);
    assert_eq!(Card::from_value(53), None);
    assert_eq!(Card::from_value(255), None);
}

#[test]
fn test_parse_card_rejects_tokens_outside_vocabulary() {
    for token in ["", "A", "Ahh", "1h", "Ax", "ah", "AH", "10h", " Ah", "A\u{2660}"] {
        assert!(
            matches!(parse_card(token), Err(EvalError::InvalidCard(_))),
            "{:?} should be rejected",
            token
        );
    }
}

#[test]
fn test_card_from_str() {
    let card: Card = "Th".parse().unwrap();
    assert_eq!(card, Card::new(Rank::Ten, Suit::Hearts));
}

#[test]
fn test_parse_board_empty() {
    assert!(parse_board("").unwrap().is_empty());
    assert!(parse_board("   ").unwrap().is_empty());
}

#[test]
fn test_parse_board_flop_turn_river() {
    let flop = parse_board("Ac3d7h").unwrap();
    assert_eq!(flop, vec![c("Ac"), c("3d"), c("7h")]);
    assert_eq!(parse_board("Ac3d7h9s").unwrap().len(), 4);
    assert_eq!(parse_board("Ac3d7h9sTc").unwrap().len(), 5);
}

#[test]
fn test_parse_board_odd_length() {
    for board in ["A", "Ac3", "Ac3d7", "Ac3d7h9", "Ac3d7h9sT", "Ac3d7h9sTcJ"] {
        assert!(matches!(parse_board(board), Err(EvalError::InvalidBoard(_))));
    }
}

#[test]
fn test_parse_board_too_long() {
    assert!(matches!(
        parse_board("Ac3d7h9sTcJd"),
        Err(EvalError::InvalidBoard(_))
    ));
    assert!(matches!(
        parse_board("Ac3d7h9sTcJdQd"),
        Err(EvalError::InvalidBoard(_))
    ));
}

#[test]
fn test_parse_board_invalid_card() {
    assert!(matches!(parse_board("AcXx"), Err(EvalError::InvalidBoard(_))));
    assert!(matches!(parse_board("ac3d"), Err(EvalError::InvalidBoard(_))));
}

#[test]
fn test_parse_board_allows_duplicates() {
    // Collisions are caught when a simulation is set up.
    assert_eq!(parse_board("AcAc").unwrap(), vec![c("Ac"), c("Ac")]);
}

#[test]
fn test_parse_starting_hand() {
    let h = parse_starting_hand("AhKd").unwrap();
    assert_eq!(h.first(), c("Ah"));
    assert_eq!(h.second(), c("Kd"));
    assert_eq!(h.to_string(), "AhKd");
    assert_eq!("AhKd".parse::<StartingHand>().unwrap(), h);
}

#[test]
fn test_parse_starting_hand_wrong_length() {
    for text in ["", "Ah", "AhK", "AhKdQ", "AhKdQs"] {
        assert!(matches!(
            parse_starting_hand(text),
            Err(EvalError::InvalidHand(_))
        ));
    }
}

#[test]
fn test_parse_starting_hand_invalid_card() {
    assert!(matches!(
        parse_starting_hand("AhKx"),
        Err(EvalError::InvalidCard(_))
    ));
}

#[test]
fn test_parse_starting_hand_same_card_twice() {
    for card in Card::all() {
        let text = format!("{}{}", card, card);
        assert!(matches!(
            parse_starting_hand(&text),
            Err(EvalError::InvalidHand(_))
        ));
    }
}

#[test]
fn test_starting_hand_new_rejects_equal_cards() {
    assert!(StartingHand::new(c("Qs"), c("Qs")).is_err());
    assert!(StartingHand::new(c("Qs"), c("Qh")).is_ok());
}

#[test]
fn test_deck_mask() {
    let empty = DeckMask::new();
    assert!(empty.is_empty());

    let mask = empty.mark_used(c("As")).mark_used(c("2c"));
    assert_eq!(mask.len(), 2);
    assert!(mask.is_used(c("As")));
    assert!(mask.is_used(c("2c")));
    assert!(!mask.is_used(c("Ks")));
    assert_eq!(mask.bits(), (1 << 52) | (1 << 1));

    // Marking returns a new mask and leaves the original alone.
    assert!(!empty.is_used(c("As")));
}

#[test]
fn test_deck_mask_marking_twice_is_idempotent() {
    let mask = DeckMask::new().mark_used(c("7h"));
    assert!(mask.is_used(c("7h")));
    assert_eq!(mask.mark_used(c("7h")), mask);
}
