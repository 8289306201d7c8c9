pub(crate) mod detector;
pub(crate) mod hand_analysis;
pub(crate) mod rank_groups;

use crate::cards::{Card, Rank};
use crate::hand::{Hand, HandError};
use core::cmp::Ordering;
use std::fmt;

/// Packed `(rank, tiebreakers)` value; ordering matches lexicographic comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandValue(u64);

/// Hand categories from weakest (1) to strongest (10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum HandRank {
    HighCard = 1,
    OnePair = 2,
    TwoPair = 3,
    ThreeOfAKind = 4,
    Straight = 5,
    Flush = 6,
    FullHouse = 7,
    FourOfAKind = 8,
    StraightFlush = 9,
    RoyalFlush = 10,
}

impl HandRank {
    pub const fn value(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            HandRank::HighCard => "High Card",
            HandRank::OnePair => "One Pair",
            HandRank::TwoPair => "Two Pair",
            HandRank::ThreeOfAKind => "Three of a Kind",
            HandRank::Straight => "Straight",
            HandRank::Flush => "Flush",
            HandRank::FullHouse => "Full House",
            HandRank::FourOfAKind => "Four of a Kind",
            HandRank::StraightFlush => "Straight Flush",
            HandRank::RoyalFlush => "Royal Flush",
        }
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of evaluating five cards. Ordering and equality go through the packed value.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Evaluation {
    pub rank: HandRank,
    /// Ranks relevant to the category, most significant first.
    pub tiebreakers: Vec<Rank>,
    pub description: String,
    value: HandValue,
}

impl Ord for Evaluation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl PartialOrd for Evaluation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Evaluation {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Evaluation {}

impl Evaluation {
    pub const fn value(&self) -> HandValue {
        self.value
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

impl HandValue {
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Pack a hand rank and up to five tiebreakers into a comparable value.
    /// Missing tiebreakers pack as zero, below every real rank.
    pub fn from_parts(rank: HandRank, tiebreakers: &[Rank]) -> Self {
        // [ rank (8 bits) | t0 (6) | t1 (6) | t2 (6) | t3 (6) | t4 (6) | 18 zero bits ]
        const RANK_SHIFT: u32 = 48;
        const STRIDE: u32 = 6;
        let mut v: u64 = (rank.value() as u64) << RANK_SHIFT;
        for (i, r) in tiebreakers.iter().take(5).enumerate() {
            let offset = RANK_SHIFT - STRIDE * (i as u32 + 1);
            v |= (r.value() as u64) << offset;
        }
        HandValue(v)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvalError {
    #[error("invalid hand: {0}")]
    InvalidHand(#[from] HandError),
}

/// Evaluate exactly five cards.
///
/// ```
/// use draw_poker::evaluator::{evaluate_five, HandRank};
/// use draw_poker::cards::parse_cards;
///
/// let cards: [_; 5] = parse_cards("Ac 2d 3h 4s 5c").unwrap().try_into().unwrap();
/// let eval = evaluate_five(&cards);
/// assert_eq!(eval.rank, HandRank::Straight);
/// assert_eq!(eval.description, "Straight, 5 high");
/// ```
pub fn evaluate_five(cards: &[Card; 5]) -> Evaluation {
    use detector::DETECTORS;
    use hand_analysis::HandAnalysis;

    let analysis = HandAnalysis::new(cards);
    DETECTORS
        .iter()
        .find_map(|d| d.evaluate(&analysis))
        .unwrap_or_else(|| {
            let desc = format!("High Card, {}", analysis.ranks[0]);
            analysis.build(HandRank::HighCard, analysis.ranks.to_vec(), desc)
        })
}

/// Evaluate a validated hand.
pub fn evaluate(hand: &Hand) -> Evaluation {
    evaluate_five(hand.cards())
}

/// Evaluate an arbitrary card slice, rejecting wrong counts and duplicate cards.
pub fn evaluate_cards(cards: &[Card]) -> Result<Evaluation, EvalError> {
    let hand = Hand::from_slice(cards)?;
    Ok(evaluate(&hand))
}

/// Total order between two hands; `Equal` is a split.
pub fn compare(a: &Hand, b: &Hand) -> Ordering {
    evaluate(a).cmp(&evaluate(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(s: &str) -> Evaluation {
        evaluate(&s.parse::<Hand>().unwrap())
    }

    #[test]
    fn categories_and_descriptions() {
        let cases = [
            ("As Ks Qs Js 10s", HandRank::RoyalFlush, "Royal Flush"),
            ("9h 8h 7h 6h 5h", HandRank::StraightFlush, "Straight Flush, 9 high"),
            ("Kc Kd Kh Ks 2s", HandRank::FourOfAKind, "Four of a Kind, Ks"),
            ("10c 10d 10h 2s 2h", HandRank::FullHouse, "Full House, 10s over 2s"),
            ("Ah 9h 7h 3h 2h", HandRank::Flush, "Flush, A high"),
            ("Ac 2d 3h 4s 5c", HandRank::Straight, "Straight, 5 high"),
            ("Qc Qd Qh 9s 2c", HandRank::ThreeOfAKind, "Three of a Kind, Qs"),
            ("Jc Jd 9c 9h 2s", HandRank::TwoPair, "Two Pair, Js and 9s"),
            ("Ah Ad 10s 9c 2d", HandRank::OnePair, "One Pair, As"),
            ("Ah Kd 7s 5c 2d", HandRank::HighCard, "High Card, A"),
        ];
        for (cards, rank, desc) in cases {
            let e = eval(cards);
            assert_eq!(e.rank, rank, "{cards}");
            assert_eq!(e.description, desc, "{cards}");
        }
    }

    #[test]
    fn wheel_is_lowest_straight() {
        assert!(eval("Ac 2d 3h 4s 5c") < eval("2c 3d 4h 5s 6c"));
        assert_eq!(eval("Ac 2d 3h 4s 5c").tiebreakers, vec![Rank::Five]);
    }

    #[test]
    fn kickers_break_ties_and_suits_do_not() {
        assert!(eval("Ah Ad Ks 9c 2d") > eval("Ac As Qs Jc 10d"));
        assert_eq!(eval("Ah Kd 7s 5c 2d"), eval("As Kc 7h 5d 2c"));
        assert!(eval("Jc Jd 9c 9h 3s") > eval("Jh Js 9d 9s 2c"));
    }

    #[test]
    fn royal_beats_straight_flush_beats_quads() {
        let royal = eval("As Ks Qs Js 10s");
        let sf = eval("9s 8s 7s 6s 5s");
        let quads = eval("Ac Ad Ah As Kd");
        assert!(royal > sf);
        assert!(sf > quads);
    }

    #[test]
    fn evaluate_cards_rejects_duplicates_and_counts() {
        let dup = crate::cards::parse_cards("As As Qs Js 10s").unwrap();
        assert!(matches!(evaluate_cards(&dup), Err(EvalError::InvalidHand(HandError::DuplicateCard(_)))));
        let short = crate::cards::parse_cards("As Ks").unwrap();
        assert!(matches!(evaluate_cards(&short), Err(EvalError::InvalidHand(HandError::CardCount(2)))));
    }

    #[test]
    fn compare_is_antisymmetric() {
        let a: Hand = "Kc Kd 5h 5s 2c".parse().unwrap();
        let b: Hand = "Qc Qd Jh Js Ac".parse().unwrap();
        assert_eq!(compare(&a, &b), Ordering::Greater);
        assert_eq!(compare(&b, &a), Ordering::Less);
        assert_eq!(compare(&a, &a), Ordering::Equal);
    }
}
