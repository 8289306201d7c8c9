use super::hand_analysis::HandAnalysis;
use crate::cards::Rank;
use crate::evaluator::{Evaluation, HandRank};

/// Each category detector recognises its own category and builds the evaluation.
pub trait CategoryDetector {
    fn evaluate(&self, analysis: &HandAnalysis) -> Option<Evaluation>;
}

fn plural(r: Rank) -> String {
    format!("{}s", r.label())
}

pub struct RoyalFlushDetector;

impl CategoryDetector for RoyalFlushDetector {
    fn evaluate(&self, a: &HandAnalysis) -> Option<Evaluation> {
        match (a.is_flush, a.straight_top) {
            (true, Some(Rank::Ace)) => {
                Some(a.build(HandRank::RoyalFlush, vec![Rank::Ace], "Royal Flush".into()))
            }
            _ => None,
        }
    }
}

pub struct StraightFlushDetector;

impl CategoryDetector for StraightFlushDetector {
    fn evaluate(&self, a: &HandAnalysis) -> Option<Evaluation> {
        let top = a.straight_top.filter(|_| a.is_flush)?;
        Some(a.build(HandRank::StraightFlush, vec![top], format!("Straight Flush, {top} high")))
    }
}

pub struct FourOfAKindDetector;

impl CategoryDetector for FourOfAKindDetector {
    fn evaluate(&self, a: &HandAnalysis) -> Option<Evaluation> {
        let quad = a.groups.quad()?;
        let kicker = *a.groups.kickers().first()?;
        let desc = format!("Four of a Kind, {}", plural(quad));
        Some(a.build(HandRank::FourOfAKind, vec![quad, kicker], desc))
    }
}

pub struct FullHouseDetector;

impl CategoryDetector for FullHouseDetector {
    fn evaluate(&self, a: &HandAnalysis) -> Option<Evaluation> {
        let trips = a.groups.trips()?;
        let pair = *a.groups.pairs().first()?;
        let desc = format!("Full House, {} over {}", plural(trips), plural(pair));
        Some(a.build(HandRank::FullHouse, vec![trips, pair], desc))
    }
}

pub struct FlushDetector;

impl CategoryDetector for FlushDetector {
    fn evaluate(&self, a: &HandAnalysis) -> Option<Evaluation> {
        if !a.is_flush {
            return None;
        }
        let desc = format!("Flush, {} high", a.ranks[0]);
        Some(a.build(HandRank::Flush, a.ranks.to_vec(), desc))
    }
}

pub struct StraightDetector;

impl CategoryDetector for StraightDetector {
    fn evaluate(&self, a: &HandAnalysis) -> Option<Evaluation> {
        let top = a.straight_top?;
        Some(a.build(HandRank::Straight, vec![top], format!("Straight, {top} high")))
    }
}

pub struct ThreeOfAKindDetector;

impl CategoryDetector for ThreeOfAKindDetector {
    fn evaluate(&self, a: &HandAnalysis) -> Option<Evaluation> {
        let trips = a.groups.trips()?;
        let kickers = a.groups.kickers();
        if kickers.len() != 2 {
            return None;
        }
        let mut tb = vec![trips];
        tb.extend(kickers);
        Some(a.build(HandRank::ThreeOfAKind, tb, format!("Three of a Kind, {}", plural(trips))))
    }
}

pub struct TwoPairDetector;

impl CategoryDetector for TwoPairDetector {
    fn evaluate(&self, a: &HandAnalysis) -> Option<Evaluation> {
        let pairs = a.groups.pairs();
        let &[high, low] = &pairs[..] else {
            return None;
        };
        let kicker = *a.groups.kickers().first()?;
        let desc = format!("Two Pair, {} and {}", plural(high), plural(low));
        Some(a.build(HandRank::TwoPair, vec![high, low, kicker], desc))
    }
}

pub struct OnePairDetector;

impl CategoryDetector for OnePairDetector {
    fn evaluate(&self, a: &HandAnalysis) -> Option<Evaluation> {
        let pairs = a.groups.pairs();
        let &[pair] = &pairs[..] else {
            return None;
        };
        let mut tb = vec![pair];
        tb.extend(a.groups.kickers());
        Some(a.build(HandRank::OnePair, tb, format!("One Pair, {}", plural(pair))))
    }
}

pub struct HighCardDetector;

impl CategoryDetector for HighCardDetector {
    fn evaluate(&self, a: &HandAnalysis) -> Option<Evaluation> {
        let desc = format!("High Card, {}", a.ranks[0]);
        Some(a.build(HandRank::HighCard, a.ranks.to_vec(), desc))
    }
}

/// Detectors in priority order, strongest first. The last one always matches.
pub const DETECTORS: [&dyn CategoryDetector; 10] = [
    &RoyalFlushDetector,
    &StraightFlushDetector,
    &FourOfAKindDetector,
    &FullHouseDetector,
    &FlushDetector,
    &StraightDetector,
    &ThreeOfAKindDetector,
    &TwoPairDetector,
    &OnePairDetector,
    &HighCardDetector,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{parse_cards, Card};

    fn analyse(s: &str) -> HandAnalysis {
        let arr: [Card; 5] = parse_cards(s).unwrap().try_into().unwrap();
        HandAnalysis::new(&arr)
    }

    #[test]
    fn royal_detector_ignores_lower_straight_flush() {
        assert!(RoyalFlushDetector.evaluate(&analyse("9h 8h 7h 6h 5h")).is_none());
        let sf = StraightFlushDetector.evaluate(&analyse("9h 8h 7h 6h 5h")).unwrap();
        assert_eq!(sf.rank, HandRank::StraightFlush);
        assert_eq!(sf.tiebreakers, vec![Rank::Nine]);
    }

    #[test]
    fn trips_detector_skips_full_house() {
        assert!(ThreeOfAKindDetector.evaluate(&analyse("Qc Qd Qh 9s 9c")).is_none());
        let fh = FullHouseDetector.evaluate(&analyse("Qc Qd Qh 9s 9c")).unwrap();
        assert_eq!(fh.tiebreakers, vec![Rank::Queen, Rank::Nine]);
        assert_eq!(fh.description, "Full House, Qs over 9s");
    }

    #[test]
    fn pair_detector_requires_exactly_one_pair() {
        assert!(OnePairDetector.evaluate(&analyse("Jc Jd 9c 9h 2s")).is_none());
        let tp = TwoPairDetector.evaluate(&analyse("Jc Jd 9c 9h 2s")).unwrap();
        assert_eq!(tp.tiebreakers, vec![Rank::Jack, Rank::Nine, Rank::Two]);
    }

    #[test]
    fn high_card_always_matches() {
        let e = HighCardDetector.evaluate(&analyse("Ah Kd 7s 5c 2d")).unwrap();
        assert_eq!(e.rank, HandRank::HighCard);
        assert_eq!(e.description, "High Card, A");
    }
}
