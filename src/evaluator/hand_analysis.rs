use super::rank_groups::RankGroups;
use crate::cards::{Card, Rank};
use crate::evaluator::{Evaluation, HandRank, HandValue};

/// Pre-computed facts about a 5-card hand, shared by all category detectors.
#[derive(Debug, Clone)]
pub struct HandAnalysis {
    /// Ranks sorted high to low.
    pub ranks: [Rank; 5],
    pub groups: RankGroups,
    pub is_flush: bool,
    /// Top card of the straight, if the hand is one. Five for the wheel.
    pub straight_top: Option<Rank>,
}

impl HandAnalysis {
    pub fn new(cards: &[Card; 5]) -> Self {
        let mut ranks = cards.map(Card::rank);
        ranks.sort_unstable_by(|a, b| b.cmp(a));
        let groups = RankGroups::from_cards(cards);
        let is_flush = cards.iter().all(|c| c.suit() == cards[0].suit());
        let straight_top = straight_top(&ranks, groups.distinct());
        Self { ranks, groups, is_flush, straight_top }
    }

    pub fn build(&self, rank: HandRank, tiebreakers: Vec<Rank>, description: String) -> Evaluation {
        let value = HandValue::from_parts(rank, &tiebreakers);
        Evaluation { rank, tiebreakers, description, value }
    }
}

fn straight_top(desc: &[Rank; 5], distinct: usize) -> Option<Rank> {
    if distinct != 5 {
        return None;
    }
    if desc[0].value() - desc[4].value() == 4 {
        return Some(desc[0]);
    }
    // A-2-3-4-5: the ace plays low
    if desc == &[Rank::Ace, Rank::Five, Rank::Four, Rank::Three, Rank::Two] {
        return Some(Rank::Five);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn analyse(s: &str) -> HandAnalysis {
        let cards = parse_cards(s).unwrap();
        let arr: [Card; 5] = cards.try_into().unwrap();
        HandAnalysis::new(&arr)
    }

    #[test]
    fn royal_is_flush_and_ace_high_straight() {
        let a = analyse("As Ks Qs Js 10s");
        assert!(a.is_flush);
        assert_eq!(a.straight_top, Some(Rank::Ace));
    }

    #[test]
    fn wheel_tops_out_at_five() {
        let a = analyse("Ac 2d 3h 4s 5c");
        assert!(!a.is_flush);
        assert_eq!(a.straight_top, Some(Rank::Five));
    }

    #[test]
    fn gaps_and_pairs_are_not_straights() {
        assert_eq!(analyse("Ac Kd Qh Js 9c").straight_top, None);
        assert_eq!(analyse("Ac Ad Kh Qs Jc").straight_top, None);
        // no wrap-around through the ace
        assert_eq!(analyse("Qc Kd Ah 2s 3c").straight_top, None);
    }

    #[test]
    fn ranks_sorted_descending() {
        let a = analyse("3s Ah 5d Kc 9s");
        assert_eq!(a.ranks, [Rank::Ace, Rank::King, Rank::Nine, Rank::Five, Rank::Three]);
    }
}
