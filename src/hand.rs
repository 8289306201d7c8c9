use crate::cards::{parse_cards, Card};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

pub const HAND_SIZE: usize = 5;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandError {
    #[error("expected exactly 5 cards, got {0}")]
    CardCount(usize),
    #[error("duplicate card in hand: {0}")]
    DuplicateCard(Card),
    #[error("replacement count {got} does not match {expected} positions")]
    ReplacementCount { expected: usize, got: usize },
    #[error("position {0} is outside the hand")]
    Position(usize),
    #[error("card parse error: {0}")]
    CardParse(String),
}

/// A player's five cards in positional order.
///
/// Positions matter during the draw: replacements land where the
/// discarded cards were.
///
/// ```
/// use draw_poker::hand::Hand;
///
/// let mut hand: Hand = "As Kd 7c 7h 2s".parse().unwrap();
/// let out = hand.replace(&[1, 4], &"9c 9d".parse::<draw_poker::hand::CardList>().unwrap().0).unwrap();
/// assert_eq!(out.len(), 2);
/// assert_eq!(hand.to_string(), "As 9c 7c 7h 9d");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hand([Card; HAND_SIZE]);

impl Hand {
    pub fn try_new(cards: [Card; HAND_SIZE]) -> Result<Self, HandError> {
        ensure_distinct(&cards)?;
        Ok(Self(cards))
    }

    pub fn from_slice(slice: &[Card]) -> Result<Self, HandError> {
        let cards: [Card; HAND_SIZE] =
            slice.try_into().map_err(|_| HandError::CardCount(slice.len()))?;
        Self::try_new(cards)
    }

    pub fn cards(&self) -> &[Card; HAND_SIZE] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<Card> {
        self.0.get(index).copied()
    }

    /// Swap the cards at `positions` for `replacements`, position by position.
    /// Returns the cards that were removed. On error the hand is unchanged.
    pub fn replace(
        &mut self,
        positions: &[usize],
        replacements: &[Card],
    ) -> Result<Vec<Card>, HandError> {
        if positions.len() != replacements.len() {
            return Err(HandError::ReplacementCount {
                expected: positions.len(),
                got: replacements.len(),
            });
        }
        let mut next = self.0;
        let mut removed = Vec::with_capacity(positions.len());
        for (&pos, &card) in positions.iter().zip(replacements) {
            let slot = next.get_mut(pos).ok_or(HandError::Position(pos))?;
            removed.push(*slot);
            *slot = card;
        }
        ensure_distinct(&next)?;
        self.0 = next;
        Ok(removed)
    }
}

fn ensure_distinct(cards: &[Card]) -> Result<(), HandError> {
    let mut seen = HashSet::with_capacity(cards.len());
    for &c in cards {
        if !seen.insert(c) {
            return Err(HandError::DuplicateCard(c));
        }
    }
    Ok(())
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl FromStr for Hand {
    type Err = HandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s).map_err(|e| HandError::CardParse(e.to_string()))?;
        Self::from_slice(&cards)
    }
}

/// Free-length card list parsed from text, used for replacement cards in fixtures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardList(pub Vec<Card>);

impl FromStr for CardList {
    type Err = HandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_cards(s).map(CardList).map_err(|e| HandError::CardParse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};

    fn c(r: Rank, s: Suit) -> Card {
        Card::new(r, s)
    }

    #[test]
    fn rejects_wrong_count_and_duplicates() {
        let four = [
            c(Rank::Ace, Suit::Spades),
            c(Rank::King, Suit::Spades),
            c(Rank::Queen, Suit::Spades),
            c(Rank::Jack, Suit::Spades),
        ];
        assert_eq!(Hand::from_slice(&four).unwrap_err(), HandError::CardCount(4));
        let dup = "As Ks Qs Js As".parse::<Hand>().unwrap_err();
        assert_eq!(dup, HandError::DuplicateCard(c(Rank::Ace, Suit::Spades)));
    }

    #[test]
    fn replace_keeps_untouched_positions() {
        let mut hand: Hand = "2c 3d 4h 5s 6c".parse().unwrap();
        let removed = hand
            .replace(&[1, 3], &[c(Rank::King, Suit::Hearts), c(Rank::Queen, Suit::Hearts)])
            .unwrap();
        assert_eq!(removed, vec![c(Rank::Three, Suit::Diamonds), c(Rank::Five, Suit::Spades)]);
        assert_eq!(hand.get(0), Some(c(Rank::Two, Suit::Clubs)));
        assert_eq!(hand.get(1), Some(c(Rank::King, Suit::Hearts)));
        assert_eq!(hand.get(2), Some(c(Rank::Four, Suit::Hearts)));
        assert_eq!(hand.get(3), Some(c(Rank::Queen, Suit::Hearts)));
        assert_eq!(hand.get(4), Some(c(Rank::Six, Suit::Clubs)));
    }

    #[test]
    fn replace_failure_leaves_hand_unchanged() {
        let mut hand: Hand = "2c 3d 4h 5s 6c".parse().unwrap();
        let before = hand;
        assert!(hand.replace(&[7], &[c(Rank::Ace, Suit::Hearts)]).is_err());
        assert!(hand.replace(&[0], &[c(Rank::Six, Suit::Clubs)]).is_err());
        assert!(hand.replace(&[0, 1], &[c(Rank::Ace, Suit::Hearts)]).is_err());
        assert_eq!(hand, before);
    }
}
