use crate::cards::{Card, Rank, Suit};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt;

pub const DECK_SIZE: usize = 52;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("cannot deal {requested} cards: only {remaining} remaining")]
    InsufficientCards { requested: usize, remaining: usize },
}

/// A 52-card pool split into three disjoint piles: live, dealt and discarded.
///
/// The piles always hold 52 cards between them. Shuffling only reorders the
/// live pile.
///
/// ```
/// use draw_poker::deck::Deck;
///
/// let mut deck = Deck::seeded(7);
/// let hand = deck.deal(5).unwrap();
/// assert_eq!(hand.len(), 5);
/// assert_eq!(deck.remaining(), 47);
/// deck.add_discarded(&hand[..2]);
/// assert_eq!(deck.to_string(), "Deck: 47 cards remaining, 3 dealt, 2 discarded");
/// ```
#[derive(Debug, Clone)]
pub struct Deck {
    live: Vec<Card>,
    dealt: Vec<Card>,
    discarded: Vec<Card>,
    rng: ChaCha8Rng,
}

impl Deck {
    /// A fresh shuffled deck seeded from the thread RNG.
    pub fn new() -> Self {
        let seed: u64 = rand::rng().random();
        Self::seeded(seed)
    }

    /// A fresh deck shuffled with a reproducible seed.
    pub fn seeded(seed: u64) -> Self {
        let mut deck = Self::ordered(ChaCha8Rng::seed_from_u64(seed));
        deck.shuffle();
        deck
    }

    /// An unshuffled deck (clubs through spades, two through ace) for tests and fixtures.
    pub fn unshuffled(seed: u64) -> Self {
        Self::ordered(ChaCha8Rng::seed_from_u64(seed))
    }

    fn ordered(rng: ChaCha8Rng) -> Self {
        let mut live = Vec::with_capacity(DECK_SIZE);
        for s in Suit::ALL {
            for r in Rank::ALL {
                live.push(Card::new(r, s));
            }
        }
        Self { live, dealt: Vec::new(), discarded: Vec::new(), rng }
    }

    /// Randomly permute the live pile.
    pub fn shuffle(&mut self) {
        self.live.shuffle(&mut self.rng);
    }

    /// Remove the first `n` live cards, record them as dealt and return them.
    pub fn deal(&mut self, n: usize) -> Result<Vec<Card>, DeckError> {
        if n > self.live.len() {
            return Err(DeckError::InsufficientCards { requested: n, remaining: self.live.len() });
        }
        let cards: Vec<Card> = self.live.drain(..n).collect();
        self.dealt.extend_from_slice(&cards);
        Ok(cards)
    }

    /// Move cards to the discard pile. Cards held in the dealt pile leave it.
    pub fn add_discarded(&mut self, cards: &[Card]) {
        for &card in cards {
            if let Some(pos) = self.dealt.iter().position(|&c| c == card) {
                self.dealt.swap_remove(pos);
            }
            self.discarded.push(card);
        }
    }

    /// Return every discarded card to the live pile and shuffle it.
    pub fn reshuffle_discards(&mut self) {
        log::debug!("reshuffling {} discards into {} live cards", self.discarded.len(), self.live.len());
        self.live.append(&mut self.discarded);
        self.shuffle();
    }

    /// Collect dealt and discarded cards back into the live pile and shuffle.
    pub fn reshuffle_all(&mut self) {
        self.live.append(&mut self.dealt);
        self.live.append(&mut self.discarded);
        self.shuffle();
    }

    pub fn remaining(&self) -> usize {
        self.live.len()
    }

    pub fn needs_reshuffle(&self, needed: usize) -> bool {
        self.live.len() < needed
    }

    pub fn live(&self) -> &[Card] {
        &self.live
    }

    pub fn dealt(&self) -> &[Card] {
        &self.dealt
    }

    pub fn discarded(&self) -> &[Card] {
        &self.discarded
    }

    /// Total of all three piles.
    pub fn total(&self) -> usize {
        self.live.len() + self.dealt.len() + self.discarded.len()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Deck: {} cards remaining, {} dealt, {} discarded",
            self.live.len(),
            self.dealt.len(),
            self.discarded.len()
        )
    }
}
