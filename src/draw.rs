//! The draw: each player still in the hand may replace up to five cards once.
//!
//! Discards collected during the phase sit in a side buffer. When the live
//! pile runs short, the buffer goes back into the deck and is reshuffled
//! before the next player draws. Replacement cards land in the positions that
//! were vacated.

use crate::cards::Card;
use crate::deck::{Deck, DeckError};
use crate::events::{EventSink, GameEvent};
use crate::hand::{HandError, HAND_SIZE};
use crate::player::Player;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DrawError {
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error(transparent)]
    Hand(#[from] HandError),
}

/// What happened to one player's hand.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DrawOutcome {
    pub positions: Vec<usize>,
    pub discarded: Vec<Card>,
    pub received: Vec<Card>,
    /// The request was invalid and the hand was kept.
    pub rejected: bool,
}

/// Clean up a discard request.
///
/// Keeps at most five entries and drops repeats. Returns `None` when any
/// position is outside the hand, meaning the whole request is ignored.
///
/// ```
/// use draw_poker::draw::sanitize_discards;
///
/// assert_eq!(sanitize_discards(&[3, 1, 3]), Some(vec![3, 1]));
/// assert_eq!(sanitize_discards(&[0, 5]), None);
/// assert_eq!(sanitize_discards(&[]), Some(vec![]));
/// ```
pub fn sanitize_discards(requested: &[usize]) -> Option<Vec<usize>> {
    let mut out = Vec::with_capacity(HAND_SIZE);
    for &pos in requested.iter().take(HAND_SIZE) {
        if pos >= HAND_SIZE {
            return None;
        }
        if !out.contains(&pos) {
            out.push(pos);
        }
    }
    Some(out)
}

/// Runs one draw phase against a deck.
#[derive(Debug, Default)]
pub struct DrawEngine {
    buffer: Vec<Card>,
}

impl DrawEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cards discarded this phase that have not gone back to the deck yet.
    pub fn buffered(&self) -> &[Card] {
        &self.buffer
    }

    /// Replace the requested positions of `player`'s hand.
    pub fn draw_for(
        &mut self,
        player: &mut Player,
        requested: &[usize],
        deck: &mut Deck,
        sink: &mut dyn EventSink,
    ) -> Result<DrawOutcome, DrawError> {
        let Some(mut hand) = player.hand else {
            return Ok(DrawOutcome::default());
        };
        let Some(mut positions) = sanitize_discards(requested) else {
            sink.emit(&GameEvent::DiscardRejected {
                name: player.name().to_string(),
                requested: requested.to_vec(),
            });
            return Ok(DrawOutcome { rejected: true, ..DrawOutcome::default() });
        };

        if deck.needs_reshuffle(positions.len()) && !self.buffer.is_empty() {
            deck.add_discarded(&self.buffer);
            self.buffer.clear();
            deck.reshuffle_discards();
            sink.emit(&GameEvent::DeckReshuffled { live: deck.remaining() });
        }
        if deck.needs_reshuffle(positions.len()) {
            log::warn!(
                "{} wants {} cards but only {} remain",
                player.name(),
                positions.len(),
                deck.remaining()
            );
            positions.truncate(deck.remaining());
        }

        let received = deck.deal(positions.len())?;
        let discarded = hand.replace(&positions, &received)?;
        player.hand = Some(hand);
        self.buffer.extend_from_slice(&discarded);

        sink.emit(&GameEvent::CardsDrawn {
            name: player.name().to_string(),
            positions: positions.clone(),
            discarded: discarded.clone(),
            received: received.clone(),
        });
        Ok(DrawOutcome { positions, discarded, received, rejected: false })
    }

    /// Hand the buffered discards to the deck's discard pile.
    pub fn finish(mut self, deck: &mut Deck) {
        deck.add_discarded(&self.buffer);
        self.buffer.clear();
    }
}
