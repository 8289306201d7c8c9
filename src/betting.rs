//! One betting phase as a state machine.
//!
//! A [`BettingRound`] holds the turn queue and the bet bookkeeping for a single
//! phase. Each call to [`BettingRound::apply`] resolves one decision for the
//! player at the head of the queue. Malformed decisions are clamped to the
//! nearest legal action instead of being rejected.
//!
//! A raise that puts a player all-in for less than a full raise updates the bet
//! to call but does not reopen raising: players who already acted since the
//! last full raise may only call or fold.

use crate::action::Action;
use crate::events::{Adjustment, EventSink, GameEvent};
use crate::player::Player;
use crate::pot::PotManager;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    PreDraw,
    PostDraw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    AwaitingAction(usize),
    Complete,
}

/// Mutable state of a betting phase.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct RoundState {
    pub round_number: u32,
    pub phase: Phase,
    /// Total bet this phase that every live player must match.
    pub current_bet: u64,
    /// Smallest legal raise increment.
    pub min_raise: u64,
    /// Full raises made this phase.
    pub raise_count: u32,
    pub last_raiser: Option<usize>,
    /// Turn queue; the head is the player to act.
    pub needs_to_act: VecDeque<usize>,
    /// Seats that acted since the last full raise.
    pub acted_this_phase: Vec<bool>,
    /// Seats whose raise converts to a call after a short all-in.
    pub raise_locked: Vec<bool>,
    pub complete: bool,
}

/// Table limits for a betting phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BettingLimits {
    /// Bet every live player must match when the phase opens.
    pub opening_bet: u64,
    pub min_raise: u64,
    pub max_raises: u32,
}

/// The outcome of one applied decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub seat: usize,
    pub requested: Action,
    /// What the engine actually did. `Raise` carries the new total bet.
    pub applied: Action,
    pub paid: u64,
    pub all_in: bool,
}

#[derive(Debug, Clone)]
pub struct BettingRound {
    state: RoundState,
    max_raises: u32,
}

impl BettingRound {
    /// Open a phase. The queue holds every player able to act, in seat order
    /// starting at `first_to_act`.
    pub fn start(
        round_number: u32,
        phase: Phase,
        players: &[Player],
        first_to_act: usize,
        limits: BettingLimits,
    ) -> Self {
        let n = players.len();
        let needs_to_act = seats_from(first_to_act, n).filter(|&s| players[s].can_act()).collect();
        let mut round = Self {
            state: RoundState {
                round_number,
                phase,
                current_bet: limits.opening_bet,
                min_raise: limits.min_raise.max(1),
                raise_count: 0,
                last_raiser: None,
                needs_to_act,
                acted_this_phase: vec![false; n],
                raise_locked: vec![false; n],
                complete: false,
            },
            max_raises: limits.max_raises,
        };
        round.settle(players);
        round
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state.complete
    }

    pub fn status(&self) -> RoundStatus {
        match self.state.needs_to_act.front() {
            Some(&seat) if !self.state.complete => RoundStatus::AwaitingAction(seat),
            _ => RoundStatus::Complete,
        }
    }

    /// Seat at the head of the turn queue.
    pub fn to_act(&self) -> Option<usize> {
        match self.status() {
            RoundStatus::AwaitingAction(seat) => Some(seat),
            RoundStatus::Complete => None,
        }
    }

    /// Chips `player` must add to stay in.
    pub fn to_call(&self, player: &Player) -> u64 {
        self.state.current_bet.saturating_sub(player.bet()).min(player.chips())
    }

    /// Smallest legal raise total right now.
    pub fn min_raise_to(&self) -> u64 {
        self.state.current_bet + self.state.min_raise
    }

    /// Apply `action` for the player at the head of the queue.
    ///
    /// Returns `None` once the phase is complete; a completed phase never changes.
    pub fn apply(
        &mut self,
        players: &mut [Player],
        pot: &mut PotManager,
        action: Action,
        sink: &mut dyn EventSink,
    ) -> Option<Resolved> {
        let seat = self.to_act()?;
        self.state.needs_to_act.pop_front();

        let chips_before = players[seat].chips();
        let bet_before = players[seat].bet();
        let pot_before = pot.total();
        let bet_to_match = self.state.current_bet;

        let (applied, paid) = match action {
            Action::Fold => {
                players[seat].fold();
                (Action::Fold, 0)
            }
            Action::Call => self.call(seat, players),
            Action::Raise { amount } => self.raise(seat, amount, players, sink),
        };
        pot.add(seat, paid);
        self.state.acted_this_phase[seat] = true;
        let all_in = players[seat].is_all_in() && paid > 0;

        sink.emit(&GameEvent::ActionTaken {
            name: players[seat].name().to_string(),
            action: applied,
            paid,
            all_in,
            current_bet: bet_to_match,
            chips_before,
            bet_before,
            pot_before,
            pot_after: pot.total(),
        });

        self.settle(players);
        Some(Resolved { seat, requested: action, applied, paid, all_in })
    }

    fn call(&mut self, seat: usize, players: &mut [Player]) -> (Action, u64) {
        let owed = self.state.current_bet.saturating_sub(players[seat].bet());
        (Action::Call, players[seat].commit(owed))
    }

    fn raise(
        &mut self,
        seat: usize,
        requested: u64,
        players: &mut [Player],
        sink: &mut dyn EventSink,
    ) -> (Action, u64) {
        let name = players[seat].name().to_string();
        let mut adjust = |adjustment: Adjustment| {
            sink.emit(&GameEvent::ActionAdjusted {
                name: name.clone(),
                requested: Action::raise_to(requested),
                adjustment,
            })
        };

        if self.state.raise_locked[seat] {
            adjust(Adjustment::BettingNotReopened);
            return self.call(seat, players);
        }
        if self.state.raise_count >= self.max_raises {
            adjust(Adjustment::RaiseCapReached { max_raises: self.max_raises });
            return self.call(seat, players);
        }
        let current = self.state.current_bet;
        let stack_total = players[seat].bet() + players[seat].chips();
        if stack_total <= current {
            adjust(Adjustment::CannotRaise);
            return self.call(seat, players);
        }

        let minimum = self.min_raise_to();
        let mut target = requested;
        if target < minimum {
            if minimum <= stack_total {
                adjust(Adjustment::RaisedToMinimum { requested, minimum });
            }
            target = minimum;
        }
        if target > stack_total {
            if requested > stack_total {
                adjust(Adjustment::CappedAtStack { requested, stack: stack_total });
            }
            target = stack_total;
        }

        let paid = players[seat].commit(target - players[seat].bet());
        let increment = target - current;
        self.state.current_bet = target;
        let n = players.len();

        if increment >= self.state.min_raise {
            self.state.min_raise = increment;
            self.state.raise_count += 1;
            self.state.last_raiser = Some(seat);
            self.state.acted_this_phase.fill(false);
            self.state.raise_locked.fill(false);
            self.state.needs_to_act =
                seats_from(seat + 1, n).filter(|&s| s != seat && players[s].can_act()).collect();
        } else {
            log::debug!("short all-in raise to {target} by seat {seat} does not reopen betting");
            let queued = &self.state.needs_to_act;
            let next: VecDeque<usize> = seats_from(seat + 1, n)
                .filter(|&s| s != seat && players[s].can_act())
                .filter(|&s| queued.contains(&s) || players[s].bet() < target)
                .collect();
            for &s in &next {
                if self.state.acted_this_phase[s] {
                    self.state.raise_locked[s] = true;
                }
            }
            self.state.needs_to_act = next;
        }
        (Action::raise_to(target), paid)
    }

    /// Drop players who can no longer act and detect the end of the phase.
    fn settle(&mut self, players: &[Player]) {
        self.state.needs_to_act.retain(|&s| players[s].can_act());
        let live = players.iter().filter(|p| !p.is_folded()).count();
        if live <= 1 {
            self.state.needs_to_act.clear();
        }
        let actors = players.iter().filter(|p| p.can_act()).count();
        if actors <= 1 {
            // nobody left to answer a raise; only an unmatched bet still needs action
            let bet = self.state.current_bet;
            self.state.needs_to_act.retain(|&s| players[s].bet() < bet);
        }
        if self.state.needs_to_act.is_empty() {
            self.state.complete = true;
        }
    }
}

/// Every seat once, starting at `start` and wrapping.
pub(crate) fn seats_from(start: usize, n: usize) -> impl Iterator<Item = usize> {
    (0..n).map(move |i| (start + i) % n.max(1))
}
