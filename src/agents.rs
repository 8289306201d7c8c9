//! Agents: pluggable decision makers that sit in seats.
//!
//! The game engine owns the rules; an agent only sees a [`TableView`] built
//! for its seat and answers with an [`Action`] or a list of discard
//! positions. Anything an agent returns is clamped by the engine, so agents
//! never need to know the exact legal range.

use crate::action::Action;
use crate::betting::Phase;
use crate::events::{GameEvent, Stage};
use crate::hand::Hand;
use crate::player::{Player, PlayerStatus};
use std::collections::VecDeque;
use std::time::Duration;

mod bots;
mod opponents;
mod response;
mod timeout;

pub use bots::{BotProfile, Difficulty, HeuristicAgent, RandomAgent};
pub use opponents::{OpponentBook, OpponentStats};
pub use response::{render_decision_prompt, render_discard_prompt, ResponseAgent, Responder};
pub use timeout::TimeoutAgent;

/// Kinds of agents attached to seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AgentKind {
    Random,
    Heuristic,
    /// Driven by free-text responses (a remote model, a human at a prompt).
    Response,
    Scripted,
}

impl AgentKind {
    pub fn label(self) -> &'static str {
        match self {
            AgentKind::Random => "random",
            AgentKind::Heuristic => "heuristic",
            AgentKind::Response => "response",
            AgentKind::Scripted => "scripted",
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AgentError {
    #[error("no decision within {0:?}")]
    Timeout(Duration),
    #[error("agent worker is gone")]
    Disconnected,
    #[error("agent returned no response")]
    NoResponse,
}

/// Public information about one seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatView {
    pub name: String,
    pub chips: u64,
    pub bet: u64,
    pub status: PlayerStatus,
}

impl From<&Player> for SeatView {
    fn from(p: &Player) -> Self {
        Self { name: p.name().to_string(), chips: p.chips(), bet: p.bet(), status: p.status() }
    }
}

/// What a seat may know when it is asked to act.
///
/// Only the viewer's own hand is included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub round: u32,
    pub stage: Stage,
    pub seat: usize,
    pub dealer: usize,
    pub hand: Option<Hand>,
    pub pot: u64,
    pub current_bet: u64,
    pub to_call: u64,
    pub min_raise_to: u64,
    pub seats: Vec<SeatView>,
}

impl TableView {
    pub fn me(&self) -> Option<&SeatView> {
        self.seats.get(self.seat)
    }

    pub fn chips(&self) -> u64 {
        self.me().map_or(0, |s| s.chips)
    }

    pub fn bet(&self) -> u64 {
        self.me().map_or(0, |s| s.bet)
    }

    pub fn num_players(&self) -> usize {
        self.seats.len()
    }

    /// Opponents still holding cards this round.
    pub fn live_opponents(&self) -> impl Iterator<Item = &SeatView> + '_ {
        self.seats.iter().enumerate().filter_map(move |(i, s)| {
            let live = matches!(s.status, PlayerStatus::Active | PlayerStatus::AllIn);
            (i != self.seat && live).then_some(s)
        })
    }

    pub fn phase(&self) -> Option<Phase> {
        match self.stage {
            Stage::Betting(phase) => Some(phase),
            _ => None,
        }
    }
}

/// A seat controller.
pub trait PlayerAgent {
    /// Choose a betting action. An error folds the hand.
    fn decide(&mut self, view: &TableView) -> Result<Action, AgentError>;

    /// Positions (0-4) to replace in the draw. Empty stands pat.
    fn discard(&mut self, view: &TableView) -> Vec<usize>;

    /// Every event the table emits, in order.
    fn observe(&mut self, _event: &GameEvent) {}

    fn kind(&self) -> AgentKind;
}

impl<A: PlayerAgent + ?Sized> PlayerAgent for Box<A> {
    fn decide(&mut self, view: &TableView) -> Result<Action, AgentError> {
        (**self).decide(view)
    }
    fn discard(&mut self, view: &TableView) -> Vec<usize> {
        (**self).discard(view)
    }
    fn observe(&mut self, event: &GameEvent) {
        (**self).observe(event)
    }
    fn kind(&self) -> AgentKind {
        (**self).kind()
    }
}

/// Replays queued actions and discards. Once a queue runs dry the agent
/// checks or calls and stands pat.
#[derive(Debug, Clone, Default)]
pub struct ScriptedAgent {
    actions: VecDeque<Action>,
    discards: VecDeque<Vec<usize>>,
}

impl ScriptedAgent {
    pub fn new(actions: impl IntoIterator<Item = Action>) -> Self {
        Self { actions: actions.into_iter().collect(), discards: VecDeque::new() }
    }

    pub fn with_discards(mut self, discards: impl IntoIterator<Item = Vec<usize>>) -> Self {
        self.discards = discards.into_iter().collect();
        self
    }

    /// Actions not yet replayed.
    pub fn pending(&self) -> usize {
        self.actions.len()
    }
}

impl PlayerAgent for ScriptedAgent {
    fn decide(&mut self, _view: &TableView) -> Result<Action, AgentError> {
        Ok(self.actions.pop_front().unwrap_or(Action::Call))
    }

    fn discard(&mut self, _view: &TableView) -> Vec<usize> {
        self.discards.pop_front().unwrap_or_default()
    }

    fn kind(&self) -> AgentKind {
        AgentKind::Scripted
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn view_for(hand: &str, current_bet: u64, chips: u64) -> TableView {
        TableView {
            round: 1,
            stage: Stage::Betting(Phase::PreDraw),
            seat: 0,
            dealer: 1,
            hand: Some(hand.parse().unwrap()),
            pot: 30,
            current_bet,
            to_call: current_bet.min(chips),
            min_raise_to: current_bet + 20,
            seats: vec![
                SeatView { name: "Me".into(), chips, bet: 0, status: PlayerStatus::Active },
                SeatView { name: "Villain".into(), chips: 1000, bet: current_bet, status: PlayerStatus::Active },
            ],
        }
    }

    #[test]
    fn scripted_agent_replays_then_calls() {
        let mut agent = ScriptedAgent::new([Action::raise_to(60), Action::Fold])
            .with_discards([vec![0, 1]]);
        let view = view_for("As Ks Qs Js 9h", 20, 500);
        assert_eq!(agent.decide(&view), Ok(Action::raise_to(60)));
        assert_eq!(agent.decide(&view), Ok(Action::Fold));
        assert_eq!(agent.decide(&view), Ok(Action::Call));
        assert_eq!(agent.discard(&view), vec![0, 1]);
        assert!(agent.discard(&view).is_empty());
    }

    #[test]
    fn view_hides_nothing_of_its_own_seat() {
        let view = view_for("2c 3d 4h 5s 7c", 0, 250);
        assert_eq!(view.chips(), 250);
        assert_eq!(view.live_opponents().count(), 1);
        assert_eq!(view.phase(), Some(Phase::PreDraw));
    }

    #[test]
    fn boxed_agents_delegate() {
        let mut boxed: Box<dyn PlayerAgent> = Box::new(ScriptedAgent::new([Action::Fold]));
        let view = view_for("2c 3d 4h 5s 7c", 0, 250);
        assert_eq!(boxed.kind(), AgentKind::Scripted);
        assert_eq!(boxed.decide(&view), Ok(Action::Fold));
    }
}
