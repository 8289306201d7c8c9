//! Structured game events and the sinks that consume them.
//!
//! Components never log directly; they emit [`GameEvent`]s into an injected
//! [`EventSink`]. [`LogSink`] renders the line-oriented log format with its
//! fixed section markers, and [`RecordingSink`] keeps events for inspection.

use crate::action::Action;
use crate::betting::Phase;
use crate::cards::Card;
use crate::hand::Hand;
use std::borrow::Cow;

/// A named section of a round, used for log headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Stage {
    Betting(Phase),
    Draw,
    Showdown,
}

impl Stage {
    pub fn title(self) -> &'static str {
        match self {
            Stage::Betting(Phase::PreDraw) => "Pre-draw betting",
            Stage::Betting(Phase::PostDraw) => "Post-draw betting",
            Stage::Draw => "Draw Phase",
            Stage::Showdown => "Showdown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForcedBet {
    Ante,
    SmallBlind,
    BigBlind,
}

impl ForcedBet {
    pub fn label(self) -> &'static str {
        match self {
            ForcedBet::Ante => "ante",
            ForcedBet::SmallBlind => "small blind",
            ForcedBet::BigBlind => "big blind",
        }
    }
}

/// Why a collaborator's action was not applied as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Adjustment {
    /// Raise lifted to the minimum legal total.
    RaisedToMinimum { requested: u64, minimum: u64 },
    /// Raise cut down to the player's stack.
    CappedAtStack { requested: u64, stack: u64 },
    /// Raise converted to a call because the raise cap was hit.
    RaiseCapReached { max_raises: u32 },
    /// Raise converted to a call because a short all-in did not reopen betting.
    BettingNotReopened,
    /// Raise converted to a call because the stack cannot exceed the current bet.
    CannotRaise,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameEvent {
    GameStarted {
        players: Vec<(String, u64)>,
        small_blind: u64,
        big_blind: u64,
        ante: u64,
    },
    RoundStarted {
        round: u32,
        dealer: String,
        small_blind: Option<String>,
        big_blind: Option<String>,
        stacks: Vec<(String, u64)>,
    },
    ForcedBetPosted {
        name: String,
        kind: ForcedBet,
        amount: u64,
        partial: bool,
        all_in: bool,
    },
    StageStarted(Stage),
    StageCompleted(Stage),
    ActionAdjusted {
        name: String,
        requested: Action,
        adjustment: Adjustment,
    },
    ActionTaken {
        name: String,
        action: Action,
        /// Chips moved from the player to the pot by this action.
        paid: u64,
        all_in: bool,
        current_bet: u64,
        chips_before: u64,
        bet_before: u64,
        pot_before: u64,
        pot_after: u64,
    },
    DeckReshuffled {
        live: usize,
    },
    CardsDrawn {
        name: String,
        positions: Vec<usize>,
        discarded: Vec<Card>,
        received: Vec<Card>,
    },
    /// Another player's draw as the rest of the table sees it: how many
    /// cards were replaced, not which.
    CardsExchanged {
        name: String,
        count: usize,
    },
    /// Requested discards that could not be honoured.
    DiscardRejected {
        name: String,
        requested: Vec<usize>,
    },
    HandShown {
        name: String,
        hand: Hand,
        description: String,
    },
    PotAwarded {
        pot: usize,
        amount: u64,
        winners: Vec<(String, u64)>,
    },
    UncontestedWin {
        name: String,
        amount: u64,
        stage: Stage,
    },
    PlayerEliminated {
        name: String,
    },
    RoundEnded {
        round: u32,
        stacks: Vec<(String, u64)>,
    },
    GameOver {
        winner: Option<(String, u64)>,
        rounds: u32,
        max_rounds_reached: bool,
    },
}

impl GameEvent {
    /// The event as the player `viewer` is allowed to see it.
    ///
    /// Card-level draw details are kept only for the drawing player; everyone
    /// else gets a [`GameEvent::CardsExchanged`] count.
    pub fn seen_by(&self, viewer: &str) -> Cow<'_, GameEvent> {
        match self {
            GameEvent::CardsDrawn { name, positions, .. } if name != viewer => {
                Cow::Owned(GameEvent::CardsExchanged { name: name.clone(), count: positions.len() })
            }
            other => Cow::Borrowed(other),
        }
    }
}

/// Receives events emitted by the engine.
pub trait EventSink {
    fn emit(&mut self, event: &GameEvent);
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: &GameEvent) {
        (**self).emit(event)
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Vec<GameEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &GameEvent) {
        self.events.push(event.clone());
    }
}

/// Drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &GameEvent) {}
}

/// Writes events through the `log` facade in the line-oriented game log format.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

fn all_in_suffix(all_in: bool) -> &'static str {
    if all_in {
        " (all in)"
    } else {
        ""
    }
}

impl LogSink {
    /// Render an event as log lines.
    pub fn render(event: &GameEvent) -> Vec<String> {
        let rule = "=".repeat(50);
        match event {
            GameEvent::GameStarted { players, small_blind, big_blind, ante } => {
                let mut lines = vec![rule.clone(), "Game Configuration".into(), rule.clone()];
                lines.push(format!("Players: {}", players.len()));
                lines.push(format!("Small blind: ${small_blind}"));
                lines.push(format!("Big blind: ${big_blind}"));
                lines.push(format!("Ante: ${ante}"));
                lines.extend(players.iter().map(|(n, c)| format!("  {n}: ${c}")));
                lines
            }
            GameEvent::RoundStarted { round, dealer, small_blind, big_blind, stacks } => {
                let mut lines = vec![rule.clone(), format!("Round {round}"), rule];
                lines.push("Starting stacks (before antes/blinds):".into());
                lines.extend(stacks.iter().map(|(n, c)| format!("  {n}: ${c}")));
                lines.push(format!("Dealer: {dealer}"));
                if let Some(sb) = small_blind {
                    lines.push(format!("Small Blind: {sb}"));
                }
                if let Some(bb) = big_blind {
                    lines.push(format!("Big Blind: {bb}"));
                }
                lines
            }
            GameEvent::ForcedBetPosted { name, kind, amount, partial, all_in } => {
                let partial = if *partial { "partial " } else { "" };
                vec![format!(
                    "{name} posts {partial}{} of ${amount}{}",
                    kind.label(),
                    all_in_suffix(*all_in)
                )]
            }
            GameEvent::StageStarted(stage) => vec![format!("====== {} ======", stage.title())],
            GameEvent::StageCompleted(stage) => {
                vec![format!("====== {} Complete ======", stage.title())]
            }
            GameEvent::ActionAdjusted { name, requested, adjustment } => {
                let why = match adjustment {
                    Adjustment::RaisedToMinimum { requested, minimum } => {
                        format!("Raise amount ${requested} below minimum (${minimum}), raising to minimum")
                    }
                    Adjustment::CappedAtStack { requested, stack } => {
                        format!("Raise amount ${requested} exceeds stack, capped at ${stack}")
                    }
                    Adjustment::RaiseCapReached { max_raises } => {
                        format!("Max raises ({max_raises}) reached, converting raise to call")
                    }
                    Adjustment::BettingNotReopened => {
                        "Betting not reopened by short all-in, converting raise to call".into()
                    }
                    Adjustment::CannotRaise => "Stack too short to raise, converting to call".into(),
                };
                vec![format!("{name} requested {requested}: {why}")]
            }
            GameEvent::ActionTaken {
                name,
                action,
                paid,
                all_in,
                current_bet,
                chips_before,
                bet_before,
                pot_before,
                pot_after,
            } => {
                let head = match action {
                    Action::Fold => format!("{name} folds"),
                    Action::Call if *paid == 0 => format!("{name} checks"),
                    Action::Call => format!("{name} calls ${paid}{}", all_in_suffix(*all_in)),
                    Action::Raise { amount } => {
                        format!("{name} raises to ${amount}{}", all_in_suffix(*all_in))
                    }
                };
                vec![
                    head,
                    format!("  Current bet: ${current_bet}"),
                    format!("  Player chips: ${chips_before}"),
                    format!("  Player current bet: ${bet_before}"),
                    format!("  Current pot: ${pot_before}"),
                    format!("  Pot after action: ${pot_after}"),
                ]
            }
            GameEvent::DeckReshuffled { live } => {
                vec![format!("Reshuffled discards into deck ({live} cards available)")]
            }
            GameEvent::CardsDrawn { name, positions, discarded, received } => {
                if positions.is_empty() {
                    return vec![format!("{name} stands pat")];
                }
                vec![format!(
                    "{name} discards {} card(s): {} and draws {}",
                    positions.len(),
                    join_cards(discarded),
                    join_cards(received)
                )]
            }
            GameEvent::CardsExchanged { name, count: 0 } => vec![format!("{name} stands pat")],
            GameEvent::CardsExchanged { name, count } => {
                vec![format!("{name} draws {count} card(s)")]
            }
            GameEvent::DiscardRejected { name, requested } => {
                vec![format!("{name} gave invalid discard positions {requested:?}, keeping hand")]
            }
            GameEvent::HandShown { name, hand, description } => {
                vec![format!("{name} shows {hand} - {description}")]
            }
            GameEvent::PotAwarded { pot, amount, winners } => {
                let label = if *pot == 0 { "main pot".to_string() } else { format!("side pot {pot}") };
                match winners.as_slice() {
                    [(name, _)] => vec![format!("{name} wins ${amount} from the {label}")],
                    many => {
                        let names: Vec<String> =
                            many.iter().map(|(n, share)| format!("{n} (${share})")).collect();
                        vec![format!("Split {label} of ${amount}: {}", names.join(", "))]
                    }
                }
            }
            GameEvent::UncontestedWin { name, amount, stage } => {
                let when = match stage {
                    Stage::Betting(Phase::PreDraw) => "pre-draw",
                    Stage::Betting(Phase::PostDraw) => "post-draw",
                    Stage::Draw => "in the draw",
                    Stage::Showdown => "before showdown",
                };
                vec![format!("{name} wins ${amount} (all others folded {when})")]
            }
            GameEvent::PlayerEliminated { name } => {
                vec![format!("{name} is eliminated (out of chips)!")]
            }
            GameEvent::RoundEnded { round, stacks } => {
                let mut sorted = stacks.clone();
                sorted.sort_by(|a, b| b.1.cmp(&a.1));
                let mut lines = vec![format!("Round {round} complete"), "Final chip counts (sorted by amount):".into()];
                lines.extend(sorted.iter().map(|(n, c)| format!("  {n}: ${c}")));
                lines
            }
            GameEvent::GameOver { winner, rounds, max_rounds_reached } => {
                let mut lines = Vec::new();
                match winner {
                    Some((name, chips)) if !max_rounds_reached => {
                        lines.push(format!("Game Over! {name} wins with ${chips}!"))
                    }
                    None if !max_rounds_reached => {
                        lines.push("Game Over! All players are bankrupt!".into())
                    }
                    _ => lines.push(format!("Game ended after {rounds} rounds!")),
                }
                lines
            }
        }
    }
}

fn join_cards(cards: &[Card]) -> String {
    cards.iter().map(Card::to_string).collect::<Vec<_>>().join(" ")
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &GameEvent) {
        for line in Self::render(event) {
            log::info!("{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_markers_keep_their_text() {
        let start = LogSink::render(&GameEvent::StageStarted(Stage::Betting(Phase::PreDraw)));
        assert_eq!(start, vec!["====== Pre-draw betting ======"]);
        let done = LogSink::render(&GameEvent::StageCompleted(Stage::Draw));
        assert_eq!(done, vec!["====== Draw Phase Complete ======"]);
    }

    #[test]
    fn action_lines_carry_field_labels() {
        let lines = LogSink::render(&GameEvent::ActionTaken {
            name: "Alice".into(),
            action: Action::Call,
            paid: 80,
            all_in: true,
            current_bet: 200,
            chips_before: 80,
            bet_before: 0,
            pot_before: 300,
            pot_after: 380,
        });
        assert_eq!(lines[0], "Alice calls $80 (all in)");
        assert_eq!(lines[1], "  Current bet: $200");
        assert_eq!(lines[2], "  Player chips: $80");
        assert_eq!(lines[5], "  Pot after action: $380");
    }

    #[test]
    fn zero_call_renders_as_check() {
        let lines = LogSink::render(&GameEvent::ActionTaken {
            name: "Bob".into(),
            action: Action::Call,
            paid: 0,
            all_in: false,
            current_bet: 0,
            chips_before: 500,
            bet_before: 0,
            pot_before: 40,
            pot_after: 40,
        });
        assert_eq!(lines[0], "Bob checks");
    }

    #[test]
    fn draw_cards_are_hidden_from_other_players() {
        let drawn = GameEvent::CardsDrawn {
            name: "Villain".into(),
            positions: vec![0, 1, 2],
            discarded: crate::cards::parse_cards("2c 7d 9h").unwrap(),
            received: crate::cards::parse_cards("Jd Js Qh").unwrap(),
        };
        assert_eq!(*drawn.seen_by("Villain"), drawn);
        let public = drawn.seen_by("Hero");
        assert_eq!(*public, GameEvent::CardsExchanged { name: "Villain".into(), count: 3 });
        assert_eq!(LogSink::render(&public), vec!["Villain draws 3 card(s)"]);
        let pat = GameEvent::CardsExchanged { name: "Pat".into(), count: 0 };
        assert_eq!(LogSink::render(&pat), vec!["Pat stands pat"]);
    }

    #[test]
    fn recording_sink_collects_through_mut_ref() {
        let mut rec = RecordingSink::new();
        {
            let sink: &mut dyn EventSink = &mut rec;
            sink.emit(&GameEvent::PlayerEliminated { name: "Cy".into() });
        }
        assert_eq!(rec.events().len(), 1);
        assert_eq!(
            LogSink::render(&rec.events()[0]),
            vec!["Cy is eliminated (out of chips)!"]
        );
    }
}
