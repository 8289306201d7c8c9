//! Agents that answer in free text.
//!
//! A [`ResponseAgent`] renders a prompt from the table view, hands it to a
//! responder (a language model client, a console prompt, a test closure) and
//! parses `DECISION:` and `DISCARD:` lines out of whatever comes back.

use crate::action::{parse_decision, parse_discard, parse_reasoning, Action};
use crate::events::{GameEvent, LogSink};
use std::collections::VecDeque;
use std::fmt::{self, Write as _};

use super::{AgentError, AgentKind, PlayerAgent, TableView};

/// Turns a prompt into a response, or `None` when nothing came back.
pub type Responder = Box<dyn FnMut(&str) -> Option<String> + Send>;

const HISTORY_LINES: usize = 12;

pub struct ResponseAgent {
    name: String,
    responder: Responder,
    history: VecDeque<String>,
    last_reasoning: Option<String>,
}

impl fmt::Debug for ResponseAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseAgent")
            .field("name", &self.name)
            .field("history", &self.history.len())
            .finish()
    }
}

impl ResponseAgent {
    pub fn new(name: impl Into<String>, responder: Responder) -> Self {
        Self { name: name.into(), responder, history: VecDeque::new(), last_reasoning: None }
    }

    /// The `REASONING:` text from the most recent decision, if it had one.
    pub fn last_reasoning(&self) -> Option<&str> {
        self.last_reasoning.as_deref()
    }

    fn history(&self) -> Vec<&str> {
        self.history.iter().map(String::as_str).collect()
    }
}

impl PlayerAgent for ResponseAgent {
    fn decide(&mut self, view: &TableView) -> Result<Action, AgentError> {
        let prompt = render_decision_prompt(view, &self.history());
        let text = (self.responder)(&prompt).ok_or(AgentError::NoResponse)?;
        self.last_reasoning = parse_reasoning(&text);
        Ok(parse_decision(&text))
    }

    fn discard(&mut self, view: &TableView) -> Vec<usize> {
        let prompt = render_discard_prompt(view);
        match (self.responder)(&prompt) {
            Some(text) => parse_discard(&text),
            None => {
                log::warn!("{} gave no discard response, keeping hand", self.name);
                Vec::new()
            }
        }
    }

    fn observe(&mut self, event: &GameEvent) {
        if matches!(event, GameEvent::RoundStarted { .. }) {
            self.history.clear();
        }
        for line in LogSink::render(event) {
            if self.history.len() == HISTORY_LINES {
                self.history.pop_front();
            }
            self.history.push_back(line);
        }
    }

    fn kind(&self) -> AgentKind {
        AgentKind::Response
    }
}

fn write_state(out: &mut String, view: &TableView) {
    let _ = writeln!(out, "Round {} - {}", view.round, view.stage.title());
    if let Some(hand) = view.hand {
        let _ = writeln!(out, "Your hand: {hand}");
    }
    let _ = writeln!(out, "Pot: ${}", view.pot);
    let _ = writeln!(out, "Current bet: ${}", view.current_bet);
    let _ = writeln!(out, "To call: ${}", view.to_call);
    let _ = writeln!(out, "Minimum raise to: ${}", view.min_raise_to);
    let _ = writeln!(out, "Your chips: ${}", view.chips());
    let _ = writeln!(out, "Players:");
    for (i, s) in view.seats.iter().enumerate() {
        let dealer = if i == view.dealer { " (dealer)" } else { "" };
        let _ = writeln!(out, "  {}: ${} bet ${} {}{dealer}", s.name, s.chips, s.bet, s.status.label());
    }
}

/// Prompt asking for a betting decision.
pub fn render_decision_prompt(view: &TableView, history: &[&str]) -> String {
    let mut out = String::new();
    write_state(&mut out, view);
    if !history.is_empty() {
        out.push_str("Recent table history:\n");
        for line in history {
            let _ = writeln!(out, "  {line}");
        }
    }
    out.push_str(
        "\nRespond with a REASONING: line and then exactly one of:\n\
         DECISION: fold\n\
         DECISION: call\n\
         DECISION: raise NUMBER\n\
         NUMBER is the total bet to raise to.\n",
    );
    out
}

/// Prompt asking which positions to replace.
pub fn render_discard_prompt(view: &TableView) -> String {
    let mut out = String::new();
    write_state(&mut out, view);
    if let Some(hand) = view.hand {
        for (i, card) in hand.cards().iter().enumerate() {
            let _ = writeln!(out, "Card {i}: {card}");
        }
    }
    out.push_str(
        "\nRespond with a DISCARD: line listing positions 0-4, for example\n\
         DISCARD: [0,2]\n\
         DISCARD: none\n",
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::tests::view_for;
    use std::sync::{Arc, Mutex};

    fn canned(reply: &'static str) -> Responder {
        Box::new(move |_prompt: &str| Some(reply.to_string()))
    }

    #[test]
    fn parses_labelled_decision_and_reasoning() {
        let mut agent = ResponseAgent::new("Bot", canned("REASONING: trips\nDECISION: raise 120"));
        let view = view_for("9c 9h 9s 2d 4c", 20, 500);
        assert_eq!(agent.decide(&view), Ok(Action::raise_to(120)));
        assert_eq!(agent.last_reasoning(), Some("trips"));
    }

    #[test]
    fn gibberish_folds_and_silence_is_an_error() {
        let mut agent = ResponseAgent::new("Bot", canned("la la la"));
        let view = view_for("9c 9h 9s 2d 4c", 20, 500);
        assert_eq!(agent.decide(&view), Ok(Action::Fold));

        let mut silent = ResponseAgent::new("Quiet", Box::new(|_: &str| None));
        assert_eq!(silent.decide(&view), Err(AgentError::NoResponse));
        assert!(silent.discard(&view).is_empty());
    }

    #[test]
    fn discard_prompt_lists_positions() {
        let seen = Arc::new(Mutex::new(String::new()));
        let sink = Arc::clone(&seen);
        let mut agent = ResponseAgent::new(
            "Bot",
            Box::new(move |prompt: &str| {
                *sink.lock().unwrap() = prompt.to_string();
                Some("ANALYSIS: junk\nDISCARD: [3, 4]".into())
            }),
        );
        let view = view_for("9c 9h Ks 2d 4c", 0, 500);
        assert_eq!(agent.discard(&view), vec![3, 4]);
        let prompt = seen.lock().unwrap();
        assert!(prompt.contains("Card 0: 9c"));
        assert!(prompt.contains("Card 4: 4c"));
    }

    #[test]
    fn history_is_bounded_and_reset_each_round() {
        let mut agent = ResponseAgent::new("Bot", canned("DECISION: call"));
        for _ in 0..40 {
            agent.observe(&GameEvent::PlayerEliminated { name: "X".into() });
        }
        assert_eq!(agent.history.len(), HISTORY_LINES);
        agent.observe(&GameEvent::RoundStarted {
            round: 2,
            dealer: "X".into(),
            small_blind: None,
            big_blind: None,
            stacks: vec![],
        });
        assert!(agent.history.len() < HISTORY_LINES);
    }
}
