use crate::action::Action;
use crate::betting::Phase;
use crate::cards::{Card, Suit};
use crate::evaluator::{evaluate, HandRank};
use crate::events::GameEvent;
use crate::hand::{Hand, HAND_SIZE};
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};

use super::{AgentError, AgentKind, OpponentBook, PlayerAgent, TableView};

/// Difficulty tiers for bot play style and mistake rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

/// Configuration for a bot's play style and randomness.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct BotProfile {
    pub difficulty: Difficulty,
    pub tightness: f64,
    pub aggression: f64,
    pub bluff: f64,
    pub curiosity: f64,
    pub rng_seed: Option<u64>,
}

impl BotProfile {
    /// Create a profile with tuned defaults for a difficulty tier.
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let (tightness, aggression, bluff, curiosity) = match difficulty {
            Difficulty::Easy => (0.3, 0.18, 0.03, 0.4),
            Difficulty::Medium => (0.5, 0.35, 0.05, 0.2),
            Difficulty::Hard => (0.62, 0.48, 0.08, 0.12),
            Difficulty::Expert => (0.72, 0.6, 0.12, 0.1),
        };
        Self { difficulty, tightness, aggression, bluff, curiosity, rng_seed: None }
    }

    /// Set a deterministic RNG seed for reproducible decisions.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}

impl Default for BotProfile {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::Medium)
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(v) => StdRng::seed_from_u64(v),
        None => {
            let mut seed = [0u8; 32];
            rand::rng().fill_bytes(&mut seed);
            StdRng::from_seed(seed)
        }
    }
}

#[derive(Clone, Copy)]
struct DecisionParams {
    adjusted: f64,
    fold_threshold: f64,
    raise_threshold: f64,
    aggression: f64,
    bluff: f64,
    curiosity: f64,
}

/// Plays from hand strength, pot odds and what it has seen of the table.
#[derive(Debug)]
pub struct HeuristicAgent {
    name: String,
    profile: BotProfile,
    rng: StdRng,
    opponents: OpponentBook,
}

impl HeuristicAgent {
    pub fn new(name: impl Into<String>, profile: BotProfile) -> Self {
        let rng = seeded_rng(profile.rng_seed);
        Self { name: name.into(), profile, rng, opponents: OpponentBook::new() }
    }

    pub fn opponents(&self) -> &OpponentBook {
        &self.opponents
    }

    fn params(&mut self, view: &TableView, hand: &Hand) -> DecisionParams {
        let before_draw = !matches!(view.phase(), Some(Phase::PostDraw));
        let strength = estimate_strength(hand, before_draw);
        let pot_odds = if view.to_call == 0 {
            0.0
        } else {
            view.to_call as f64 / (view.pot + view.to_call) as f64
        };
        let position = position_factor(view.seat, view.dealer, view.num_players());
        let (mistake_rate, diff_bias) = difficulty_modifiers(self.profile.difficulty);
        // loose tables get called down a little lighter
        let table_bias = self.opponents.table_aggression().map_or(0.0, |a| (a - 0.35) * 0.1);

        let tightness = (self.profile.tightness + diff_bias - position - table_bias).clamp(0.05, 0.95);
        let aggression = (self.profile.aggression + diff_bias + position).clamp(0.05, 0.95);
        let bluff = (self.profile.bluff + diff_bias * 0.5).clamp(0.0, 0.5);
        let curiosity = self.profile.curiosity.clamp(0.0, 0.6);

        let noise = self.rng.random_range(-1.0..=1.0) * mistake_rate * 0.18;
        let adjusted = (strength + noise).clamp(0.0, 1.0);
        let fold_threshold = (0.2 + tightness * 0.25 - pot_odds * 0.25).clamp(0.05, 0.9);
        let raise_threshold = (0.6 - aggression * 0.25).clamp(0.15, 0.9);
        DecisionParams { adjusted, fold_threshold, raise_threshold, aggression, bluff, curiosity }
    }

    fn facing_bet(&mut self, view: &TableView, p: DecisionParams) -> Action {
        if p.adjusted < p.fold_threshold && self.rng.random::<f64>() > p.curiosity * 0.3 {
            return Action::Fold;
        }
        if p.adjusted > p.raise_threshold && self.rng.random::<f64>() < p.aggression {
            return Action::raise_to(choose_raise_target(view, p.aggression, p.adjusted));
        }
        Action::Call
    }

    fn unopposed(&mut self, view: &TableView, p: DecisionParams) -> Action {
        let value = p.adjusted > p.raise_threshold && self.rng.random::<f64>() < p.aggression;
        let bluff = p.adjusted < p.fold_threshold && self.rng.random::<f64>() < p.bluff;
        if value || bluff {
            return Action::raise_to(choose_raise_target(view, p.aggression, p.adjusted));
        }
        Action::Call
    }
}

impl PlayerAgent for HeuristicAgent {
    fn decide(&mut self, view: &TableView) -> Result<Action, AgentError> {
        let Some(hand) = view.hand else {
            return Ok(Action::Fold);
        };
        let params = self.params(view, &hand);
        let action = if view.to_call > 0 {
            self.facing_bet(view, params)
        } else {
            self.unopposed(view, params)
        };
        log::debug!("{} strength {:.2} -> {action}", self.name, params.adjusted);
        Ok(action)
    }

    fn discard(&mut self, view: &TableView) -> Vec<usize> {
        view.hand.map(|h| standard_discards(&h)).unwrap_or_default()
    }

    fn observe(&mut self, event: &GameEvent) {
        self.opponents.record(&self.name, event);
    }

    fn kind(&self) -> AgentKind {
        AgentKind::Heuristic
    }
}

fn difficulty_modifiers(difficulty: Difficulty) -> (f64, f64) {
    match difficulty {
        Difficulty::Easy => (0.28, -0.1),
        Difficulty::Medium => (0.14, 0.0),
        Difficulty::Hard => (0.08, 0.05),
        Difficulty::Expert => (0.04, 0.09),
    }
}

fn position_factor(seat: usize, dealer: usize, num_players: usize) -> f64 {
    if num_players <= 2 {
        return 0.0;
    }
    let dist = (seat + num_players - dealer) % num_players;
    let frac = dist as f64 / num_players as f64;
    if dist == 0 || frac >= 0.7 {
        0.05
    } else if frac <= 0.4 {
        -0.05
    } else {
        0.0
    }
}

fn choose_raise_target(view: &TableView, aggression: f64, strength: f64) -> u64 {
    let max_total = view.bet() + view.chips();
    if max_total <= view.min_raise_to {
        return max_total;
    }
    if strength > 0.85 && view.chips() <= view.pot.saturating_add(view.to_call) {
        return max_total;
    }
    let base_factor = if strength > 0.8 {
        1.0
    } else if strength > 0.6 {
        0.7
    } else {
        0.5
    };
    let scale = 0.9 + aggression * 0.3;
    let raise = ((view.pot.max(view.current_bet) as f64) * base_factor * scale).round() as u64;
    (view.current_bet + raise).max(view.min_raise_to).min(max_total)
}

/// Hand strength in 0.0..=1.0: category over ten, scaled by the top tiebreaker.
/// Before the draw, four-card flush and straight draws add a little.
fn estimate_strength(hand: &Hand, before_draw: bool) -> f64 {
    let eval = evaluate(hand);
    let high = eval.tiebreakers.first().map_or(0.0, |r| r.value() as f64 / 14.0);
    let base = eval.rank.value() as f64 / 10.0;
    let mut strength = base * (0.85 + 0.15 * high);
    if before_draw && eval.rank < HandRank::Straight {
        if four_flush_outlier(hand).is_some() {
            strength += 0.08;
        } else if four_straight_outlier(hand).is_some() {
            strength += 0.05;
        }
    }
    strength.clamp(0.0, 1.0)
}

fn suit_index(suit: Suit) -> usize {
    match suit {
        Suit::Clubs => 0,
        Suit::Diamonds => 1,
        Suit::Hearts => 2,
        Suit::Spades => 3,
    }
}

/// Position of the odd card when four cards share a suit.
fn four_flush_outlier(hand: &Hand) -> Option<usize> {
    let mut suits = [0u8; 4];
    for c in hand.cards() {
        suits[suit_index(c.suit())] += 1;
    }
    let flush_suit = suits.iter().position(|&n| n == 4)?;
    hand.cards().iter().position(|c| suit_index(c.suit()) != flush_suit)
}

/// Position of the odd card when the other four ranks run consecutively.
fn four_straight_outlier(hand: &Hand) -> Option<usize> {
    let cards = hand.cards();
    (0..HAND_SIZE).find(|&skip| {
        let mut values: Vec<u8> = cards
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != skip)
            .map(|(_, c)| c.rank().value())
            .collect();
        values.sort_unstable();
        values.dedup();
        if values.len() != 4 {
            return false;
        }
        let run = values[3] - values[0] == 3;
        // A-2-3-4 with the ace played low
        let wheel = values == [2, 3, 4, 14];
        run || wheel
    })
}

/// Classic five-card-draw discards.
///
/// Made hands of a straight or better stand pat, sets and pairs keep their
/// matched cards, four-card flushes and straights draw one, and anything else
/// keeps its highest card.
pub(crate) fn standard_discards(hand: &Hand) -> Vec<usize> {
    let eval = evaluate(hand);
    let cards = hand.cards();
    let keep_matched = |cards: &[Card; HAND_SIZE]| -> Vec<usize> {
        (0..HAND_SIZE)
            .filter(|&i| cards.iter().filter(|c| c.rank() == cards[i].rank()).count() == 1)
            .collect()
    };
    match eval.rank {
        HandRank::Straight
        | HandRank::Flush
        | HandRank::FullHouse
        | HandRank::FourOfAKind
        | HandRank::StraightFlush
        | HandRank::RoyalFlush => Vec::new(),
        HandRank::ThreeOfAKind | HandRank::TwoPair | HandRank::OnePair => keep_matched(cards),
        _ => {
            if let Some(i) = four_flush_outlier(hand).or_else(|| four_straight_outlier(hand)) {
                return vec![i];
            }
            let Some(high) = (0..HAND_SIZE).max_by_key(|&i| cards[i].rank()) else {
                return Vec::new();
            };
            (0..HAND_SIZE).filter(|&i| i != high).collect()
        }
    }
}

/// Picks uniformly among the legal options; useful as a baseline opponent.
#[derive(Debug)]
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new(seed: Option<u64>) -> Self {
        Self { rng: seeded_rng(seed) }
    }
}

impl PlayerAgent for RandomAgent {
    fn decide(&mut self, view: &TableView) -> Result<Action, AgentError> {
        let chips = view.chips();
        let current = view.current_bet;
        if current > chips {
            return Ok(Action::Fold);
        }
        let min_raise = current * 2;
        let options = if chips >= min_raise { 3 } else { 2 };
        let action = match self.rng.random_range(0..options) {
            0 => Action::Fold,
            1 => Action::Call,
            _ => {
                let max_raise = chips.min(current * 3);
                if max_raise > min_raise {
                    let steps = (max_raise - min_raise) / 10;
                    Action::raise_to(min_raise + 10 * self.rng.random_range(0..=steps))
                } else {
                    Action::Call
                }
            }
        };
        Ok(action)
    }

    fn discard(&mut self, _view: &TableView) -> Vec<usize> {
        let count = self.rng.random_range(0..=3);
        let mut picks = rand::seq::index::sample(&mut self.rng, HAND_SIZE, count).into_vec();
        picks.sort_unstable();
        picks
    }

    fn kind(&self) -> AgentKind {
        AgentKind::Random
    }
}
