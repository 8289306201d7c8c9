//! The game orchestrator: runs rounds of five-card draw until one player is
//! left, everyone is broke, or the round limit is hit.
//!
//! A round is antes, blinds, the deal, pre-draw betting, the draw, post-draw
//! betting and then either a showdown or an uncontested award. The dealer
//! button moves to the next player with chips after every round.

use crate::action::Action;
use crate::agents::{PlayerAgent, SeatView, TableView};
use crate::betting::{seats_from, BettingLimits, BettingRound, Phase};
use crate::config::{ConfigError, GameConfig};
use crate::deck::{Deck, DeckError, DECK_SIZE};
use crate::draw::{DrawEngine, DrawError};
use crate::evaluator::{evaluate, Evaluation};
use crate::events::{EventSink, ForcedBet, GameEvent, LogSink, Stage};
use crate::hand::{Hand, HandError, HAND_SIZE};
use crate::player::{Player, PlayerStatus};
use crate::pot::{PotError, PotManager, Settlement};
use std::fmt;

pub const MIN_PLAYERS: usize = 2;
/// Every player must be able to hold a full hand from one deck.
pub const MAX_PLAYERS: usize = DECK_SIZE / HAND_SIZE;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum GameError {
    #[error("need at least 2 players, got {0}")]
    NotEnoughPlayers(usize),
    #[error("at most 10 players fit at the table, got {0}")]
    TooManyPlayers(usize),
    #[error("player name {0:?} is used twice")]
    DuplicateName(String),
    #[error("the game is already over")]
    GameOver,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error(transparent)]
    Hand(#[from] HandError),
    #[error(transparent)]
    Draw(#[from] DrawError),
    #[error(transparent)]
    Pot(#[from] PotError),
}

/// Why a game stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Termination {
    LastPlayerStanding,
    AllBankrupt,
    MaxRounds,
}

impl Termination {
    pub fn label(self) -> &'static str {
        match self {
            Termination::LastPlayerStanding => "last player standing",
            Termination::AllBankrupt => "all players bankrupt",
            Termination::MaxRounds => "round limit reached",
        }
    }
}

/// What one round did.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct RoundOutcome {
    pub round: u32,
    pub dealer: usize,
    /// Chips paid to each seat from the pot.
    pub payouts: Vec<u64>,
    /// Hands revealed at showdown, by seat. Empty when the pot was uncontested.
    pub shown: Vec<(usize, Evaluation)>,
    pub eliminated: Vec<usize>,
    pub termination: Option<Termination>,
}

impl RoundOutcome {
    pub fn went_to_showdown(&self) -> bool {
        !self.shown.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub rounds: u32,
    pub termination: Termination,
    pub winner: Option<(String, u64)>,
    /// Every player by chips, richest first.
    pub standings: Vec<(String, u64)>,
}

impl fmt::Display for GameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Game over after {} rounds ({})", self.rounds, self.termination.label())?;
        if let Some((name, chips)) = &self.winner {
            writeln!(f, "Winner: {name} with ${chips}")?;
        }
        for (i, (name, chips)) in self.standings.iter().enumerate() {
            writeln!(f, "{:>2}. {name:<12} ${chips}", i + 1)?;
        }
        Ok(())
    }
}

/// Forwards each event to the sink, and to every agent as its seat may see it.
struct Broadcast<'a, S: ?Sized> {
    sink: &'a mut S,
    agents: &'a mut [Box<dyn PlayerAgent>],
    names: &'a [String],
}

impl<S: EventSink + ?Sized> EventSink for Broadcast<'_, S> {
    fn emit(&mut self, event: &GameEvent) {
        self.sink.emit(event);
        for (agent, name) in self.agents.iter_mut().zip(self.names) {
            agent.observe(&event.seen_by(name));
        }
    }
}

/// A table of players and the agents that decide for them.
pub struct Game<S: EventSink = LogSink> {
    config: GameConfig,
    players: Vec<Player>,
    agents: Vec<Box<dyn PlayerAgent>>,
    /// Seat names in seat order, for per-seat event filtering.
    names: Vec<String>,
    deck: Deck,
    pot: PotManager,
    dealer: usize,
    round: u32,
    /// Chips at the table; constant for the whole game.
    bank: u64,
    finished: Option<Termination>,
    sink: S,
}

impl<S: EventSink> fmt::Debug for Game<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("round", &self.round)
            .field("dealer", &self.dealer)
            .field("players", &self.players)
            .field("finished", &self.finished)
            .finish()
    }
}

impl<S: EventSink> Game<S> {
    /// Seat one player per `(name, agent)` pair, in order, each with
    /// `config.starting_chips`.
    pub fn new(
        config: GameConfig,
        seats: Vec<(String, Box<dyn PlayerAgent>)>,
        sink: S,
    ) -> Result<Self, GameError> {
        config.validate()?;
        let n = seats.len();
        if n < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers(n));
        }
        if n > MAX_PLAYERS {
            return Err(GameError::TooManyPlayers(n));
        }
        let mut players = Vec::with_capacity(n);
        let mut agents = Vec::with_capacity(n);
        for (name, agent) in seats {
            if players.iter().any(|p: &Player| p.name() == name) {
                return Err(GameError::DuplicateName(name));
            }
            players.push(Player::new(name, config.starting_chips));
            agents.push(agent);
        }
        let deck = match config.seed {
            Some(seed) => Deck::seeded(seed),
            None => Deck::new(),
        };
        let names = players.iter().map(|p| p.name().to_string()).collect();
        Ok(Self {
            bank: config.starting_chips * n as u64,
            pot: PotManager::new(n),
            config,
            players,
            agents,
            names,
            deck,
            dealer: 0,
            round: 0,
            finished: None,
            sink,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn dealer(&self) -> usize {
        self.dealer
    }

    /// Rounds started so far.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn is_over(&self) -> bool {
        self.finished.is_some()
    }

    pub fn termination(&self) -> Option<Termination> {
        self.finished
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Chips in stacks plus chips in the pot.
    pub fn chips_in_play(&self) -> u64 {
        self.players.iter().map(Player::chips).sum::<u64>() + self.pot.total()
    }

    fn emit(&mut self, event: GameEvent) {
        Broadcast { sink: &mut self.sink, agents: &mut self.agents, names: &self.names }.emit(&event);
    }

    fn stacks(&self) -> Vec<(String, u64)> {
        self.players.iter().map(|p| (p.name().to_string(), p.chips())).collect()
    }

    /// Next seat after `from` that is still in the game.
    fn next_seated(&self, from: usize) -> usize {
        let n = self.players.len();
        seats_from(from + 1, n)
            .find(|&s| !matches!(self.players[s].status(), PlayerStatus::Eliminated))
            .unwrap_or(from)
    }

    fn live_count(&self) -> usize {
        self.players.iter().filter(|p| !p.is_folded()).count()
    }

    /// Play rounds until the game ends.
    pub fn play(&mut self) -> Result<GameSummary, GameError> {
        while !self.is_over() {
            self.play_round()?;
        }
        self.summary().ok_or(GameError::GameOver)
    }

    /// Final standings, once the game is over.
    pub fn summary(&self) -> Option<GameSummary> {
        let termination = self.finished?;
        let mut standings = self.stacks();
        standings.sort_by(|a, b| b.1.cmp(&a.1));
        let winner = match termination {
            Termination::AllBankrupt => None,
            _ => standings.first().cloned(),
        };
        Some(GameSummary { rounds: self.round, termination, winner, standings })
    }

    /// Play one full round.
    pub fn play_round(&mut self) -> Result<RoundOutcome, GameError> {
        if self.finished.is_some() {
            return Err(GameError::GameOver);
        }
        if self.round == 0 {
            self.emit(GameEvent::GameStarted {
                players: self.stacks(),
                small_blind: self.config.small_blind,
                big_blind: self.config.big_blind,
                ante: self.config.ante,
            });
        }
        self.round += 1;
        let n = self.players.len();
        for p in &mut self.players {
            p.reset_for_hand();
        }
        self.pot.reset(n);
        self.deck.reshuffle_all();
        if matches!(self.players[self.dealer].status(), PlayerStatus::Eliminated) {
            self.dealer = self.next_seated(self.dealer);
        }

        let seated = self.players.iter().filter(|p| !p.is_folded()).count();
        let (sb, bb) = if seated == 2 {
            (self.dealer, self.next_seated(self.dealer))
        } else {
            let sb = self.next_seated(self.dealer);
            (sb, self.next_seated(sb))
        };
        self.emit(GameEvent::RoundStarted {
            round: self.round,
            dealer: self.players[self.dealer].name().to_string(),
            small_blind: Some(self.players[sb].name().to_string()),
            big_blind: Some(self.players[bb].name().to_string()),
            stacks: self.stacks(),
        });

        self.post_antes();
        self.post_blind(sb, ForcedBet::SmallBlind, self.config.small_blind);
        self.post_blind(bb, ForcedBet::BigBlind, self.config.big_blind);
        self.deal()?;

        let first = if seated == 2 { self.dealer } else { self.next_seated(bb) };
        self.run_betting(Phase::PreDraw, first, self.config.big_blind);

        let settlement = if self.live_count() < 2 {
            self.award_uncontested(Stage::Betting(Phase::PreDraw))?
        } else {
            self.run_draw()?;
            self.run_betting(Phase::PostDraw, (self.dealer + 1) % n, 0);
            if self.live_count() < 2 {
                self.award_uncontested(Stage::Betting(Phase::PostDraw))?
            } else {
                self.showdown()?
            }
        };
        let shown = settlement.1;
        let payouts = settlement.0.payouts;
        for (p, won) in self.players.iter_mut().zip(&payouts) {
            p.chips += won;
        }
        self.pot.reset(n);
        self.check_conservation();

        let eliminated = self.eliminate_busted();
        self.emit(GameEvent::RoundEnded { round: self.round, stacks: self.stacks() });
        let dealer = self.dealer;
        let termination = self.check_termination();
        if termination.is_none() {
            self.dealer = self.next_with_chips(self.dealer);
        }
        Ok(RoundOutcome { round: self.round, dealer, payouts, shown, eliminated, termination })
    }

    fn post_antes(&mut self) {
        let ante = self.config.ante;
        if ante == 0 {
            return;
        }
        let n = self.players.len();
        for seat in seats_from(self.dealer + 1, n) {
            if !self.players[seat].can_act() {
                continue;
            }
            let paid = self.players[seat].commit(ante);
            // antes are dead money; they do not count toward the bet to call
            self.players[seat].reset_bet();
            self.pot.add(seat, paid);
            self.emit(GameEvent::ForcedBetPosted {
                name: self.players[seat].name().to_string(),
                kind: ForcedBet::Ante,
                amount: paid,
                partial: paid < ante,
                all_in: self.players[seat].is_all_in(),
            });
        }
    }

    fn post_blind(&mut self, seat: usize, kind: ForcedBet, amount: u64) {
        if !self.players[seat].can_act() {
            log::debug!("{} cannot post the {}", self.players[seat].name(), kind.label());
            return;
        }
        let paid = self.players[seat].commit(amount);
        self.pot.add(seat, paid);
        self.emit(GameEvent::ForcedBetPosted {
            name: self.players[seat].name().to_string(),
            kind,
            amount: paid,
            partial: paid < amount,
            all_in: self.players[seat].is_all_in(),
        });
    }

    fn deal(&mut self) -> Result<(), GameError> {
        let n = self.players.len();
        for seat in seats_from(self.dealer + 1, n) {
            if self.players[seat].is_folded() {
                continue;
            }
            let cards = self.deck.deal(HAND_SIZE)?;
            self.players[seat].hand = Some(Hand::from_slice(&cards)?);
        }
        Ok(())
    }

    fn view(&self, seat: usize, stage: Stage, betting: Option<&BettingRound>) -> TableView {
        let (current_bet, to_call, min_raise_to) = match betting {
            Some(r) => (r.state().current_bet, r.to_call(&self.players[seat]), r.min_raise_to()),
            None => (0, 0, 0),
        };
        TableView {
            round: self.round,
            stage,
            seat,
            dealer: self.dealer,
            hand: self.players[seat].hand,
            pot: self.pot.total(),
            current_bet,
            to_call,
            min_raise_to,
            seats: self.players.iter().map(SeatView::from).collect(),
        }
    }

    fn run_betting(&mut self, phase: Phase, first: usize, opening_bet: u64) {
        let stage = Stage::Betting(phase);
        self.emit(GameEvent::StageStarted(stage));
        let limits = BettingLimits {
            opening_bet,
            min_raise: self.config.min_bet(),
            max_raises: self.config.max_raises_per_round,
        };
        let mut round = BettingRound::start(self.round, phase, &self.players, first, limits);
        while let Some(seat) = round.to_act() {
            let view = self.view(seat, stage, Some(&round));
            let action = self.agents[seat].decide(&view).unwrap_or_else(|e| {
                log::warn!("{} could not decide ({e}), folding", self.players[seat].name());
                Action::Fold
            });
            let mut out = Broadcast { sink: &mut self.sink, agents: &mut self.agents, names: &self.names };
            round.apply(&mut self.players, &mut self.pot, action, &mut out);
        }
        for p in &mut self.players {
            p.reset_bet();
        }
        self.emit(GameEvent::StageCompleted(stage));
    }

    fn run_draw(&mut self) -> Result<(), GameError> {
        self.emit(GameEvent::StageStarted(Stage::Draw));
        let n = self.players.len();
        let mut engine = DrawEngine::new();
        for seat in seats_from(self.dealer + 1, n) {
            if self.players[seat].is_folded() {
                continue;
            }
            let view = self.view(seat, Stage::Draw, None);
            let requested = self.agents[seat].discard(&view);
            let mut out = Broadcast { sink: &mut self.sink, agents: &mut self.agents, names: &self.names };
            engine.draw_for(&mut self.players[seat], &requested, &mut self.deck, &mut out)?;
        }
        engine.finish(&mut self.deck);
        self.emit(GameEvent::StageCompleted(Stage::Draw));
        Ok(())
    }

    fn award_uncontested(
        &mut self,
        stage: Stage,
    ) -> Result<(Settlement, Vec<(usize, Evaluation)>), GameError> {
        let seat = self.players.iter().position(|p| !p.is_folded()).ok_or(PotError::NoEligiblePlayers { pot: 0 })?;
        let settlement = self.pot.award_uncontested(seat)?;
        self.emit(GameEvent::UncontestedWin {
            name: self.players[seat].name().to_string(),
            amount: settlement.total(),
            stage,
        });
        Ok((settlement, Vec::new()))
    }

    fn showdown(&mut self) -> Result<(Settlement, Vec<(usize, Evaluation)>), GameError> {
        self.emit(GameEvent::StageStarted(Stage::Showdown));
        let n = self.players.len();
        let mut evaluations: Vec<Option<Evaluation>> = vec![None; n];
        let mut shown = Vec::new();
        for seat in seats_from(self.dealer + 1, n) {
            let player = &self.players[seat];
            let (false, Some(hand)) = (player.is_folded(), player.hand) else {
                continue;
            };
            let eval = evaluate(&hand);
            let event = GameEvent::HandShown {
                name: player.name().to_string(),
                hand,
                description: eval.description.clone(),
            };
            self.emit(event);
            shown.push((seat, eval.clone()));
            evaluations[seat] = Some(eval);
        }

        let folded: Vec<bool> = self.players.iter().map(Player::is_folded).collect();
        let pots = self.pot.side_pots(&folded);
        let settlement = self.pot.distribute(&pots, &evaluations, self.dealer)?;
        for award in &settlement.awards {
            let winners = award
                .winners
                .iter()
                .zip(&award.shares)
                .map(|(&s, &share)| (self.players[s].name().to_string(), share))
                .collect();
            self.emit(GameEvent::PotAwarded { pot: award.pot, amount: award.amount, winners });
        }
        self.emit(GameEvent::StageCompleted(Stage::Showdown));
        Ok((settlement, shown))
    }

    fn check_conservation(&self) {
        let in_play = self.chips_in_play();
        if in_play != self.bank {
            log::error!("chip total drifted: {in_play} in play, {} expected", self.bank);
        }
        debug_assert_eq!(in_play, self.bank, "chips must be conserved");
    }

    fn eliminate_busted(&mut self) -> Vec<usize> {
        let busted: Vec<usize> = (0..self.players.len())
            .filter(|&s| {
                let p = &self.players[s];
                p.chips() == 0 && !matches!(p.status(), PlayerStatus::Eliminated)
            })
            .collect();
        for &seat in &busted {
            self.players[seat].status = PlayerStatus::Eliminated;
            let name = self.players[seat].name().to_string();
            self.emit(GameEvent::PlayerEliminated { name });
        }
        busted
    }

    fn next_with_chips(&self, from: usize) -> usize {
        let n = self.players.len();
        seats_from(from + 1, n).find(|&s| self.players[s].chips() > 0).unwrap_or(from)
    }

    fn check_termination(&mut self) -> Option<Termination> {
        let solvent: Vec<&Player> = self.players.iter().filter(|p| p.chips() > 0).collect();
        let termination = match solvent.len() {
            0 => Termination::AllBankrupt,
            1 => Termination::LastPlayerStanding,
            _ if self.config.max_rounds.is_some_and(|max| self.round >= max) => Termination::MaxRounds,
            _ => return None,
        };
        let leader = self
            .players
            .iter()
            .filter(|p| p.chips() > 0)
            .max_by_key(|p| p.chips())
            .map(|p| (p.name().to_string(), p.chips()));
        self.finished = Some(termination);
        self.emit(GameEvent::GameOver {
            winner: leader,
            rounds: self.round,
            max_rounds_reached: termination == Termination::MaxRounds,
        });
        Some(termination)
    }
}
