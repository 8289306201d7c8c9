//! draw-poker: a five-card draw poker engine
//!
//! Goals:
//! - Deterministic play from a seed: the deck and the bots share one seed
//! - Rules live in the library; agents only choose among legal actions
//! - No panics on bad agent output; malformed decisions are clamped or folded
//!
//! ## Quick start: rank two hands
//! ```
//! use draw_poker::evaluator::{compare, evaluate, HandRank};
//! use draw_poker::hand::Hand;
//! use std::cmp::Ordering;
//!
//! let flush: Hand = "2h 7h 9h Jh Kh".parse().unwrap();
//! let straight: Hand = "5c 6d 7h 8s 9c".parse().unwrap();
//! assert_eq!(evaluate(&flush).rank, HandRank::Flush);
//! assert_eq!(compare(&flush, &straight), Ordering::Greater);
//! ```
//!
//! ## Quick start: play a seeded game
//! ```
//! use draw_poker::agents::{PlayerAgent, RandomAgent};
//! use draw_poker::config::GameConfig;
//! use draw_poker::events::RecordingSink;
//! use draw_poker::game::Game;
//!
//! let config = GameConfig { seed: Some(7), max_rounds: Some(5), ..GameConfig::default() };
//! let seats: Vec<(String, Box<dyn PlayerAgent>)> = (0..3)
//!     .map(|i| (format!("Bot{i}"), Box::new(RandomAgent::new(Some(i))) as Box<dyn PlayerAgent>))
//!     .collect();
//! let mut game = Game::new(config, seats, RecordingSink::new()).unwrap();
//! let summary = game.play().unwrap();
//! assert!(summary.rounds <= 5);
//! assert_eq!(summary.standings.iter().map(|(_, c)| c).sum::<u64>(), 3000);
//! ```
//!
//! ## CLI
//! Run a bot session with:
//! ```sh
//! cargo run --bin draw-poker -- --players 4 --rounds 20 --seed 1
//! ```

pub mod action;
pub mod agents;
pub mod betting;
pub mod cards;
pub mod config;
pub mod deck;
pub mod draw;
pub mod evaluator;
pub mod events;
pub mod game;
pub mod hand;
pub mod player;
pub mod pot;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
