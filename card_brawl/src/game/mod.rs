//! Card game engine: decks, players, fighters and the vote state machine.
//!
//! This module provides:
//! - An inexhaustible, reshuffling [`Deck`](entities::Deck)
//! - Players, fighters and live [`Settings`](entities::Settings)
//! - The [`GameState`](state_machine::GameState) turn/vote machine

pub mod constants;
pub mod entities;
pub mod state_machine;

pub use entities::{CardColor, ConfigurationError, Deck, Fighter, Player, Settings, Vote};
pub use state_machine::{GameError, GameSnapshot, GameState, Phase, VoteOutcome};
