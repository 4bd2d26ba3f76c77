//! # Card Brawl
//!
//! Game core for a party card game played in rounds of head-to-head
//! match-ups, plus the event hub that keeps every connected client in sync.
//!
//! ## Architecture
//!
//! A round runs through a small set of phases:
//!
//! - **Choosing**: fighters commit one white card and `fighters_per_black`
//!   black cards from their hand
//! - **Voting**: everyone else picks the old (streak holder) or new fighter
//! - **TieBreak**: a drawn vote deals each fighter an extra white card and
//!   reopens voting
//! - **Finished**: a player reached the goal; actions are still accepted so
//!   clients decide how to present the result
//!
//! The winner of a vote stays on as fighter 0 and the next player in turn
//! order steps up as challenger. Three straight wins clear the match-up.
//!
//! ## Core Modules
//!
//! - [`game`]: decks, players and the turn/vote state machine
//! - [`hub`]: broadcast fan-out with slow-consumer eviction
//!
//! ## Example
//!
//! ```
//! use card_brawl::{GameState, Vote, VoteOutcome};
//!
//! let white = vec!["W1".to_string(), "W2".to_string(), "W3".to_string()];
//! let black = vec!["B1".to_string(), "B2".to_string(), "B3".to_string()];
//! let mut game = GameState::new(white, black).unwrap();
//!
//! let alice = game.add_player("Alice");
//! let bob = game.add_player("Bob");
//! let carol = game.add_player("Carol");
//! game.choose(alice, 1, &[1]).unwrap();
//! game.choose(bob, 1, &[1]).unwrap();
//!
//! let outcome = game.vote(carol, Vote::New).unwrap();
//! assert_eq!(outcome, VoteOutcome::Resolved);
//! assert_eq!(game.players()[bob].points, 1);
//! ```

/// Core game logic, entities, and state machine.
pub mod game;
pub use game::{
    CardColor, ConfigurationError, Deck, Fighter, GameError, GameSnapshot, GameState, Phase,
    Player, Settings, Vote, VoteOutcome, constants,
};

/// Event fan-out to streaming clients.
pub mod hub;
pub use hub::{
    EventKind, HubActor, HubError, HubHandle, Mailbox, PendingSubscription, ResetKind,
};
