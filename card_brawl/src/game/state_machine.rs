//! Turn and vote state machine.
//!
//! Phases are never stored; they fall out of the player, fighter and `done`
//! fields (see [`GameState::phase`]). Callers are expected to validate request
//! parameters before calling in. Anything that still slips through comes back
//! as a [`GameError`] and leaves the state untouched.

use log::{debug, info};
use serde::Serialize;
use std::{cmp::Ordering, fmt};
use thiserror::Error;

use super::constants::{EXPECTED_PLAYERS, MAX_FIGHTERS, MAX_STREAK};
use super::entities::{CardColor, ConfigurationError, Deck, Fighter, Player, Settings, Vote};

/// Contract violations: the boundary layer let through something it
/// should have rejected.
#[derive(Debug, Eq, Error, PartialEq)]
pub enum GameError {
    #[error("player index {0} out of bounds")]
    InvalidPlayerIndex(usize),
    #[error("{color} card choice {index} is not in the player's hand")]
    InvalidCardIndex { color: CardColor, index: usize },
    #[error("expected {expected} black card choices, got {got}")]
    WrongBlackCount { expected: usize, got: usize },
    #[error("match-up already has two fighters")]
    MatchUpFull,
    #[error("no match-up to vote on")]
    NoMatchUp,
}

/// What a vote did to the game.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VoteOutcome {
    /// Ballot recorded; someone still has to vote.
    Pending,
    /// Votes split evenly. Both fighters drew a tiebreak card and votes were
    /// cleared for a re-vote.
    Tiebreak,
    /// A winner was scored and turn order moved on.
    Resolved,
}

impl VoteOutcome {
    /// Whether every player's vote was wiped by this call.
    #[must_use]
    pub fn votes_cleared(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Choosing,
    Voting,
    TieBreak,
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Idle => "idle",
            Self::Choosing => "choosing",
            Self::Voting => "voting",
            Self::TieBreak => "tiebreak",
            Self::Finished => "finished",
        };
        write!(f, "{repr}")
    }
}

/// Everything clients are allowed to see, detached from the live state so it
/// can be serialized after the state lock is released.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub players: Vec<Player>,
    pub fighters: Vec<Fighter>,
    pub streak: u8,
    pub settings: Settings,
    pub done: bool,
}

#[derive(Debug)]
pub struct GameState {
    players: Vec<Player>,
    fighters: Vec<Fighter>,
    streak: u8,
    next_up: usize,
    done: bool,
    settings: Settings,
    white: Deck,
    black: Deck,
}

impl GameState {
    pub fn new(
        white_cards: Vec<String>,
        black_cards: Vec<String>,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self {
            players: Vec::with_capacity(EXPECTED_PLAYERS),
            fighters: Vec::with_capacity(MAX_FIGHTERS),
            streak: 0,
            next_up: 0,
            done: false,
            settings: Settings::default(),
            white: Deck::new(CardColor::White, white_cards)?,
            black: Deck::new(CardColor::Black, black_cards)?,
        })
    }

    /// Starts the game with non-default settings. Only meaningful before
    /// anyone has joined; use the setters afterwards.
    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn fighters(&self) -> &[Fighter] {
        &self.fighters
    }

    #[must_use]
    pub fn streak(&self) -> u8 {
        self.streak
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.done {
            Phase::Finished
        } else if self.fighters.len() == MAX_FIGHTERS {
            if self.fighters.iter().all(|f| f.tiebreak.is_some()) {
                Phase::TieBreak
            } else {
                Phase::Voting
            }
        } else if self.players.len() < 2 && self.fighters.is_empty() {
            Phase::Idle
        } else {
            Phase::Choosing
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            players: self.players.clone(),
            fighters: self.fighters.clone(),
            streak: self.streak,
            settings: self.settings,
            done: self.done,
        }
    }

    /// Seats a player, or returns the existing seat for a known name.
    pub fn add_player(&mut self, name: &str) -> usize {
        if let Some(index) = self.players.iter().position(|p| p.name == name) {
            return index;
        }
        let index = self.players.len();
        self.players.push(Player::new(name, &self.settings));
        info!("{name} joined in seat {index}");
        if index < 2 {
            self.advance_next_up();
        }
        index
    }

    /// Moves a player's chosen cards into a new fighter. Choices are 1-based
    /// positions in the player's hands.
    pub fn choose(
        &mut self,
        player: usize,
        white_choice: usize,
        black_choices: &[usize],
    ) -> Result<(), GameError> {
        if self.fighters.len() >= MAX_FIGHTERS {
            return Err(GameError::MatchUpFull);
        }
        let seat = self
            .players
            .get(player)
            .ok_or(GameError::InvalidPlayerIndex(player))?;

        let expected = usize::from(self.settings.fighters_per_black);
        if black_choices.len() != expected {
            return Err(GameError::WrongBlackCount {
                expected,
                got: black_choices.len(),
            });
        }
        if white_choice == 0 || white_choice > seat.white.len() {
            return Err(GameError::InvalidCardIndex {
                color: CardColor::White,
                index: white_choice,
            });
        }
        if let Some(&index) = black_choices
            .iter()
            .find(|&&choice| choice == 0 || choice > seat.black.len())
        {
            return Err(GameError::InvalidCardIndex {
                color: CardColor::Black,
                index,
            });
        }

        let fighter = self.players[player].play(player, white_choice, black_choices);
        self.fighters.push(fighter);
        debug!(
            "seat {player} is fighter {} of {MAX_FIGHTERS}",
            self.fighters.len()
        );
        Ok(())
    }

    /// Records a ballot and resolves the match-up once everyone has voted.
    pub fn vote(&mut self, player: usize, vote: Vote) -> Result<VoteOutcome, GameError> {
        if player >= self.players.len() {
            return Err(GameError::InvalidPlayerIndex(player));
        }
        if self.fighters.len() < MAX_FIGHTERS {
            return Err(GameError::NoMatchUp);
        }

        self.players[player].vote = Some(vote);
        let Some((old, new)) = self.tally() else {
            return Ok(VoteOutcome::Pending);
        };
        self.clear_votes();

        match old.cmp(&new) {
            Ordering::Greater => self.streak += 1,
            Ordering::Less => {
                // Challenger takes the holder's slot; the old holder is
                // dropped by the truncate below.
                self.fighters.swap(0, 1);
                self.streak = 1;
            }
            Ordering::Equal => {
                for fighter in &mut self.fighters {
                    fighter.tiebreak = Some(self.white.draw());
                }
                debug!("vote tied {old}-{new}, tiebreak cards drawn");
                return Ok(VoteOutcome::Tiebreak);
            }
        }

        let winner = self.fighters[0].player;
        let points = &mut self.players[winner].points;
        *points = points.saturating_add(1);
        if *points >= self.settings.goal_points {
            self.done = true;
            info!(
                "{} reached {} points, game finished",
                self.players[winner].name, self.settings.goal_points
            );
        }
        debug!("seat {winner} won {old}-{new}, streak {}", self.streak);

        if self.streak >= MAX_STREAK {
            self.fighters.clear();
            self.streak = 0;
            self.advance_next_up();
        } else {
            self.fighters.truncate(1);
            self.fighters[0].tiebreak = None;
        }
        self.advance_next_up();

        Ok(VoteOutcome::Resolved)
    }

    /// Starts a new match with the same seats.
    pub fn reset(&mut self) {
        for player in &mut self.players {
            player.reset();
        }
        self.fighters.clear();
        self.streak = 0;
        self.done = false;
        self.white.shuffle();
        self.black.shuffle();
        for player in self.players.iter_mut().take(2) {
            player.deal(&self.settings, &mut self.white, &mut self.black);
        }
        self.next_up = 0;
        info!("game reset with {} players", self.players.len());
    }

    /// Returns whether the `done` flag flipped.
    pub fn set_goal(&mut self, goal: u8) -> bool {
        self.settings.goal_points = goal;
        let was_done = self.done;
        self.done = self.players.iter().any(|p| p.points >= goal);
        was_done != self.done
    }

    /// Returns whether any held hand was resized.
    pub fn set_hand_white_size(&mut self, size: u8) -> bool {
        self.settings.hand_white_size = size;
        let mut changed = false;
        for player in &mut self.players {
            changed |= resize_hand(&mut player.white, size.into(), &mut self.white);
        }
        changed
    }

    /// Returns whether any held hand was resized.
    pub fn set_hand_black_size(&mut self, size: u8) -> bool {
        self.settings.hand_black_size = size;
        let mut changed = false;
        for player in &mut self.players {
            changed |= resize_hand(&mut player.black, size.into(), &mut self.black);
        }
        changed
    }

    /// Returns whether a recorded fighter lost black cards.
    pub fn set_fighters_per_black(&mut self, count: u8) -> bool {
        self.settings.fighters_per_black = count;
        let count = usize::from(count);
        let mut changed = false;
        for fighter in &mut self.fighters {
            if fighter.black.len() > count {
                fighter.black.truncate(count);
                changed = true;
            }
        }
        changed
    }

    fn is_fighter(&self, seat: usize) -> bool {
        self.fighters.iter().any(|f| f.player == seat)
    }

    /// `(old, new)` counts, or `None` while a ballot is missing. Fighters
    /// don't vote on themselves unless nobody else is seated.
    fn tally(&self) -> Option<(usize, usize)> {
        let has_audience = (0..self.players.len()).any(|seat| !self.is_fighter(seat));
        let mut old = 0;
        let mut new = 0;
        for (seat, player) in self.players.iter().enumerate() {
            if has_audience && self.is_fighter(seat) {
                continue;
            }
            match player.vote? {
                Vote::Old => old += 1,
                Vote::New => new += 1,
            }
        }
        Some((old, new))
    }

    fn clear_votes(&mut self) {
        for player in &mut self.players {
            player.vote = None;
        }
    }

    fn increment_next_up(&mut self) {
        self.next_up = (self.next_up + 1) % self.players.len();
    }

    fn advance_next_up(&mut self) {
        self.increment_next_up();
        if self.is_fighter(self.next_up) {
            self.increment_next_up();
        }
        let seat = self.next_up;
        self.players[seat].deal(&self.settings, &mut self.white, &mut self.black);
        debug!("dealt seat {seat}");
    }
}

// Empty hands belong to players still waiting for a turn and stay empty.
fn resize_hand(hand: &mut Vec<String>, size: usize, deck: &mut Deck) -> bool {
    match hand.len() {
        0 => false,
        len if len < size => {
            hand.extend((len..size).map(|_| deck.draw()));
            true
        }
        len if len > size => {
            hand.truncate(size);
            true
        }
        _ => false,
    }
}
