use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize, Serializer};
use std::{fmt, sync::Arc};
use thiserror::Error;

use super::constants::{
    DEFAULT_FIGHTERS_PER_BLACK, DEFAULT_GOAL_POINTS, DEFAULT_HAND_BLACK_SIZE,
    DEFAULT_HAND_WHITE_SIZE,
};

/// Raised when a game can't be built from the supplied card lists.
#[derive(Debug, Eq, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("{0} card list is empty")]
    EmptyCardList(CardColor),
}

/// The two card categories. White cards are prompts (one per fighter),
/// black cards are responses (`fighters_per_black` per fighter).
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardColor {
    White,
    Black,
}

impl fmt::Display for CardColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::White => "white",
            Self::Black => "black",
        };
        write!(f, "{repr}")
    }
}

/// An inexhaustible draw pile over a fixed list of card texts.
///
/// `order` is always a permutation of `0..values.len()` and `cursor` never
/// exceeds `order.len()`. Once every card of a pass has been drawn, the next
/// draw reshuffles and starts a new pass, so cards recur only across passes.
#[derive(Clone, Debug)]
pub struct Deck {
    color: CardColor,
    values: Arc<[String]>,
    order: Vec<usize>,
    cursor: usize,
}

impl Deck {
    pub fn new(color: CardColor, values: Vec<String>) -> Result<Self, ConfigurationError> {
        if values.is_empty() {
            return Err(ConfigurationError::EmptyCardList(color));
        }
        let order = (0..values.len()).collect();
        let mut deck = Self {
            color,
            values: values.into(),
            order,
            cursor: 0,
        };
        deck.shuffle();
        Ok(deck)
    }

    pub fn draw(&mut self) -> String {
        if self.cursor == self.order.len() {
            self.shuffle();
        }
        let card = self.values[self.order[self.cursor]].clone();
        self.cursor += 1;
        card
    }

    pub fn shuffle(&mut self) {
        self.order.shuffle(&mut rand::rng());
        self.cursor = 0;
    }

    #[must_use]
    pub fn color(&self) -> CardColor {
        self.color
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Cards left before the next reshuffle.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.order.len() - self.cursor
    }
}

/// A ballot in the current match-up.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Vote {
    /// Keep the streak holder (fighter 0).
    Old = 1,
    /// Crown the challenger (fighter 1).
    New = 2,
}

impl Vote {
    #[must_use]
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Vote {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Old),
            2 => Ok(Self::New),
            other => Err(other),
        }
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Old => "old",
            Self::New => "new",
        };
        write!(f, "{repr}")
    }
}

// Clients read `0` as "hasn't voted".
fn serialize_vote<S>(vote: &Option<Vote>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u8(vote.map_or(0, Vote::as_u8))
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Player {
    pub name: String,
    pub points: u8,
    #[serde(serialize_with = "serialize_vote")]
    pub vote: Option<Vote>,
    pub white: Vec<String>,
    pub black: Vec<String>,
}

impl Player {
    pub fn new(name: &str, settings: &Settings) -> Self {
        Self {
            name: name.to_string(),
            points: 0,
            vote: None,
            white: Vec::with_capacity(settings.hand_white_size.into()),
            black: Vec::with_capacity(settings.hand_black_size.into()),
        }
    }

    pub fn draw_white(&mut self, n: usize, deck: &mut Deck) {
        self.white.extend((0..n).map(|_| deck.draw()));
    }

    pub fn draw_black(&mut self, n: usize, deck: &mut Deck) {
        self.black.extend((0..n).map(|_| deck.draw()));
    }

    /// Throws away whatever the player holds and deals a full hand.
    pub fn deal(&mut self, settings: &Settings, white: &mut Deck, black: &mut Deck) {
        self.white.clear();
        self.black.clear();
        self.draw_white(settings.hand_white_size.into(), white);
        self.draw_black(settings.hand_black_size.into(), black);
    }

    /// Spends the chosen cards into a fighter. Choices are 1-based and must
    /// already be validated against the hand; the rest of the hand is discarded.
    pub fn play(&mut self, index: usize, white_choice: usize, black_choices: &[usize]) -> Fighter {
        let fighter = Fighter {
            player: index,
            white: self.white[white_choice - 1].clone(),
            black: black_choices
                .iter()
                .map(|&choice| self.black[choice - 1].clone())
                .collect(),
            tiebreak: None,
        };
        self.white.clear();
        self.black.clear();
        fighter
    }

    /// Back to a fresh seat: no points, no cards, no vote.
    pub fn reset(&mut self) {
        self.points = 0;
        self.vote = None;
        self.white.clear();
        self.black.clear();
    }

    #[must_use]
    pub fn has_hand(&self) -> bool {
        !self.white.is_empty() || !self.black.is_empty()
    }
}

/// One player's committed play in the current match-up.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Fighter {
    pub player: usize,
    pub white: String,
    pub black: Vec<String>,
    pub tiebreak: Option<String>,
}

/// Live-tunable game knobs.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Settings {
    pub goal_points: u8,
    pub fighters_per_black: u8,
    pub hand_white_size: u8,
    pub hand_black_size: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            goal_points: DEFAULT_GOAL_POINTS,
            fighters_per_black: DEFAULT_FIGHTERS_PER_BLACK,
            hand_white_size: DEFAULT_HAND_WHITE_SIZE,
            hand_black_size: DEFAULT_HAND_BLACK_SIZE,
        }
    }
}
