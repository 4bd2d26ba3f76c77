/// Points needed to finish a match.
pub const DEFAULT_GOAL_POINTS: u8 = 6;

/// Response cards each fighter commits alongside their prompt card.
pub const DEFAULT_FIGHTERS_PER_BLACK: u8 = 1;

/// Prompt cards dealt per hand.
pub const DEFAULT_HAND_WHITE_SIZE: u8 = 3;

/// Response cards dealt per hand.
pub const DEFAULT_HAND_BLACK_SIZE: u8 = 3;

/// A fighter holding the streak this many rounds clears the match-up.
pub const MAX_STREAK: u8 = 3;

/// Concurrent fighters in a match-up.
pub const MAX_FIGHTERS: usize = 2;

/// Longest accepted player name, in characters.
pub const MAX_NAME_LENGTH: usize = 32;

/// Seats reserved up front so the first few joins don't reallocate.
pub const EXPECTED_PLAYERS: usize = 6;
