//! Form parameter validation.
//!
//! Request bodies arrive as `application/x-www-form-urlencoded` pairs. Keys
//! may repeat (`black=1&black=3`), so the raw pair list is kept and looked up
//! by key. Every failure maps to a `422` with a plain-text message.

use card_brawl::constants::MAX_NAME_LENGTH;
use std::{collections::HashSet, fmt::Display, hash::Hash, ops::RangeInclusive, str::FromStr};
use thiserror::Error;

#[derive(Debug, Eq, Error, PartialEq)]
pub enum ValidationError {
    #[error("Missing parameter: {0}")]
    Missing(String),

    #[error("{key}: {reason}")]
    Malformed { key: String, reason: String },

    #[error("{key}: should be in range {min}-{max}")]
    OutOfRange {
        key: String,
        min: String,
        max: String,
    },

    #[error("{key}: expected {expected} values, got {got}")]
    WrongCount {
        key: String,
        expected: usize,
        got: usize,
    },

    #[error("{key}: {value} chosen more than once")]
    Duplicate { key: String, value: String },
}

impl ValidationError {
    pub fn malformed(key: &str, reason: impl Display) -> Self {
        Self::Malformed {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Decoded form body.
#[derive(Debug, Clone, Default)]
pub struct FormFields(Vec<(String, String)>);

impl FormFields {
    #[must_use]
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }

    fn values<'a, 'k>(&'a self, key: &'k str) -> impl Iterator<Item = &'a str> + use<'a, 'k> {
        self.0
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values(key).next().is_some()
    }

    /// First value for `key`.
    pub fn string(&self, key: &str) -> Result<&str, ValidationError> {
        self.values(key)
            .next()
            .ok_or_else(|| ValidationError::Missing(key.to_string()))
    }

    /// First value for `key` parsed as a number within `range`.
    pub fn number<T>(&self, key: &str, range: RangeInclusive<T>) -> Result<T, ValidationError>
    where
        T: FromStr + PartialOrd + Display,
        T::Err: Display,
    {
        parse_in_range(key, self.string(key)?, &range)
    }

    /// Like [`FormFields::number`], but `None` when the key is absent.
    pub fn optional_number<T>(
        &self,
        key: &str,
        range: RangeInclusive<T>,
    ) -> Result<Option<T>, ValidationError>
    where
        T: FromStr + PartialOrd + Display,
        T::Err: Display,
    {
        if self.contains(key) {
            self.number(key, range).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Exactly `count` values for `key`, each within `range`.
    pub fn numbers<T>(
        &self,
        key: &str,
        range: RangeInclusive<T>,
        count: usize,
    ) -> Result<Vec<T>, ValidationError>
    where
        T: FromStr + PartialOrd + Display,
        T::Err: Display,
    {
        let raw: Vec<&str> = self.values(key).collect();
        if raw.len() != count {
            return Err(ValidationError::WrongCount {
                key: key.to_string(),
                expected: count,
                got: raw.len(),
            });
        }
        raw.into_iter()
            .map(|value| parse_in_range(key, value, &range))
            .collect()
    }
}

fn parse_in_range<T>(key: &str, raw: &str, range: &RangeInclusive<T>) -> Result<T, ValidationError>
where
    T: FromStr + PartialOrd + Display,
    T::Err: Display,
{
    let value: T = raw
        .trim()
        .parse()
        .map_err(|e| ValidationError::malformed(key, e))?;
    if !range.contains(&value) {
        return Err(ValidationError::OutOfRange {
            key: key.to_string(),
            min: range.start().to_string(),
            max: range.end().to_string(),
        });
    }
    Ok(value)
}

/// Seat index for a game with `player_count` seats.
pub fn player_index(fields: &FormFields, player_count: usize) -> Result<usize, ValidationError> {
    let Some(last) = player_count.checked_sub(1) else {
        return Err(ValidationError::malformed("player", "nobody has joined yet"));
    };
    fields.number("player", 0..=last)
}

/// Trimmed display name, 1 to [`MAX_NAME_LENGTH`] characters.
pub fn player_name(raw: &str) -> Result<&str, ValidationError> {
    let name = raw.trim();
    let length = name.chars().count();
    if length == 0 || length > MAX_NAME_LENGTH {
        return Err(ValidationError::OutOfRange {
            key: "name length".to_string(),
            min: "1".to_string(),
            max: MAX_NAME_LENGTH.to_string(),
        });
    }
    Ok(name)
}

pub fn ensure_distinct<T>(key: &str, values: &[T]) -> Result<(), ValidationError>
where
    T: Eq + Hash + Display,
{
    let mut seen = HashSet::with_capacity(values.len());
    match values.iter().find(|value| !seen.insert(*value)) {
        Some(value) => Err(ValidationError::Duplicate {
            key: key.to_string(),
            value: value.to_string(),
        }),
        None => Ok(()),
    }
}
