//! Card list loading.
//!
//! Cards live in `<assets>/cards/white.txt` and `<assets>/cards/black.txt`,
//! one card per line. Blank lines are skipped.

use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CardSourceError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} contains no cards", path.display())]
    Empty { path: PathBuf },
}

/// Both card lists, ready for `GameState::new`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSet {
    pub white: Vec<String>,
    pub black: Vec<String>,
}

pub fn load_cards(cards_dir: &Path) -> Result<CardSet, CardSourceError> {
    let white = load_card_file(&cards_dir.join("white.txt"))?;
    let black = load_card_file(&cards_dir.join("black.txt"))?;
    tracing::info!(
        white = white.len(),
        black = black.len(),
        "Loaded cards from {}",
        cards_dir.display()
    );
    Ok(CardSet { white, black })
}

fn load_card_file(path: &Path) -> Result<Vec<String>, CardSourceError> {
    let contents = fs::read_to_string(path).map_err(|source| CardSourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let cards: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    if cards.is_empty() {
        return Err(CardSourceError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(cards)
}
