//! Game action handlers.
//!
//! Each handler parses its form, then validates against and mutates the game
//! under one lock acquisition, so checks and the change see the same state.
//! Events go out after the lock is released.

use axum::{
    Form, Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Response,
};
use card_brawl::{EventKind, ResetKind, Vote};
use serde::Serialize;

use super::{
    AppState,
    cache::JsonCache,
    error::ApiError,
    validation::{self, FormFields, ValidationError},
};
use crate::metrics;

type FormPairs = Form<Vec<(String, String)>>;

#[derive(Debug, Serialize)]
pub struct JoinResponse {
    pub player_index: usize,
}

/// `POST /api/join`: seats a player, or finds their existing seat.
pub async fn join(
    State(state): State<AppState>,
    Form(form): FormPairs,
) -> Result<Json<JoinResponse>, ApiError> {
    let fields = FormFields::new(form);
    let name = validation::player_name(fields.string("name")?)?;

    let (player_index, snapshot) = {
        let mut game = state.game.lock().await;
        let seated = game.players().len();
        let index = game.add_player(name);
        let snapshot = (game.players().len() > seated).then(|| game.snapshot());
        (index, snapshot)
    };

    metrics::game_actions_total("join");
    if let Some(snapshot) = snapshot {
        tracing::info!(player = player_index, "{name} joined");
        state.publish(EventKind::Update, &snapshot).await;
    }
    Ok(Json(JoinResponse { player_index }))
}

/// `POST /api/choose`: commits a player's cards as a fighter.
pub async fn choose(
    State(state): State<AppState>,
    Form(form): FormPairs,
) -> Result<StatusCode, ApiError> {
    let fields = FormFields::new(form);

    let snapshot = {
        let mut game = state.game.lock().await;
        let player = validation::player_index(&fields, game.players().len())?;

        let hand = &game.players()[player];
        if !hand.has_hand() {
            return Err(ValidationError::malformed("player", "has no cards to play").into());
        }
        let white = fields.number("white", 1..=hand.white.len())?;
        let expected = usize::from(game.settings().fighters_per_black);
        let black = fields.numbers("black", 1..=hand.black.len(), expected)?;
        validation::ensure_distinct("black", &black)?;

        game.choose(player, white, &black)?;
        game.snapshot()
    };

    metrics::game_actions_total("choose");
    state.publish(EventKind::Update, &snapshot).await;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/vote`: records a ballot; `fighter` 1 backs the streak holder,
/// 2 the challenger.
pub async fn vote(
    State(state): State<AppState>,
    Form(form): FormPairs,
) -> Result<StatusCode, ApiError> {
    let fields = FormFields::new(form);

    let (outcome, snapshot) = {
        let mut game = state.game.lock().await;
        let player = validation::player_index(&fields, game.players().len())?;
        let fighter: u8 = fields.number("fighter", 1..=2)?;
        let vote = Vote::try_from(fighter)
            .map_err(|value| ValidationError::malformed("fighter", format!("unknown vote {value}")))?;

        let outcome = game.vote(player, vote)?;
        (outcome, game.snapshot())
    };

    metrics::game_actions_total("vote");
    if outcome.votes_cleared() {
        state.publish(EventKind::Reset, &ResetKind::Votes).await;
    }
    state.publish(EventKind::Update, &snapshot).await;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/reset`: starts a new match with the same seats.
pub async fn reset(State(state): State<AppState>) -> StatusCode {
    let snapshot = {
        let mut game = state.game.lock().await;
        game.reset();
        game.snapshot()
    };

    metrics::game_actions_total("reset");
    state.publish(EventKind::Reset, &ResetKind::Game).await;
    state.publish(EventKind::Update, &snapshot).await;
    StatusCode::NO_CONTENT
}

/// `GET /api/game`: current snapshot with a content-derived ETag.
pub async fn get_game(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let snapshot = state.game.lock().await.snapshot();
    let cache = JsonCache::new(&snapshot)?;
    Ok(cache.respond(&headers))
}

/// `PATCH /api/game`: changes any subset of the settings.
pub async fn update_settings(
    State(state): State<AppState>,
    Form(form): FormPairs,
) -> Result<StatusCode, ApiError> {
    let fields = FormFields::new(form);

    let (settings, snapshot) = {
        let mut game = state.game.lock().await;
        let goal_points = fields.optional_number::<u8>("goal_points", 1..=u8::MAX)?;
        let fighters_per_black = fields.optional_number::<u8>("fighters_per_black", 1..=u8::MAX)?;
        let hand_white_size = fields.optional_number::<u8>("hand_white_size", 1..=u8::MAX)?;
        let hand_black_size = fields.optional_number::<u8>("hand_black_size", 1..=u8::MAX)?;

        let current = *game.settings();
        let black_needed = fighters_per_black.unwrap_or(current.fighters_per_black);
        let black_held = hand_black_size.unwrap_or(current.hand_black_size);
        if black_needed > black_held {
            return Err(ValidationError::malformed(
                "fighters_per_black",
                format!("can't exceed hand_black_size ({black_held})"),
            )
            .into());
        }

        let mut changed = false;
        if let Some(goal) = goal_points {
            changed |= game.set_goal(goal);
        }
        if let Some(size) = hand_white_size {
            changed |= game.set_hand_white_size(size);
        }
        if let Some(size) = hand_black_size {
            changed |= game.set_hand_black_size(size);
        }
        if let Some(count) = fighters_per_black {
            changed |= game.set_fighters_per_black(count);
        }

        (*game.settings(), changed.then(|| game.snapshot()))
    };

    metrics::game_actions_total("settings");
    tracing::info!(?settings, "Settings updated");
    state.publish(EventKind::Settings, &settings).await;
    if let Some(snapshot) = snapshot {
        state.publish(EventKind::Update, &snapshot).await;
    }
    Ok(StatusCode::NO_CONTENT)
}
