/// Integration tests for game flow scenarios
///
/// These tests drive a full game through the public API: joining, choosing,
/// voting, streak rotation, tiebreaks, the goal and live settings changes.
use card_brawl::{GameError, GameState, Phase, Settings, Vote, VoteOutcome};

fn cards(prefix: &str, n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("{prefix}{i}")).collect()
}

fn new_game() -> GameState {
    GameState::new(cards("W", 40), cards("B", 40)).unwrap()
}

fn seat_all(game: &mut GameState, names: &[&str]) -> Vec<usize> {
    names.iter().map(|name| game.add_player(name)).collect()
}

#[test]
fn test_two_player_match_up() {
    let mut game = new_game();
    let alice = game.add_player("Alice");
    let bob = game.add_player("Bob");

    assert_eq!((alice, bob), (0, 1));
    assert_eq!(game.players()[alice].white.len(), 3);
    assert_eq!(game.players()[bob].white.len(), 3);
    assert_eq!(game.phase(), Phase::Choosing);

    let bob_white = game.players()[bob].white[0].clone();
    let bob_black = game.players()[bob].black[1].clone();

    game.choose(alice, 1, &[1]).unwrap();
    game.choose(bob, 1, &[2]).unwrap();
    assert_eq!(game.phase(), Phase::Voting);

    assert_eq!(game.vote(alice, Vote::New), Ok(VoteOutcome::Pending));
    assert_eq!(game.vote(bob, Vote::New), Ok(VoteOutcome::Resolved));

    assert_eq!(game.streak(), 1);
    assert_eq!(game.fighters().len(), 1);
    assert_eq!(game.fighters()[0].player, bob);
    assert_eq!(game.fighters()[0].white, bob_white);
    assert_eq!(game.fighters()[0].black, vec![bob_black]);
    assert_eq!(game.players()[bob].points, 1);
    assert_eq!(game.players()[alice].points, 0);

    // Alice is next up and holds a fresh hand.
    assert_eq!(game.players()[alice].white.len(), 3);
    assert_eq!(game.players()[alice].black.len(), 3);
    assert!(game.players().iter().all(|p| p.vote.is_none()));
}

#[test]
fn test_streak_rotation_and_clear() {
    let mut game = new_game();
    let seats = seat_all(&mut game, &["Alice", "Bob", "Carol"]);
    let (alice, bob, carol) = (seats[0], seats[1], seats[2]);

    // Round 1: Alice holds against Bob.
    game.choose(alice, 1, &[1]).unwrap();
    game.choose(bob, 1, &[1]).unwrap();
    assert_eq!(game.vote(carol, Vote::Old), Ok(VoteOutcome::Resolved));
    assert_eq!(game.streak(), 1);
    assert!(game.players()[carol].has_hand());

    // Round 2: Carol challenges, Bob votes.
    game.choose(carol, 2, &[3]).unwrap();
    assert_eq!(game.vote(bob, Vote::Old), Ok(VoteOutcome::Resolved));
    assert_eq!(game.streak(), 2);
    // Alice is fighting, so Bob is dealt in instead.
    assert!(game.players()[bob].has_hand());

    // Round 3: third straight win clears the match-up.
    game.choose(bob, 3, &[2]).unwrap();
    assert_eq!(game.vote(carol, Vote::Old), Ok(VoteOutcome::Resolved));

    assert_eq!(game.players()[alice].points, 3);
    assert_eq!(game.streak(), 0);
    assert!(game.fighters().is_empty());
    assert_eq!(game.phase(), Phase::Choosing);
    assert!(game.players()[carol].has_hand());
    assert!(game.players()[alice].has_hand());
}

#[test]
fn test_tiebreak_then_resolution() {
    let mut game = new_game();
    let seats = seat_all(&mut game, &["Alice", "Bob", "Carol", "Dave"]);

    game.choose(seats[0], 1, &[1]).unwrap();
    game.choose(seats[1], 1, &[1]).unwrap();

    assert_eq!(game.vote(seats[2], Vote::Old), Ok(VoteOutcome::Pending));
    assert_eq!(game.vote(seats[3], Vote::New), Ok(VoteOutcome::Tiebreak));
    assert_eq!(game.phase(), Phase::TieBreak);
    assert!(game.fighters().iter().all(|f| f.tiebreak.is_some()));
    assert!(game.players().iter().all(|p| p.points == 0));
    assert!(game.players().iter().all(|p| p.vote.is_none()));

    game.vote(seats[2], Vote::New).unwrap();
    assert_eq!(game.vote(seats[3], Vote::New), Ok(VoteOutcome::Resolved));

    assert_eq!(game.fighters().len(), 1);
    assert_eq!(game.fighters()[0].player, seats[1]);
    assert_eq!(game.fighters()[0].tiebreak, None);
    assert_eq!(game.players()[seats[1]].points, 1);
}

#[test]
fn test_game_finishes_at_goal() {
    let settings = Settings {
        goal_points: 2,
        ..Settings::default()
    };
    let mut game = new_game().with_settings(settings);
    let seats = seat_all(&mut game, &["Alice", "Bob", "Carol"]);

    game.choose(seats[0], 1, &[1]).unwrap();
    game.choose(seats[1], 1, &[1]).unwrap();
    game.vote(seats[2], Vote::Old).unwrap();
    assert!(!game.is_done());

    game.choose(seats[2], 1, &[1]).unwrap();
    game.vote(seats[1], Vote::Old).unwrap();

    assert!(game.is_done());
    assert_eq!(game.phase(), Phase::Finished);
    assert_eq!(game.players()[seats[0]].points, 2);

    // Raising the goal reopens the game.
    assert!(game.set_goal(5));
    assert!(!game.is_done());
}

#[test]
fn test_reset_mid_game() {
    let mut game = new_game();
    let seats = seat_all(&mut game, &["Alice", "Bob", "Carol"]);
    game.choose(seats[0], 1, &[1]).unwrap();
    game.choose(seats[1], 1, &[1]).unwrap();
    game.vote(seats[2], Vote::New).unwrap();

    game.reset();

    assert_eq!(game.players().len(), 3);
    assert!(game.fighters().is_empty());
    assert_eq!(game.streak(), 0);
    assert!(game.players().iter().all(|p| p.points == 0));
    assert!(game.players()[seats[0]].has_hand());
    assert!(game.players()[seats[1]].has_hand());
    assert!(!game.players()[seats[2]].has_hand());

    // Known names keep their seats.
    assert_eq!(game.add_player("Carol"), seats[2]);
}

#[test]
fn test_settings_reshape_live_hands() {
    let mut game = new_game();
    let seats = seat_all(&mut game, &["Alice", "Bob", "Carol"]);

    assert!(game.set_hand_white_size(5));
    assert!(game.set_hand_black_size(2));
    assert_eq!(game.players()[seats[0]].white.len(), 5);
    assert_eq!(game.players()[seats[0]].black.len(), 2);
    assert!(!game.players()[seats[2]].has_hand());

    assert!(!game.set_fighters_per_black(2));
    game.choose(seats[0], 5, &[2, 1]).unwrap();
    assert_eq!(game.fighters()[0].black.len(), 2);

    assert!(game.set_fighters_per_black(1));
    assert_eq!(game.fighters()[0].black.len(), 1);
}

#[test]
fn test_contract_errors_surface() {
    let mut game = new_game();
    let seats = seat_all(&mut game, &["Alice", "Bob", "Carol"]);

    assert_eq!(game.vote(seats[2], Vote::Old), Err(GameError::NoMatchUp));
    assert_eq!(
        game.choose(7, 1, &[1]),
        Err(GameError::InvalidPlayerIndex(7))
    );

    game.choose(seats[0], 1, &[1]).unwrap();
    game.choose(seats[1], 1, &[1]).unwrap();
    assert_eq!(game.choose(seats[2], 1, &[1]), Err(GameError::MatchUpFull));
}
