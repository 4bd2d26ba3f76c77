use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use card_brawl::{
    CardColor, Deck, EventKind, GameState, Vote,
    hub::format_event,
};
use std::hint::black_box;

fn cards(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{prefix} card number {i}")).collect()
}

/// Helper to create a game with N seated players
fn setup_game_with_players(n_players: usize) -> GameState {
    let mut game = GameState::new(cards("white", 200), cards("black", 200)).unwrap();
    for i in 0..n_players {
        game.add_player(&format!("player{i}"));
    }
    game
}

/// Benchmark drawing through several deck passes, reshuffles included
fn bench_deck_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("deck_draw");
    for size in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut deck = Deck::new(CardColor::White, cards("white", size)).unwrap();
            b.iter(|| {
                for _ in 0..size * 3 {
                    black_box(deck.draw());
                }
            });
        });
    }
    group.finish();
}

/// Benchmark a full choose-and-vote round
fn bench_vote_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("vote_resolution");
    for n_players in [3, 6, 12] {
        group.bench_with_input(
            BenchmarkId::from_parameter(n_players),
            &n_players,
            |b, &n_players| {
                b.iter_batched(
                    || setup_game_with_players(n_players),
                    |mut game| {
                        game.choose(0, 1, &[1]).unwrap();
                        game.choose(1, 1, &[1]).unwrap();
                        for seat in 2..n_players {
                            game.vote(seat, Vote::New).unwrap();
                        }
                        black_box(game)
                    },
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }
    group.finish();
}

/// Benchmark snapshot serialization into an event frame
fn bench_update_frame(c: &mut Criterion) {
    let game = setup_game_with_players(8);
    c.bench_function("update_frame", |b| {
        b.iter(|| {
            let snapshot = game.snapshot();
            black_box(format_event(EventKind::Update, &snapshot).unwrap())
        });
    });
}

criterion_group!(deck_operations, bench_deck_draw);

criterion_group!(game_operations, bench_vote_resolution, bench_update_frame);

criterion_main!(deck_operations, game_operations);
