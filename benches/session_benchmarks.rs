use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use vocab_quest::engine::grading::{generate_options, grade};
use vocab_quest::session::{Answer, Event, Game, GameMode};
use vocab_quest::words::{BundledWords, Direction, WordBank, WordPair};

fn bank() -> Vec<WordPair> {
    BundledWords::load().list().to_vec()
}

/// Play a typed session to the end, answering every round correctly.
fn play_through(words: &[WordPair], seed: u64) -> Game {
    let mut game = Game::default()
        .apply(Event::Start {
            mode: GameMode::TranslateForward,
            words: words.to_vec(),
            seed,
            best_streak: 0,
        })
        .map(|t| t.state)
        .unwrap_or_default();

    while let Some(session) = game.session().filter(|s| s.outcome.is_none()) {
        let Some(word) = session.current_word() else {
            break;
        };
        let answer = word.answer(session.direction()).to_string();
        let Ok(t) = game.apply(Event::Submit(Answer::Typed(answer))) else {
            break;
        };
        let token = match t.state.session() {
            Some(s) => s.token(),
            None => break,
        };
        game = match t.state.apply(Event::Advance(token)) {
            Ok(t) => t.state,
            Err(_) => break,
        };
    }
    game
}

fn bench_full_session(c: &mut Criterion) {
    let words = bank();
    c.bench_function("typed session (25 rounds)", |b| {
        b.iter(|| play_through(black_box(&words), 42))
    });
}

fn bench_grading(c: &mut Criterion) {
    let words = bank();
    let word = &words[0];
    let typed = format!("  {}  ", word.primary_source().to_uppercase());

    c.bench_function("grade reverse with synonyms", |b| {
        b.iter(|| grade(black_box(word), Direction::Reverse, black_box(&typed)))
    });
}

fn bench_options(c: &mut Criterion) {
    let words = bank();
    let mut rng = SmallRng::seed_from_u64(7);

    c.bench_function("generate_options (25 words)", |b| {
        b.iter(|| generate_options(black_box(&words), 12, Direction::Forward, &mut rng))
    });
}

criterion_group!(benches, bench_full_session, bench_grading, bench_options);
criterion_main!(benches);
