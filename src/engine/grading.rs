use icu_normalizer::ComposingNormalizerBorrowed;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::words::{Direction, WordPair};

pub const CHOICE_OPTION_COUNT: usize = 4;

/// Trim, NFC-compose and lowercase, so that visually identical input compares equal.
pub fn normalize(text: &str) -> String {
    let nfc = ComposingNormalizerBorrowed::new_nfc();
    nfc.normalize(text.trim()).to_lowercase()
}

/// Forward answers must match the target exactly (after normalization).
/// Reverse answers may match any of the comma-separated source synonyms.
pub fn grade(word: &WordPair, direction: Direction, answer: &str) -> bool {
    let answer = normalize(answer);
    if answer.is_empty() {
        return false;
    }
    match direction {
        Direction::Forward => normalize(&word.target) == answer,
        Direction::Reverse => word.source_synonyms().any(|s| normalize(s) == answer),
    }
}

/// Correct label plus up to three distractors taken from the other words of
/// the sequence, in random order.
pub fn generate_options<R: Rng>(
    sequence: &[WordPair],
    index: usize,
    direction: Direction,
    rng: &mut R,
) -> Vec<String> {
    let Some(current) = sequence.get(index) else {
        return Vec::new();
    };

    let mut others: Vec<usize> = (0..sequence.len()).filter(|&i| i != index).collect();
    others.shuffle(rng);

    let mut options: Vec<String> = Vec::with_capacity(CHOICE_OPTION_COUNT);
    options.push(current.option_label(direction).to_string());
    options.extend(
        others
            .into_iter()
            .take(CHOICE_OPTION_COUNT - 1)
            .map(|i| sequence[i].option_label(direction).to_string()),
    );
    options.shuffle(rng);
    options
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::words::{BundledWords, Difficulty, WordBank};

    fn pair(id: &str, source: &str, target: &str) -> WordPair {
        WordPair {
            id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            category: "Test".to_string(),
            difficulty: Difficulty::Medium,
        }
    }

    #[test]
    fn forward_is_case_insensitive_exact_match() {
        let word = pair("1", "точный", "accurate");
        assert!(grade(&word, Direction::Forward, "  Accurate "));
        assert!(grade(&word, Direction::Forward, "ACCURATE"));
        assert!(!grade(&word, Direction::Forward, "accurat"));
        assert!(!grade(&word, Direction::Forward, "accurate, precise"));
    }

    #[test]
    fn forward_does_not_split_target_on_commas() {
        let word = pair("1", "слово", "one, two");
        assert!(grade(&word, Direction::Forward, "one, two"));
        assert!(!grade(&word, Direction::Forward, "one"));
    }

    #[test]
    fn reverse_accepts_any_synonym() {
        let word = pair("2", "умный, высокоинтеллектуальный", "intelligent");
        assert!(grade(&word, Direction::Reverse, "Умный"));
        assert!(grade(&word, Direction::Reverse, " высокоинтеллектуальный"));
        assert!(!grade(&word, Direction::Reverse, "умный, высокоинтеллектуальный"));
        assert!(!grade(&word, Direction::Reverse, "intelligent"));
    }

    #[test]
    fn empty_answer_never_grades_correct() {
        let word = pair("3", " , ", "x");
        assert!(!grade(&word, Direction::Reverse, "   "));
        assert!(!grade(&word, Direction::Forward, ""));
    }

    #[test]
    fn decomposed_input_matches_composed_target() {
        // "й" typed as "и" + combining breve
        let word = pair("4", "мой", "mine");
        assert!(grade(&word, Direction::Reverse, "мои\u{0306}"));
    }

    #[test]
    fn options_have_one_correct_answer_and_skip_current_word() {
        let bank = BundledWords::load();
        let words = bank.list();
        for direction in [Direction::Forward, Direction::Reverse] {
            for index in 0..words.len() {
                let mut rng = SmallRng::seed_from_u64(index as u64);
                let options = generate_options(words, index, direction, &mut rng);
                assert_eq!(options.len(), CHOICE_OPTION_COUNT);
                let correct = options
                    .iter()
                    .filter(|o| grade(&words[index], direction, o))
                    .count();
                assert_eq!(correct, 1, "word {} {direction:?}: {options:?}", words[index].id);
                let prompt = words[index].prompt(direction);
                assert!(!options.iter().any(|o| o == prompt));
            }
        }
    }

    #[test]
    fn small_sequences_produce_fewer_options() {
        let words = vec![pair("a", "кот", "cat"), pair("b", "пёс", "dog")];
        let mut rng = SmallRng::seed_from_u64(7);
        let options = generate_options(&words, 0, Direction::Forward, &mut rng);
        assert_eq!(options.len(), 2);
        assert!(options.contains(&"cat".to_string()));
        assert!(options.contains(&"dog".to_string()));
    }

    #[test]
    fn options_are_deterministic_for_a_seed() {
        let bank = BundledWords::load();
        let a = generate_options(bank.list(), 3, Direction::Forward, &mut SmallRng::seed_from_u64(11));
        let b = generate_options(bank.list(), 3, Direction::Forward, &mut SmallRng::seed_from_u64(11));
        assert_eq!(a, b);
    }
}
