//! Quiz generation and grading.
//!
//! Every function here is pure apart from the random source it is handed,
//! so a seeded generator reproduces a quiz exactly.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{QuestionKind, ScoreSummary, TestQuestion, Word};

/// Questions per quiz unless configured otherwise.
pub const DEFAULT_QUESTION_COUNT: usize = 10;

/// Wrong options offered next to the correct answer.
pub const DISTRACTOR_COUNT: usize = 3;

/// Submitted answers keyed by question index.
pub type Answers = HashMap<usize, String>;

/// Return a uniformly shuffled copy of `items`, leaving the input untouched.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    // Fisher-Yates from the last index down.
    shuffled.shuffle(rng);
    shuffled
}

/// Build one question for `target`.
///
/// Distractors are the first [`DISTRACTOR_COUNT`] words of `pool` (in pool
/// order) whose spelling differs from the target. A small pool yields fewer
/// options rather than an error.
pub fn generate_question<R: Rng + ?Sized>(
    kind: QuestionKind,
    target: &Word,
    pool: &[Word],
    rng: &mut R,
) -> TestQuestion {
    let mut options = Vec::with_capacity(DISTRACTOR_COUNT + 1);
    options.push(target.english.clone());
    options.extend(
        pool.iter()
            .filter(|w| w.english != target.english)
            .take(DISTRACTOR_COUNT)
            .map(|w| w.english.clone()),
    );

    TestQuestion {
        kind,
        word: target.clone(),
        options: shuffle(&options, rng),
        correct_answer: target.english.clone(),
    }
}

/// Kind of the question at position `index`: position 0 and every odd
/// position are listening questions, other even positions are word matches.
pub fn kind_for_index(index: usize) -> QuestionKind {
    if index == 0 || index % 2 == 1 {
        QuestionKind::ListenAndChoose
    } else {
        QuestionKind::WordPictureMatch
    }
}

/// Assemble a quiz of `min(question_count, words.len())` questions.
///
/// Targets are a shuffled selection of `words`; distractors always come from
/// the full `words` list. An empty word list gives an empty quiz.
pub fn build_quiz<R: Rng + ?Sized>(
    words: &[Word],
    question_count: usize,
    rng: &mut R,
) -> Vec<TestQuestion> {
    if words.is_empty() {
        return Vec::new();
    }

    let selected = shuffle(words, rng);
    selected
        .iter()
        .take(question_count)
        .enumerate()
        .map(|(i, word)| generate_question(kind_for_index(i), word, words, rng))
        .collect()
}

/// Grade `questions` against `answers`. Unanswered questions count as wrong.
pub fn score(questions: &[TestQuestion], answers: &Answers) -> ScoreSummary {
    let mut summary = ScoreSummary {
        total: questions.len(),
        ..Default::default()
    };

    for (i, question) in questions.iter().enumerate() {
        match answers.get(&i) {
            Some(answer) if question.is_correct(answer) => summary.correct += 1,
            _ => summary.wrong_words.push(question.word.clone()),
        }
    }

    if summary.total > 0 {
        summary.percentage =
            (100.0 * summary.correct as f64 / summary.total as f64).round() as u32;
    }
    summary
}

/// Stars earned for a quiz percentage.
pub fn stars_for(percentage: u32) -> u32 {
    match percentage {
        p if p >= 90 => 3,
        p if p >= 70 => 2,
        p if p >= 50 => 1,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn words(names: &[&str]) -> Vec<Word> {
        names.iter().map(|n| Word::new(*n, format!("{}-zh", n))).collect()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn sorted<T: Ord + Clone>(items: &[T]) -> Vec<T> {
        let mut v = items.to_vec();
        v.sort();
        v
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let input: Vec<u32> = (0..50).chain(0..10).collect();
        let out = shuffle(&input, &mut rng());
        assert_eq!(out.len(), input.len());
        assert_eq!(sorted(&out), sorted(&input));
    }

    #[test]
    fn test_shuffle_empty_and_single() {
        let empty: Vec<u8> = Vec::new();
        assert!(shuffle(&empty, &mut rng()).is_empty());
        assert_eq!(shuffle(&["only"], &mut rng()), vec!["only"]);
    }

    #[test]
    fn test_shuffle_is_deterministic_for_a_seed() {
        let input: Vec<u32> = (0..20).collect();
        let a = shuffle(&input, &mut StdRng::seed_from_u64(42));
        let b = shuffle(&input, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_question_takes_first_three_distractors() {
        let pool = words(&["met", "above", "ground", "those", "us"]);
        let q = generate_question(QuestionKind::ListenAndChoose, &pool[1], &pool, &mut rng());

        assert_eq!(q.kind, QuestionKind::ListenAndChoose);
        assert_eq!(q.correct_answer, "above");
        assert_eq!(q.word, pool[1]);
        assert_eq!(
            sorted(&q.options),
            sorted(&["above", "met", "ground", "those"].map(String::from))
        );
    }

    #[test]
    fn test_question_options_are_unique_and_contain_answer_once() {
        let pool = words(&["a", "b", "c", "d", "e", "f"]);
        let mut r = rng();
        for target in &pool {
            let q = generate_question(QuestionKind::WordPictureMatch, target, &pool, &mut r);
            assert_eq!(q.options.len(), 4);
            assert_eq!(q.options.iter().filter(|o| **o == q.correct_answer).count(), 1);
            let mut deduped = sorted(&q.options);
            deduped.dedup();
            assert_eq!(deduped.len(), q.options.len());
        }
    }

    #[test]
    fn test_question_with_small_pool_has_fewer_options() {
        let pool = words(&["cat", "dog"]);
        let q = generate_question(QuestionKind::ListenAndChoose, &pool[0], &pool, &mut rng());
        assert_eq!(sorted(&q.options), vec!["cat".to_string(), "dog".to_string()]);

        let alone = words(&["cat"]);
        let q = generate_question(QuestionKind::ListenAndChoose, &alone[0], &alone, &mut rng());
        assert_eq!(q.options, vec!["cat".to_string()]);
    }

    #[test]
    fn test_build_quiz_size_bound() {
        let pool = words(&["a", "b", "c", "d", "e", "f", "g"]);
        assert_eq!(build_quiz(&pool, 10, &mut rng()).len(), 7);
        assert_eq!(build_quiz(&pool, 5, &mut rng()).len(), 5);
        assert!(build_quiz(&[], 10, &mut rng()).is_empty());
    }

    #[test]
    fn test_build_quiz_kind_sequence() {
        use QuestionKind::{ListenAndChoose as L, WordPictureMatch as P};

        let pool = words(&["a", "b", "c", "d", "e", "f", "g"]);
        let kinds: Vec<_> = build_quiz(&pool, 5, &mut rng()).iter().map(|q| q.kind).collect();
        assert_eq!(kinds, vec![L, L, P, L, P]);
    }

    #[test]
    fn test_build_quiz_targets_are_distinct_and_from_unit() {
        let pool = words(&["a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l"]);
        let quiz = build_quiz(&pool, 10, &mut rng());
        let mut targets: Vec<_> = quiz.iter().map(|q| q.correct_answer.clone()).collect();
        targets.sort();
        targets.dedup();
        assert_eq!(targets.len(), 10);
        assert!(quiz.iter().all(|q| pool.contains(&q.word)));
    }

    #[test]
    fn test_build_quiz_draws_distractors_from_full_list() {
        // With two targets chosen from four words, the leading catalog words
        // still appear as distractors even when they are not targets.
        let pool = words(&["a", "b", "c", "d"]);
        for q in build_quiz(&pool, 2, &mut rng()) {
            assert_eq!(q.options.len(), 4);
            assert_eq!(sorted(&q.options), sorted(&["a", "b", "c", "d"].map(String::from)));
        }
    }

    #[test]
    fn test_build_quiz_is_reproducible() {
        let pool = words(&["a", "b", "c", "d", "e", "f"]);
        let a = build_quiz(&pool, 4, &mut StdRng::seed_from_u64(99));
        let b = build_quiz(&pool, 4, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    fn question(answer: &str) -> TestQuestion {
        TestQuestion {
            kind: QuestionKind::ListenAndChoose,
            word: Word::new(answer, "zh"),
            options: vec![answer.to_string()],
            correct_answer: answer.to_string(),
        }
    }

    #[test]
    fn test_score_counts_right_and_wrong() {
        let questions = vec![question("cat"), question("dog")];
        let answers = Answers::from([(0, "cat".to_string()), (1, "fox".to_string())]);

        let summary = score(&questions, &answers);
        assert_eq!(summary.correct, 1);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.percentage, 50);
        assert_eq!(summary.wrong_words, vec![questions[1].word.clone()]);
    }

    #[test]
    fn test_score_unanswered_counts_wrong() {
        let summary = score(&[question("cat")], &Answers::new());
        assert_eq!(summary.correct, 0);
        assert_eq!(summary.total, 1);
        assert_eq!(summary.percentage, 0);
        assert_eq!(summary.wrong_words.len(), 1);
    }

    #[test]
    fn test_score_empty_quiz() {
        assert_eq!(score(&[], &Answers::new()), ScoreSummary::default());
    }

    #[test]
    fn test_score_rounds_percentage() {
        let questions = vec![question("a"), question("b"), question("c")];
        let answers = Answers::from([(0, "a".to_string()), (1, "b".to_string())]);
        let summary = score(&questions, &answers);
        assert_eq!(summary.percentage, 67);
        assert_eq!(summary.correct + summary.wrong_words.len(), summary.total);
    }

    #[test]
    fn test_stars_boundaries() {
        assert_eq!(stars_for(100), 3);
        assert_eq!(stars_for(90), 3);
        assert_eq!(stars_for(89), 2);
        assert_eq!(stars_for(70), 2);
        assert_eq!(stars_for(69), 1);
        assert_eq!(stars_for(50), 1);
        assert_eq!(stars_for(49), 0);
        assert_eq!(stars_for(0), 0);
        assert_eq!(stars_for(250), 3);
    }
}
