//! Uniform shuffling for the question bank and for each question's options.
//!
//! Both rely on `SliceRandom::shuffle`, which is a Fisher–Yates shuffle, so every
//! permutation is equally likely given a uniform source of randomness.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::{PresentedOption, Question};

/// Produce the options of `question` in a random order, each tagged with
/// whether it is the correct answer.
///
/// The question itself is left untouched. A one-option question yields a single
/// correct entry.
pub fn present_options<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> Vec<PresentedOption> {
    let mut presented = present_in_order(question);
    presented.shuffle(rng);
    presented
}

/// Options in their original order, for sessions that do not shuffle.
#[must_use]
pub fn present_in_order(question: &Question) -> Vec<PresentedOption> {
    question
        .options()
        .iter()
        .enumerate()
        .map(|(idx, text)| PresentedOption {
            text: text.clone(),
            is_correct: idx == question.correct_index(),
            source_index: idx,
        })
        .collect()
}

/// A uniformly random permutation of `0..len`.
pub fn shuffled_order<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    order.shuffle(rng);
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionDraft;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::{BTreeSet, HashMap};

    fn question() -> Question {
        QuestionDraft::new("Pick c", ["a", "b", "c", "d"], 2)
            .validate()
            .unwrap()
    }

    #[test]
    fn presentation_keeps_option_set_and_single_correct_flag() {
        let q = question();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let presented = present_options(&q, &mut rng);
            assert_eq!(presented.iter().filter(|o| o.is_correct).count(), 1);

            let texts: BTreeSet<_> = presented.iter().map(|o| o.text.as_str()).collect();
            let source: BTreeSet<_> = q.options().iter().map(String::as_str).collect();
            assert_eq!(texts, source);

            let correct = presented.iter().find(|o| o.is_correct).unwrap();
            assert_eq!(correct.text, "c");
            assert_eq!(correct.source_index, 2);
        }
        assert_eq!(q.options(), ["a", "b", "c", "d"]);
    }

    #[test]
    fn every_permutation_of_three_options_shows_up() {
        let q = QuestionDraft::new("Q", ["x", "y", "z"], 0).validate().unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen: HashMap<Vec<usize>, usize> = HashMap::new();
        for _ in 0..6_000 {
            let order = present_options(&q, &mut rng)
                .iter()
                .map(|o| o.source_index)
                .collect();
            *seen.entry(order).or_default() += 1;
        }
        assert_eq!(seen.len(), 6);
        // Each permutation expects ~1000 hits; a biased shuffle lands far outside this band.
        for count in seen.values() {
            assert!((800..=1200).contains(count), "skewed count {count}");
        }
    }

    #[test]
    fn single_option_question_presents_one_correct_entry() {
        let q = QuestionDraft::new("Only", ["yes"], 0).validate().unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let presented = present_options(&q, &mut rng);
        assert_eq!(presented.len(), 1);
        assert!(presented[0].is_correct);
    }

    #[test]
    fn shuffled_order_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut order = shuffled_order(10, &mut rng);
        order.sort_unstable();
        assert_eq!(order, (0..10).collect::<Vec<_>>());
        assert!(shuffled_order(0, &mut rng).is_empty());
    }

    #[test]
    fn in_order_presentation_matches_source() {
        let q = question();
        let presented = present_in_order(&q);
        let texts: Vec<_> = presented.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(texts, ["a", "b", "c", "d"]);
        assert!(presented[2].is_correct);
    }
}
