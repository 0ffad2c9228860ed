//! Multiple-choice quiz
//!
//! The first click locks in an answer; later clicks are ignored. The quiz
//! has no link to the physics model.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

/// Value of `data-answer` marking the right option
pub const CORRECT_MARKER: &str = "correct";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOption {
    pub label: String,
    pub correct: bool,
}

impl QuizOption {
    /// `data-answer` value for this option's element, `None` to drop it
    pub fn answer_attribute(&self) -> Option<&'static str> {
        self.correct.then_some(CORRECT_MARKER)
    }
}

/// What the page shows once an option is chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOutcome {
    pub chosen: usize,
    /// Index of the option to highlight as correct, if the quiz has one
    pub correct_index: Option<usize>,
    pub is_correct: bool,
    pub feedback: &'static str,
}

#[derive(Debug, Clone)]
pub struct Quiz {
    options: Vec<QuizOption>,
    answer: Option<usize>,
}

impl Quiz {
    pub fn new(options: Vec<QuizOption>) -> Self {
        Self {
            options,
            answer: None,
        }
    }

    /// Build from `(label, data-answer)` pairs as found in the page markup
    pub fn from_answers<'a, I>(options: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    {
        Self::new(
            options
                .into_iter()
                .map(|(label, answer)| QuizOption {
                    label: label.to_owned(),
                    correct: answer == Some(CORRECT_MARKER),
                })
                .collect(),
        )
    }

    /// Reorder options reproducibly for a given seed. Only allowed before
    /// an answer is locked in.
    pub fn shuffle(&mut self, seed: u64) {
        if self.answer.is_some() {
            return;
        }
        let mut rng = Pcg32::seed_from_u64(seed);
        self.options.shuffle(&mut rng);
    }

    pub fn options(&self) -> &[QuizOption] {
        &self.options
    }

    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| o.correct)
    }

    pub fn is_locked(&self) -> bool {
        self.answer.is_some()
    }

    pub fn answer(&self) -> Option<usize> {
        self.answer
    }

    /// Handle a click on option `index`. Returns `None` once locked or for
    /// an index that does not exist.
    pub fn choose(&mut self, index: usize) -> Option<QuizOutcome> {
        if self.answer.is_some() {
            return None;
        }
        let option = self.options.get(index)?;
        let is_correct = option.correct;
        self.answer = Some(index);
        Some(QuizOutcome {
            chosen: index,
            correct_index: self.correct_index(),
            is_correct,
            feedback: if is_correct {
                "Correct! Well done."
            } else {
                "Incorrect. The highlighted answer is the right one."
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_quiz() -> Quiz {
        Quiz::from_answers([
            ("R/2", None),
            ("R", Some("correct")),
            ("2R", Some("wrong")),
            ("4R", None),
        ])
    }

    #[test]
    fn test_from_answers_marks_correct() {
        let quiz = sample_quiz();
        assert_eq!(quiz.correct_index(), Some(1));
        assert_eq!(quiz.options().len(), 4);
    }

    #[test]
    fn test_choose_locks() {
        let mut quiz = sample_quiz();
        let outcome = quiz.choose(2).unwrap();
        assert!(!outcome.is_correct);
        assert_eq!(outcome.correct_index, Some(1));
        assert!(quiz.is_locked());

        // Subsequent clicks do nothing
        assert_eq!(quiz.choose(1), None);
        assert_eq!(quiz.answer(), Some(2));
    }

    #[test]
    fn test_choose_correct() {
        let mut quiz = sample_quiz();
        let outcome = quiz.choose(1).unwrap();
        assert!(outcome.is_correct);
        assert!(outcome.feedback.starts_with("Correct"));
    }

    #[test]
    fn test_out_of_range_click_does_not_lock() {
        let mut quiz = sample_quiz();
        assert_eq!(quiz.choose(10), None);
        assert!(!quiz.is_locked());
    }

    #[test]
    fn test_shuffle_is_reproducible() {
        let mut a = sample_quiz();
        let mut b = sample_quiz();
        a.shuffle(42);
        b.shuffle(42);
        assert_eq!(a.options(), b.options());
        assert_eq!(a.options()[a.correct_index().unwrap()].label, "R");
    }

    #[test]
    fn test_shuffled_markup_keeps_one_correct_marker() {
        let mut quiz = sample_quiz();
        quiz.shuffle(42);
        let marked: Vec<_> = quiz
            .options()
            .iter()
            .filter(|o| o.answer_attribute() == Some(CORRECT_MARKER))
            .collect();
        assert_eq!(marked.len(), 1);
        assert_eq!(marked[0].label, "R");

        // "wrong" in the original markup is not carried over
        let two_r = quiz.options().iter().find(|o| o.label == "2R").unwrap();
        assert_eq!(two_r.answer_attribute(), None);
    }

    #[test]
    fn test_shuffle_after_answer_is_ignored() {
        let mut quiz = sample_quiz();
        quiz.choose(0);
        let before = quiz.options().to_vec();
        quiz.shuffle(7);
        assert_eq!(quiz.options(), &before[..]);
    }
}
