//! State of one quiz attempt, from first question to grading.

use rand::Rng;
use uuid::Uuid;

use crate::models::{ScoreSummary, TestQuestion, Unit};
use crate::quiz::{self, Answers};

/// A quiz in progress.
#[derive(Debug, Clone)]
pub struct QuizSession {
    pub id: String,
    pub unit_id: String,
    pub questions: Vec<TestQuestion>,
    pub answers: Answers,
    pub current: usize,
}

impl QuizSession {
    /// Start a quiz for `unit`. Returns `None` when the unit has no words.
    pub fn start<R: Rng + ?Sized>(unit: &Unit, question_count: usize, rng: &mut R) -> Option<Self> {
        let questions = quiz::build_quiz(&unit.words, question_count, rng);
        if questions.is_empty() {
            return None;
        }

        Some(Self {
            id: Uuid::new_v4().to_string()[..8].to_string(),
            unit_id: unit.id.clone(),
            questions,
            answers: Answers::new(),
            current: 0,
        })
    }

    pub fn current(&self) -> &TestQuestion {
        &self.questions[self.current]
    }

    pub fn current_answer(&self) -> Option<&str> {
        self.answers.get(&self.current).map(String::as_str)
    }

    pub fn is_answered(&self) -> bool {
        self.answers.contains_key(&self.current)
    }

    /// Record the answer for the current question. Later answers to the same
    /// question are ignored. Returns whether the recorded answer is correct.
    pub fn answer(&mut self, choice: &str) -> bool {
        let recorded = self
            .answers
            .entry(self.current)
            .or_insert_with(|| choice.to_string());
        self.questions[self.current].is_correct(recorded)
    }

    /// Move to the next question. Returns false when already on the last one.
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.questions.len()
    }

    pub fn is_finished(&self) -> bool {
        self.is_last() && self.is_answered()
    }

    pub fn summary(&self) -> ScoreSummary {
        quiz::score(&self.questions, &self.answers)
    }
}
