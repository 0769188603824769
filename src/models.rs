//! Data models for words, units, quiz questions and learner progress.

use std::collections::BTreeSet;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A single vocabulary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub english: String,
    pub chinese: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
}

impl Word {
    pub fn new(english: impl Into<String>, chinese: impl Into<String>) -> Self {
        Self {
            english: english.into(),
            chinese: chinese.into(),
            phonetic: None,
            audio: None,
        }
    }
}

/// A lesson: a named, ordered group of words.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub words: Vec<Word>,
}

impl Unit {
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// English spellings that occur more than once in this unit.
    pub fn duplicate_words(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        let mut dupes = BTreeSet::new();
        for word in &self.words {
            if !seen.insert(word.english.as_str()) {
                dupes.insert(word.english.as_str());
            }
        }
        dupes.into_iter().collect()
    }
}

/// A group of units, e.g. one textbook module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub units: Vec<Unit>,
}

/// How a question is presented. Both kinds are answered by picking the
/// written English word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    /// The learner hears the word and picks its spelling.
    ListenAndChoose,
    /// The learner sees the meaning and picks the matching word.
    WordPictureMatch,
}

impl QuestionKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ListenAndChoose => "Listen & Choose",
            Self::WordPictureMatch => "Word Match",
        }
    }

    pub fn is_listening(&self) -> bool {
        matches!(self, Self::ListenAndChoose)
    }
}

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestQuestion {
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub word: Word,
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl TestQuestion {
    pub fn is_correct(&self, answer: &str) -> bool {
        answer == self.correct_answer
    }
}

/// Outcome of grading a finished quiz.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScoreSummary {
    pub correct: usize,
    pub total: usize,
    /// Rounded to the nearest whole percent.
    pub percentage: u32,
    pub wrong_words: Vec<Word>,
}

/// Persisted per-unit learning state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitProgress {
    pub unit_id: String,
    #[serde(default)]
    pub learned_words: Vec<String>,
    #[serde(default)]
    pub completed_tests: Vec<String>,
    #[serde(default)]
    pub stars: u32,
    pub last_studied_at: DateTime<Local>,
}

impl UnitProgress {
    pub fn new(unit_id: &str) -> Self {
        Self {
            unit_id: unit_id.to_string(),
            learned_words: Vec::new(),
            completed_tests: Vec::new(),
            stars: 0,
            last_studied_at: Local::now(),
        }
    }

    pub fn has_learned(&self, english: &str) -> bool {
        self.learned_words.iter().any(|w| w == english)
    }
}

/// Partial update merged into a unit's progress.
#[derive(Debug, Clone, Default)]
pub struct ProgressUpdate {
    pub learned_words: Option<Vec<String>>,
    pub completed_tests: Option<Vec<String>>,
    pub stars: Option<u32>,
}

impl ProgressUpdate {
    pub fn apply(self, progress: &mut UnitProgress) {
        if let Some(words) = self.learned_words {
            progress.learned_words = words;
        }
        if let Some(tests) = self.completed_tests {
            progress.completed_tests = tests;
        }
        if let Some(stars) = self.stars {
            progress.stars = stars;
        }
        progress.last_studied_at = Local::now();
    }
}
