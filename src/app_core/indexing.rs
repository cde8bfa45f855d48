//! Grouping of fetched questions into category and difficulty buckets.
//!
//! This module is synchronous and has no runtime-specific dependencies. The
//! native runtime calls [`build_questions_index`] once, when the fetch completes.

use crate::decode::EntityDecoder;
use crate::model::Question;
use foldhash::HashMap;

/// Insertion-ordered mapping from a key to a non-empty list of questions.
///
/// Keys iterate in the order they were first seen; a bucket exists only after
/// its first question is pushed.
#[derive(Debug, Clone, Default)]
pub struct Buckets {
    entries: Vec<(String, Vec<Question>)>,
    positions: HashMap<String, usize>,
}

impl Buckets {
    /// Appends `question` to the bucket named `key`, creating it if absent.
    pub fn push(&mut self, key: &str, question: Question) {
        match self.positions.get(key) {
            Some(&pos) => self.entries[pos].1.push(question),
            None => {
                self.positions.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), vec![question]));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&[Question]> {
        self.positions
            .get(key)
            .map(|&pos| self.entries[pos].1.as_slice())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Question])> {
        self.entries
            .iter()
            .map(|(key, questions)| (key.as_str(), questions.as_slice()))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of questions across all buckets.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, questions)| questions.len()).sum()
    }
}

/// Questions grouped two ways: by decoded category and by raw difficulty.
#[derive(Debug, Clone, Default)]
pub struct QuestionsIndex {
    pub categories: Buckets,
    pub difficulties: Buckets,
}

impl QuestionsIndex {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.difficulties.is_empty()
    }

    /// Number of indexed questions.
    pub fn total_questions(&self) -> usize {
        self.categories.total()
    }
}

/// Builds the category/difficulty index from raw API records.
///
/// `question` and `category` are decoded exactly once here, before grouping.
/// Difficulty and answer text stay as fetched; answers are decoded on demand by
/// the popup. Missing fields were already defaulted to `""` by deserialization
/// and are grouped under that key.
pub fn build_questions_index<D>(raw: Vec<Question>, decoder: &D) -> QuestionsIndex
where
    D: EntityDecoder + ?Sized,
{
    let mut index = QuestionsIndex::default();

    for mut question in raw {
        question.question = decoder.decode(&question.question);
        question.category = decoder.decode(&question.category);

        let category = question.category.clone();
        let difficulty = question.difficulty.clone();
        index.categories.push(&category, question.clone());
        index.difficulties.push(&difficulty, question);
    }

    index
}
