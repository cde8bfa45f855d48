//! Question detail popup: which questions are listed, which one is expanded and
//! which have their correct answer revealed.

use crate::app_core::indexing::QuestionsIndex;
use crate::decode::EntityDecoder;
use crate::model::Question;
use foldhash::HashSet;

/// Header used for a single-question popup when the question has no category.
pub const FALLBACK_HEADER: &str = "Question";

/// State of an open popup.
///
/// `expanded_index`, `cursor` and every member of `revealed` are valid indices
/// into `items` (the last two only when `items` is non-empty).
#[derive(Debug, Clone, Default)]
pub struct PopupState {
    pub items: Vec<Question>,
    pub header: String,
    pub expanded_index: Option<usize>,
    pub revealed: HashSet<usize>,
    /// Row under the keyboard cursor.
    pub cursor: usize,
}

impl PopupState {
    fn new(items: Vec<Question>, header: String, expanded_index: Option<usize>) -> Self {
        Self {
            items,
            header,
            expanded_index,
            revealed: HashSet::default(),
            cursor: expanded_index.unwrap_or(0),
        }
    }

    pub fn is_expanded(&self, i: usize) -> bool {
        self.expanded_index == Some(i)
    }

    pub fn is_revealed(&self, i: usize) -> bool {
        self.revealed.contains(&i)
    }
}

/// Popup state machine: `Closed` or `Open`.
#[derive(Debug, Clone, Default)]
pub enum Popup {
    #[default]
    Closed,
    Open(PopupState),
}

impl Popup {
    pub fn is_open(&self) -> bool {
        matches!(self, Popup::Open(_))
    }

    pub fn state(&self) -> Option<&PopupState> {
        match self {
            Popup::Open(state) => Some(state),
            Popup::Closed => None,
        }
    }

    pub fn state_mut(&mut self) -> Option<&mut PopupState> {
        match self {
            Popup::Open(state) => Some(state),
            Popup::Closed => None,
        }
    }

    /// Opens a popup listing every question in group `key`.
    ///
    /// Categories are looked up first, then difficulties; an unknown key opens an
    /// empty popup. Replaces any popup already open.
    pub fn open_for_group(&mut self, key: &str, index: &QuestionsIndex) {
        let items = index
            .categories
            .get(key)
            .or_else(|| index.difficulties.get(key))
            .map(<[Question]>::to_vec)
            .unwrap_or_default();
        *self = Popup::Open(PopupState::new(items, key.to_string(), None));
    }

    /// Opens a popup for one question, already expanded.
    pub fn open_for_question(&mut self, question: &Question) {
        let header = if question.category.is_empty() {
            FALLBACK_HEADER.to_string()
        } else {
            question.category.clone()
        };
        *self = Popup::Open(PopupState::new(vec![question.clone()], header, Some(0)));
    }

    pub fn close(&mut self) {
        *self = Popup::Closed;
    }

    /// Expands item `i`, or collapses it if it is already the expanded one.
    pub fn toggle_expand(&mut self, i: usize) {
        let Some(state) = self.state_mut() else {
            return;
        };
        if i >= state.items.len() {
            return;
        }
        state.expanded_index = if state.expanded_index == Some(i) {
            None
        } else {
            Some(i)
        };
    }

    /// Flips whether item `i` shows which answer is correct.
    pub fn toggle_reveal(&mut self, i: usize) {
        let Some(state) = self.state_mut() else {
            return;
        };
        if i >= state.items.len() {
            return;
        }
        if !state.revealed.remove(&i) {
            state.revealed.insert(i);
        }
    }

    /// Moves the keyboard cursor by `delta` rows, clamped to the item list.
    pub fn move_cursor(&mut self, delta: i32) {
        let Some(state) = self.state_mut() else {
            return;
        };
        let len = state.items.len();
        if len == 0 {
            return;
        }
        let next = if delta < 0 {
            state.cursor.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            state.cursor.saturating_add(delta as usize)
        };
        state.cursor = next.min(len - 1);
    }

    pub fn set_cursor(&mut self, i: usize) {
        if let Some(state) = self.state_mut()
            && i < state.items.len()
        {
            state.cursor = i;
        }
    }
}

/// One answer line in an expanded question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerChoice {
    pub text: String,
    pub is_correct: bool,
}

/// Decoded answer choices for `question`: the correct answer first, then the
/// incorrect ones in their original order.
///
/// A choice is correct when its decoded text equals the decoded correct answer,
/// so an incorrect answer that decodes to the same text is also marked correct.
pub fn answer_choices<D>(question: &Question, decoder: &D) -> Vec<AnswerChoice>
where
    D: EntityDecoder + ?Sized,
{
    let correct = decoder.decode(&question.correct_answer);
    std::iter::once(&question.correct_answer)
        .chain(question.incorrect_answers.iter())
        .map(|answer| {
            let text = decoder.decode(answer);
            let is_correct = text == correct;
            AnswerChoice { text, is_correct }
        })
        .collect()
}
