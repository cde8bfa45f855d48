//! Shared application state, types, and state-mutation methods.
//!
//! This module is runtime-agnostic. All view-state transitions (filter
//! selection, popup open/close/toggle) go through methods on [`AppState`]; the
//! renderer only reads it.

use crate::app_core::chart::{self, ChartEntry};
use crate::app_core::indexing::QuestionsIndex;
use crate::app_core::popup::{self, AnswerChoice, Popup};
use crate::decode::EntityDecoder;
use crate::model::Question;
use crate::theme::ThemeConfig;
use ratatui::{layout::Rect, widgets::ListState};
use tui_scrollview::ScrollViewState;

/// Label of the selector row that clears the category filter.
pub const ALL_CATEGORIES_LABEL: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Categories,
    Questions,
    CategoryChart,
    DifficultyChart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// The question fetch has not completed yet.
    Loading,
    /// An index is installed (possibly empty, if the fetch failed).
    Ready,
}

#[derive(Debug, Clone)]
pub struct ProgressStage {
    pub label: String,
    pub ratio: f64,
    pub done: bool,
}

/// What a line of the popup body does when clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupHitTarget {
    Expand(usize),
    Reveal(usize),
}

/// Questions shown by the list for `selected` ("" means every category).
///
/// An unknown category yields an empty list. The unfiltered view concatenates
/// the category buckets in key order; each question appears once since it
/// belongs to exactly one category.
pub fn filtered_questions<'a>(index: &'a QuestionsIndex, selected: &str) -> Vec<&'a Question> {
    if selected.is_empty() {
        index
            .categories
            .iter()
            .flat_map(|(_, questions)| questions.iter())
            .collect()
    } else {
        index
            .categories
            .get(selected)
            .map(|questions| questions.iter().collect())
            .unwrap_or_default()
    }
}

/// Application state for the Ratatui app.
pub struct AppState {
    /// Questions grouped by category and difficulty
    pub index: QuestionsIndex,
    /// Bars of the "Questions by Category" chart
    pub category_chart: Vec<ChartEntry>,
    /// Bars of the "Questions by Difficulty" chart (always easy/medium/hard)
    pub difficulty_chart: Vec<ChartEntry>,
    /// Selected category filter; empty means all categories
    pub selected_category: String,
    /// Question list for the current filter, rebuilt on filter or index change
    pub filtered: Vec<Question>,
    /// Detail popup
    pub popup: Popup,
    /// Decoder for answer text, which is stored undecoded
    pub decoder: Box<dyn EntityDecoder>,
    pub load_status: LoadStatus,
    /// Which pane currently has keyboard focus
    pub focused_pane: FocusPane,
    /// Cursor in the category selector (row 0 is "All")
    pub category_list_state: ListState,
    /// Cursor in the question list
    pub question_list_state: ListState,
    /// Bar under the cursor in the category chart
    pub category_bar: usize,
    /// First category bar drawn (the chart scrolls when taller than its pane)
    pub category_chart_offset: usize,
    /// Bar under the cursor in the difficulty chart
    pub difficulty_bar: usize,
    /// Scroll position inside the popup body
    pub popup_scroll_state: ScrollViewState,
    /// Click targets for each line of the popup body (set during render)
    pub popup_targets: Vec<Option<PopupHitTarget>>,
    /// Popup cursor the scroll position was last adjusted for
    pub popup_rendered_cursor: Option<usize>,
    /// Theme configuration
    pub theme: ThemeConfig,
    /// App version string
    pub app_version: String,
    /// Time spent fetching and indexing, in milliseconds
    pub load_time_ms: f64,
    /// Screen region of the category selector (including borders)
    pub category_list_area: Option<Rect>,
    /// Screen region of the question list (including borders)
    pub question_list_area: Option<Rect>,
    /// Screen region of the category chart (including borders)
    pub category_chart_area: Option<Rect>,
    /// Screen region of the difficulty chart (including borders)
    pub difficulty_chart_area: Option<Rect>,
    /// Bar geometry of the difficulty chart as `(bar_width, bar_gap)`
    pub difficulty_bar_layout: (u16, u16),
    /// Screen region of the whole popup (including borders)
    pub popup_area: Option<Rect>,
    /// Screen region of the scrollable popup body
    pub popup_content_area: Option<Rect>,
    /// Flag to quit app
    pub should_quit: bool,
    /// Whether help overlay is visible
    pub show_help: bool,
    /// Whether progress modal is visible
    pub show_progress: bool,
    /// Progress modal title
    pub progress_title: String,
    /// Progress stages for modal display
    pub progress_stages: Vec<ProgressStage>,
}

impl AppState {
    pub fn new(theme: ThemeConfig, app_version: String, decoder: Box<dyn EntityDecoder>) -> Self {
        let mut category_list_state = ListState::default();
        category_list_state.select(Some(0));
        let index = QuestionsIndex::default();

        Self {
            category_chart: chart::by_category(&index),
            difficulty_chart: chart::by_difficulty(&index),
            index,
            selected_category: String::new(),
            filtered: Vec::new(),
            popup: Popup::Closed,
            decoder,
            load_status: LoadStatus::Loading,
            focused_pane: FocusPane::Questions,
            category_list_state,
            question_list_state: ListState::default(),
            category_bar: 0,
            category_chart_offset: 0,
            difficulty_bar: 0,
            popup_scroll_state: ScrollViewState::default(),
            popup_targets: Vec::new(),
            popup_rendered_cursor: None,
            theme,
            app_version,
            load_time_ms: 0.0,
            category_list_area: None,
            question_list_area: None,
            category_chart_area: None,
            difficulty_chart_area: None,
            difficulty_bar_layout: (1, 0),
            popup_area: None,
            popup_content_area: None,
            should_quit: false,
            show_help: false,
            show_progress: false,
            progress_title: String::new(),
            progress_stages: Vec::new(),
        }
    }

    /// Installs a freshly built index and recomputes every derived view.
    ///
    /// The selected category is kept as-is, even if the new index lacks it.
    pub fn install_index(&mut self, index: QuestionsIndex, load_time_ms: f64) {
        self.index = index;
        self.load_time_ms = load_time_ms;
        self.load_status = LoadStatus::Ready;
        self.category_chart = chart::by_category(&self.index);
        self.difficulty_chart = chart::by_difficulty(&self.index);
        self.category_bar = self
            .category_bar
            .min(self.category_chart.len().saturating_sub(1));
        self.category_chart_offset = 0;
        self.rebuild_filtered();
        self.sync_category_cursor();
    }

    /// Category names in selector order, without the leading "All" row.
    pub fn category_names(&self) -> Vec<&str> {
        self.index.categories.keys().collect()
    }

    /// Sets the category filter; an empty name shows every category.
    pub fn select_category(&mut self, name: &str) {
        tracing::debug!(category = name, "select category");
        self.selected_category = name.to_string();
        self.rebuild_filtered();
        self.sync_category_cursor();
    }

    /// Applies selector row `row` (0 is "All").
    pub fn select_category_row(&mut self, row: usize) {
        let name = if row == 0 {
            String::new()
        } else {
            match self.index.categories.keys().nth(row - 1) {
                Some(name) => name.to_string(),
                None => return,
            }
        };
        self.select_category(&name);
    }

    pub fn selected_category_label(&self) -> &str {
        if self.selected_category.is_empty() {
            ALL_CATEGORIES_LABEL
        } else {
            &self.selected_category
        }
    }

    fn rebuild_filtered(&mut self) {
        self.filtered = filtered_questions(&self.index, &self.selected_category)
            .into_iter()
            .cloned()
            .collect();
        self.question_list_state
            .select(if self.filtered.is_empty() { None } else { Some(0) });
    }

    fn sync_category_cursor(&mut self) {
        let row = if self.selected_category.is_empty() {
            Some(0)
        } else {
            self.index
                .categories
                .keys()
                .position(|key| key == self.selected_category)
                .map(|pos| pos + 1)
        };
        if let Some(row) = row {
            self.category_list_state.select(Some(row));
        }
    }

    pub fn open_group_popup(&mut self, key: &str) {
        tracing::debug!(group = key, "open group popup");
        self.popup.open_for_group(key, &self.index);
        self.reset_popup_view();
    }

    /// Opens the popup for the question at `pos` in the filtered list.
    pub fn open_question_popup(&mut self, pos: usize) {
        let Some(question) = self.filtered.get(pos) else {
            return;
        };
        tracing::debug!(position = pos, category = %question.category, "open question popup");
        self.popup.open_for_question(question);
        self.reset_popup_view();
    }

    fn reset_popup_view(&mut self) {
        self.popup_scroll_state = ScrollViewState::default();
        self.popup_rendered_cursor = None;
        self.show_help = false;
    }

    pub fn close_popup(&mut self) {
        if self.popup.is_open() {
            tracing::debug!("close popup");
        }
        self.popup.close();
        self.popup_targets.clear();
        self.popup_area = None;
        self.popup_content_area = None;
    }

    pub fn toggle_expand(&mut self, i: usize) {
        self.popup.toggle_expand(i);
        self.popup.set_cursor(i);
    }

    pub fn toggle_reveal(&mut self, i: usize) {
        self.popup.toggle_reveal(i);
        self.popup.set_cursor(i);
    }

    /// Decoded answer choices for popup item `i`.
    pub fn answer_choices(&self, i: usize) -> Vec<AnswerChoice> {
        self.popup
            .state()
            .and_then(|state| state.items.get(i))
            .map(|question| popup::answer_choices(question, self.decoder.as_ref()))
            .unwrap_or_default()
    }

    pub fn focus_pane(&mut self, pane: FocusPane) {
        self.focused_pane = pane;
    }

    pub fn focus_next_pane(&mut self) {
        let next = match self.focused_pane {
            FocusPane::Categories => FocusPane::Questions,
            FocusPane::Questions => FocusPane::CategoryChart,
            FocusPane::CategoryChart => FocusPane::DifficultyChart,
            FocusPane::DifficultyChart => FocusPane::Categories,
        };
        self.focus_pane(next);
    }

    pub fn focus_prev_pane(&mut self) {
        let prev = match self.focused_pane {
            FocusPane::Categories => FocusPane::DifficultyChart,
            FocusPane::Questions => FocusPane::Categories,
            FocusPane::CategoryChart => FocusPane::Questions,
            FocusPane::DifficultyChart => FocusPane::CategoryChart,
        };
        self.focus_pane(prev);
    }

    /// Number of selectable rows or bars in `pane`.
    pub fn pane_len(&self, pane: FocusPane) -> usize {
        match pane {
            FocusPane::Categories => self.index.categories.len() + 1,
            FocusPane::Questions => self.filtered.len(),
            FocusPane::CategoryChart => self.category_chart.len(),
            FocusPane::DifficultyChart => self.difficulty_chart.len(),
        }
    }

    fn pane_cursor(&self, pane: FocusPane) -> Option<usize> {
        match pane {
            FocusPane::Categories => self.category_list_state.selected(),
            FocusPane::Questions => self.question_list_state.selected(),
            FocusPane::CategoryChart => Some(self.category_bar),
            FocusPane::DifficultyChart => Some(self.difficulty_bar),
        }
    }

    /// Moves the cursor of the focused pane to `pos`, clamped to its length.
    pub fn set_cursor(&mut self, pos: usize) {
        let len = self.pane_len(self.focused_pane);
        if len == 0 {
            return;
        }
        let pos = pos.min(len - 1);
        match self.focused_pane {
            FocusPane::Categories => self.category_list_state.select(Some(pos)),
            FocusPane::Questions => self.question_list_state.select(Some(pos)),
            FocusPane::CategoryChart => self.category_bar = pos,
            FocusPane::DifficultyChart => self.difficulty_bar = pos,
        }
    }

    /// Moves the cursor of the focused pane by `delta`, clamped to its bounds.
    pub fn move_selection(&mut self, delta: i32) {
        let current = self.pane_cursor(self.focused_pane).unwrap_or(0);
        let next = if delta < 0 {
            current.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            current.saturating_add(delta as usize)
        };
        self.set_cursor(next);
    }

    /// Activates the item under the cursor of the focused pane.
    pub fn activate_selection(&mut self) {
        let Some(pos) = self.pane_cursor(self.focused_pane) else {
            return;
        };
        match self.focused_pane {
            FocusPane::Categories => self.select_category_row(pos),
            FocusPane::Questions => self.open_question_popup(pos),
            FocusPane::CategoryChart => {
                if let Some(name) = self.category_chart.get(pos).map(|e| e.name.clone()) {
                    self.open_group_popup(&name);
                }
            }
            FocusPane::DifficultyChart => {
                if let Some(name) = self.difficulty_chart.get(pos).map(|e| e.name.clone()) {
                    self.open_group_popup(&name);
                }
            }
        }
    }

    pub fn start_progress(&mut self, title: impl Into<String>, stages: &[&str]) {
        self.show_progress = true;
        self.progress_title = title.into();
        self.progress_stages = stages
            .iter()
            .map(|label| ProgressStage {
                label: (*label).to_string(),
                ratio: 0.0,
                done: false,
            })
            .collect();
    }

    pub fn update_stage(&mut self, label: &str, ratio: f64) {
        if let Some(stage) = self
            .progress_stages
            .iter_mut()
            .find(|stage| stage.label == label)
        {
            stage.ratio = ratio.clamp(0.0, 1.0);
            if stage.ratio >= 1.0 {
                stage.done = true;
            }
        }
    }

    pub fn finish_stage(&mut self, label: &str) {
        self.update_stage(label, 1.0);
    }

    pub fn clear_progress(&mut self) {
        self.show_progress = false;
        self.progress_title.clear();
        self.progress_stages.clear();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::app_core::indexing::build_questions_index;
    use crate::decode::HtmlEntityDecoder;
    use crate::theme::Theme;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    pub(crate) fn sample_index() -> QuestionsIndex {
        let raw: Vec<Question> = serde_json::from_value(json!([
            {"category": "Art", "difficulty": "easy", "question": "&quot;Q1&quot;",
             "correct_answer": "A", "incorrect_answers": ["B", "C"]},
            {"category": "Science &amp; Nature", "difficulty": "hard", "question": "Q2",
             "correct_answer": "True", "incorrect_answers": ["False"]},
            {"category": "Art", "difficulty": "medium", "question": "Q3",
             "correct_answer": "X", "incorrect_answers": ["Y"]}
        ]))
        .unwrap();
        build_questions_index(raw, &HtmlEntityDecoder)
    }

    pub(crate) fn make_test_app() -> AppState {
        let mut app = AppState::new(
            Theme::Dracula.config(),
            "v0".to_string(),
            Box::new(HtmlEntityDecoder),
        );
        app.install_index(sample_index(), 0.0);
        app
    }

    fn texts(questions: &[&Question]) -> Vec<String> {
        questions.iter().map(|q| q.question.clone()).collect()
    }

    #[test]
    fn test_filtered_questions_all_concatenates_buckets() {
        let index = sample_index();
        let all = filtered_questions(&index, "");
        assert_eq!(all.len(), 3);
        assert_eq!(texts(&all), vec!["\"Q1\"", "Q3", "Q2"]);
    }

    #[test]
    fn test_filtered_questions_by_category() {
        let index = sample_index();
        assert_eq!(texts(&filtered_questions(&index, "Art")), vec!["\"Q1\"", "Q3"]);
        assert!(filtered_questions(&index, "NoSuchCategory").is_empty());
    }

    #[test]
    fn test_new_state_is_loading_and_unfiltered() {
        let app = AppState::new(
            Theme::Dracula.config(),
            "v0".to_string(),
            Box::new(HtmlEntityDecoder),
        );
        assert_eq!(app.load_status, LoadStatus::Loading);
        assert_eq!(app.selected_category, "");
        assert!(app.filtered.is_empty());
        assert!(!app.popup.is_open());
        assert_eq!(app.difficulty_chart.len(), 3);
    }

    #[test]
    fn test_install_index_recomputes_views() {
        let app = make_test_app();
        assert_eq!(app.load_status, LoadStatus::Ready);
        assert_eq!(app.filtered.len(), 3);
        assert_eq!(app.category_chart.len(), 2);
        assert_eq!(app.category_names(), vec!["Art", "Science & Nature"]);
        assert_eq!(app.question_list_state.selected(), Some(0));
    }

    #[test]
    fn test_select_category_updates_list_and_cursor() {
        let mut app = make_test_app();
        app.select_category("Science & Nature");
        assert_eq!(app.filtered.len(), 1);
        assert_eq!(app.category_list_state.selected(), Some(2));
        assert_eq!(app.selected_category_label(), "Science & Nature");

        app.select_category_row(0);
        assert_eq!(app.selected_category, "");
        assert_eq!(app.selected_category_label(), ALL_CATEGORIES_LABEL);
        assert_eq!(app.filtered.len(), 3);
    }

    #[test]
    fn test_select_unknown_category_yields_empty_list() {
        let mut app = make_test_app();
        app.select_category("Stale");
        assert!(app.filtered.is_empty());
        assert_eq!(app.question_list_state.selected(), None);
    }

    #[test]
    fn test_open_question_popup_from_filtered_list() {
        let mut app = make_test_app();
        app.select_category("Art");
        app.open_question_popup(1);
        let state = app.popup.state().unwrap();
        assert_eq!(state.items[0].question, "Q3");
        assert_eq!(state.header, "Art");
        assert_eq!(state.expanded_index, Some(0));
    }

    #[test]
    fn test_activate_chart_bar_opens_group() {
        let mut app = make_test_app();
        app.focus_pane(FocusPane::DifficultyChart);
        app.move_selection(2);
        app.activate_selection();
        let state = app.popup.state().unwrap();
        assert_eq!(state.header, "hard");
        assert_eq!(state.items.len(), 1);
    }

    #[test]
    fn test_answer_choices_are_decoded_on_demand() {
        let mut app = make_test_app();
        app.open_group_popup("Art");
        let choices = app.answer_choices(0);
        assert_eq!(choices.len(), 3);
        assert!(choices[0].is_correct);
        assert!(app.answer_choices(9).is_empty());
    }

    #[test]
    fn test_close_popup_clears_hit_targets() {
        let mut app = make_test_app();
        app.open_group_popup("Art");
        app.popup_targets = vec![Some(PopupHitTarget::Expand(0))];
        app.close_popup();
        assert!(!app.popup.is_open());
        assert!(app.popup_targets.is_empty());
    }

    #[test]
    fn test_focus_cycle_wraps() {
        let mut app = make_test_app();
        app.focus_pane(FocusPane::DifficultyChart);
        app.focus_next_pane();
        assert_eq!(app.focused_pane, FocusPane::Categories);
        app.focus_prev_pane();
        assert_eq!(app.focused_pane, FocusPane::DifficultyChart);
    }

    #[test]
    fn test_move_selection_clamps() {
        let mut app = make_test_app();
        app.focus_pane(FocusPane::Questions);
        app.move_selection(10);
        assert_eq!(app.question_list_state.selected(), Some(2));
        app.move_selection(-10);
        assert_eq!(app.question_list_state.selected(), Some(0));
    }
}
