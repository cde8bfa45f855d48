//! Property tests for the question index and its chart projections.
//!
//! Question lists are generated with a small pool of categories and
//! difficulties (including entity-encoded and unknown values) so that keys
//! repeat and buckets actually grow.

use proptest::prelude::*;
use survey_tui::app_core::chart;
use survey_tui::app_core::indexing::{QuestionsIndex, build_questions_index};
use survey_tui::app_core::state::filtered_questions;
use survey_tui::decode::HtmlEntityDecoder;
use survey_tui::model::{KNOWN_DIFFICULTIES, Question};

fn question_strategy() -> impl Strategy<Value = Question> {
    let category = prop::sample::select(vec![
        "Art",
        "Science &amp; Nature",
        "Entertainment: Video Games",
        "",
    ]);
    let difficulty = prop::sample::select(vec!["easy", "medium", "hard", "expert", ""]);
    (category, difficulty, "[a-z ]{0,12}").prop_map(|(category, difficulty, text)| Question {
        kind: "multiple".to_string(),
        category: category.to_string(),
        difficulty: difficulty.to_string(),
        question: text,
        correct_answer: "yes".to_string(),
        incorrect_answers: vec!["no".to_string()],
    })
}

fn build(raw: Vec<Question>) -> QuestionsIndex {
    build_questions_index(raw, &HtmlEntityDecoder)
}

proptest! {
    #[test]
    fn prop_every_question_lands_in_one_bucket_of_each_kind(
        raw in prop::collection::vec(question_strategy(), 0..40)
    ) {
        let n = raw.len();
        let index = build(raw);
        prop_assert_eq!(index.categories.total(), n);
        prop_assert_eq!(index.difficulties.total(), n);
        prop_assert_eq!(index.total_questions(), n);
    }

    #[test]
    fn prop_category_chart_matches_buckets(
        raw in prop::collection::vec(question_strategy(), 0..40)
    ) {
        let index = build(raw);
        let entries = chart::by_category(&index);
        prop_assert_eq!(entries.len(), index.categories.len());
        for (entry, (key, questions)) in entries.iter().zip(index.categories.iter()) {
            prop_assert_eq!(entry.name.as_str(), key);
            prop_assert_eq!(entry.count, questions.len());
        }
    }

    #[test]
    fn prop_difficulty_chart_is_fixed_shape(
        raw in prop::collection::vec(question_strategy(), 0..40)
    ) {
        let index = build(raw);
        let entries = chart::by_difficulty(&index);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        prop_assert_eq!(names, KNOWN_DIFFICULTIES.to_vec());
        let known: usize = KNOWN_DIFFICULTIES
            .iter()
            .map(|key| index.difficulties.get(key).map_or(0, |q| q.len()))
            .sum();
        prop_assert_eq!(entries.iter().map(|e| e.count).sum::<usize>(), known);
    }

    #[test]
    fn prop_unfiltered_list_holds_every_question(
        raw in prop::collection::vec(question_strategy(), 0..40)
    ) {
        let n = raw.len();
        let index = build(raw);
        prop_assert_eq!(filtered_questions(&index, "").len(), n);
        // "" selects every category, so the empty-key bucket is not reachable by name
        for (key, questions) in index.categories.iter().filter(|(key, _)| !key.is_empty()) {
            prop_assert_eq!(filtered_questions(&index, key).len(), questions.len());
        }
    }

    #[test]
    fn prop_category_keys_are_decoded(
        raw in prop::collection::vec(question_strategy(), 0..40)
    ) {
        let index = build(raw);
        prop_assert!(index.categories.keys().all(|key| !key.contains("&amp;")));
    }
}
