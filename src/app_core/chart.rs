//! Chart-ready aggregates derived from a [`QuestionsIndex`].
//!
//! Everything here is a pure function of the index; the state layer recomputes
//! the projections whenever a new index is installed.

use crate::app_core::indexing::QuestionsIndex;
use crate::model::KNOWN_DIFFICULTIES;
use unicode_width::UnicodeWidthStr;

/// Minimum category-axis width hint, in pixels.
pub const MIN_CATEGORY_AXIS_WIDTH: usize = 100;
/// Approximate pixel width of one label character.
pub const CATEGORY_AXIS_CHAR_WIDTH: usize = 8;

/// One bar: a group key and the number of questions in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartEntry {
    pub name: String,
    pub count: usize,
}

impl ChartEntry {
    fn new(name: &str, count: usize) -> Self {
        Self {
            name: name.to_string(),
            count,
        }
    }
}

/// One entry per category, in category insertion order.
pub fn by_category(index: &QuestionsIndex) -> Vec<ChartEntry> {
    index
        .categories
        .iter()
        .map(|(name, questions)| ChartEntry::new(name, questions.len()))
        .collect()
}

/// Always exactly `easy`, `medium`, `hard`; missing difficulties count as zero
/// and unrecognized ones are left out.
pub fn by_difficulty(index: &QuestionsIndex) -> Vec<ChartEntry> {
    KNOWN_DIFFICULTIES
        .iter()
        .map(|&key| {
            let count = index.difficulties.get(key).map_or(0, |q| q.len());
            ChartEntry::new(key, count)
        })
        .collect()
}

/// Width hint for the category axis: eight pixels per character of the longest
/// category name, never below [`MIN_CATEGORY_AXIS_WIDTH`].
///
/// This is a pixel measure for graphical front ends; the terminal renderer
/// sizes its labels in cells with [`category_label_cells`].
pub fn category_axis_width(index: &QuestionsIndex) -> usize {
    index
        .categories
        .keys()
        .map(|name| name.chars().count() * CATEGORY_AXIS_CHAR_WIDTH)
        .fold(MIN_CATEGORY_AXIS_WIDTH, usize::max)
}

/// Terminal-cell width of the longest category label, clamped to `max_cells`.
pub fn category_label_cells(entries: &[ChartEntry], max_cells: u16) -> u16 {
    let widest = entries
        .iter()
        .map(|entry| entry.name.width())
        .max()
        .unwrap_or(0);
    (widest.min(u16::MAX as usize) as u16).min(max_cells)
}
