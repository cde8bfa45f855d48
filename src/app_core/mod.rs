//! Shared application core: state, input types, reducer, indexing and chart helpers.

pub mod chart;
pub mod indexing;
pub mod input;
pub mod popup;
pub mod reducer;
pub mod state;
