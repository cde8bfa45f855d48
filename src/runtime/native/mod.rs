//! Native (terminal) runtime helpers. The binary entry point lives in `main.rs`.

pub mod data;
