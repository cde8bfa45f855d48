//! survey-tui library: question indexing, view state and rendering shared by the binary.

pub mod app_core;
pub mod config;
pub mod decode;
pub mod model;
pub mod runtime;
pub mod theme;
pub mod ui;
