//! Platform-specific plumbing kept out of the runtime-agnostic core.

pub mod native;
