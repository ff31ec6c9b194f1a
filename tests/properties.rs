//! Property tests for dit.
//!
//! Properties use randomized input generation to explore edge cases and
//! protect invariants like "never panics" and "describes itself verbatim".
//!
//! Run with: `cargo test --test properties`

#[path = "properties/task_descriptor.rs"]
mod task_descriptor;

#[path = "properties/connection_descriptor.rs"]
mod connection_descriptor;
