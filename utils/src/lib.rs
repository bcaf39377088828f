//! Concurrency utilities shared across the Groupcast crates.

pub mod collections;
