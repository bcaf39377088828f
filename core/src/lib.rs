//! Core functionality for the Groupcast transport layer.

pub mod transport;

pub use transport::*;
