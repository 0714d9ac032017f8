//! Property-based tests for the hash engine and change detector

mod change_detection;
mod determinism;
