//! Integration tests for the Cartographer change-detection engine

mod pattern_resolution;
mod snapshot_store;
mod test_utils;
