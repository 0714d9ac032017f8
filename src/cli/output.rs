//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::CartographyError;

/// Map domain errors to the single line printed on stderr.
pub fn map_error(e: &CartographyError) -> String {
    format!("Error: {}", e)
}
