//! Init and update summaries.

use crate::api::{InitSummary, UpdateSummary};
use crate::placeholder::PLACEHOLDER_FILE;
use crate::store::{STATE_DIR, STATE_FILE};

pub fn format_init_summary(summary: &InitSummary, placeholders: bool) -> String {
    let mut output = String::new();
    if summary.replaced {
        output.push_str(&format!("Replaced {}/{}\n", STATE_DIR, STATE_FILE));
    } else {
        output.push_str(&format!("Created {}/{}\n", STATE_DIR, STATE_FILE));
    }
    output.push_str(&format!(
        "Tracking {} files in {} folders\n",
        summary.files, summary.folders
    ));
    output.push_str(&format!("Root digest: {}", summary.root_digest));
    if placeholders {
        output.push_str(&format!(
            "\nCreated {} empty {} files",
            summary.placeholders_created, PLACEHOLDER_FILE
        ));
    }
    output
}

pub fn format_update_summary(summary: &UpdateSummary) -> String {
    let mut output = format!(
        "Updated {}/{} with {} files",
        STATE_DIR, STATE_FILE, summary.files
    );
    if summary.patterns_changed {
        output.push_str("\nPattern set replaced with the configured patterns");
    }
    if summary.previous_root_digest == Some(summary.root_digest) {
        output.push_str("\nNo content changes since the previous snapshot");
    }
    output
}
