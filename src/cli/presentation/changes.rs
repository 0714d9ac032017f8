//! Changes command presentation.

use crate::changes::ChangeSet;
use crate::error::CartographyError;
use crate::types::ROOT_PATH;
use owo_colors::OwoColorize;
use std::collections::BTreeSet;

pub fn format_changes_text(changes: &ChangeSet, color: bool) -> String {
    if changes.is_empty() && !changes.rebaseline {
        return "No changes detected.".to_string();
    }

    let mut output = String::new();
    if changes.rebaseline {
        output.push_str(
            "No comparable snapshot for the current patterns; every file is reported as added.\n",
        );
    }
    push_section(&mut output, "added", '+', &changes.added_files, color);
    push_section(&mut output, "removed", '-', &changes.removed_files, color);
    push_section(&mut output, "modified", '~', &changes.modified_files, color);

    output.push_str(&format!(
        "\n{} folders affected:\n",
        changes.affected_folders.len()
    ));
    for folder in &changes.affected_folders {
        output.push_str(&format!("  {}\n", folder_label(folder)));
    }
    output.trim().to_string()
}

pub fn format_changes_json(changes: &ChangeSet) -> Result<String, CartographyError> {
    serde_json::to_string_pretty(changes)
        .map_err(|e| CartographyError::Config(format!("Failed to serialize changes: {}", e)))
}

fn push_section(
    output: &mut String,
    label: &str,
    marker: char,
    paths: &BTreeSet<String>,
    color: bool,
) {
    if paths.is_empty() {
        return;
    }
    output.push_str(&format!("\n{} {}:\n", paths.len(), label));
    for path in paths {
        let line = format!("{} {}", marker, path);
        let line = if !color {
            line
        } else {
            match marker {
                '+' => line.green().to_string(),
                '-' => line.red().to_string(),
                _ => line.yellow().to_string(),
            }
        };
        output.push_str(&format!("  {}\n", line));
    }
}

fn folder_label(folder: &str) -> String {
    if folder == ROOT_PATH {
        "./".to_string()
    } else {
        format!("{}/", folder)
    }
}
