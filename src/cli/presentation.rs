//! CLI presentation: text and json formatters per command.

mod changes;
mod summary;

pub use changes::{format_changes_json, format_changes_text};
pub use summary::{format_init_summary, format_update_summary};
