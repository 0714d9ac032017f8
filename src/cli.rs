//! CLI domain: parse, route, output, and presentation only.
//! No domain orchestration; single route table dispatches to the operations API.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, OutputFormat};
pub use presentation::{
    format_changes_json, format_changes_text, format_init_summary, format_update_summary,
};
pub use route::RunContext;
