//! CLI domain: parse, route, help and output only.
//! Single route table dispatches to the emitter factory and renderers.

mod help;
mod output;
mod parse;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands};
pub use route::{parse_field, RunContext};
