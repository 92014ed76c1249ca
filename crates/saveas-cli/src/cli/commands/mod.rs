//! CLI command handlers, one file per command.

mod completions;
mod config;
mod probe;
mod save;

pub use completions::{run_completions, run_man};
pub use config::run_config;
pub use probe::run_probe;
pub use save::{run_save, SaveArgs};
