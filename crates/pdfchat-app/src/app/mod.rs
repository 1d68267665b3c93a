pub mod commands;
pub mod repl;
pub mod setup;

pub use commands::{parse_command, ReplCommand};
pub use repl::run_repl_mode;
pub use setup::{resolve_model, resolve_settings, setup_from_cli, AppConfig};
