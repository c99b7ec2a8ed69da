pub mod args;
pub mod helpers;

pub use args::{Cli, Commands};
pub use helpers::{handle_check_command, handle_run_command, handle_show_command};
