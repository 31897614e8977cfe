pub mod commands;
pub mod logging;
pub mod output;
pub mod progress;

pub use commands::{Cli, Commands};
