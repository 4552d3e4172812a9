pub mod commands;
pub mod prompt;
pub mod table;

pub use commands::{Cli, Commands, run};
