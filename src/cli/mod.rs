mod commands;

pub use commands::{Cli, run};
