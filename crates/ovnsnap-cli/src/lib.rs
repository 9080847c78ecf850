mod args;
mod commands;
pub mod context;
mod handlers;
mod legacy;
pub mod logging;
pub mod presentation;
pub mod types;

pub use args::{Cli, Commands};
pub use commands::run;
