//! CLI module - argument parsing

mod args;

pub use args::{BucketArgs, Cli, Commands};
