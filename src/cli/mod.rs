//! Command-line interface module.

mod args;
pub mod build;
pub mod check;
pub mod common;

pub use args::{Cli, Commands};
