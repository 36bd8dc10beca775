//! CLI command implementations.

use serde::Serialize;
use thiserror::Error;

use quickcart_storefront::StoreError;

pub mod cart;
pub mod wishlist;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The store rejected the operation or could not reach its slot.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// The result could not be rendered.
    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Render a value as pretty JSON.
pub fn render<T: Serialize>(value: &T) -> Result<String, CommandError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Write a command result to stdout.
#[allow(clippy::print_stdout)] // stdout is the command's output channel
pub fn emit(output: &str) {
    println!("{output}");
}
