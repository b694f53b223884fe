//! Command classification and structured command representation.

mod classifier;
mod parsed;

pub use classifier::{ToolKind, classify};
pub use parsed::ParsedCommand;
