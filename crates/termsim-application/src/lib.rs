//! Application layer for termsim.
//!
//! Wires the domain pieces into a command cycle: `CommandParser` and
//! `SimulationDispatcher` turn one command into output plus a state outcome,
//! and `SessionService` runs cycles against stored sessions, one at a time
//! per session.

pub mod command_parser;
pub mod dispatcher;
mod generation;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use command_parser::CommandParser;
pub use dispatcher::{SimulationDispatcher, SimulationResult, UNRECOGNIZED_COMMAND_OUTPUT};
pub use session::{CommandRequest, CommandResponse, SessionService};
