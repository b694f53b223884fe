//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: the persisted `SessionState` aggregate
//! - `repository`: the storage contract for sessions

mod model;
mod repository;

pub use model::SessionState;
pub use repository::SessionRepository;
