//! Opening and closing connections

mod closer;
mod manager;

pub use closer::close;
pub use manager::{ConnectionManager, FailurePolicy};
