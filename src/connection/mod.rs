//! Connection management
//!
//! This module handles:
//! * Opening a driver connection for a connection string
//! * Runtime vs migration open options
//! * Lifecycle state tracking
//! * TLS connector setup

mod handle;
mod options;
mod state;
mod tls;

pub use handle::ConnectionHandle;
pub use options::{OpenMode, OpenOptions};
pub use state::ConnectionState;
