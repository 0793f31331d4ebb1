//! HTTP server module with optional TLS.
//!
//! Two modes:
//! - **None (default)**: Plain HTTP, for local use or behind a reverse proxy
//! - **Manual**: User-provided certificate and key files
//!
//! The server shuts down gracefully on SIGTERM/SIGINT and, with manual TLS,
//! reloads certificates on SIGHUP.

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
