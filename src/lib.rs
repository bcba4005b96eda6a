//! Purpose: Helper library for HTTP/JSON services backed by SQLite.
//! Exports: `httpjson` (bounded body decoding), `sql` (startup statement preparation),
//! `errorstate` (structured error details), `core` (crate error type).
//! Role: Consumed by hosting services and by the `servekit` CLI.
//! Invariants: Library calls never terminate the process; callers decide how to escalate.
//! Invariants: Operations are stateless; nothing is shared across calls.
pub mod core;
pub mod errorstate;
pub mod httpjson;
pub mod sql;

pub use crate::core::error::{Error, ErrorKind, to_exit_code};
