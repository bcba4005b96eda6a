//! Purpose: Prepare SQL statements during application startup.
//! Exports: `prepare`, `prepare_all`.
//! Role: Thin fail-fast seam over `rusqlite::Connection::prepare`.
//! Invariants: Failures come back as `Error` carrying the query text; the library never exits.
//! Invariants: Escalation to process termination belongs to the binary entry point.

mod prepare;

pub use prepare::{prepare, prepare_all};
