use rusqlite::{Connection, Statement};

use crate::core::error::{Error, ErrorKind};

/// Prepares `query` for repeated execution on `conn`.
pub fn prepare<'conn>(conn: &'conn Connection, query: &str) -> Result<Statement<'conn>, Error> {
    if query.trim().is_empty() {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("query text is empty")
            .with_hint("Pass a non-empty SQL statement."));
    }
    match conn.prepare(query) {
        Ok(stmt) => {
            tracing::debug!(%query, "prepared statement");
            Ok(stmt)
        }
        Err(err) => Err(Error::new(ErrorKind::Statement)
            .with_message("failed to prepare statement")
            .with_query(query)
            .with_source(err)),
    }
}

/// Prepares every query in order, stopping at the first failure.
pub fn prepare_all<'conn, Q>(
    conn: &'conn Connection,
    queries: &[Q],
) -> Result<Vec<Statement<'conn>>, Error>
where
    Q: AsRef<str>,
{
    queries
        .iter()
        .map(|query| prepare(conn, query.as_ref()))
        .collect()
}
