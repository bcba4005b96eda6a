//! Purpose: Hold top-level CLI command dispatch for `servekit`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: Each command writes exactly one JSON document to stdout on success.

use super::*;

pub(super) fn dispatch_command(command: Command) -> Result<RunOutcome, Error> {
    match command {
        Command::Decode(args) => {
            let value = decode_body(&args)?;
            emit_json(&value)?;
            Ok(RunOutcome::ok())
        }
        Command::Prepare(args) => {
            let conn = open_database(&args)?;
            let report = prepare_statements(&conn, &args.queries)?;
            emit_json(&report)?;
            Ok(RunOutcome::ok())
        }
    }
}
