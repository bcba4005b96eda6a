//! Purpose: `servekit` CLI entry point.
//! Role: Binary crate root; parses args, runs commands, emits JSON on stdout.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `to_exit_code`.
//! Invariants: This is the only place a failed statement preparation ends the process.
use std::fs::File;
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;

use axum::http::Request;
use axum::http::header::CONTENT_TYPE;
use clap::{Args, Parser, Subcommand, error::ErrorKind as ClapErrorKind};
use rusqlite::Connection;
use serde_json::{Map, Value, json};
use tracing_subscriber::EnvFilter;

use servekit::httpjson::{self, JSON_CONTENT_TYPE};
use servekit::{Error, ErrorKind, sql, to_exit_code};

mod command_dispatch;

const DEFAULT_MAX_BYTES: u64 = 1024 * 1024;

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

#[derive(Parser)]
#[command(
    name = "servekit",
    version,
    about = "Bounded JSON decoding and startup statement preparation",
    long_about = None,
    after_help = r#"EXAMPLES
  $ echo '{"a":1}' | servekit decode --max-bytes 64
  $ servekit decode --max-bytes 5 body.json          # exits 5: body too large
  $ servekit prepare --db app.db 'SELECT id FROM users WHERE name = ?1'
"#,
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode one JSON value from a size-limited body (stdin or FILE).
    Decode(DecodeArgs),
    /// Prepare SQL statements against a SQLite database; exits non-zero on the first failure.
    Prepare(PrepareArgs),
}

#[derive(Args)]
struct DecodeArgs {
    /// Maximum number of body bytes to read.
    #[arg(long, default_value_t = DEFAULT_MAX_BYTES)]
    max_bytes: u64,
    /// Content-Type header value to present with the body.
    #[arg(long, default_value = JSON_CONTENT_TYPE, conflicts_with = "no_content_type")]
    content_type: String,
    /// Send the body without a Content-Type header.
    #[arg(long)]
    no_content_type: bool,
    /// Body file; reads stdin when omitted.
    file: Option<PathBuf>,
}

#[derive(Args)]
struct PrepareArgs {
    /// SQLite database path.
    #[arg(long, default_value = ":memory:")]
    db: String,
    /// SQL batch executed before preparing (repeatable).
    #[arg(long = "init", value_name = "SQL")]
    init: Vec<String>,
    /// Queries to prepare, in order.
    #[arg(required = true, value_name = "QUERY")]
    queries: Vec<String>,
}

fn main() {
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(clap_error_summary(&err))
                    .with_hint("Run `servekit --help` for usage."));
            }
        },
    };

    init_tracing();

    command_dispatch::dispatch_command(cli.command)
}

fn clap_error_summary(err: &clap::Error) -> String {
    let text = err.to_string();
    text.lines()
        .next()
        .unwrap_or("invalid arguments")
        .trim_start_matches("error: ")
        .to_string()
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .try_init();
}

fn open_body(file: Option<&PathBuf>) -> Result<Box<dyn Read>, Error> {
    match file {
        Some(path) => {
            let file = File::open(path).map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message(format!("failed to open {}", path.display()))
                    .with_source(err)
            })?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

fn decode_body(args: &DecodeArgs) -> Result<Value, Error> {
    let body = open_body(args.file.as_ref())?;
    let mut builder = Request::builder().method("POST").uri("/");
    if !args.no_content_type {
        builder = builder.header(CONTENT_TYPE, args.content_type.as_str());
    }
    let mut request = builder.body(body).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message("invalid --content-type value")
            .with_source(err)
    })?;
    let value = httpjson::decode(&mut request, args.max_bytes)?;
    Ok(value)
}

fn open_database(args: &PrepareArgs) -> Result<Connection, Error> {
    let conn = Connection::open(&args.db).map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message(format!("failed to open database {}", args.db))
            .with_source(err)
    })?;
    for batch in &args.init {
        conn.execute_batch(batch).map_err(|err| {
            Error::new(ErrorKind::Statement)
                .with_message("failed to run init batch")
                .with_query(batch.as_str())
                .with_source(err)
        })?;
    }
    Ok(conn)
}

fn prepare_statements(conn: &Connection, queries: &[String]) -> Result<Value, Error> {
    let statements = match sql::prepare_all(conn, queries) {
        Ok(statements) => statements,
        Err(err) => {
            tracing::error!(
                query = err.query().unwrap_or_default(),
                error = %err,
                "cannot prepare statement; refusing to start"
            );
            return Err(err.with_hint("Check the query against the database schema."));
        }
    };
    let prepared: Vec<Value> = queries
        .iter()
        .zip(&statements)
        .map(|(query, stmt)| {
            json!({
                "query": query,
                "parameters": stmt.parameter_count(),
                "columns": stmt.column_names(),
            })
        })
        .collect();
    Ok(json!({ "prepared": prepared }))
}

fn emit_json(value: &Value) -> Result<(), Error> {
    let text = serde_json::to_string(value).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("failed to encode output")
            .with_source(err)
    })?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{text}").map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to write output")
            .with_source(err)
    })
}

fn emit_error(err: &Error) {
    if io::stderr().is_terminal() {
        eprintln!("{}", error_text(err));
        return;
    }
    let json = serde_json::to_string(&error_json(err)).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    err.message()
        .map(str::to_string)
        .unwrap_or_else(|| format!("{:?}", err.kind()))
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut current = std::error::Error::source(err);
    while let Some(source) = current {
        causes.push(source.to_string());
        current = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(query) = err.query() {
        inner.insert("query".to_string(), json!(query));
    }
    if let Some(detail) = err.detail() {
        inner.insert("detail".to_string(), json!(detail));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error) -> String {
    let mut lines = vec![format!("error: {}", error_message(err))];
    if let Some(detail) = err.detail() {
        lines.push(format!("reason: {}", detail.reason));
    }
    if let Some(query) = err.query() {
        lines.push(format!("query: {query}"));
    }
    if let Some(hint) = err.hint() {
        lines.push(format!("hint: {hint}"));
    }
    for cause in error_causes(err) {
        lines.push(format!("caused by: {cause}"));
    }
    lines.join("\n")
}
