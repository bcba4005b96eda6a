//! Purpose: Decode one JSON value from a size-limited request body.
//! Exports: `JsonRequest`, `decode`, `decode_into`, `has_json_content_type`.
//! Role: Synchronous core shared by the plain API and the axum extractor.
//! Invariants: Content type is checked before any body byte is read.
//! Invariants: "Too large" only when the budget ran out and the body kept going.
//! Notes: Bytes after the first decoded value are left alone.
use std::io::{BufReader, Read};

use axum::http::Request;
use axum::http::header::CONTENT_TYPE;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::error::DecodeError;
use super::limited::LimitedReader;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// An inbound request: case-insensitive headers plus a readable body.
pub trait JsonRequest {
    fn header(&self, name: &str) -> Option<&str>;
    fn body_reader(&mut self) -> &mut dyn Read;
}

impl<B: Read> JsonRequest for Request<B> {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
    }

    fn body_reader(&mut self) -> &mut dyn Read {
        self.body_mut()
    }
}

/// Exact match only; `application/json; charset=utf-8` is rejected.
pub fn has_json_content_type(content_type: Option<&str>) -> bool {
    content_type == Some(JSON_CONTENT_TYPE)
}

/// Reads at most `max_bytes` of the body and decodes one JSON value from it.
pub fn decode<T, R>(request: &mut R, max_bytes: u64) -> Result<T, DecodeError>
where
    T: DeserializeOwned,
    R: JsonRequest + ?Sized,
{
    if !has_json_content_type(request.header(CONTENT_TYPE.as_str())) {
        return Err(DecodeError::ContentType);
    }
    decode_body(request.body_reader(), max_bytes)
}

/// Same as [`decode`], writing the value through `destination`.
///
/// `destination` is left untouched on failure.
pub fn decode_into<T, R>(
    request: &mut R,
    destination: &mut T,
    max_bytes: u64,
) -> Result<(), DecodeError>
where
    T: DeserializeOwned,
    R: JsonRequest + ?Sized,
{
    *destination = decode(request, max_bytes)?;
    Ok(())
}

pub(crate) fn decode_body<T, B>(body: B, max_bytes: u64) -> Result<T, DecodeError>
where
    T: DeserializeOwned,
    B: Read,
{
    let mut reader = BufReader::new(LimitedReader::new(body, max_bytes));
    // no `end()` call: whatever follows the first value is never looked at
    let err = match T::deserialize(&mut serde_json::Deserializer::from_reader(&mut reader)) {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };

    let limited = reader.get_mut();
    // a parse failure inside a fully buffered budget never asked for more input
    if limited.continues().unwrap_or(false) {
        tracing::debug!(
            limit = max_bytes,
            consumed = limited.consumed(),
            "request body exceeded limit"
        );
        return Err(DecodeError::EntityTooLarge { limit: max_bytes });
    }
    let reason = if err.is_eof() && err.line() == 1 && err.column() == 0 {
        "unexpected end of input".to_string()
    } else {
        err.to_string()
    };
    tracing::debug!(
        limit = max_bytes,
        consumed = limited.consumed(),
        %reason,
        "request body is not valid JSON"
    );
    Err(DecodeError::MalformedJson { reason })
}
