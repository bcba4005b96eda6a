//! Purpose: axum extractor over the bounded JSON decoder.
//! Exports: `BoundedJson`, `BodyLimit`.
//! Role: Async adapter that buffers a capped prefix of the body, then decodes synchronously.
//! Invariants: Content type is checked before the body stream is polled.
//! Invariants: At most `limit + 1` bytes are buffered per request.
use std::io::Cursor;

use axum::async_trait;
use axum::body::Body;
use axum::extract::{FromRef, FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use bytes::{Bytes, BytesMut};
use serde::de::DeserializeOwned;
use tokio_stream::StreamExt;

use super::decode::{decode_body, has_json_content_type};
use super::error::DecodeError;

const DEFAULT_BODY_LIMIT: u64 = 1024 * 1024;

/// Per-router body budget, pulled from state through `FromRef`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BodyLimit(pub u64);

impl Default for BodyLimit {
    fn default() -> Self {
        BodyLimit(DEFAULT_BODY_LIMIT)
    }
}

/// JSON body decoded under a [`BodyLimit`].
#[derive(Clone, Copy, Debug, Default)]
pub struct BoundedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for BoundedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    BodyLimit: FromRef<S>,
{
    type Rejection = DecodeError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let BodyLimit(limit) = BodyLimit::from_ref(state);
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok());
        if !has_json_content_type(content_type) {
            return Err(DecodeError::ContentType);
        }

        let cap = usize::try_from(limit.saturating_add(1)).unwrap_or(usize::MAX);
        let bytes = collect_capped(req.into_body(), cap)
            .await
            .map_err(|err| DecodeError::malformed(err.to_string()))?;
        decode_body(Cursor::new(bytes), limit).map(BoundedJson)
    }
}

async fn collect_capped(body: Body, cap: usize) -> Result<Bytes, axum::Error> {
    let mut stream = body.into_data_stream();
    let mut buf = BytesMut::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        let room = cap - buf.len();
        if chunk.len() >= room {
            buf.extend_from_slice(&chunk[..room]);
            break;
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}
