//! Purpose: Bounded JSON request-body decoding with content-type enforcement.
//! Exports: `decode`, `decode_into`, `DecodeError`, `BoundedJson`, `BodyLimit`, `LimitedReader`.
//! Role: Library surface consumed by hosting HTTP services.
//! Invariants: Every failure maps to exactly one `errorstate::Detail`.
//! Invariants: Calls are independent; no state is shared between requests.

mod decode;
mod error;
mod extract;
mod limited;

pub use decode::{JSON_CONTENT_TYPE, JsonRequest, decode, decode_into, has_json_content_type};
pub use error::{DecodeError, entity_too_large, malformed_json, unexpected_content_type};
pub use extract::{BodyLimit, BoundedJson};
pub use limited::LimitedReader;
