//! Purpose: Lock the bounded-decode contract through the public API.
//! Exports: Integration tests only (no runtime exports).
//! Role: Cover size-limit classification, content-type enforcement, and wire details.
//! Invariants: "Too large" is reported only when the body continues past the limit.
//! Invariants: Content-type mismatches never touch the body stream.

use std::io::{self, Cursor, Read};

use axum::http::Request;
use serde::Deserialize;
use serde_json::{Value, json};
use servekit::errorstate::ErrorState;
use servekit::httpjson::{self, DecodeError};

fn json_request(body: &[u8]) -> Request<Cursor<Vec<u8>>> {
    Request::builder()
        .method("POST")
        .uri("/v1/items")
        .header("content-type", "application/json")
        .body(Cursor::new(body.to_vec()))
        .expect("request")
}

/// Counts bytes handed out so tests can see how much of the body was consumed.
struct CountingBody {
    inner: Cursor<Vec<u8>>,
    read: usize,
}

impl Read for CountingBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.read += n;
        Ok(n)
    }
}

#[test]
fn valid_bodies_up_to_the_limit_decode() {
    let corpus = [
        br#"{"a":1}"#.as_slice(),
        br#"[1,2,3,{"x":true}]"#.as_slice(),
        br#""just a string""#.as_slice(),
        br#"{"nested":{"arr":[{"k":"v"}]}}"#.as_slice(),
        b"  \n {\"padded\": null}".as_slice(),
    ];

    for body in corpus {
        let expected: Value = serde_json::from_slice(body).expect("baseline");
        for limit in [body.len() as u64, body.len() as u64 + 1, 4096] {
            let value: Value = httpjson::decode(&mut json_request(body), limit)
                .unwrap_or_else(|err| panic!("limit {limit}: {err}"));
            assert_eq!(value, expected);
        }
    }
}

#[test]
fn bodies_cut_off_by_the_limit_are_too_large() {
    let body = br#"{"message":"hello world","tags":["a","b","c"]}"#;
    for limit in [0u64, 1, 5, 20, body.len() as u64 - 1] {
        let err = httpjson::decode::<Value, _>(&mut json_request(body), limit)
            .expect_err("too large");
        assert_eq!(err, DecodeError::EntityTooLarge { limit });
        assert!(err.detail().message.contains(&limit.to_string()));
    }
}

#[test]
fn oversized_bodies_with_invalid_prefixes_are_too_large() {
    let corpus = [
        br#"{"a":}"#.as_slice(),
        br#"[1,,2]"#.as_slice(),
        b"nope".as_slice(),
    ];

    for prefix in corpus {
        let mut body = prefix.to_vec();
        body.extend_from_slice(&[b'x'; 32]);
        for limit in [prefix.len() as u64, prefix.len() as u64 + 2, 24] {
            let err = httpjson::decode::<Value, _>(&mut json_request(&body), limit)
                .expect_err("too large");
            assert_eq!(
                err,
                DecodeError::EntityTooLarge { limit },
                "prefix {prefix:?} at limit {limit}"
            );
        }
    }
}

#[test]
fn invalid_bodies_within_the_limit_are_malformed() {
    let corpus = [
        br#"{"a":}"#.as_slice(),
        br#"{"a":1"#.as_slice(),
        br#"[1,2,"#.as_slice(),
        b"nope".as_slice(),
        b"".as_slice(),
    ];

    for body in corpus {
        for limit in [body.len() as u64, 100] {
            let err = httpjson::decode::<Value, _>(&mut json_request(body), limit)
                .expect_err("malformed");
            let DecodeError::MalformedJson { reason } = &err else {
                panic!("expected malformed for {body:?} at {limit}, got {err:?}");
            };
            assert!(!reason.is_empty());
            assert_eq!(err.detail().message, "Unable to parse JSON.");
        }
    }
}

#[test]
fn spec_examples() {
    let value: Value = httpjson::decode(&mut json_request(br#"{"a":1}"#), 10).expect("decode");
    assert_eq!(value, json!({ "a": 1 }));

    let err = httpjson::decode::<Value, _>(&mut json_request(br#"{"a":1}"#), 5)
        .expect_err("too large");
    assert_eq!(
        err.detail().message,
        "Request body size is limited to 5 bytes."
    );

    let err = httpjson::decode::<Value, _>(&mut json_request(br#"{"a":}"#), 100)
        .expect_err("malformed");
    assert!(matches!(err, DecodeError::MalformedJson { .. }));
}

#[test]
fn wrong_content_type_consumes_nothing() {
    for content_type in ["text/plain", "application/json; charset=utf-8", "APPLICATION/JSON"] {
        let mut request = Request::builder()
            .header("Content-Type", content_type)
            .body(CountingBody {
                inner: Cursor::new(br#"{"a":1}"#.to_vec()),
                read: 0,
            })
            .expect("request");
        let err = httpjson::decode::<Value, _>(&mut request, 100).expect_err("content type");
        assert_eq!(err, DecodeError::ContentType);
        assert_eq!(request.body().read, 0);
        assert_eq!(
            err.detail().message,
            "Expecting 'application/json' content type."
        );
    }
}

#[test]
fn consumption_stays_within_one_byte_of_the_limit() {
    let body = vec![b' '; 10_000];
    let mut request = Request::builder()
        .header("content-type", "application/json")
        .body(CountingBody {
            inner: Cursor::new(body),
            read: 0,
        })
        .expect("request");
    let err = httpjson::decode::<Value, _>(&mut request, 64).expect_err("too large");
    assert_eq!(err, DecodeError::EntityTooLarge { limit: 64 });
    assert_eq!(request.body().read, 65);
}

#[test]
fn independent_requests_decode_identically() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Signup {
        email: String,
        plan: Option<String>,
    }

    let body = br#"{"email":"ada@example.com","plan":"pro"}"#;
    let first: Signup = httpjson::decode(&mut json_request(body), 256).expect("first");
    let second: Signup = httpjson::decode(&mut json_request(body), 256).expect("second");
    assert_eq!(first, second);
    assert_eq!(first.plan.as_deref(), Some("pro"));
}

#[test]
fn error_state_envelope_is_stable() {
    let state = DecodeError::malformed("expected value at line 1 column 6").error_state();
    let value = serde_json::to_value(&state).expect("serialize");
    assert_eq!(
        value,
        json!({
            "errors": [{
                "domain": "JSON",
                "type": "decode",
                "location": "HTTP request body",
                "reason": "expected value at line 1 column 6",
                "message": "Unable to parse JSON.",
            }]
        })
    );
    let back: ErrorState = serde_json::from_value(value).expect("deserialize");
    assert_eq!(back, state);
}
