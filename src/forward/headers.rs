//! Header sanitation for the proxied hop.
//!
//! The outbound request must look like a fresh client call, not a relayed
//! one: connection-scoped headers from the caller's hop are dropped and
//! framing headers are left for the HTTP client to recompute against the
//! rebuilt body.

use axum::http::{header, HeaderMap, HeaderValue, Method};

/// Headers meaningful only on the caller's connection; never forwarded.
/// Matching is case-insensitive because `HeaderName` lowercases on parse.
const HOP_BY_HOP_HEADERS: &[&str] = &[
    "host",
    "connection",
    "upgrade",
    "transfer-encoding",
    "proxy-connection",
    "content-length",
];

/// Headers the proxy recomputes when relaying an upstream response.
const RESPONSE_FRAMING_HEADERS: &[&str] = &["content-length", "transfer-encoding", "connection"];

/// Methods whose requests never carry a body through the proxy.
fn is_bodiless_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Build the outbound header set from the caller's headers.
///
/// Hop-by-hop headers are stripped, everything else (auth, tracing,
/// custom headers) passes through with duplicates preserved. Requests
/// that carry a body default to `application/json` when the caller sent
/// no content type; bodiless requests lose any content type entirely.
/// The caller's map is left untouched.
pub fn sanitize(headers: &HeaderMap, method: &Method, has_body: bool) -> HeaderMap {
    let mut outbound = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if HOP_BY_HOP_HEADERS.contains(&name.as_str()) {
            continue;
        }
        outbound.append(name.clone(), value.clone());
    }

    if !is_bodiless_method(method) && has_body {
        if !outbound.contains_key(header::CONTENT_TYPE) {
            outbound.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
    } else {
        outbound.remove(header::CONTENT_TYPE);
    }

    outbound
}

/// Copy upstream response headers for relay, dropping the framing set.
/// The relayed body is re-serialized, so upstream lengths and encodings
/// no longer apply.
pub fn relay_response_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut relayed = HeaderMap::with_capacity(upstream.len());
    for (name, value) in upstream {
        if RESPONSE_FRAMING_HEADERS.contains(&name.as_str()) {
            continue;
        }
        relayed.append(name.clone(), value.clone());
    }
    relayed
}
