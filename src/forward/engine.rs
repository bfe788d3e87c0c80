//! Forwarding engine.
//!
//! A request travels through five stages:
//!
//! 1. resolve: first path segment selects a backend route
//! 2. cache check: cacheable targets may be answered without a dispatch
//! 3. sanitize: caller headers are rewritten for the outbound hop
//! 4. dispatch: bounded call to the backend
//! 5. relay: upstream answer is decoded, optionally cached, and returned
//!
//! The engine returns `Err` only for REJECTED outcomes (no route, dead
//! backend, timeout, undecodable payload). Upstream non-2xx statuses are
//! relayed as `Ok` responses because the backend answered authoritatively.

use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderValue, Method, Request, Response, StatusCode, Uri};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use serde_json::{json, Value};
use url::Url;

use crate::cache::{CachePolicy, CacheRule, ResponseCache};
use crate::config::BffConfig;
use crate::forward::error::ProxyError;
use crate::forward::headers;
use crate::routing::{split_service_path, RouteTable};

/// Relayed message when a failing backend provides no usable one.
const UPSTREAM_ERROR_MESSAGE: &str = "error from backend service";

/// Outbound request assembled by the sanitize stage. Lives only for the
/// duration of one dispatch.
struct ForwardedRequest {
    method: Method,
    target: String,
    headers: HeaderMap,
    body: Option<Bytes>,
}

/// One engine per process, shared across connections via `Arc`.
///
/// Holds the immutable route table and cache policy plus the pooled HTTP
/// client; per-request state never touches the engine itself.
pub struct Forwarder {
    routes: RouteTable,
    policy: CachePolicy,
    cache: ResponseCache,
    client: Client<HttpConnector, Body>,
    upstream_timeout: Duration,
    max_body_bytes: usize,
}

impl Forwarder {
    pub fn new(config: &BffConfig, cache: ResponseCache) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.timeouts.connect_secs)));

        Self {
            routes: RouteTable::from_config(&config.routes),
            policy: CachePolicy::from_config(&config.cache.rules),
            cache,
            client: Client::builder(TokioExecutor::new()).build(connector),
            upstream_timeout: Duration::from_secs(config.timeouts.upstream_secs),
            max_body_bytes: config.limits.max_body_bytes,
        }
    }

    /// The configured routes, for the admin surface.
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Service label for a request path: the resolved service name, or
    /// `None` when the path does not map to a configured route. Only
    /// configured names come back, so metric label cardinality stays
    /// bounded by the route table.
    pub fn resolved_service<'a>(&self, path: &'a str) -> Option<&'a str> {
        split_service_path(path)
            .map(|(service, _)| service)
            .filter(|service| self.routes.resolve(service).is_some())
    }

    /// Run one request through the full pipeline.
    pub async fn forward(&self, request: Request<Body>) -> Result<Response<Body>, ProxyError> {
        let (parts, body) = request.into_parts();
        let path = parts.uri.path();

        let (service, rest) = split_service_path(path).ok_or_else(|| ProxyError::RouteNotFound {
            service: path.to_string(),
        })?;
        let route = self
            .routes
            .resolve(service)
            .ok_or_else(|| ProxyError::RouteNotFound {
                service: service.to_string(),
            })?;

        let target = build_target(&route.base_url, rest, parts.uri.query());
        let target_url = Url::parse(&target).map_err(|e| ProxyError::BadTarget {
            target: target.clone(),
            reason: e.to_string(),
        })?;

        // The rule is looked up on the target path so one pattern covers a
        // service wherever its base URL points.
        let cache_rule = self.policy.rule_for(target_url.path(), &parts.method);
        if cache_rule.is_some() {
            if let Some(payload) = self.cache.get(&target) {
                tracing::debug!(target = %target, "Serving cached response");
                return json_response(StatusCode::OK, &payload);
            }
        }

        let body_bytes = axum::body::to_bytes(body, self.max_body_bytes)
            .await
            .map_err(|e| ProxyError::Transport(format!("reading request body: {e}")))?;
        let has_body = !body_bytes.is_empty();

        let forwarded = ForwardedRequest {
            method: parts.method.clone(),
            headers: headers::sanitize(&parts.headers, &parts.method, has_body),
            body: has_body.then_some(body_bytes),
            target: target.clone(),
        };

        tracing::debug!(
            service = %service,
            method = %forwarded.method,
            target = %forwarded.target,
            "Forwarding request"
        );

        let (upstream, upstream_body) = self.dispatch(forwarded).await?;
        self.relay(service, &target, upstream, upstream_body, cache_rule)
    }

    /// Stage 4: send the sanitized request, bounded by the upstream
    /// deadline. The deadline covers the exchange end to end, response
    /// body included, so a backend that stalls mid-body cannot hold the
    /// caller forever.
    async fn dispatch(
        &self,
        forwarded: ForwardedRequest,
    ) -> Result<(axum::http::response::Parts, Bytes), ProxyError> {
        let uri: Uri = forwarded
            .target
            .parse()
            .map_err(|e: axum::http::uri::InvalidUri| ProxyError::BadTarget {
                target: forwarded.target.clone(),
                reason: e.to_string(),
            })?;

        let mut request = Request::new(match forwarded.body {
            Some(bytes) => Body::from(bytes),
            None => Body::empty(),
        });
        *request.method_mut() = forwarded.method;
        *request.uri_mut() = uri;
        *request.headers_mut() = forwarded.headers;

        let exchange = async {
            let response = self
                .client
                .request(request)
                .await
                .map_err(|e| ProxyError::Transport(e.to_string()))?;
            let (parts, body) = response.into_parts();
            let bytes = axum::body::to_bytes(Body::new(body), self.max_body_bytes)
                .await
                .map_err(|e| ProxyError::Transport(format!("reading upstream body: {e}")))?;
            Ok::<_, ProxyError>((parts, bytes))
        };

        tokio::time::timeout(self.upstream_timeout, exchange)
            .await
            .map_err(|_| ProxyError::UpstreamTimeout {
                secs: self.upstream_timeout.as_secs(),
            })?
    }

    /// Stage 5: turn the upstream answer into the caller-facing response.
    fn relay(
        &self,
        service: &str,
        target: &str,
        upstream: axum::http::response::Parts,
        upstream_body: Bytes,
        cache_rule: Option<&CacheRule>,
    ) -> Result<Response<Body>, ProxyError> {
        let status = upstream.status;

        if !status.is_success() {
            // The backend answered; its status is authoritative and the
            // body is normalized to the error shape callers expect.
            let message = extract_error_message(&upstream_body)
                .unwrap_or_else(|| UPSTREAM_ERROR_MESSAGE.to_string());
            tracing::warn!(service = %service, status = %status, "Relaying upstream error");
            return json_response(status, &json!({ "error": message }));
        }

        let mut relayed_headers = headers::relay_response_headers(&upstream.headers);

        if upstream_body.is_empty() {
            let mut response = Response::new(Body::empty());
            *response.status_mut() = status;
            *response.headers_mut() = relayed_headers;
            return Ok(response);
        }

        let payload: Value = serde_json::from_slice(&upstream_body)?;
        if let Some(rule) = cache_rule {
            self.cache.put(target, payload.clone(), rule.ttl());
        }

        if !relayed_headers.contains_key(header::CONTENT_TYPE) {
            relayed_headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
        }

        let body = serde_json::to_vec(&payload)?;
        let mut response = Response::new(Body::from(body));
        *response.status_mut() = status;
        *response.headers_mut() = relayed_headers;
        Ok(response)
    }
}

/// Join a route base with the remaining path and original query string.
/// Pure concatenation: the backend sees exactly the path the caller sent
/// after the service segment.
fn build_target(base_url: &str, rest: &str, query: Option<&str>) -> String {
    let mut target = String::with_capacity(base_url.len() + rest.len() + 16);
    target.push_str(base_url);
    target.push_str(rest);
    if let Some(query) = query {
        target.push('?');
        target.push_str(query);
    }
    target
}

/// Serialize a JSON payload into a response with the given status.
fn json_response(status: StatusCode, payload: &Value) -> Result<Response<Body>, ProxyError> {
    let body = serde_json::to_vec(payload)?;
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    Ok(response)
}

/// Pull an upstream-supplied message out of a failing response body:
/// `message` wins over `error`, first string value found is used.
fn extract_error_message(body: &Bytes) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::to_string)
}
