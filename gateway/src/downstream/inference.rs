//! Reverse proxy to the Immich machine-learning service.

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use reqwest::Client;

use crate::error::{Error, Result};

/// Headers that describe a single connection and must not be relayed.
const HOP_BY_HOP: [&str; 9] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Client forwarding requests unmodified to `{base}{path}`.
pub struct InferenceClient {
    http_client: Client,
    base_url: String,
}

/// Downstream reply, relayed to the caller as-is.
#[derive(Debug)]
pub struct ForwardedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl InferenceClient {
    pub fn new(http_client: Client, base_url: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Forward a request. `body` is the exact byte sequence the caller sent.
    ///
    /// Any status the downstream answers with is a successful forward; only
    /// transport failures are errors.
    pub async fn forward(
        &self,
        method: Method,
        path_and_query: &str,
        headers: &HeaderMap,
        body: Bytes,
    ) -> Result<ForwardedResponse> {
        let url = format!("{}{}", self.base_url, path_and_query);

        tracing::debug!("Forwarding {} request: {} size={}", method, url, body.len());

        let response = self
            .http_client
            .request(method, &url)
            .headers(relayable_headers(headers, &["host", "content-length"]))
            .body(body)
            .send()
            .await
            .map_err(|e| Error::Proxy(e.to_string()))?;

        let status = response.status();
        let headers = relayable_headers(response.headers(), &["content-length"]);
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Proxy(e.to_string()))?;

        Ok(ForwardedResponse {
            status,
            headers,
            body,
        })
    }
}

impl IntoResponse for ForwardedResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// Copy of `headers` without hop-by-hop headers and without `skip`, which
/// the transport derives again for the new connection.
fn relayable_headers(headers: &HeaderMap, skip: &[&str]) -> HeaderMap {
    let mut relayed = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name_str = name.as_str();
        if HOP_BY_HOP.contains(&name_str) || skip.contains(&name_str) {
            continue;
        }
        relayed.append(name.clone(), value.clone());
    }
    relayed
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_relayable_headers_drop_connection_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("connection", HeaderValue::from_static("keep-alive"));
        headers.insert("host", HeaderValue::from_static("gateway:8080"));
        headers.insert("content-length", HeaderValue::from_static("42"));
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        headers.insert("x-auth-token", HeaderValue::from_static("secret"));
        headers.append("accept", HeaderValue::from_static("text/plain"));
        headers.append("accept", HeaderValue::from_static("application/json"));

        let relayed = relayable_headers(&headers, &["host", "content-length"]);

        assert!(relayed.get("connection").is_none());
        assert!(relayed.get("host").is_none());
        assert!(relayed.get("content-length").is_none());
        assert_eq!(relayed["content-type"], "application/json");
        assert_eq!(relayed["x-auth-token"], "secret");
        assert_eq!(relayed.get_all("accept").iter().count(), 2);
    }

    #[test]
    fn test_forwarded_response_is_relayed() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("text/plain"));

        let response = ForwardedResponse {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            headers,
            body: Bytes::from_static(b"nope"),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.headers()["content-type"], "text/plain");
    }

    #[test]
    fn test_url_normalization() {
        let client = InferenceClient::new(Client::new(), "http://localhost:3003/");
        assert_eq!(client.base_url, "http://localhost:3003");
    }
}
