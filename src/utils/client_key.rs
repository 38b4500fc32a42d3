//! Client identity extraction for admission control.

use axum::http::HeaderMap;
use std::net::SocketAddr;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Derives the admission key for a request.
///
/// By default the key is the peer socket IP. When `behind_proxy` is set the
/// first address in `X-Forwarded-For` wins, then `X-Real-IP`, falling back to
/// the peer IP if neither header carries a usable value.
///
/// Only enable `behind_proxy` when a trusted reverse proxy sets these headers;
/// otherwise clients can pick their own key.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
///
/// let key = client_key(&headers, "10.0.0.1:4000".parse().unwrap(), true);
/// assert_eq!(key, "203.0.113.7");
/// ```
pub fn client_key(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> String {
    if behind_proxy {
        let forwarded = headers
            .get(X_FORWARDED_FOR)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        let real_ip = || {
            headers
                .get(X_REAL_IP)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        if let Some(ip) = forwarded.or_else(real_ip) {
            return ip.to_string();
        }
    }

    peer.ip().to_string()
}
