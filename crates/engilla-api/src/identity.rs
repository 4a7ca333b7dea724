//! Client identity extractor.
//!
//! Identity is the client's IP address: the TCP peer by default, or the first
//! `X-Forwarded-For` hop when the server is configured to trust a proxy.
//! Clients sharing a NAT share an identity.

use std::net::{IpAddr, SocketAddr};

use axum::{
  extract::{ConnectInfo, FromRequestParts},
  http::{HeaderMap, request::Parts},
};
use engilla_core::record::ClientIdentity;
use serde::Deserialize;

use crate::{AppState, error::ApiError};

/// Where the client identity is read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentitySource {
  /// The socket peer address.
  #[default]
  PeerAddr,
  /// The first `X-Forwarded-For` entry, falling back to the peer address.
  ForwardedFor,
}

/// Extracted identity of the requesting client.
pub struct Client(pub ClientIdentity);

/// First address in `X-Forwarded-For`, if it parses as an IP.
fn forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
  headers
    .get("x-forwarded-for")
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.split(',').next())
    .and_then(|first| first.trim().parse().ok())
}

impl<S, V> FromRequestParts<AppState<S, V>> for Client
where
  S: Send + Sync,
  V: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, V>,
  ) -> Result<Self, Self::Rejection> {
    if state.identity_source == IdentitySource::ForwardedFor
      && let Some(ip) = forwarded_for(&parts.headers)
    {
      return Ok(Client(ClientIdentity::from(ip)));
    }

    let ConnectInfo(addr) = ConnectInfo::<SocketAddr>::from_request_parts(parts, state)
      .await
      .map_err(|e| ApiError::Internal(format!("client address unavailable: {e}").into()))?;
    Ok(Client(ClientIdentity::from(addr.ip())))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::HeaderValue;

  #[test]
  fn forwarded_for_takes_first_hop() {
    let mut headers = HeaderMap::new();
    headers.insert(
      "x-forwarded-for",
      HeaderValue::from_static("198.51.100.4, 10.0.0.1"),
    );
    assert_eq!(forwarded_for(&headers), Some("198.51.100.4".parse().unwrap()));
  }

  #[test]
  fn forwarded_for_ignores_garbage() {
    let mut headers = HeaderMap::new();
    headers.insert("x-forwarded-for", HeaderValue::from_static("unknown"));
    assert_eq!(forwarded_for(&headers), None);
    assert_eq!(forwarded_for(&HeaderMap::new()), None);
  }
}
