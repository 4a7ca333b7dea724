//! [`PaymentVerifier`] backed by the Flutterwave transactions API.
//!
//! `GET {base_url}/transactions/{id}/verify` with the secret key as a bearer
//! token. Only an HTTP success whose body carries `"status": "success"` counts
//! as paid; everything else, timeouts included, is a [`VerificationError`].

use std::time::Duration;

use anyhow::{Context, Result};
use engilla_core::{
  VerificationError,
  payment::{ConfirmedPayment, PaymentVerifier},
};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::GatewayConfig;

#[derive(Debug, Deserialize)]
struct VerifyResponse {
  status: String,
  data:   Option<VerifyData>,
}

#[derive(Debug, Deserialize)]
struct VerifyData {
  amount:   f64,
  currency: String,
}

/// Flutterwave verification client.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct FlutterwaveVerifier {
  client:     Client,
  base_url:   Url,
  secret_key: String,
}

impl FlutterwaveVerifier {
  pub fn new(config: &GatewayConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_millis(config.timeout_ms))
      .build()
      .context("failed to build HTTP client")?;
    let base_url = Url::parse(&config.base_url)
      .with_context(|| format!("invalid payment gateway URL {:?}", config.base_url))?;
    if base_url.cannot_be_a_base() {
      anyhow::bail!("payment gateway URL {:?} cannot be a base", config.base_url);
    }
    Ok(Self { client, base_url, secret_key: config.secret_key.clone() })
  }

  /// `{base_url}/transactions/{id}/verify`, with `id` percent-encoded as a
  /// single path segment. Callers reject `.` and `..` first, since those are
  /// dropped rather than encoded.
  fn verify_url(&self, transaction_id: &str) -> Url {
    let mut url = self.base_url.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
      segments
        .pop_if_empty()
        .extend(["transactions", transaction_id, "verify"]);
    }
    url
  }
}

impl PaymentVerifier for FlutterwaveVerifier {
  async fn verify(&self, transaction_id: &str) -> Result<ConfirmedPayment, VerificationError> {
    if transaction_id.trim().is_empty() {
      return Err(VerificationError::MissingTransactionId);
    }
    if matches!(transaction_id, "." | "..") {
      return Err(VerificationError::Malformed(format!(
        "transaction id {transaction_id:?} is not a valid path segment"
      )));
    }

    let resp = self
      .client
      .get(self.verify_url(transaction_id))
      .bearer_auth(&self.secret_key)
      .send()
      .await
      .map_err(|e| {
        if e.is_timeout() {
          VerificationError::Timeout
        } else {
          VerificationError::Transport(e.without_url().to_string())
        }
      })?;

    if !resp.status().is_success() {
      return Err(VerificationError::Status(resp.status().as_u16()));
    }

    let body: VerifyResponse = resp.json().await.map_err(|e| {
      if e.is_timeout() {
        VerificationError::Timeout
      } else {
        VerificationError::Malformed(e.without_url().to_string())
      }
    })?;

    if body.status != "success" {
      return Err(VerificationError::NotSuccessful(body.status));
    }

    let data = body
      .data
      .ok_or_else(|| VerificationError::Malformed("missing `data` object".to_owned()))?;

    Ok(ConfirmedPayment { amount: data.amount, currency: data.currency })
  }
}
