//! Server wiring for Engilla: configuration and the Flutterwave payment
//! gateway client. The binary in `main.rs` puts these together with the
//! SQLite store and the API router.

pub mod flutterwave;

use std::{
  fmt,
  path::{Path, PathBuf},
};

use anyhow::Context as _;
use engilla_api::IdentitySource;
use serde::Deserialize;

pub use flutterwave::FlutterwaveVerifier;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ENGILLA_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:            String,
  #[serde(default = "default_port")]
  pub port:            u16,
  #[serde(default = "default_store_path")]
  pub store_path:      PathBuf,
  /// Set to `forwarded_for` only when running behind a trusted proxy.
  #[serde(default)]
  pub identity_source: IdentitySource,
  pub payment:         GatewayConfig,
}

/// Payment gateway settings.
#[derive(Deserialize, Clone)]
pub struct GatewayConfig {
  #[serde(default = "default_gateway_url")]
  pub base_url:   String,
  pub secret_key: String,
  /// Upper bound on a verification round trip; exceeding it fails closed.
  #[serde(default = "default_timeout_ms")]
  pub timeout_ms: u64,
}

impl fmt::Debug for GatewayConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("GatewayConfig")
      .field("base_url", &self.base_url)
      .field("secret_key", &"<redacted>")
      .field("timeout_ms", &self.timeout_ms)
      .finish()
  }
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 5000 }

fn default_store_path() -> PathBuf { PathBuf::from("engilla.db") }

fn default_gateway_url() -> String { "https://api.flutterwave.com/v3".to_owned() }

fn default_timeout_ms() -> u64 { 10_000 }

/// Load configuration from an optional TOML file, overridden by environment
/// variables such as `ENGILLA_PORT` or `ENGILLA_PAYMENT__SECRET_KEY`.
pub fn load_config(path: &Path) -> anyhow::Result<ServerConfig> {
  let settings = config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(
      config::Environment::with_prefix("ENGILLA")
        .prefix_separator("_")
        .separator("__"),
    )
    .build()
    .context("failed to read config file")?;

  settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(toml: &str) -> ServerConfig {
    config::Config::builder()
      .add_source(config::File::from_str(toml, config::FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn defaults_fill_missing_fields() {
    let cfg = parse("[payment]\nsecret_key = \"FLWSECK_TEST-x\"\n");
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 5000);
    assert_eq!(cfg.store_path, PathBuf::from("engilla.db"));
    assert_eq!(cfg.identity_source, IdentitySource::PeerAddr);
    assert_eq!(cfg.payment.base_url, "https://api.flutterwave.com/v3");
    assert_eq!(cfg.payment.timeout_ms, 10_000);
  }

  #[test]
  fn explicit_values_win() {
    let cfg = parse(
      "port = 8080\nidentity_source = \"forwarded_for\"\n\
       [payment]\nsecret_key = \"k\"\ntimeout_ms = 2500\n",
    );
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.identity_source, IdentitySource::ForwardedFor);
    assert_eq!(cfg.payment.timeout_ms, 2500);
  }

  #[test]
  fn debug_output_redacts_secret() {
    let cfg = parse("[payment]\nsecret_key = \"FLWSECK_TEST-supersecret\"\n");
    let shown = format!("{cfg:?}");
    assert!(!shown.contains("supersecret"), "{shown}");
    assert!(shown.contains("<redacted>"));
  }

  #[test]
  fn relative_paths_are_left_alone() {
    assert_eq!(expand_tilde(Path::new("data/engilla.db")), PathBuf::from("data/engilla.db"));
  }
}
