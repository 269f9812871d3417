// ── Runtime connection configuration ──
//
// Describes *how* to reach a Berlin host. Carries the API key and
// connection tuning but never touches disk: badgeville-config (or a test)
// builds a `ClientConfig` and hands it in.

use std::time::Duration;

use badgeville_api::{BerlinClient, TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;

/// Configuration for talking to one Berlin host.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service base URL (e.g., `http://staging.badgeville.com`).
    pub host: Url,
    /// Static API key embedded in every request path.
    pub api_key: SecretString,
    /// TLS verification strategy.
    pub tls: TlsMode,
    /// Request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(host: Url, api_key: SecretString) -> Self {
        Self {
            host,
            api_key,
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
        }
    }

    /// Build the HTTP client every record operation is run against.
    pub fn connect(&self) -> Result<BerlinClient, CoreError> {
        let transport = TransportConfig::default()
            .with_tls(self.tls.clone())
            .with_timeout(self.timeout);
        let client = BerlinClient::new(self.host.as_str(), &self.api_key, &transport)
            .map_err(|e| match e {
                badgeville_api::Error::InvalidUrl(e) => CoreError::Config {
                    message: format!("invalid host {}: {e}", self.host),
                },
                other => CoreError::from(other),
            })?;
        tracing::debug!(host = %self.host, timeout = ?self.timeout, "client configured");
        Ok(client)
    }
}
