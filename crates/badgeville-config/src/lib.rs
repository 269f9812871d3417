//! Profile configuration for Badgeville Berlin clients.
//!
//! TOML profiles, API key resolution (env + keyring + plaintext), and
//! translation to `badgeville_core::ClientConfig`. Nothing here is global:
//! callers load a [`Config`], pick a profile, and hand the resulting
//! `ClientConfig` to whatever needs a client.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use badgeville_core::{ClientConfig, TlsMode};

/// Prefix for every environment override.
pub const ENV_PREFIX: &str = "BADGEVILLE_";

/// Keyring service name; entries are stored as `<profile>/api-key`.
const KEYRING_SERVICE: &str = "badgeville";

/// Name given to the profile assembled from `BADGEVILLE_HOST_NAME` /
/// `BADGEVILLE_API_KEY`.
pub const ENV_PROFILE: &str = "env";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API key configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{profile}' not found")]
    UnknownProfile { profile: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named explicitly.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named host profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// A named Berlin host profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Service base URL (e.g., "http://staging.badgeville.com").
    pub host_name: String,

    /// API key (plaintext; prefer keyring or env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// Path to custom CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,

    /// Override timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Profile {
    pub fn new(host_name: impl Into<String>) -> Self {
        Self {
            host_name: host_name.into(),
            api_key: None,
            api_key_env: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "badgeville", "badgeville").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("badgeville");
    p
}

// ── Config loading ──────────────────────────────────────────────────

fn file_figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
}

/// Load the full Config from the canonical file + environment.
///
/// Nested keys use a double underscore:
/// `BADGEVILLE_PROFILES__STAGING__HOST_NAME=http://staging.badgeville.com`.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();
    debug!(path = %path.display(), "loading config");

    let config: Config = file_figment(&path)
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()?;
    Ok(config)
}

/// Load config from a specific file, without environment overrides.
/// A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let config: Config = file_figment(path).extract()?;
    Ok(config)
}

// ── Profile selection ───────────────────────────────────────────────

/// Build a profile from `BADGEVILLE_HOST_NAME` and `BADGEVILLE_API_KEY`.
///
/// Returns `None` unless a host name is set. The key is looked up through
/// `api_key_env`, so it is never copied into the profile.
pub fn env_profile() -> Option<Profile> {
    #[derive(Deserialize)]
    struct EnvHost {
        host_name: Option<String>,
        timeout: Option<u64>,
    }

    let env: EnvHost = Figment::new()
        .merge(Env::prefixed(ENV_PREFIX).only(&["host_name", "timeout"]))
        .extract()
        .ok()?;

    let mut profile = Profile::new(env.host_name?);
    profile.api_key_env = Some(format!("{ENV_PREFIX}API_KEY"));
    profile.timeout = env.timeout;
    Some(profile)
}

/// Pick the profile named `name`, or the config's default profile.
pub fn active_profile<'a>(
    config: &'a Config,
    name: Option<&str>,
) -> Result<(String, &'a Profile), ConfigError> {
    let name = name
        .or(config.default_profile.as_deref())
        .unwrap_or("default");

    config
        .profiles
        .get(name)
        .map(|profile| (name.to_owned(), profile))
        .ok_or_else(|| ConfigError::UnknownProfile {
            profile: name.to_owned(),
        })
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve an API key from the credential chain.
pub fn resolve_api_key(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's api_key_env → env var lookup
    if let Some(ref env_name) = profile.api_key_env {
        if let Ok(val) = std::env::var(env_name) {
            debug!(profile = profile_name, source = "env", "API key resolved");
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/api-key")) {
        if let Ok(secret) = entry.get_password() {
            debug!(profile = profile_name, source = "keyring", "API key resolved");
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref key) = profile.api_key {
        debug!(profile = profile_name, source = "config", "API key resolved");
        return Ok(SecretString::from(key.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

// ── Translation to ClientConfig ─────────────────────────────────────

/// Build a `ClientConfig` from a profile, filling gaps from `defaults`.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let host: url::Url = profile
        .host_name
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "host_name".into(),
            reason: format!("invalid URL: {}", profile.host_name),
        })?;

    if !matches!(host.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "host_name".into(),
            reason: format!("unsupported scheme '{}'", host.scheme()),
        });
    }

    let api_key = resolve_api_key(profile, profile_name)?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    Ok(ClientConfig {
        host,
        api_key,
        tls,
        timeout,
    })
}

/// Load config and build a `ClientConfig` for `profile` (or the default).
///
/// Falls back to the environment profile when the config names no such
/// profile and `BADGEVILLE_HOST_NAME` is set.
pub fn resolve_client_config(profile: Option<&str>) -> Result<ClientConfig, ConfigError> {
    let config = load_config()?;
    match active_profile(&config, profile) {
        Ok((name, selected)) => profile_to_client_config(selected, &name, &config.defaults),
        Err(err) => match env_profile() {
            Some(env) => {
                debug!("using profile from environment");
                profile_to_client_config(&env, ENV_PROFILE, &config.defaults)
            }
            None => Err(err),
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    const SAMPLE: &str = r#"
default_profile = "staging"

[defaults]
timeout = 15

[profiles.staging]
host_name = "http://staging.badgeville.com"
api_key = "007857cd4fb9f360e120589c34fea080"

[profiles.sandbox]
host_name = "https://sandbox.badgeville.com"
api_key_env = "PATH"
timeout = 5
insecure = true
"#;

    fn sample_config() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        let config = load_config_from(&path).unwrap();
        (dir, config)
    }

    #[test]
    fn loads_profiles_and_defaults() {
        let (_dir, config) = sample_config();

        assert_eq!(config.default_profile.as_deref(), Some("staging"));
        assert_eq!(config.defaults.timeout, 15);
        assert_eq!(config.profiles.len(), 2);
        assert_eq!(
            config.profiles["staging"].host_name,
            "http://staging.badgeville.com"
        );
        assert_eq!(config.profiles["sandbox"].timeout, Some(5));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[profiles.staging\nhost_name = ").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Figment(_)));
    }

    #[test]
    fn profile_without_host_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[profiles.staging]\napi_key = \"k\"\n").unwrap();

        assert!(load_config_from(&path).is_err());
    }

    #[test]
    fn active_profile_uses_default_name() {
        let (_dir, config) = sample_config();
        let (name, profile) = active_profile(&config, None).unwrap();
        assert_eq!(name, "staging");
        assert_eq!(profile.api_key.as_deref(), Some("007857cd4fb9f360e120589c34fea080"));
    }

    #[test]
    fn active_profile_unknown_name() {
        let (_dir, config) = sample_config();
        let err = active_profile(&config, Some("production")).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProfile { ref profile } if profile == "production"));
    }

    #[test]
    fn env_var_key_wins_and_overrides_apply() {
        let (_dir, config) = sample_config();
        let (name, profile) = active_profile(&config, Some("sandbox")).unwrap();

        let client = profile_to_client_config(profile, &name, &config.defaults).unwrap();

        assert_eq!(client.host.as_str(), "https://sandbox.badgeville.com/");
        assert_eq!(
            client.api_key.expose_secret(),
            std::env::var("PATH").unwrap()
        );
        assert_eq!(client.timeout, Duration::from_secs(5));
        assert!(matches!(client.tls, TlsMode::DangerAcceptInvalid));
    }

    #[test]
    fn defaults_fill_missing_overrides() {
        let mut profile = Profile::new("http://staging.badgeville.com");
        profile.api_key_env = Some("PATH".into());
        profile.ca_cert = Some(PathBuf::from("/etc/ssl/berlin.pem"));
        let defaults = Defaults {
            insecure: false,
            timeout: 15,
        };

        let client = profile_to_client_config(&profile, "local", &defaults).unwrap();

        assert_eq!(client.timeout, Duration::from_secs(15));
        assert!(matches!(client.tls, TlsMode::CustomCa(ref p) if p == Path::new("/etc/ssl/berlin.pem")));
    }

    #[test]
    fn invalid_host_is_rejected() {
        let profile = Profile::new("not a url");
        let err = profile_to_client_config(&profile, "broken", &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "host_name"));
    }

    #[test]
    fn non_http_host_is_rejected() {
        let profile = Profile::new("ftp://staging.badgeville.com");
        let err = profile_to_client_config(&profile, "broken", &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref reason, .. } if reason.contains("ftp")));
    }
}
