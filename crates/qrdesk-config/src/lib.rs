//! Configuration for the qrdesk terminal client.
//!
//! TOML profiles naming backend URLs, environment overrides, and
//! translation to `qrdesk_core::BackendConfig`. Command-line flags are
//! layered on top by the binary through [`resolve_backend`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use qrdesk_core::BackendConfig;

/// Backend origin used when neither a flag nor a profile names one.
pub const DEFAULT_URL: &str = "http://localhost:8080";

const DEFAULT_PROFILE: &str = "default";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unknown profile '{name}'")]
    UnknownProfile { name: String },

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
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is requested.
    pub default_profile: Option<String>,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some(DEFAULT_PROFILE.into()),
            profiles: HashMap::new(),
        }
    }
}

/// A named backend profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Backend origin (e.g., "http://localhost:8080").
    #[serde(default = "default_url")]
    pub url: String,

    /// Per-request timeout in seconds. Unset waits indefinitely.
    pub timeout: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout: None,
        }
    }
}

fn default_url() -> String {
    DEFAULT_URL.into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "qrdesk", "qrdesk").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("qrdesk");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the platform path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + environment. A missing file is not an error.
///
/// Environment keys use `__` for nesting:
/// `QRDESK_PROFILES__STAGING__URL=http://staging:8080`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("QRDESK_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Resolution ──────────────────────────────────────────────────────

/// Build a `BackendConfig` from a single profile.
pub fn profile_to_backend_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<BackendConfig, ConfigError> {
    let url = parse_url(&profile.url).map_err(|reason| ConfigError::Validation {
        field: format!("profiles.{profile_name}.url"),
        reason,
    })?;

    Ok(BackendConfig::new(url).with_timeout(profile.timeout.map(Duration::from_secs)))
}

/// Pick the backend for this run.
///
/// Precedence: `url_override` > requested or default profile > built-in
/// default. Asking for a profile that does not exist is an error; a missing
/// *default* profile silently falls back to [`DEFAULT_URL`].
pub fn resolve_backend(
    config: &Config,
    profile_override: Option<&str>,
    url_override: Option<&str>,
) -> Result<BackendConfig, ConfigError> {
    let profile = match profile_override {
        Some(name) => Some((
            name,
            config
                .profiles
                .get(name)
                .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })?,
        )),
        None => {
            let name = config.default_profile.as_deref().unwrap_or(DEFAULT_PROFILE);
            config.profiles.get(name).map(|p| (name, p))
        }
    };

    let mut backend = match profile {
        Some((name, profile)) => profile_to_backend_config(profile, name)?,
        None => profile_to_backend_config(&Profile::default(), DEFAULT_PROFILE)?,
    };

    if let Some(raw) = url_override {
        backend.url = parse_url(raw).map_err(|reason| ConfigError::Validation {
            field: "--url".into(),
            reason,
        })?;
    }

    Ok(backend)
}

fn parse_url(raw: &str) -> Result<url::Url, String> {
    let url = url::Url::parse(raw).map_err(|e| format!("{raw}: {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("{raw}: unsupported scheme '{other}'")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;

    use super::*;

    const SAMPLE: &str = r#"
default_profile = "local"

[profiles.local]
url = "http://localhost:9090"

[profiles.staging]
url = "https://qr.example.com"
timeout = 15
"#;

    // Loading reads the process environment, so every test that loads runs
    // inside a `Jail` to stay isolated from `set_env` in its neighbours.

    #[test]
    fn missing_file_gives_defaults() {
        Jail::expect_with(|_| {
            let config = load_config_from(Path::new("absent.toml")).unwrap();
            assert_eq!(config.default_profile.as_deref(), Some("default"));
            assert!(config.profiles.is_empty());

            let backend = resolve_backend(&config, None, None).unwrap();
            assert_eq!(backend.url.as_str(), "http://localhost:8080/");
            assert!(backend.timeout.is_none());
            Ok(())
        });
    }

    #[test]
    fn default_profile_from_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", SAMPLE)?;
            let config = load_config_from(Path::new("config.toml")).unwrap();

            let backend = resolve_backend(&config, None, None).unwrap();
            assert_eq!(backend.url.as_str(), "http://localhost:9090/");
            Ok(())
        });
    }

    #[test]
    fn named_profile_carries_timeout() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", SAMPLE)?;
            let config = load_config_from(Path::new("config.toml")).unwrap();

            let backend = resolve_backend(&config, Some("staging"), None).unwrap();
            assert_eq!(backend.url.host_str(), Some("qr.example.com"));
            assert_eq!(backend.timeout, Some(Duration::from_secs(15)));
            Ok(())
        });
    }

    #[test]
    fn url_flag_wins_over_profile() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", SAMPLE)?;
            let config = load_config_from(Path::new("config.toml")).unwrap();

            let backend =
                resolve_backend(&config, Some("staging"), Some("http://10.0.0.5:8080")).unwrap();
            assert_eq!(backend.url.as_str(), "http://10.0.0.5:8080/");
            assert_eq!(backend.timeout, Some(Duration::from_secs(15)));
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", SAMPLE)?;
            jail.set_env("QRDESK_DEFAULT_PROFILE", "staging");
            jail.set_env("QRDESK_PROFILES__STAGING__URL", "http://override:8081");

            let config = load_config_from(Path::new("config.toml")).unwrap();
            let backend = resolve_backend(&config, None, None).unwrap();

            assert_eq!(backend.url.as_str(), "http://override:8081/");
            assert_eq!(backend.timeout, Some(Duration::from_secs(15)));
            Ok(())
        });
    }

    #[test]
    fn unknown_profile_is_rejected() {
        let config = Config::default();
        assert!(matches!(
            resolve_backend(&config, Some("prod"), None),
            Err(ConfigError::UnknownProfile { name }) if name == "prod"
        ));
    }

    #[test]
    fn invalid_urls_are_rejected() {
        let profile = Profile {
            url: "ftp://files".into(),
            timeout: None,
        };
        assert!(matches!(
            profile_to_backend_config(&profile, "bad"),
            Err(ConfigError::Validation { .. })
        ));
        assert!(matches!(
            resolve_backend(&Config::default(), None, Some("not a url")),
            Err(ConfigError::Validation { field, .. }) if field == "--url"
        ));
    }
}
