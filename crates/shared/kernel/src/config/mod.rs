use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default configuration file, resolved against the working directory (extension optional).
pub const DEFAULT_CONFIG_PATH: &str = "config/server";

/// Prefix of environment overrides, e.g. `CAPHUB__SERVER__PORT=9000`.
pub const ENV_PREFIX: &str = "CAPHUB";

#[caphub_derive::caphub_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads configuration from a file layered with environment overrides.
///
/// 1. **Base file**: `path`, or [`DEFAULT_CONFIG_PATH`] when `None`. The extension may be
///    omitted; any format the `config` crate knows (`toml`, `json`, `yaml`, ...) is accepted.
/// 2. **Environment**: variables prefixed with `CAPHUB__`, nested with double underscores
///    (`CAPHUB__SECURITY__SESSION__TTL_SECONDS` maps to `security.session.ttl_seconds`).
///
/// # Errors
/// Fails when the file is missing or its content does not match `T`.
///
/// # Example
/// ```rust
/// use caphub_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), |p| p.as_ref().to_path_buf());

    info!("Loading config from {}", effective_path.display());

    Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .convert_case(config::Case::Snake),
        )
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}

#[cfg(test)]
mod tests {
    use super::*;
    use caphub_domain::config::ApiConfig;
    use std::fs;

    #[test]
    fn loads_toml_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("server.toml"),
            "[server]\nport = 9100\n\n[security.session]\nttl_seconds = 120\n",
        )
        .unwrap();

        let cfg: ApiConfig = load_config(Some(dir.path().join("server"))).unwrap();
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.security.session.ttl_seconds, 120);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config::<ApiConfig>(Some(dir.path().join("absent"))).unwrap_err();
        assert!(err.to_string().contains("Failed to build config"));
    }
}
