use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{DatabaseSettings, LogFormat, LoggingSettings, ServerSettings, Settings};

/// The file read when no explicit path is given. It is optional.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Loads the application configuration.
///
/// Sources are layered: built-in defaults, then the TOML file, then
/// `FYYUR__SECTION__KEY` environment variables. An explicit `path` must exist;
/// the default `config.toml` may be absent.
pub fn load_config(path: Option<&Path>) -> Result<Settings, ConfigError> {
    build(path, environment())
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("FYYUR")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

fn build(path: Option<&Path>, env: config::Environment) -> Result<Settings, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(env)
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    tracing::debug!(?settings, "Configuration loaded.");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env_from(pairs: &[(&str, &str)]) -> config::Environment {
        let map: config::Map<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(map))
    }

    fn toml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("tempfile");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn defaults_apply_without_sources() {
        let settings = build(None, env_from(&[])).expect("defaults");
        assert_eq!(settings.server.port, 5000);
        assert_eq!(settings.database.max_connections, 10);
        assert_eq!(settings.logging.format, LogFormat::Full);
        assert!(settings.logging.directory.is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let file = toml_file(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [database]
            url = "postgres://localhost/fyyur"

            [logging]
            format = "compact"
            directory = "logs"
            "#,
        );
        let settings = build(Some(file.path()), env_from(&[])).expect("settings");
        assert_eq!(settings.server.socket_addr().unwrap().to_string(), "0.0.0.0:8080");
        assert_eq!(
            settings.database.resolved_url().unwrap(),
            "postgres://localhost/fyyur"
        );
        assert_eq!(settings.logging.format, LogFormat::Compact);
        assert_eq!(settings.logging.file_prefix, "fyyur.log");
    }

    #[test]
    fn environment_overrides_file() {
        let file = toml_file("[server]\nport = 8080\n");
        let settings = build(
            Some(file.path()),
            env_from(&[("FYYUR__SERVER__PORT", "9090")]),
        )
        .expect("settings");
        assert_eq!(settings.server.port, 9090);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let result = build(Some(Path::new("/nonexistent/fyyur.toml")), env_from(&[]));
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn zero_port_is_rejected() {
        let file = toml_file("[server]\nport = 0\n");
        let result = build(Some(file.path()), env_from(&[]));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn hostname_is_not_an_ip() {
        let file = toml_file("[server]\nhost = \"localhost\"\n");
        let result = build(Some(file.path()), env_from(&[]));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
