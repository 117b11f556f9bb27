// Configuration loading and parsing (pokedraft.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::draft::DraftSettings;

pub const CONFIG_FILE: &str = "pokedraft.toml";

pub const DEFAULT_POKEAPI_BASE_URL: &str = "https://pokeapi.co/api/v2";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub pokeapi: PokeApiConfig,
    #[serde(default)]
    pub draft: DraftSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokeApiConfig {
    /// Root of the REST API. Defaults to the public PokeAPI.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout. A timed out lookup counts as a transient failure.
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_POKEAPI_BASE_URL.to_string()
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/pokedraft.toml` relative to `base_dir`.
///
/// Does not copy defaults; prefer `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config = parse_config(&text).map_err(|source| ConfigError::ParseError {
        path: path.clone(),
        source,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Parse a config document without validating it.
pub fn parse_config(text: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(text)
}

/// Seed `config/pokedraft.toml` from `defaults/pokedraft.toml` when it is
/// missing. Returns the path written, or `None` when a config already exists.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    if !source.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "neither {} nor {} exists; run from the project root",
                target.display(),
                source.display()
            ),
        });
    }

    if let Some(config_dir) = target.parent() {
        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", config_dir.display()),
        })?;
    }
    std::fs::copy(&source, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {} to {}: {e}", source.display(), target.display()),
    })?;

    Ok(Some(target))
}

/// Loads config relative to the current working directory, seeding it from
/// defaults first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_file(&cwd)?;
    load_config_from(&cwd)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.server.host.trim().is_empty() {
        return Err(invalid("server.host", "must not be empty"));
    }
    if config.server.port == 0 {
        return Err(invalid("server.port", "must be greater than 0"));
    }

    if config.pokeapi.base_url.trim().is_empty() {
        return Err(invalid("pokeapi.base_url", "must not be empty"));
    }
    if config.pokeapi.timeout_secs == 0 {
        return Err(invalid("pokeapi.timeout_secs", "must be greater than 0"));
    }

    let draft = &config.draft;
    let count_fields: &[(&str, usize)] = &[
        ("draft.pick_count", draft.pick_count),
        ("draft.options_per_pick", draft.options_per_pick),
        ("draft.family_count", draft.family_count as usize),
        ("draft.max_attempts_per_slot", draft.max_attempts_per_slot as usize),
    ];
    for (name, val) in count_fields {
        if *val == 0 {
            return Err(invalid(name, "must be greater than 0"));
        }
    }

    if let Some(id) = draft
        .skip_chain_ids
        .iter()
        .find(|id| **id == 0 || **id > draft.family_count)
    {
        return Err(invalid(
            "draft.skip_chain_ids",
            &format!("id {id} is outside 1..={}", draft.family_count),
        ));
    }

    let drawable = draft.drawable_id_count();
    if draft.options_per_pick > drawable {
        return Err(invalid(
            "draft.options_per_pick",
            &format!(
                "cannot exceed the {drawable} ids left after skip_chain_ids, got {}",
                draft.options_per_pick
            ),
        ));
    }

    let slots = draft.pick_count.saturating_mul(draft.options_per_pick);
    if draft.unique_across_draft && slots > drawable {
        return Err(invalid(
            "draft.unique_across_draft",
            &format!("needs {slots} distinct families but only {drawable} ids can be drawn"),
        ));
    }

    Ok(())
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_string(),
        message: message.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const MINIMAL: &str = r#"
[server]
host = "127.0.0.1"
port = 5000

[pokeapi]
base_url = "https://pokeapi.co/api/v2"
timeout_secs = 10
"#;

    fn write_config(text: &str) -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        let config_dir = tmp.path().join("config");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join(CONFIG_FILE), text).unwrap();
        tmp
    }

    fn expect_field(err: ConfigError, expected: &str) {
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn minimal_config_uses_draft_defaults() {
        let tmp = write_config(MINIMAL);
        let config = load_config_from(tmp.path()).expect("should load minimal config");

        assert_eq!(config.server.bind_addr(), "127.0.0.1:5000");
        assert_eq!(config.pokeapi.timeout_secs, 10);
        assert_eq!(config.draft, DraftSettings::default());
    }

    #[test]
    fn draft_table_overrides_defaults() {
        let text = format!(
            "{MINIMAL}\n[draft]\npick_count = 3\nunique_across_draft = true\nskip_chain_ids = []\n"
        );
        let tmp = write_config(&text);
        let config = load_config_from(tmp.path()).unwrap();

        assert_eq!(config.draft.pick_count, 3);
        assert_eq!(config.draft.options_per_pick, 4);
        assert!(config.draft.unique_across_draft);
        assert!(config.draft.skip_chain_ids.is_empty());
    }

    #[test]
    fn missing_file_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load_config_from(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let tmp = write_config("[server\nhost = ");
        let err = load_config_from(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn missing_section_is_parse_error() {
        let tmp = write_config("[server]\nhost = \"0.0.0.0\"\nport = 80\n");
        let err = load_config_from(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn rejects_port_zero() {
        let tmp = write_config(&MINIMAL.replace("port = 5000", "port = 0"));
        expect_field(load_config_from(tmp.path()).unwrap_err(), "server.port");
    }

    #[test]
    fn rejects_timeout_zero() {
        let tmp = write_config(&MINIMAL.replace("timeout_secs = 10", "timeout_secs = 0"));
        expect_field(
            load_config_from(tmp.path()).unwrap_err(),
            "pokeapi.timeout_secs",
        );
    }

    #[test]
    fn rejects_empty_base_url() {
        let tmp = write_config(&MINIMAL.replace("https://pokeapi.co/api/v2", " "));
        expect_field(load_config_from(tmp.path()).unwrap_err(), "pokeapi.base_url");
    }

    #[test]
    fn rejects_zero_attempts() {
        let text = format!("{MINIMAL}\n[draft]\nmax_attempts_per_slot = 0\n");
        let tmp = write_config(&text);
        expect_field(
            load_config_from(tmp.path()).unwrap_err(),
            "draft.max_attempts_per_slot",
        );
    }

    #[test]
    fn rejects_more_options_than_families() {
        let text = format!(
            "{MINIMAL}\n[draft]\nfamily_count = 3\noptions_per_pick = 4\nskip_chain_ids = []\n"
        );
        let tmp = write_config(&text);
        expect_field(
            load_config_from(tmp.path()).unwrap_err(),
            "draft.options_per_pick",
        );
    }

    #[test]
    fn rejects_skip_id_out_of_range() {
        let text = format!("{MINIMAL}\n[draft]\nfamily_count = 100\nskip_chain_ids = [7, 210]\n");
        let tmp = write_config(&text);
        expect_field(
            load_config_from(tmp.path()).unwrap_err(),
            "draft.skip_chain_ids",
        );
    }

    #[test]
    fn omitted_base_url_falls_back_to_public_api() {
        let text = MINIMAL.replace("base_url = \"https://pokeapi.co/api/v2\"\n", "");
        let tmp = write_config(&text);
        let config = load_config_from(tmp.path()).unwrap();
        assert_eq!(config.pokeapi.base_url, DEFAULT_POKEAPI_BASE_URL);
    }

    #[test]
    fn rejects_options_exceeding_ids_left_after_skips() {
        let text = format!(
            "{MINIMAL}\n[draft]\nfamily_count = 4\noptions_per_pick = 4\nskip_chain_ids = [1]\n"
        );
        let tmp = write_config(&text);
        expect_field(
            load_config_from(tmp.path()).unwrap_err(),
            "draft.options_per_pick",
        );
    }

    #[test]
    fn duplicate_skip_ids_count_once() {
        let text = format!(
            "{MINIMAL}\n[draft]\nfamily_count = 5\noptions_per_pick = 4\nskip_chain_ids = [2, 2]\n"
        );
        let tmp = write_config(&text);
        assert!(load_config_from(tmp.path()).is_ok());
    }

    #[test]
    fn rejects_unique_across_draft_without_enough_families() {
        let text = format!(
            "{MINIMAL}\n[draft]\nfamily_count = 10\nunique_across_draft = true\n\
             skip_chain_ids = []\n"
        );
        let tmp = write_config(&text);
        expect_field(
            load_config_from(tmp.path()).unwrap_err(),
            "draft.unique_across_draft",
        );
    }

    #[test]
    fn accepts_unique_across_draft_with_exactly_enough_families() {
        let text = format!(
            "{MINIMAL}\n[draft]\nfamily_count = 34\nunique_across_draft = true\n\
             skip_chain_ids = [3, 9]\n"
        );
        let tmp = write_config(&text);
        assert!(load_config_from(tmp.path()).is_ok());
    }

    #[test]
    fn ensure_config_file_seeds_from_defaults_once() {
        let tmp = tempfile::tempdir().unwrap();
        let defaults = tmp.path().join("defaults");
        fs::create_dir_all(&defaults).unwrap();
        fs::write(defaults.join(CONFIG_FILE), MINIMAL).unwrap();

        let written = ensure_config_file(tmp.path()).unwrap();
        assert_eq!(written, Some(tmp.path().join("config").join(CONFIG_FILE)));

        // An edited config is left alone on the next start.
        fs::write(
            tmp.path().join("config").join(CONFIG_FILE),
            MINIMAL.replace("5000", "6000"),
        )
        .unwrap();
        assert_eq!(ensure_config_file(tmp.path()).unwrap(), None);
        let config = load_config_from(tmp.path()).unwrap();
        assert_eq!(config.server.port, 6000);
    }

    #[test]
    fn ensure_config_file_without_defaults_or_config_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = ensure_config_file(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::DefaultsCopyError { .. }));
    }

    #[test]
    fn ensure_config_file_with_existing_config_is_noop() {
        let tmp = write_config(MINIMAL);
        assert_eq!(ensure_config_file(tmp.path()).unwrap(), None);
    }
}
