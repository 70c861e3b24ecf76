//! Configuration file parsing.
//!
//! Every section and key is optional; a missing or partial file yields the
//! built-in defaults, so a bare deployment needs no config file at all.

use std::{fs, path::Path};

use crate::{Config, ConfigError};

/// Loads a configuration file from disk.
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<Config, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_config_yields_defaults() {
        let config = parse_config_str("", Path::new("test.toml")).unwrap();
        assert_eq!(config.settings.stemmer, "english");
        assert_eq!(config.fields.base, vec!["name", "key"]);
    }

    #[test]
    fn partial_config_overrides_only_named_keys() {
        let config = parse_config_str(
            r#"
            [settings]
            stemmer = "danish"

            [fields.member]
            search = ["email"]
            load = ["email"]
            "#,
            Path::new("test.toml"),
        )
        .unwrap();

        assert_eq!(config.settings.stemmer, "danish");
        assert_eq!(config.settings.max_page_size, 500);
        assert_eq!(config.fields.member.search, vec!["email"]);
        // Untouched categories keep their defaults.
        assert_eq!(config.fields.document.search, vec!["body", "tags"]);
    }

    #[test]
    fn invalid_toml_reports_path() {
        let err = parse_config_str("settings = nonsense", Path::new("broken.toml")).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[settings]\nmax_page_size = 25").unwrap();

        let config = load_config_file(file.path()).unwrap();
        assert_eq!(config.settings.max_page_size, 25);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_config_file(Path::new("/nonexistent/canopy.toml")).unwrap_err();
        assert!(err.to_string().contains("canopy.toml"));
    }
}
