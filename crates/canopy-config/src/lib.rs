//! Search configuration for canopy back-office search.
//!
//! A [`Config`] carries:
//! - [`Settings`] - analyzer language and paging limits
//! - [`SearchFields`] - which fields are searched and loaded per category
//!
//! Configuration is read from a single TOML file ([`load_config_file`]) with
//! serde defaults throughout, so a missing file or a file that sets only one
//! key both work.
//!
//! # Example
//!
//! ```
//! use canopy_config::Config;
//!
//! let config = Config::default();
//! assert_eq!(config.settings.stemmer, "english");
//! let member = config.fields.search_fields(&config.fields.member);
//! assert!(member.contains(&"email".to_string()));
//! ```

#![warn(missing_docs)]

mod error;
mod fields;
mod parse;

use serde::Deserialize;

pub use error::ConfigError;
pub use fields::{CategoryFields, SearchFields};
pub use parse::{load_config_file, parse_config_str};

/// Complete search configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub settings: Settings,
    /// Field sets per entity category.
    pub fields: SearchFields,
}

/// General search settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Stemming language for the text analyzer.
    pub stemmer: String,
    /// Upper bound on the page size a single request may ask for.
    pub max_page_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stemmer: "english".to_string(),
            max_page_size: 500,
        }
    }
}
