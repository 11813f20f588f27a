//! Configuration schema and loading for jovhub.
//!
//! Config files may be `toml`, `yaml`/`yml`, or `json`; the format is picked
//! from the file extension. `${ENV_VAR}` placeholders are substituted in the
//! raw text before parsing.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{load_config, load_or_default, parse_config},
    schema::{DEFAULT_EMBEDDING_MAX_CHARS, DEFAULT_MAX_FILE_BYTES, JovhubConfig, SkillsConfig},
};
