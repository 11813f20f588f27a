//! Config schema types.

use serde::{Deserialize, Serialize};

/// Character budget for embedding text when nothing else is configured.
pub const DEFAULT_EMBEDDING_MAX_CHARS: usize = 12_000;

/// Files larger than this are not loaded as embedding input.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 512 * 1024;

/// Root config document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JovhubConfig {
    pub skills: SkillsConfig,
}

/// Skill ingestion configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillsConfig {
    /// Hard character cap applied to the assembled embedding text.
    #[serde(default = "default_embedding_max_chars")]
    pub embedding_max_chars: usize,
    /// Extensions (without the dot) treated as text in addition to the built-in list.
    pub extra_text_extensions: Vec<String>,
    /// Mime types treated as text in addition to `text/*` and the built-in list.
    pub extra_text_mime_types: Vec<String>,
    /// Skip files above this size when collecting embedding input.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

impl Default for SkillsConfig {
    fn default() -> Self {
        Self {
            embedding_max_chars: DEFAULT_EMBEDDING_MAX_CHARS,
            extra_text_extensions: Vec::new(),
            extra_text_mime_types: Vec::new(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

fn default_embedding_max_chars() -> usize {
    DEFAULT_EMBEDDING_MAX_CHARS
}

fn default_max_file_bytes() -> u64 {
    DEFAULT_MAX_FILE_BYTES
}
