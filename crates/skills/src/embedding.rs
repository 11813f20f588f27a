//! Embedding text assembly for skill search.

use crate::{frontmatter::get_frontmatter_value, types::Frontmatter};

/// Character budget applied when the caller does not pick one.
pub const DEFAULT_EMBEDDING_MAX_CHARS: usize = 12_000;

/// A text file contributing to a skill's embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddingFile {
    pub path: String,
    pub content: String,
}

impl EmbeddingFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Inputs for [`build_embedding_text`].
#[derive(Debug, Clone)]
pub struct EmbeddingInput<'a> {
    pub frontmatter: &'a Frontmatter,
    pub readme: &'a str,
    pub files: Vec<EmbeddingFile>,
    pub max_chars: usize,
}

impl<'a> EmbeddingInput<'a> {
    pub fn new(frontmatter: &'a Frontmatter, readme: &'a str) -> Self {
        Self {
            frontmatter,
            readme,
            files: Vec::new(),
            max_chars: DEFAULT_EMBEDDING_MAX_CHARS,
        }
    }

    #[must_use]
    pub fn with_files(mut self, files: Vec<EmbeddingFile>) -> Self {
        self.files = files;
        self
    }

    #[must_use]
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }
}

/// Build the text used to embed a skill.
///
/// Parts are the `name`/`description` header, the readme, and one
/// `# {path}` section per file, separated by blank lines. The result is cut
/// to at most `max_chars` characters.
pub fn build_embedding_text(input: &EmbeddingInput<'_>) -> String {
    let header = ["name", "description"]
        .iter()
        .filter_map(|key| get_frontmatter_value(input.frontmatter, key))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    let parts = std::iter::once(header)
        .chain(std::iter::once(input.readme.to_string()))
        .chain(
            input
                .files
                .iter()
                .map(|file| format!("# {}\n{}", file.path, file.content)),
        )
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>();

    truncate_chars(parts.join("\n\n"), input.max_chars)
}

fn truncate_chars(mut text: String, max_chars: usize) -> String {
    if let Some((byte_idx, _)) = text.char_indices().nth(max_chars) {
        text.truncate(byte_idx);
    }
    text
}
