//! Text/binary classification for files that feed the embedding corpus.

/// Extensions treated as text regardless of mime type.
const TEXT_EXTENSIONS: &[&str] = &[
    // Docs
    "md", "mdx", "markdown", "txt", "rst", "adoc", "org",
    // Data / config
    "json", "json5", "jsonc", "yaml", "yml", "toml", "ini", "cfg", "conf", "env", "csv", "tsv",
    "xml", "svg", "plist", "nix", "lock",
    // Web
    "html", "htm", "css", "scss", "sass", "less",
    // Scripts and source
    "sh", "bash", "zsh", "fish", "ps1", "py", "rb", "pl", "lua", "js", "mjs", "cjs", "jsx", "ts",
    "mts", "cts", "tsx", "go", "rs", "swift", "kt", "kts", "java", "scala", "c", "h", "cc",
    "cpp", "hpp", "cs", "php", "sql", "graphql", "proto", "r", "dart", "ex", "exs", "zig",
];

/// Non-`text/*` mime types that carry structured text.
const TEXT_MIME_TYPES: &[&str] = &[
    "application/json",
    "application/ld+json",
    "application/xml",
    "application/yaml",
    "application/x-yaml",
    "application/toml",
    "application/javascript",
    "application/typescript",
    "application/x-sh",
    "application/sql",
    "application/graphql",
    "image/svg+xml",
];

/// Decide whether a file should be read as text, using the built-in lists only.
pub fn is_text_file(path: &str, mime_type: Option<&str>) -> bool {
    TextClassifier::default().is_text_file(path, mime_type)
}

/// Text classifier with optional extra extensions and mime types.
#[derive(Debug, Clone, Default)]
pub struct TextClassifier {
    extra_extensions: Vec<String>,
    extra_mime_types: Vec<String>,
}

impl TextClassifier {
    pub fn new(
        extra_extensions: impl IntoIterator<Item = String>,
        extra_mime_types: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            extra_extensions: extra_extensions
                .into_iter()
                .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
            extra_mime_types: extra_mime_types
                .into_iter()
                .map(|m| m.trim().to_ascii_lowercase())
                .filter(|m| !m.is_empty())
                .collect(),
        }
    }

    pub fn is_text_file(&self, path: &str, mime_type: Option<&str>) -> bool {
        if let Some(mime) = mime_type
            && self.is_text_mime(mime)
        {
            return true;
        }
        self.has_text_extension(path)
    }

    fn is_text_mime(&self, mime: &str) -> bool {
        // Drop parameters such as `; charset=utf-8`.
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        essence.starts_with("text/")
            || TEXT_MIME_TYPES.contains(&essence.as_str())
            || self.extra_mime_types.iter().any(|m| *m == essence)
    }

    fn has_text_extension(&self, path: &str) -> bool {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        // Dotfiles like `.env` are classified by the part after the dot.
        let Some((_, ext)) = file_name.rsplit_once('.') else {
            return false;
        };
        self.known_extension(&ext.to_ascii_lowercase())
    }

    fn known_extension(&self, ext: &str) -> bool {
        TEXT_EXTENSIONS.contains(&ext) || self.extra_extensions.iter().any(|e| e == ext)
    }
}
