//! Skill documents: header parsing, metadata resolution, and the inputs
//! registries derive from a skill package (embedding text, file-set digest).
//!
//! A skill is a `SKILL.md` file with a `---` delimited header followed by
//! markdown instructions, optionally shipped with supporting files.

pub mod embedding;
pub mod error;
pub mod frontmatter;
pub mod hash;
pub mod metadata;
pub mod parse;
pub mod path;
pub mod requirements;
pub mod text;
pub mod types;

pub use {
    embedding::{
        DEFAULT_EMBEDDING_MAX_CHARS, EmbeddingFile, EmbeddingInput, build_embedding_text,
    },
    error::{Error, Result},
    frontmatter::{get_frontmatter_value, parse_frontmatter, split_frontmatter},
    hash::{hash_skill_files, sha256_hex},
    metadata::{get_frontmatter_metadata, parse_jovis_metadata},
    parse::{parse_skill, parse_skill_document, validate_name},
    path::sanitize_path,
    text::{TextClassifier, is_text_file},
    types::*,
};
