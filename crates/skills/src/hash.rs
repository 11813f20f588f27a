//! Content digests for skill file sets.

use sha2::{Digest, Sha256};

use crate::types::FileEntry;

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: impl AsRef<[u8]>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes.as_ref());
    format!("{:x}", hasher.finalize())
}

/// Digest of a file set, independent of the order the entries are given in.
///
/// Entries are sorted by path and folded into `path:sha256` lines joined by
/// `\n`, which are then hashed. Paths are assumed unique.
pub fn hash_skill_files(files: &[FileEntry]) -> String {
    let mut sorted: Vec<&FileEntry> = files.iter().collect();
    sorted.sort_by(|a, b| a.path.cmp(&b.path));

    let manifest = sorted
        .iter()
        .map(|f| format!("{}:{}", f.path, f.sha256))
        .collect::<Vec<_>>()
        .join("\n");
    sha256_hex(manifest)
}
