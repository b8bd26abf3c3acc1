//! Content-addressed file naming.

use std::path::Path;

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of `data` (64 characters).
pub(crate) fn content_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Build `<stem>.<hash>.<ext>` from the original file name.
///
/// Files without an extension become `<stem>.<hash>`.
pub(crate) fn hashed_file_name(path: &Path, hash: &str) -> String {
    let stem = path
        .file_stem()
        .map_or_else(|| "asset".into(), |s| s.to_string_lossy());

    match path.extension() {
        Some(ext) => format!("{stem}.{hash}.{}", ext.to_string_lossy()),
        None => format!("{stem}.{hash}"),
    }
}
