//! Resolution defaults and limits.

/// Default size limit (bytes) for inlining images as data URIs.
pub const DEFAULT_INLINE_LIMIT: u64 = 8192;

/// Default number of content hash hex digits in relocated file names.
pub const DEFAULT_HASH_LENGTH: usize = 8;

/// Longest hash a relocated name can carry (full SHA-256 in hex).
pub const MAX_HASH_LENGTH: usize = 64;
