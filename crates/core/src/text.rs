//! Key normalization shared by every text index.

use alloc::string::String;

/// Trims surrounding whitespace and case-folds a text key.
///
/// Both indexing and lookup go through this function, which makes field
/// indexes case- and whitespace-insensitive.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Case-insensitive sort key used to order query results by title.
pub fn title_sort_key(title: &str) -> String {
    title.to_lowercase()
}
