//! Category labels

/// Label used when a story has no usable category.
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// Normalize a raw category label.
///
/// Surrounding whitespace is removed; a label that is empty afterwards becomes
/// [`DEFAULT_CATEGORY`].
#[must_use]
pub fn normalize_category(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        DEFAULT_CATEGORY.to_string()
    } else {
        trimmed.to_string()
    }
}
