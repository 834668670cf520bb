//! SQL utility functions

/// Escape SQL LIKE metacharacters (%, _, \) in user input
///
/// Patterns built from the result must be matched with `ESCAPE '\'`.
pub fn escape_like_pattern(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Build an unanchored LIKE pattern matching `s` anywhere in the value
///
/// ```
/// use storefront_server::utils::sql::contains_pattern;
///
/// assert_eq!(contains_pattern("100% cotton"), "%100\\% cotton%");
/// ```
pub fn contains_pattern(s: &str) -> String {
    format!("%{}%", escape_like_pattern(s))
}

/// Case fold for stored search columns and the keywords matched against them.
///
/// Full Unicode lowercasing; SQLite's own `LIKE` only folds ASCII.
pub fn fold_case(s: &str) -> String {
    s.to_lowercase()
}
