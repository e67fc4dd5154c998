//! SQL identifier validation.
//!
//! Column and table names are interpolated into generated SQL, so they are
//! checked once when a builder or [`KeysetColumns`](crate::KeysetColumns) is
//! constructed. Values never are: they always travel as bound parameters.

/// Maximum length for SQL identifiers (`PostgreSQL` limit is 63).
const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Validate that a string is a safe SQL identifier.
///
/// A valid SQL identifier starts with an ASCII letter or underscore, contains
/// only ASCII letters, digits and underscores, and is 1-63 characters long.
///
/// # Examples
///
/// ```
/// use skyvault_paging::is_valid_sql_identifier;
///
/// assert!(is_valid_sql_identifier("file_info"));
/// assert!(is_valid_sql_identifier("_updated_at"));
///
/// assert!(!is_valid_sql_identifier(""));
/// assert!(!is_valid_sql_identifier("1name"));
/// assert!(!is_valid_sql_identifier("name; DROP TABLE files"));
/// ```
#[inline]
#[must_use]
pub fn is_valid_sql_identifier(s: &str) -> bool {
    if s.is_empty() || s.len() > MAX_IDENTIFIER_LENGTH {
        return false;
    }

    let mut chars = s.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {},
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Check an identifier that came from configuration or user input.
///
/// The error carries the rejected name.
pub fn check_sql_identifier(s: &str, context: &'static str) -> Result<(), crate::Error> {
    if is_valid_sql_identifier(s) {
        Ok(())
    } else {
        Err(crate::Error::InvalidIdentifier {
            context,
            name: s.to_string(),
        })
    }
}

/// Assert that a string is a valid SQL identifier.
///
/// # Panics
///
/// Panics with a descriptive error if the identifier is invalid.
/// This is intended for programmer errors (invalid table/column names in code),
/// not for user input validation; use [`check_sql_identifier`] for that.
#[inline]
pub fn assert_valid_sql_identifier(s: &str, context: &str) {
    assert!(
        is_valid_sql_identifier(s),
        "Invalid SQL {context} name '{s}': must start with letter/underscore, \
             contain only ASCII alphanumeric/underscore, and be 1-63 chars"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_sql_identifiers() {
        assert!(is_valid_sql_identifier("files"));
        assert!(is_valid_sql_identifier("owner_id"));
        assert!(is_valid_sql_identifier("_private"));
        assert!(is_valid_sql_identifier("Table123"));
        assert!(is_valid_sql_identifier("a"));
    }

    #[test]
    fn test_invalid_sql_identifiers() {
        assert!(!is_valid_sql_identifier(""));
        assert!(!is_valid_sql_identifier("123abc"));
        assert!(!is_valid_sql_identifier("updated-at"));
        assert!(!is_valid_sql_identifier("file.name"));
        assert!(!is_valid_sql_identifier("name ASC"));
        assert!(!is_valid_sql_identifier("files--"));
        assert!(!is_valid_sql_identifier("(SELECT 1)"));
        assert!(!is_valid_sql_identifier("usërs"));
        assert!(!is_valid_sql_identifier("files\u{200B}"));
    }

    #[test]
    fn test_sql_identifier_length_limit() {
        assert!(is_valid_sql_identifier(&"a".repeat(63)));
        assert!(!is_valid_sql_identifier(&"a".repeat(64)));
    }

    #[test]
    fn test_check_sql_identifier_reports_name() {
        assert!(check_sql_identifier("name", "sort column").is_ok());

        let err = check_sql_identifier("name;", "sort column").unwrap_err();
        assert_eq!(err.to_string(), "invalid SQL sort column name 'name;'");
    }

    #[test]
    #[should_panic(expected = "Invalid SQL table name")]
    fn test_assert_valid_identifier_panics() {
        assert_valid_sql_identifier("files; DROP TABLE", "table");
    }
}
