use regex::Regex;
use std::sync::OnceLock;

/// Extracts structured information from PostgreSQL constraint violation messages.
///
/// PostgreSQL reports a unique violation as
/// `duplicate key value violates unique constraint "users_email_key"` followed by
/// `DETAIL: Key (email)=(ana@example.com) already exists.`; the parser turns that
/// into `("users", "email", "ana@example.com")`.
pub struct ConstraintParser;

struct Patterns {
    key_value: Regex,
    column_name: Regex,
    relation_name: Regex,
}

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| Patterns {
        key_value: Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").expect("key/value pattern"),
        column_name: Regex::new(r#"column "([^"]+)""#).expect("column pattern"),
        relation_name: Regex::new(r#"(?:relation|table) "([^"]+)""#).expect("relation pattern"),
    })
}

impl ConstraintParser {
    /// Parses a unique violation into `(entity, field, value)`.
    ///
    /// The constraint name decides entity and field when it follows the
    /// `<table>_<column>_key` convention; the `Key (..)=(..)` detail supplies the value.
    pub fn parse_unique_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let key_value = Self::extract_key_value_from_message(message);

        if let Some((entity, field)) = constraint_name.and_then(Self::parse_constraint_name) {
            let value = key_value
                .map(|(_, value)| value)
                .unwrap_or_else(|| "duplicate_value".to_string());
            return Some((entity, field, value));
        }

        let (field, value) = key_value?;
        let entity = Self::extract_relation_from_message(message)
            .unwrap_or_else(|| "resource".to_string());
        Some((entity, field, value))
    }

    /// Parses a not-null violation into `(entity, field)`.
    pub fn parse_not_null_violation(message: &str) -> Option<(String, String)> {
        let field = Self::extract_column_from_message(message)?;
        let entity = Self::extract_relation_from_message(message)
            .unwrap_or_else(|| "resource".to_string());
        Some((entity, field))
    }

    /// Splits `<table>_<column>_<suffix>` constraint names.
    ///
    /// Multi-word columns are kept together: `users_created_at_idx` yields
    /// `("users", "created_at")`.
    pub fn parse_constraint_name(constraint_name: &str) -> Option<(String, String)> {
        let (rest, _suffix) = constraint_name.rsplit_once('_')?;
        let (entity, field) = rest.split_once('_')?;
        if entity.is_empty() || field.is_empty() {
            return None;
        }
        Some((entity.to_string(), field.to_string()))
    }

    pub fn extract_key_value_from_message(message: &str) -> Option<(String, String)> {
        patterns().key_value.captures(message).and_then(|caps| {
            let field = caps.get(1)?.as_str().to_string();
            let value = caps.get(2)?.as_str().to_string();
            Some((field, value))
        })
    }

    pub fn extract_column_from_message(message: &str) -> Option<String> {
        patterns()
            .column_name
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    pub fn extract_relation_from_message(message: &str) -> Option<String> {
        patterns()
            .relation_name
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMAIL_VIOLATION: &str = "duplicate key value violates unique constraint \"users_email_key\"\nDETAIL: Key (email)=(ana@example.com) already exists.";

    #[test]
    fn test_parse_unique_violation_with_constraint_name() {
        let result = ConstraintParser::parse_unique_violation(EMAIL_VIOLATION, Some("users_email_key"));
        assert_eq!(
            result,
            Some((
                "users".to_string(),
                "email".to_string(),
                "ana@example.com".to_string()
            ))
        );
    }

    #[test]
    fn test_parse_unique_violation_without_constraint_name() {
        let result = ConstraintParser::parse_unique_violation(EMAIL_VIOLATION, None);
        assert_eq!(
            result,
            Some((
                "resource".to_string(),
                "email".to_string(),
                "ana@example.com".to_string()
            ))
        );
    }

    #[test]
    fn test_parse_unique_violation_without_detail() {
        let message = "duplicate key value violates unique constraint \"users_email_key\"";
        let result = ConstraintParser::parse_unique_violation(message, Some("users_email_key"));
        assert_eq!(
            result,
            Some((
                "users".to_string(),
                "email".to_string(),
                "duplicate_value".to_string()
            ))
        );
    }

    #[test]
    fn test_parse_not_null_violation_with_relation() {
        let message = "null value in column \"name\" of relation \"users\" violates not-null constraint";
        assert_eq!(
            ConstraintParser::parse_not_null_violation(message),
            Some(("users".to_string(), "name".to_string()))
        );
    }

    #[test]
    fn test_parse_constraint_name() {
        assert_eq!(
            ConstraintParser::parse_constraint_name("users_email_key"),
            Some(("users".to_string(), "email".to_string()))
        );
        assert_eq!(
            ConstraintParser::parse_constraint_name("users_created_at_idx"),
            Some(("users".to_string(), "created_at".to_string()))
        );
        assert_eq!(ConstraintParser::parse_constraint_name("invalid"), None);
        assert_eq!(ConstraintParser::parse_constraint_name("users_pkey"), None);
    }

    #[test]
    fn test_unrelated_message_is_not_parsed() {
        let message = "connection reset by peer";
        assert_eq!(ConstraintParser::parse_unique_violation(message, None), None);
        assert_eq!(ConstraintParser::parse_not_null_violation(message), None);
    }
}
