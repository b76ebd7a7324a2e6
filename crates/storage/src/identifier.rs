//! Table and schema name validation.
//!
//! Names are interpolated into SQL text (they cannot be bound), so only
//! plain identifiers are accepted and they are always double-quoted.

use movies_etl_core::PG_MAX_IDENTIFIER_LEN;

use crate::error::StorageError;

pub fn validate_identifier(name: &str) -> Result<(), StorageError> {
    let invalid = |reason: String| StorageError::InvalidIdentifier { name: name.to_owned(), reason };

    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(invalid("identifier must not be empty".to_owned()));
    };
    if name.len() > PG_MAX_IDENTIFIER_LEN {
        return Err(invalid(format!(
            "exceeds maximum length of {PG_MAX_IDENTIFIER_LEN} bytes (got {})",
            name.len()
        )));
    }
    if !first.is_ascii_alphabetic() && first != '_' {
        return Err(invalid(format!("must start with a letter or underscore, got '{first}'")));
    }
    if let Some(ch) = chars.find(|ch| !ch.is_ascii_alphanumeric() && *ch != '_') {
        return Err(invalid(format!("contains invalid character '{ch}'")));
    }
    Ok(())
}

pub fn quote_identifier(name: &str) -> Result<String, StorageError> {
    validate_identifier(name)?;
    Ok(format!("\"{name}\""))
}

/// `"schema"."table"`
pub fn qualified_name(schema: &str, table: &str) -> Result<String, StorageError> {
    Ok(format!("{}.{}", quote_identifier(schema)?, quote_identifier(table)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_catalog_names() {
        for name in ["person", "film_work", "genre_filmwork", "_private", "content"] {
            assert!(validate_identifier(name).is_ok(), "{name}");
        }
        assert_eq!(qualified_name("content", "person").unwrap(), "\"content\".\"person\"");
    }

    #[test]
    fn rejects_injection_and_oddities() {
        for name in ["", "1person", "person; DROP TABLE genre", "gen\"re", "film-work"] {
            let err = validate_identifier(name).unwrap_err();
            assert!(matches!(err, StorageError::InvalidIdentifier { .. }), "{name}");
        }
        assert!(validate_identifier(&"a".repeat(64)).is_err());
        assert!(validate_identifier(&"a".repeat(63)).is_ok());
    }
}
