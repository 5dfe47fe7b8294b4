use crate::errors::ValidationError;

/// Reject an empty (or whitespace-only) required value
pub fn require_value(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingValue(field.to_string()));
    }
    Ok(())
}

/// Reject a zero or negative id
pub fn require_positive(field: &str, value: i64) -> Result<(), ValidationError> {
    if value <= 0 {
        return Err(ValidationError::NotPositive {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_value() {
        assert!(require_value("SUBID", "576965").is_ok());
        assert_eq!(
            require_value("SUBID", "  "),
            Err(ValidationError::MissingValue("SUBID".to_string()))
        );
    }

    #[test]
    fn test_require_positive() {
        assert!(require_positive("OSID", 127).is_ok());
        assert!(require_positive("OSID", 0).is_err());
        assert!(require_positive("DCID", -1).is_err());
    }
}
