use crate::domain::errors::ValidationError;

/// A validated bucket name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketName(String);

impl BucketName {
    /// Create a new BucketName, enforcing S3-compatible naming rules
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();

        if value.len() < 3 {
            return Err(ValidationError::BucketNameTooShort {
                actual: value.len(),
                min: 3,
            });
        }

        if value.len() > 63 {
            return Err(ValidationError::BucketNameTooLong {
                actual: value.len(),
                max: 63,
            });
        }

        let first = value.chars().next();
        if !first.map_or(false, |c| c.is_ascii_lowercase() || c.is_ascii_digit()) {
            return Err(ValidationError::BucketNameInvalidStart);
        }

        let last = value.chars().last();
        if !last.map_or(false, |c| c.is_ascii_lowercase() || c.is_ascii_digit()) {
            return Err(ValidationError::BucketNameInvalidEnd);
        }

        for c in value.chars() {
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '-' {
                return Err(ValidationError::BucketNameInvalidCharacter(c));
            }
        }

        if value.contains("--") {
            return Err(ValidationError::BucketNameConsecutiveHyphens);
        }

        Ok(Self(value))
    }

    /// Get the bucket name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the value object, returning the raw name
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for BucketName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for BucketName {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_names() {
        assert!(BucketName::new("backups").is_ok());
        assert!(BucketName::new("prod-artifacts-2024").is_ok());
        assert!(BucketName::new("0data").is_ok());
    }

    #[test]
    fn rejects_bad_lengths() {
        assert!(BucketName::new("ab").is_err());
        assert!(BucketName::new("b".repeat(64)).is_err());
    }

    #[test]
    fn rejects_bad_boundaries_and_characters() {
        assert!(BucketName::new("-leading").is_err());
        assert!(BucketName::new("trailing-").is_err());
        assert!(BucketName::new("UpperCase").is_err());
        assert!(BucketName::new("under_score").is_err());
        assert!(BucketName::new("double--hyphen").is_err());
    }

    #[test]
    fn rejects_dotted_and_ip_form_names() {
        // The character rule rejects '.', which also rules out IP-form names
        assert!(BucketName::new("my.bucket").is_err());
        assert!(BucketName::new("192.168.1.1").is_err());
    }
}
