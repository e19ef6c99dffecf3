use crate::error::RegistryError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Minimum length of a short code.
pub const MIN_LENGTH: usize = 6;
/// Maximum length of a short code.
pub const MAX_LENGTH: usize = 8;

/// A validated short code identifier for a link.
///
/// Short codes are 6-8 characters long and contain only ASCII letters and
/// digits. Comparison is case-sensitive: `abc123` and `ABC123` are distinct.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortCode(String);

impl ShortCode {
    /// Creates a new `ShortCode` after validating the input.
    ///
    /// Valid codes are 6-8 characters and contain only `[A-Za-z0-9]`.
    pub fn new(code: impl Into<String>) -> std::result::Result<Self, RegistryError> {
        let code = code.into();
        Self::validate(&code)?;
        Ok(Self(code))
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for codes produced by trusted internal sources
    /// (generators, rows read back from a store).
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if `code` satisfies the short code format.
    pub fn is_valid(code: &str) -> bool {
        Self::validate(code).is_ok()
    }

    fn validate(code: &str) -> std::result::Result<(), RegistryError> {
        if code.len() < MIN_LENGTH || code.len() > MAX_LENGTH {
            return Err(RegistryError::InvalidCodeFormat(format!(
                "length must be between {} and {}, got {}",
                MIN_LENGTH,
                MAX_LENGTH,
                code.len()
            )));
        }

        if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(RegistryError::InvalidCodeFormat(format!(
                "must contain only ASCII letters and digits: '{}'",
                code
            )));
        }

        Ok(())
    }
}

impl TryFrom<String> for ShortCode {
    type Error = RegistryError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ShortCode> for String {
    fn from(code: ShortCode) -> Self {
        code.0
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_codes() {
        assert!(ShortCode::new("abc123").is_ok());
        assert!(ShortCode::new("AbC1234").is_ok());
        assert!(ShortCode::new("a".repeat(8)).is_ok());
        assert!(ShortCode::new("000000").is_ok());
    }

    #[test]
    fn too_short() {
        assert!(ShortCode::new("ab").is_err());
        assert!(ShortCode::new("abc12").is_err());
        assert!(ShortCode::new("").is_err());
    }

    #[test]
    fn too_long() {
        assert!(ShortCode::new("a".repeat(9)).is_err());
    }

    #[test]
    fn invalid_characters() {
        assert!(ShortCode::new("abc def").is_err());
        assert!(ShortCode::new("abc/def").is_err());
        assert!(ShortCode::new("abc-def").is_err());
        assert!(ShortCode::new("abc_def").is_err());
        assert!(ShortCode::new("abcdé1").is_err());
    }

    #[test]
    fn validation_error_is_invalid_code_format() {
        let err = ShortCode::new("ab").unwrap_err();
        assert!(matches!(err, RegistryError::InvalidCodeFormat(_)));
    }

    #[test]
    fn codes_are_case_sensitive() {
        let lower = ShortCode::new("abc123").unwrap();
        let upper = ShortCode::new("ABC123").unwrap();
        assert_ne!(lower, upper);
    }

    #[test]
    fn display_and_as_str() {
        let code = ShortCode::new("my1code").unwrap();
        assert_eq!(code.to_string(), "my1code");
        assert_eq!(code.as_str(), "my1code");
    }

    #[test]
    fn to_url() {
        let code = ShortCode::new("abc123").unwrap();
        assert_eq!(code.to_url("http://localhost:3000"), "http://localhost:3000/abc123");
        assert_eq!(
            code.to_url("http://localhost:3000/"),
            "http://localhost:3000/abc123"
        );
    }

    #[test]
    fn deserialize_rejects_malformed_codes() {
        let code: ShortCode = serde_json::from_str("\"abc123\"").unwrap();
        assert_eq!(code.as_str(), "abc123");

        assert!(serde_json::from_str::<ShortCode>("\"ab\"").is_err());
        assert!(serde_json::from_str::<ShortCode>("\"abc-123\"").is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let code = ShortCode::new("abc123").unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"abc123\"");
    }
}
