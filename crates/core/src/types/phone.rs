//! Phone number type with E.164 normalization.
//!
//! Customer identity is keyed by phone number, so every phone that enters the
//! system is normalized to one canonical E.164 form before it is stored or
//! compared. Local numbers are interpreted against a fixed region (Belgium):
//! `0470 12 34 56`, `0032470123456` and `+32470123456` all normalize to
//! `+32470123456`.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Country calling code used to interpret local-format numbers.
pub const REGION_PREFIX: &str = "+32";

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains characters other than digits and separators.
    #[error("phone number contains invalid character '{0}'")]
    InvalidCharacter(char),
    /// The input carries a country code other than the supported region.
    #[error("unsupported country code (expected {REGION_PREFIX})")]
    UnsupportedRegion,
    /// The national part has the wrong number of digits.
    #[error("national number must be 8-9 digits (got {0})")]
    InvalidLength(usize),
}

/// A phone number in canonical E.164 form (`+32…`).
///
/// ## Examples
///
/// ```
/// use fornaccio_core::Phone;
///
/// let a = Phone::parse("0470 12 34 56").unwrap();
/// let b = Phone::parse("+32470123456").unwrap();
/// let c = Phone::parse("0032.470.12.34.56").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(b, c);
/// assert_eq!(a.as_str(), "+32470123456");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Parse and normalize a phone number to E.164.
    ///
    /// Accepted input forms, after stripping separators
    /// (spaces, dots, dashes, slashes and parentheses):
    /// - `+32…` - already international
    /// - `0032…` - international with dial-out prefix
    /// - `0…` - local format, rewritten with the region prefix
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains non-digit characters,
    /// carries a foreign country code, or the national number is not 8-9
    /// digits long.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let mut cleaned = String::with_capacity(s.len());
        for (i, c) in s.trim().chars().enumerate() {
            match c {
                '0'..='9' => cleaned.push(c),
                '+' if i == 0 => cleaned.push(c),
                ' ' | '.' | '-' | '/' | '(' | ')' => {}
                other => return Err(PhoneError::InvalidCharacter(other)),
            }
        }

        if cleaned.is_empty() {
            return Err(PhoneError::Empty);
        }

        let national = if let Some(rest) = cleaned.strip_prefix(REGION_PREFIX) {
            rest.to_owned()
        } else if let Some(rest) = cleaned.strip_prefix("0032") {
            rest.to_owned()
        } else if cleaned.starts_with('+') {
            return Err(PhoneError::UnsupportedRegion);
        } else if let Some(rest) = cleaned.strip_prefix('0') {
            rest.to_owned()
        } else {
            return Err(PhoneError::UnsupportedRegion);
        };

        if !(8..=9).contains(&national.len()) {
            return Err(PhoneError::InvalidLength(national.len()));
        }

        Ok(Self(format!("{REGION_PREFIX}{national}")))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Phone {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Phone {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed normalized
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Phone {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_format() {
        let phone = Phone::parse("0470123456").unwrap();
        assert_eq!(phone.as_str(), "+32470123456");
    }

    #[test]
    fn test_parse_with_separators() {
        let phone = Phone::parse("0470 12 34 56").unwrap();
        assert_eq!(phone.as_str(), "+32470123456");

        let phone = Phone::parse("0470/12.34-56").unwrap();
        assert_eq!(phone.as_str(), "+32470123456");
    }

    #[test]
    fn test_parse_international() {
        let phone = Phone::parse("+32470123456").unwrap();
        assert_eq!(phone.as_str(), "+32470123456");
    }

    #[test]
    fn test_parse_dial_out_prefix() {
        let phone = Phone::parse("0032470123456").unwrap();
        assert_eq!(phone.as_str(), "+32470123456");
    }

    #[test]
    fn test_parse_landline() {
        // Landlines have 8 national digits
        let phone = Phone::parse("02 123 45 67").unwrap();
        assert_eq!(phone.as_str(), "+3221234567");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Phone::parse(""), Err(PhoneError::Empty));
        assert_eq!(Phone::parse("  "), Err(PhoneError::Empty));
    }

    #[test]
    fn test_parse_invalid_character() {
        assert_eq!(
            Phone::parse("0470x23456"),
            Err(PhoneError::InvalidCharacter('x'))
        );
    }

    #[test]
    fn test_parse_foreign_country_code() {
        assert_eq!(
            Phone::parse("+33612345678"),
            Err(PhoneError::UnsupportedRegion)
        );
    }

    #[test]
    fn test_parse_wrong_length() {
        assert_eq!(Phone::parse("047012"), Err(PhoneError::InvalidLength(5)));
        assert_eq!(
            Phone::parse("04701234567890"),
            Err(PhoneError::InvalidLength(13))
        );
    }

    #[test]
    fn test_normalized_forms_compare_equal() {
        let a = Phone::parse("0470123456").unwrap();
        let b = Phone::parse("+32 470 12 34 56").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_serde_roundtrip() {
        let phone = Phone::parse("0470123456").unwrap();
        let json = serde_json::to_string(&phone).unwrap();
        assert_eq!(json, "\"+32470123456\"");

        let parsed: Phone = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, phone);
    }
}
