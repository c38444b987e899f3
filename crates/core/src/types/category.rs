//! Ingredient categories.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a string does not name a known ingredient category.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown ingredient category: {0}")]
pub struct CategoryParseError(pub String);

/// Category of a pizza ingredient, in build order: base sauce first,
/// finishing touches last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum IngredientCategory {
    Base,
    Cheese,
    Meat,
    Vegetable,
    Finish,
}

impl IngredientCategory {
    /// Lowercase string form, as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Cheese => "cheese",
            Self::Meat => "meat",
            Self::Vegetable => "vegetable",
            Self::Finish => "finish",
        }
    }
}

impl fmt::Display for IngredientCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IngredientCategory {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "base" => Ok(Self::Base),
            "cheese" => Ok(Self::Cheese),
            "meat" => Ok(Self::Meat),
            "vegetable" => Ok(Self::Vegetable),
            "finish" => Ok(Self::Finish),
            other => Err(CategoryParseError(other.to_owned())),
        }
    }
}

// SQLx support (with postgres feature) - stored as TEXT
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for IngredientCategory {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for IngredientCategory {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(s.parse::<Self>()?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for IngredientCategory {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for cat in [
            IngredientCategory::Base,
            IngredientCategory::Cheese,
            IngredientCategory::Meat,
            IngredientCategory::Vegetable,
            IngredientCategory::Finish,
        ] {
            assert_eq!(cat.as_str().parse::<IngredientCategory>().unwrap(), cat);
        }
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(
            "Cheese".parse::<IngredientCategory>().unwrap(),
            IngredientCategory::Cheese
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert!("dessert".parse::<IngredientCategory>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&IngredientCategory::Vegetable).unwrap();
        assert_eq!(json, "\"vegetable\"");
    }
}
