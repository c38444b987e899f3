//! Per-line-item modification snapshot.

use serde::{Deserialize, Serialize};

use super::IngredientId;

/// Ingredient ids added to and removed from a pizza's defaults, frozen at
/// order time.
///
/// The snapshot is stored on the order line itself (as two native id arrays),
/// never re-derived from the live catalog: historical orders stay accurate
/// even if pizzas or ingredients change or disappear later.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifications {
    /// Ingredients the customer added on top of the defaults.
    #[serde(default)]
    pub added: Vec<IngredientId>,
    /// Default ingredients the customer removed.
    #[serde(default)]
    pub removed: Vec<IngredientId>,
}

impl Modifications {
    /// An unmodified pizza.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
        }
    }

    /// Whether the pizza is ordered exactly as listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_empty() {
        assert!(Modifications::none().is_empty());
    }

    #[test]
    fn test_serde_defaults_missing_fields() {
        let mods: Modifications = serde_json::from_str("{}").unwrap();
        assert!(mods.is_empty());

        let mods: Modifications = serde_json::from_str(r#"{"added": [3]}"#).unwrap();
        assert_eq!(mods.added, vec![IngredientId::new(3)]);
        assert!(mods.removed.is_empty());
    }

    #[test]
    fn test_serde_roundtrip() {
        let mods = Modifications {
            added: vec![IngredientId::new(1), IngredientId::new(2)],
            removed: vec![IngredientId::new(9)],
        };
        let json = serde_json::to_string(&mods).unwrap();
        let back: Modifications = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mods);
    }
}
