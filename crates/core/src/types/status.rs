//! Order lifecycle status.
//!
//! Historically the order status was a free-form string compared
//! case-sensitively in some places and case-insensitively in others, with a
//! handful of synonyms in circulation. This module collapses all of that into
//! one closed enum with a single, documented normalization step: parsing is
//! case-insensitive and maps the legacy synonyms onto canonical variants.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a string does not name a known order status.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown order status: {0}")]
pub struct StatusParseError(pub String);

/// Lifecycle stage of a customer order.
///
/// Canonical flow:
///
/// ```text
/// PENDING → CONFIRMED → PREPARING → READY → DELIVERING → DELIVERED
/// ```
///
/// `CANCELLED` is reachable only from `PENDING`/`CONFIRMED` (payment failure
/// or manual cancellation). The kanban board also moves fresh orders straight
/// from `PENDING` to `PREPARING` when payment is settled out of band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    /// Order created, payment not yet settled.
    Pending,
    /// Payment confirmed, waiting for the kitchen.
    Confirmed,
    /// In the oven.
    Preparing,
    /// Ready for pickup or awaiting a driver.
    Ready,
    /// On the road.
    Delivering,
    /// Handed over to the customer.
    Delivered,
    /// Abandoned before preparation started.
    Cancelled,
}

impl OrderStatus {
    /// Statuses that count as an active delivery: the driver list shows these
    /// orders and GPS beacon updates fan out to them.
    pub const ACTIVE_DELIVERY: [Self; 3] = [Self::Preparing, Self::Ready, Self::Delivering];

    /// Canonical string form (SCREAMING_SNAKE_CASE).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Preparing => "PREPARING",
            Self::Ready => "READY",
            Self::Delivering => "DELIVERING",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Whether the order can move from `self` to `next`.
    ///
    /// A no-op transition (`self == next`) is always allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        if self == next {
            return true;
        }
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed | Self::Preparing | Self::Cancelled)
                | (Self::Confirmed, Self::Preparing | Self::Cancelled)
                | (Self::Preparing, Self::Ready | Self::Delivering)
                | (Self::Ready, Self::Delivering | Self::Delivered)
                | (Self::Delivering, Self::Delivered)
        )
    }

    /// Whether the order has reached a final state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether payment settlement may still change this order.
    ///
    /// Once an order is confirmed (or further along), a late payment
    /// notification must never move it backwards.
    #[must_use]
    pub const fn awaits_payment(self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = StatusParseError;

    /// Parse a status string, case-insensitively, normalizing legacy synonyms:
    /// `LIVRAISON` and `ON_THE_WAY` mean [`Self::Delivering`]; `COMPLETED`
    /// means [`Self::Delivered`]. This is the only place synonyms are handled.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "CONFIRMED" => Ok(Self::Confirmed),
            "PREPARING" => Ok(Self::Preparing),
            "READY" => Ok(Self::Ready),
            "DELIVERING" | "LIVRAISON" | "ON_THE_WAY" => Ok(Self::Delivering),
            "DELIVERED" | "COMPLETED" => Ok(Self::Delivered),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(StatusParseError(other.to_owned())),
        }
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// SQLx support (with postgres feature) - stored as TEXT
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for OrderStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for OrderStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Rows written before the enum was closed may carry synonyms;
        // normalization happens here as well.
        Ok(s.parse::<Self>()?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for OrderStatus {
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
    fn test_parse_canonical() {
        assert_eq!("PENDING".parse::<OrderStatus>().unwrap(), OrderStatus::Pending);
        assert_eq!("DELIVERED".parse::<OrderStatus>().unwrap(), OrderStatus::Delivered);
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("pending".parse::<OrderStatus>().unwrap(), OrderStatus::Pending);
        assert_eq!("Preparing".parse::<OrderStatus>().unwrap(), OrderStatus::Preparing);
    }

    #[test]
    fn test_parse_synonyms() {
        assert_eq!("LIVRAISON".parse::<OrderStatus>().unwrap(), OrderStatus::Delivering);
        assert_eq!("on_the_way".parse::<OrderStatus>().unwrap(), OrderStatus::Delivering);
        assert_eq!("COMPLETED".parse::<OrderStatus>().unwrap(), OrderStatus::Delivered);
    }

    #[test]
    fn test_parse_unknown() {
        assert!("BURNED".parse::<OrderStatus>().is_err());
        assert!("".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Delivering,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.to_string().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_transitions_forward() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Preparing));
        assert!(Confirmed.can_transition_to(Preparing));
        assert!(Preparing.can_transition_to(Ready));
        assert!(Preparing.can_transition_to(Delivering));
        assert!(Ready.can_transition_to(Delivering));
        assert!(Ready.can_transition_to(Delivered));
        assert!(Delivering.can_transition_to(Delivered));
    }

    #[test]
    fn test_transitions_cancel() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));
        // Cancellation is not allowed once the kitchen has started
        assert!(!Preparing.can_transition_to(Cancelled));
        assert!(!Delivering.can_transition_to(Cancelled));
    }

    #[test]
    fn test_transitions_no_backwards() {
        use OrderStatus::*;
        assert!(!Delivering.can_transition_to(Confirmed));
        assert!(!Delivered.can_transition_to(Delivering));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Ready.can_transition_to(Preparing));
    }

    #[test]
    fn test_no_op_transition_allowed() {
        assert!(OrderStatus::Preparing.can_transition_to(OrderStatus::Preparing));
    }

    #[test]
    fn test_terminal() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Delivering.is_terminal());
    }

    #[test]
    fn test_serde_uses_canonical_form() {
        let json = serde_json::to_string(&OrderStatus::Delivering).unwrap();
        assert_eq!(json, "\"DELIVERING\"");

        // Synonyms normalize on deserialization too
        let status: OrderStatus = serde_json::from_str("\"livraison\"").unwrap();
        assert_eq!(status, OrderStatus::Delivering);
    }

    #[test]
    fn test_active_delivery_set() {
        assert!(OrderStatus::ACTIVE_DELIVERY.contains(&OrderStatus::Preparing));
        assert!(OrderStatus::ACTIVE_DELIVERY.contains(&OrderStatus::Ready));
        assert!(OrderStatus::ACTIVE_DELIVERY.contains(&OrderStatus::Delivering));
        assert!(!OrderStatus::ACTIVE_DELIVERY.contains(&OrderStatus::Pending));
        assert!(!OrderStatus::ACTIVE_DELIVERY.contains(&OrderStatus::Delivered));
    }
}
