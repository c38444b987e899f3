//! Request/response types for the Mollie payment API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fornaccio_core::OrderId;

/// A monetary amount in the provider's wire format: a currency code and a
/// decimal string with exactly two fraction digits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Amount {
    pub currency: String,
    pub value: String,
}

impl Amount {
    /// Format a euro amount the way the provider expects (`"12.00"`).
    #[must_use]
    pub fn eur(amount: Decimal) -> Self {
        Self {
            currency: "EUR".to_owned(),
            value: format!("{amount:.2}"),
        }
    }
}

/// Metadata attached to a payment session; comes back verbatim on fetch, so
/// the webhook can find the order without any provider-side lookup table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentMetadata {
    pub order_id: OrderId,
}

/// Request body for creating a payment session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub amount: Amount,
    pub description: String,
    pub redirect_url: String,
    /// Omitted on localhost: the provider cannot call back into a dev
    /// machine, and the redirect-return validation covers settlement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    pub metadata: PaymentMetadata,
}

/// Payment lifecycle status at the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Open,
    Pending,
    Authorized,
    Paid,
    Canceled,
    Expired,
    Failed,
}

impl PaymentStatus {
    /// The customer has paid.
    #[must_use]
    pub const fn is_paid(self) -> bool {
        matches!(self, Self::Paid)
    }

    /// The session ended without payment; the order should be cancelled.
    #[must_use]
    pub const fn is_failed(self) -> bool {
        matches!(self, Self::Canceled | Self::Expired | Self::Failed)
    }
}

/// A payment session as returned by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct Payment {
    pub id: String,
    pub status: PaymentStatus,
    #[serde(default)]
    pub metadata: Option<PaymentMetadata>,
    #[serde(rename = "_links", default)]
    pub links: PaymentLinks,
}

impl Payment {
    /// The hosted checkout URL the customer is redirected to, if the payment
    /// is still open.
    #[must_use]
    pub fn checkout_url(&self) -> Option<&str> {
        self.links.checkout.as_ref().map(|l| l.href.as_str())
    }

    /// The order this payment settles, from the metadata we attached.
    #[must_use]
    pub fn order_id(&self) -> Option<OrderId> {
        self.metadata.as_ref().map(|m| m.order_id)
    }
}

/// HAL links on a payment resource.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentLinks {
    #[serde(default)]
    pub checkout: Option<Link>,
}

/// A single HAL link.
#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    pub href: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_amount_eur_formatting() {
        assert_eq!(Amount::eur(Decimal::new(1200, 2)).value, "12.00");
        assert_eq!(Amount::eur(Decimal::new(12, 0)).value, "12.00");
        assert_eq!(Amount::eur(Decimal::new(1250, 2)).value, "12.50");
        assert_eq!(Amount::eur(Decimal::new(999, 1)).value, "99.90");
    }

    #[test]
    fn test_payment_status_predicates() {
        assert!(PaymentStatus::Paid.is_paid());
        assert!(!PaymentStatus::Open.is_paid());

        assert!(PaymentStatus::Canceled.is_failed());
        assert!(PaymentStatus::Expired.is_failed());
        assert!(PaymentStatus::Failed.is_failed());
        assert!(!PaymentStatus::Paid.is_failed());
        assert!(!PaymentStatus::Pending.is_failed());
    }

    #[test]
    fn test_create_payment_request_wire_format() {
        let request = CreatePaymentRequest {
            amount: Amount::eur(Decimal::new(2650, 2)),
            description: "Commande #42".to_owned(),
            redirect_url: "https://order.example.com/order/42/status".to_owned(),
            webhook_url: None,
            metadata: PaymentMetadata {
                order_id: OrderId::new(42),
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["amount"]["currency"], "EUR");
        assert_eq!(json["amount"]["value"], "26.50");
        assert_eq!(json["redirectUrl"], "https://order.example.com/order/42/status");
        assert_eq!(json["metadata"]["order_id"], 42);
        // Skipped entirely when absent
        assert!(json.get("webhookUrl").is_none());
    }

    #[test]
    fn test_payment_deserialization() {
        let body = r#"{
            "id": "tr_WDqYK6vllg",
            "status": "open",
            "metadata": {"order_id": 7},
            "_links": {
                "checkout": {"href": "https://www.mollie.com/checkout/select-method/WDqYK6vllg", "type": "text/html"}
            }
        }"#;

        let payment: Payment = serde_json::from_str(body).unwrap();
        assert_eq!(payment.id, "tr_WDqYK6vllg");
        assert_eq!(payment.status, PaymentStatus::Open);
        assert_eq!(payment.order_id(), Some(OrderId::new(7)));
        assert_eq!(
            payment.checkout_url(),
            Some("https://www.mollie.com/checkout/select-method/WDqYK6vllg")
        );
    }

    #[test]
    fn test_payment_deserialization_minimal() {
        // Webhook fetches can come back without links or metadata
        let body = r#"{"id": "tr_x", "status": "paid"}"#;
        let payment: Payment = serde_json::from_str(body).unwrap();
        assert!(payment.checkout_url().is_none());
        assert!(payment.order_id().is_none());
        assert!(payment.status.is_paid());
    }
}
