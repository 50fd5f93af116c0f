//! Receipt model for vetclinic-service.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Receipt payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiptStatus {
    Pending,
    Paid,
    Cancelled,
}

impl ReceiptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiptStatus::Pending => "Pending",
            ReceiptStatus::Paid => "Paid",
            ReceiptStatus::Cancelled => "Cancelled",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "Paid" => ReceiptStatus::Paid,
            "Cancelled" => ReceiptStatus::Cancelled,
            _ => ReceiptStatus::Pending,
        }
    }
}

/// Billing receipt, owned directly by a client.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Receipt {
    pub id: Uuid,
    pub client_id: Uuid,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub status: String,
    pub created_utc: DateTime<Utc>,
}

/// Input for issuing a receipt. `client_id` is advisory for client-role
/// creators; the owner is always taken from the caller's scope.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReceipt {
    pub client_id: Option<Uuid>,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(default = "default_receipt_status")]
    pub status: ReceiptStatus,
}

fn default_receipt_status() -> ReceiptStatus {
    ReceiptStatus::Pending
}

/// Mutable receipt fields.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateReceipt {
    pub amount: Decimal,
    pub date: NaiveDate,
    pub status: ReceiptStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_round_trip() {
        for status in [
            ReceiptStatus::Pending,
            ReceiptStatus::Paid,
            ReceiptStatus::Cancelled,
        ] {
            assert_eq!(ReceiptStatus::from_string(status.as_str()), status);
        }
    }
}
