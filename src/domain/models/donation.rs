//! Domain model for a donation.
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    Pending,
    Confirmed,
    Failed,
}

impl DonationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationStatus::Pending => "pending",
            DonationStatus::Confirmed => "confirmed",
            DonationStatus::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(DonationStatus::Pending),
            "confirmed" => Some(DonationStatus::Confirmed),
            "failed" => Some(DonationStatus::Failed),
            _ => None,
        }
    }
}

/// A guest donation against a charity.
///
/// `status` starts at `pending` and only moves through the admin confirm/fail
/// actions. `created_at` is immutable; `updated_at` is bumped by the store on
/// every write.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Donation {
    pub id: String,
    /// Admin account id when the donation was submitted by a logged-in user;
    /// anonymous donations leave this null.
    pub user: Option<String>,
    /// Id of the charity this donation is for.
    pub charity: String,
    pub donor_name: String,
    pub donor_email: String,
    pub amount: Decimal,
    pub message: String,
    pub status: DonationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Confirmed-donation row joined with its charity name, as handed back by the
/// store for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmedDonation {
    pub amount: Decimal,
    pub charity_id: String,
    pub charity_name: String,
    pub created_at: DateTime<Utc>,
}
