//! Domain model for a charity.
use serde::{Deserialize, Serialize};

/// A charity the wedding couple supports. Guests pick one of these when
/// making a donation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Charity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub website: Option<String>,
    pub logo: Option<String>,
}
