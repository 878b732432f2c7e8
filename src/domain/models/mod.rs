pub mod admin;
pub mod charity;
pub mod donation;

pub use admin::Admin;
pub use charity::Charity;
pub use donation::{ConfirmedDonation, Donation, DonationStatus};
