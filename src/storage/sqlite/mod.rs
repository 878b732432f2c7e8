//! SQLite-backed repositories.

pub mod admin_repository;
pub mod charity_repository;
pub mod donation_repository;

pub use admin_repository::AdminRepository;
pub use charity_repository::CharityRepository;
pub use donation_repository::DonationRepository;
