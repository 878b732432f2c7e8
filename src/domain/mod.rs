pub mod auth_service;
pub mod charity_service;
pub mod donation_service;
pub mod models;
pub mod reporting_service;

pub use auth_service::AuthService;
pub use charity_service::CharityService;
pub use donation_service::DonationService;
pub use reporting_service::ReportingService;
