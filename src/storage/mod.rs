pub mod sqlite;
pub mod traits;

pub use traits::{AdminStorage, CharityStorage, DonationStorage};
