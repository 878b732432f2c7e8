//! Wedding donation backend.
//!
//! Guests browse charities and submit donations; an administrator confirms or
//! fails them; confirmed donations feed the analytics endpoint and the
//! trend/split chart. Everything runs as one axum service over SQLite.

pub mod charts;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod rest;
pub mod storage;
