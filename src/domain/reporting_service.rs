//! Aggregate reporting over confirmed donations.
//!
//! Only donations an admin has confirmed count. All arithmetic stays in
//! `Decimal`: the 50/50 allocation split must hold exactly, so sums are never
//! routed through binary floats.
use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::db::DbConnection;
use crate::error::AppResult;
use crate::storage::sqlite::DonationRepository;
use crate::storage::traits::DonationStorage;

/// Fixed allocation split: half to the charities, half to the couple.
const SPLIT: Decimal = Decimal::from_parts(5, 0, 0, false, 1); // 0.5

/// Per-charity slice of the analytics payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharityBreakdown {
    pub charity_name: String,
    pub count: u64,
    /// `sum(amount) * 0.5` over this charity's confirmed donations.
    pub total_allocated: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analytics {
    pub total_amount: Decimal,
    pub charity_amount: Decimal,
    pub couple_amount: Decimal,
    pub donations_count: u64,
    pub count_per_charity: Vec<CharityBreakdown>,
}

/// One day of the donation trend window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total: Decimal,
}

#[derive(Clone)]
pub struct ReportingService {
    donations: DonationRepository,
}

impl ReportingService {
    pub fn new(connection: DbConnection) -> Self {
        Self {
            donations: DonationRepository::new(connection),
        }
    }

    /// Aggregate totals and the per-charity breakdown over confirmed
    /// donations. `charity_amount + couple_amount == total_amount` exactly.
    pub async fn analytics(&self) -> AppResult<Analytics> {
        let confirmed = self.donations.list_confirmed().await?;

        let total_amount: Decimal = confirmed.iter().map(|d| d.amount).sum();
        let charity_amount = total_amount * SPLIT;
        let couple_amount = total_amount - charity_amount;

        // Group by charity name; BTreeMap keeps the breakdown deterministic.
        let mut per_charity: BTreeMap<String, (u64, Decimal)> = BTreeMap::new();
        for donation in &confirmed {
            let entry = per_charity
                .entry(donation.charity_name.clone())
                .or_insert((0, Decimal::ZERO));
            entry.0 += 1;
            entry.1 += donation.amount;
        }

        let count_per_charity = per_charity
            .into_iter()
            .map(|(charity_name, (count, sum))| CharityBreakdown {
                charity_name,
                count,
                total_allocated: sum * SPLIT,
            })
            .collect();

        Ok(Analytics {
            total_amount,
            charity_amount,
            couple_amount,
            donations_count: confirmed.len() as u64,
            count_per_charity,
        })
    }

    /// Confirmed-donation totals for each of the last `days` calendar days,
    /// today inclusive, oldest first. Quiet days report zero.
    pub async fn trend_last_days(&self, days: u32) -> AppResult<Vec<DailyTotal>> {
        let confirmed = self.donations.list_confirmed().await?;
        let today = Utc::now().date_naive();

        let mut trend = Vec::with_capacity(days as usize);
        for offset in (0..days as i64).rev() {
            let date = today - Duration::days(offset);
            let total = confirmed
                .iter()
                .filter(|d| d.created_at.date_naive() == date)
                .map(|d| d.amount)
                .sum();
            trend.push(DailyTotal { date, total });
        }
        Ok(trend)
    }
}
