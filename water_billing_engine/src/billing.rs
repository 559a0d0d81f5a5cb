//! The billing calculator.
//!
//! Everything in this module is pure. The tariff values are handed in as a [`RateSheet`] snapshot taken from the
//! current [`SystemSettings`](crate::db_types::SystemSettings) record, so the same inputs always price to the same
//! bill, and flows can price a batch of readings against one consistent tariff.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use wbs_common::Centavos;

use crate::db_types::SystemSettings;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BillingCalculationError {
    #[error("Current reading ({current} cu.m) is lower than the previous reading ({previous} cu.m)")]
    NegativeConsumption { previous: f64, current: f64 },
    #[error("Meter readings must be finite numbers")]
    UnusableReading,
}

/// The subset of the system settings that prices a bill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSheet {
    pub rate_per_cubic_meter: Centavos,
    pub minimum_charge: Centavos,
    pub due_date_days: i64,
}

impl From<&SystemSettings> for RateSheet {
    fn from(settings: &SystemSettings) -> Self {
        Self {
            rate_per_cubic_meter: settings.water_rate_per_cubic_meter,
            minimum_charge: settings.minimum_charge,
            due_date_days: settings.due_date_days,
        }
    }
}

/// A priced bill, before it is written to the database.
#[derive(Debug, Clone, PartialEq)]
pub struct BillTotals {
    pub consumption: f64,
    pub water_charge: Centavos,
    pub minimum_charge: Centavos,
    pub penalties: Centavos,
    pub amount_due: Centavos,
    pub due_date: DateTime<Utc>,
}

/// Prices a meter reading against the previous one.
///
/// `consumption = current - previous`. A meter cannot run backwards, so a negative difference is a capture error
/// and is rejected rather than clamped. The very first reading for a meter has no predecessor; callers pass
/// `previous = 0.0` and the full counter value is billed.
///
/// `amount_due = consumption * rate + minimum_charge + penalties`, due `due_date_days` after `billed_on`.
pub fn calculate_bill(
    current: f64,
    previous: f64,
    penalties: Centavos,
    billed_on: DateTime<Utc>,
    rates: &RateSheet,
) -> Result<BillTotals, BillingCalculationError> {
    if !current.is_finite() || !previous.is_finite() {
        return Err(BillingCalculationError::UnusableReading);
    }
    let consumption = current - previous;
    if consumption < 0.0 {
        return Err(BillingCalculationError::NegativeConsumption { previous, current });
    }
    let water_charge = rates.rate_per_cubic_meter.scale_by(consumption);
    let amount_due = water_charge + rates.minimum_charge + penalties;
    let due_date = billed_on + Duration::days(rates.due_date_days);
    Ok(BillTotals {
        consumption,
        water_charge,
        minimum_charge: rates.minimum_charge,
        penalties,
        amount_due,
        due_date,
    })
}
