//! Fixed departures: scheduled group dates for a package.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::validate::{self, FieldError, FieldResult, Validate};
use super::{package_exists, Resource};
use crate::store::{Collection, ContentStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DepartureStatus {
    #[default]
    Open,
    FillingFast,
    SoldOut,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedDeparture {
    /// Slug of the departing package.
    pub package: String,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub seats_total: u32,
    pub seats_available: u32,
    pub price: u64,
    pub currency: String,
    #[serde(default)]
    pub status: DepartureStatus,
}

impl Validate for FixedDeparture {
    fn validate(&self) -> FieldResult {
        validate::slug("package", &self.package)?;
        validate::not_before("return_date", &self.return_date, &self.departure_date, "departure_date")?;
        if self.seats_total == 0 {
            return Err(FieldError::new("seats_total", "must be at least 1"));
        }
        if self.seats_available > self.seats_total {
            return Err(FieldError::new("seats_available", "must not exceed seats_total"));
        }
        validate::currency("currency", &self.currency)
    }
}

impl Resource for FixedDeparture {
    const KIND: &'static str = "departures";

    fn is_public(&self) -> bool {
        self.status != DepartureStatus::Cancelled
    }

    fn order(&self, other: &Self) -> Ordering {
        self.departure_date.cmp(&other.departure_date)
    }

    fn normalize(&mut self) {
        if self.seats_available == 0 && self.status != DepartureStatus::Cancelled {
            self.status = DepartureStatus::SoldOut;
        }
    }

    fn check_references(&self, store: &ContentStore) -> FieldResult {
        package_exists(store, "package", Some(&self.package))
    }

    fn collection(store: &ContentStore) -> &Collection<Self> {
        &store.departures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn departure(total: u32, available: u32) -> FixedDeparture {
        FixedDeparture {
            package: "everest-base-camp".into(),
            departure_date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            return_date: NaiveDate::from_ymd_opt(2026, 4, 14).unwrap(),
            seats_total: total,
            seats_available: available,
            price: 1800,
            currency: "USD".into(),
            status: DepartureStatus::Open,
        }
    }

    #[test]
    fn test_overbooked_seats_rejected() {
        assert_eq!(departure(10, 11).validate().unwrap_err().field, "seats_available");
        assert!(departure(10, 10).validate().is_ok());
    }

    #[test]
    fn test_full_departure_marked_sold_out() {
        let mut d = departure(10, 0);
        d.normalize();
        assert_eq!(d.status, DepartureStatus::SoldOut);
        assert!(d.is_public());

        d.status = DepartureStatus::Cancelled;
        d.normalize();
        assert!(!d.is_public());
    }

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_value(DepartureStatus::FillingFast).unwrap();
        assert_eq!(json, "FILLING_FAST");
    }
}
