// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::decorator::QueryHandler;
use crate::error::AppError;
use crate::ports::{AvailableHoursReadModel, HourRepository};
use gymhours_domain::{DomainError, Hour};
use std::sync::Arc;
use time::{OffsetDateTime, UtcOffset};

/// Calendar for a time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailableHours {
    pub from: OffsetDateTime,
    pub to: OffsetDateTime,
}

/// Is a single hour open for bookings?
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourAvailability {
    pub hour: OffsetDateTime,
}

/// One day of the trainer calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Date {
    /// The UTC calendar date.
    pub date: time::Date,
    /// True if at least one hour of the day is available.
    pub has_free_hours: bool,
    /// Stored hours of the day, ordered by time.
    pub hours: Vec<HourView>,
}

/// One hour of the trainer calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourView {
    pub hour: OffsetDateTime,
    pub available: bool,
    pub has_training_scheduled: bool,
}

impl From<&Hour> for HourView {
    fn from(hour: &Hour) -> Self {
        Self {
            hour: hour.time(),
            available: hour.is_available(),
            has_training_scheduled: hour.has_training_scheduled(),
        }
    }
}

/// Groups hours (already ordered by time) into UTC days.
#[must_use]
pub fn group_by_date(hours: &[Hour]) -> Vec<Date> {
    let mut dates: Vec<Date> = Vec::new();
    for hour in hours {
        let view = HourView::from(hour);
        let date = hour.time().to_offset(UtcOffset::UTC).date();
        match dates.last_mut() {
            Some(current) if current.date == date => {
                current.has_free_hours |= view.available;
                current.hours.push(view);
            }
            _ => dates.push(Date {
                date,
                has_free_hours: view.available,
                hours: vec![view],
            }),
        }
    }
    dates
}

pub struct AvailableHoursHandler {
    read_model: Arc<dyn AvailableHoursReadModel>,
}

impl AvailableHoursHandler {
    pub fn new(read_model: Arc<dyn AvailableHoursReadModel>) -> Self {
        Self { read_model }
    }
}

impl QueryHandler<AvailableHours, Vec<Date>> for AvailableHoursHandler {
    fn handle(&self, query: AvailableHours) -> Result<Vec<Date>, AppError> {
        if query.from > query.to {
            return Err(DomainError::InvalidDateRange {
                from: query.from,
                to: query.to,
            }
            .into());
        }
        let hours = self.read_model.hours_between(query.from, query.to)?;
        Ok(group_by_date(&hours))
    }
}

/// Hours that were never written count as not available.
pub struct HourAvailabilityHandler {
    hours: Arc<dyn HourRepository>,
}

impl HourAvailabilityHandler {
    pub fn new(hours: Arc<dyn HourRepository>) -> Self {
        Self { hours }
    }
}

impl QueryHandler<HourAvailability, bool> for HourAvailabilityHandler {
    fn handle(&self, query: HourAvailability) -> Result<bool, AppError> {
        Ok(self
            .hours
            .get_hour(query.hour)?
            .is_some_and(|hour| hour.is_available()))
    }
}
