// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validity predicates deciding whether a rule applies at a point in time

use crate::error::ConfigurationError;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use std::collections::BTreeSet;
use std::fmt;

/// Decides whether a rule is valid at a given local time
pub trait Predicate: fmt::Debug + Send + Sync {
    fn is_valid(&self, at: NaiveDateTime) -> bool;

    /// Times of day at which the outcome of `is_valid` may change
    fn boundaries(&self) -> Vec<NaiveTime> {
        Vec::new()
    }
}

/// Valid at all times
#[derive(Debug, Clone, Copy, Default)]
pub struct Always;

impl Predicate for Always {
    fn is_valid(&self, _at: NaiveDateTime) -> bool {
        true
    }
}

/// Wraps a closure as a predicate without boundaries
pub struct FnPredicate<F> {
    label: String,
    func: F,
}

impl<F> FnPredicate<F>
where
    F: Fn(NaiveDateTime) -> bool + Send + Sync,
{
    pub fn new(label: impl Into<String>, func: F) -> Self {
        Self {
            label: label.into(),
            func,
        }
    }
}

impl<F> fmt::Debug for FnPredicate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FnPredicate").field(&self.label).finish()
    }
}

impl<F> Predicate for FnPredicate<F>
where
    F: Fn(NaiveDateTime) -> bool + Send + Sync,
{
    fn is_valid(&self, at: NaiveDateTime) -> bool {
        (self.func)(at)
    }
}

/// A daily time-of-day window, optionally restricted to weekdays and months.
///
/// `end` of midnight means end of day. A window whose `end` is not after its
/// `start` runs past midnight; weekday and month restrictions then apply to
/// the day on which the window opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    start: NaiveTime,
    end: NaiveTime,
    weekdays: Option<BTreeSet<u8>>,
    months: Option<BTreeSet<u32>>,
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self {
            start: NaiveTime::MIN,
            end: NaiveTime::MIN,
            weekdays: None,
            months: None,
        }
    }
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            start,
            end,
            ..Self::default()
        }
    }

    /// Whole days only
    pub fn all_day() -> Self {
        Self::default()
    }

    /// Restrict to ISO weekdays, Monday = 1 .. Sunday = 7
    pub fn on_weekdays(
        mut self,
        days: impl IntoIterator<Item = u8>,
    ) -> Result<Self, ConfigurationError> {
        let days: BTreeSet<u8> = days.into_iter().collect();
        if let Some(bad) = days.iter().find(|d| !(1..=7).contains(*d)) {
            return Err(ConfigurationError::InvalidWindow(format!(
                "weekday {} out of range 1-7",
                bad
            )));
        }
        self.weekdays = Some(days);
        Ok(self)
    }

    /// Restrict to months, January = 1
    pub fn in_months(
        mut self,
        months: impl IntoIterator<Item = u32>,
    ) -> Result<Self, ConfigurationError> {
        let months: BTreeSet<u32> = months.into_iter().collect();
        if let Some(bad) = months.iter().find(|m| !(1..=12).contains(*m)) {
            return Err(ConfigurationError::InvalidWindow(format!(
                "month {} out of range 1-12",
                bad
            )));
        }
        self.months = Some(months);
        Ok(self)
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    fn day_matches(&self, date: NaiveDate) -> bool {
        let weekday_ok = self
            .weekdays
            .as_ref()
            .map_or(true, |days| days.contains(&iso_weekday(date.weekday())));
        let month_ok = self
            .months
            .as_ref()
            .map_or(true, |months| months.contains(&date.month()));
        weekday_ok && month_ok
    }
}

fn iso_weekday(weekday: Weekday) -> u8 {
    weekday.number_from_monday() as u8
}

impl Predicate for TimeWindow {
    fn is_valid(&self, at: NaiveDateTime) -> bool {
        let time = at.time();
        let today = at.date();

        if self.end == NaiveTime::MIN {
            return time >= self.start && self.day_matches(today);
        }
        if self.start < self.end {
            return time >= self.start && time < self.end && self.day_matches(today);
        }

        // Wraps past midnight
        if time >= self.start {
            return self.day_matches(today);
        }
        time < self.end && today.pred_opt().is_some_and(|d| self.day_matches(d))
    }

    fn boundaries(&self) -> Vec<NaiveTime> {
        if self.start == self.end {
            vec![self.start]
        } else {
            vec![self.start, self.end]
        }
    }
}

#[cfg(test)]
#[path = "predicate_tests.rs"]
mod tests;
