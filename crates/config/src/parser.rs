// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration TOML parsing

use crate::types::RawConfig;
use chrono::NaiveTime;
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors that can occur during configuration parsing
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid time of day {0:?}, expected HH:MM or HH:MM:SS")]
    InvalidTime(String),
    #[error("invalid range list {value:?}: {reason}")]
    InvalidRange { value: String, reason: String },
}

/// Parse a configuration from TOML content
pub fn parse_config(content: &str) -> Result<RawConfig, ParseError> {
    Ok(toml::from_str(content)?)
}

/// Parse `HH:MM` or `HH:MM:SS`
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime, ParseError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| ParseError::InvalidTime(s.to_string()))
}

/// Parse a list like `"1-5,7"` into the set of numbers it covers.
///
/// Every number must lie within `min..=max`.
pub fn parse_range_list(s: &str, min: u32, max: u32) -> Result<BTreeSet<u32>, ParseError> {
    let invalid = |reason: String| ParseError::InvalidRange {
        value: s.to_string(),
        reason,
    };

    let mut numbers = BTreeSet::new();
    for part in s.split(',').map(str::trim) {
        if part.is_empty() {
            return Err(invalid("empty item".to_string()));
        }
        let (lo, hi) = match part.split_once('-') {
            Some((lo, hi)) => (lo.trim(), hi.trim()),
            None => (part, part),
        };
        let lo: u32 = lo
            .parse()
            .map_err(|_| invalid(format!("{:?} is not a number", lo)))?;
        let hi: u32 = hi
            .parse()
            .map_err(|_| invalid(format!("{:?} is not a number", hi)))?;
        if lo > hi {
            return Err(invalid(format!("{}-{} is descending", lo, hi)));
        }
        if lo < min || hi > max {
            return Err(invalid(format!("{} outside {}-{}", part, min, max)));
        }
        numbers.extend(lo..=hi);
    }
    Ok(numbers)
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
