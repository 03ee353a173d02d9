// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Next scheduling boundary from the wall clock

use chrono::{NaiveDateTime, NaiveTime};
use std::collections::BTreeSet;
use std::ops::Bound;
use std::time::Duration;

/// The first time of day in `times` strictly after `now`, today or tomorrow
pub fn next_boundary(times: &BTreeSet<NaiveTime>, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let today = now.date();
    if let Some(time) = times
        .range((Bound::Excluded(now.time()), Bound::Unbounded))
        .next()
    {
        return Some(today.and_time(*time));
    }
    let first = times.iter().next()?;
    today.succ_opt().map(|tomorrow| tomorrow.and_time(*first))
}

/// How long to wait from `now` until the next boundary
pub fn until_next_boundary(times: &BTreeSet<NaiveTime>, now: NaiveDateTime) -> Option<Duration> {
    let next = next_boundary(times, now)?;
    (next - now).to_std().ok()
}
