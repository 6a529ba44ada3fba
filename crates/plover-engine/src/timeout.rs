//! Deadline utilities for generator time budgets.

use std::time::{Duration, Instant};

use crate::options::OptionsError;

/// Budget of `max_time` seconds as a `Duration`; `None` means unlimited.
pub(crate) fn budget_duration(max_time: Option<f64>) -> Option<Duration> {
    max_time.and_then(|secs| Duration::try_from_secs_f64(secs).ok())
}

pub(crate) fn deadline_after(start: Instant, max_time: Option<f64>) -> Option<Instant> {
    budget_duration(max_time).and_then(|budget| start.checked_add(budget))
}

pub(crate) fn deadline_exceeded(deadline: Option<Instant>) -> bool {
    match deadline {
        Some(deadline) => Instant::now() >= deadline,
        None => false,
    }
}

/// Reject budgets that cannot be turned into a deadline.
pub(crate) fn check_max_time(max_time: Option<f64>) -> Result<(), OptionsError> {
    match max_time {
        Some(secs) if secs.is_nan() || secs < 0.0 => Err(OptionsError::InvalidMaxTime(secs)),
        _ => Ok(()),
    }
}
