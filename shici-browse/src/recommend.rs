//! Daily recommendation
//!
//! The pick is derived from the calendar date alone: the digits of
//! `YYYYMMDD` read as an integer, modulo the poem count. Same poem all day,
//! a new one after local midnight.

use crate::models::Poem;
use chrono::NaiveDate;

/// Poems in the carousel window
pub const CAROUSEL_SIZE: usize = 5;

/// Date digits as an integer, e.g. 2026-10-19 → 20261019
pub fn date_seed(date: NaiveDate) -> u64 {
    // Formatting %Y%m%d always yields digits for years 0..=9999
    date.format("%Y%m%d").to_string().parse().unwrap_or(0)
}

/// Index of the poem recommended on `date`, `None` when nothing is loaded
pub fn daily_index(date: NaiveDate, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    Some((date_seed(date) % count as u64) as usize)
}

pub fn daily_poem(poems: &[Poem], date: NaiveDate) -> Option<&Poem> {
    daily_index(date, poems.len()).map(|i| &poems[i])
}

/// `size` poems starting at the daily pick, wrapping, without repeats
pub fn carousel(poems: &[Poem], date: NaiveDate, size: usize) -> Vec<&Poem> {
    let Some(start) = daily_index(date, poems.len()) else {
        return Vec::new();
    };
    (0..size.min(poems.len()))
        .map(|i| &poems[(start + i) % poems.len()])
        .collect()
}
