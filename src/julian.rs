//! Conversions between Julian Day Numbers and proleptic Gregorian calendar dates.
//!
//! Everything here is plain integer arithmetic over an `i128` intermediate, so any `i64` day
//! number can be turned into a civil date without overflow. chrono only enters at the edges,
//! where a day number has to become a [`NaiveDate`] (or vice versa).

use crate::error::DateError;
use chrono::{Datelike, NaiveDate};
use core::fmt;

/// Julian Day Number of 1970-01-01.
pub(crate) const UNIX_EPOCH_JDN: i64 = 2_440_588;

/// Julian Day Number of 0001-01-01, the first day of the common era.
pub(crate) const CE_EPOCH_JDN: i64 = 1_721_426;

/// Days between 0000-03-01 and 1970-01-01.
const CIVIL_OFFSET: i128 = 719_468;

const DAYS_PER_ERA: i128 = 146_097;

pub(crate) fn is_leap(year: i64) -> bool {
    year.rem_euclid(4) == 0 && (year.rem_euclid(100) != 0 || year.rem_euclid(400) == 0)
}

pub(crate) fn days_in_month(year: i64, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Days since 1970-01-01 of the given civil date. `month` must be in `1..=12`; `day` is not
/// range-checked, so it can be used to step past the end of a month.
pub(crate) fn days_from_civil(year: i64, month: u32, day: i64) -> i128 {
    let year = i128::from(year) - i128::from(month <= 2);
    let era = year.div_euclid(400);
    let year_of_era = year - era * 400;
    let march_month = (i128::from(month) + 9) % 12;
    let day_of_year = (153 * march_month + 2) / 5 + i128::from(day) - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * DAYS_PER_ERA + day_of_era - CIVIL_OFFSET
}

fn civil_from_days(days: i128) -> (i64, u32, u32) {
    let days = days + CIVIL_OFFSET;
    let era = days.div_euclid(DAYS_PER_ERA);
    let day_of_era = days - era * DAYS_PER_ERA;
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let march_month = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * march_month + 2) / 5 + 1;
    let month = if march_month < 10 {
        march_month + 3
    } else {
        march_month - 9
    };
    let year = year_of_era + era * 400 + i128::from(month <= 2);
    // |year| is bounded by |days| / 365, so it always fits back into an i64
    (year as i64, month as u32, day as u32)
}

/// Converts a day offset from 1970-01-01 into a Julian Day Number, saturating at the bounds of
/// `i64`.
pub(crate) fn jdn_from_days_saturating(days: i128) -> i64 {
    let jdn = days + i128::from(UNIX_EPOCH_JDN);
    i64::try_from(jdn).unwrap_or(if jdn < 0 { i64::MIN } else { i64::MAX })
}

/// Returns the Julian Day Number of a proleptic Gregorian date, or `None` if the month or day is
/// out of range for that year (or the result does not fit an `i64`).
pub fn ymd_to_jdn(year: i64, month: u32, day: u32) -> Option<i64> {
    if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
        return None;
    }
    let jdn = days_from_civil(year, month, i64::from(day)) + i128::from(UNIX_EPOCH_JDN);
    i64::try_from(jdn).ok()
}

/// Returns the proleptic Gregorian `(year, month, day)` of a Julian Day Number.
pub fn jdn_to_ymd(jdn: i64) -> (i64, u32, u32) {
    civil_from_days(i128::from(jdn) - i128::from(UNIX_EPOCH_JDN))
}

/// Writes a Julian Day Number as `YYYY-MM-DD`. Years outside `0..=9999` get an explicit sign, the
/// same way chrono renders them.
pub(crate) fn write_iso(out: &mut impl fmt::Write, jdn: i64) -> fmt::Result {
    let (year, month, day) = jdn_to_ymd(jdn);
    if (0..=9999).contains(&year) {
        write!(out, "{year:04}-{month:02}-{day:02}")
    } else if year < 0 {
        write!(out, "-{:04}-{month:02}-{day:02}", year.unsigned_abs())
    } else {
        write!(out, "+{year}-{month:02}-{day:02}")
    }
}

/// Renders a Julian Day Number as `YYYY-MM-DD`.
pub fn jdn_to_iso(jdn: i64) -> String {
    let mut iso = String::with_capacity(10);
    // writing into a String cannot fail
    let _ = write_iso(&mut iso, jdn);
    iso
}

pub(crate) fn naive_to_jdn(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce()) + CE_EPOCH_JDN - 1
}

pub(crate) fn jdn_to_naive(jdn: i64) -> Option<NaiveDate> {
    let days_from_ce = i32::try_from(jdn.checked_sub(CE_EPOCH_JDN - 1)?).ok()?;
    NaiveDate::from_num_days_from_ce_opt(days_from_ce)
}

pub(crate) fn parse_field<T: core::str::FromStr<Err = core::num::ParseIntError>>(
    field: &str,
    input: &str,
) -> Result<T, DateError> {
    field.parse().map_err(|source| DateError::InvalidField {
        field: field.to_string(),
        input: input.to_string(),
        source,
    })
}

/// Parses a date more leniently than [`Date::from_string`](crate::Date::from_string). This is
/// what driver text is run through.
///
/// Accepted, after trimming surrounding whitespace:
///
/// - `YYYY-MM-DD`, `YYYY/MM/DD` or `YYYY.MM.DD`, where month and day may be 1 or 2 digits and the
///   year may carry a sign,
/// - `YYYYMMDD` with no separators at all,
/// - any of the above followed by `T` or a space and a time of day, which is ignored.
///
/// Empty text yields the sentinel day number `0`.
pub fn parse_flexible(text: &str) -> Result<i64, DateError> {
    let malformed = || DateError::Malformed {
        input: text.to_string(),
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    let date_part = match trimmed.find(['T', ' ']) {
        Some(index) => &trimmed[..index],
        None => trimmed,
    };

    let (negative, unsigned) = if let Some(rest) = date_part.strip_prefix('-') {
        (true, rest)
    } else {
        (false, date_part.strip_prefix('+').unwrap_or(date_part))
    };

    let (year_str, month_str, day_str) = match unsigned.find(|c: char| !c.is_ascii_digit()) {
        None => {
            // compact YYYYMMDD
            if unsigned.len() < 8 {
                return Err(malformed());
            }
            let (year, month_day) = unsigned.split_at(unsigned.len() - 4);
            let (month, day) = month_day.split_at(2);
            (year, month, day)
        }
        Some(index) => {
            let separator = unsigned[index..].chars().next().ok_or_else(malformed)?;
            if !matches!(separator, '-' | '/' | '.') {
                return Err(malformed());
            }
            let mut parts = unsigned.split(separator);
            let (Some(year), Some(month), Some(day), None) =
                (parts.next(), parts.next(), parts.next(), parts.next())
            else {
                return Err(malformed());
            };
            let well_formed = !year.is_empty()
                && (1..=2).contains(&month.len())
                && (1..=2).contains(&day.len())
                && [year, month, day]
                    .iter()
                    .all(|part| part.bytes().all(|b| b.is_ascii_digit()));
            if !well_formed {
                return Err(malformed());
            }
            (year, month, day)
        }
    };

    let year: i64 = parse_field(year_str, text)?;
    let year = if negative { -year } else { year };
    let month: u32 = parse_field(month_str, text)?;
    let day: u32 = parse_field(day_str, text)?;

    ymd_to_jdn(year, month, day).ok_or(DateError::InvalidDate {
        year,
        month: i64::from(month),
        day: i64::from(day),
    })
}
