use crate::{
    error::DateError,
    julian::{self, parse_field},
    layout::Layout,
};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use core::{
    fmt::{self, Display},
    ops::{Add, Sub},
    str::FromStr,
};

/// Returns the timestamp that stands in for "no timestamp": `0001-01-01T00:00:00Z`.
///
/// [`Date::ZERO`] converts to this instant, and this instant converts back to [`Date::ZERO`].
pub fn zero_time() -> DateTime<Utc> {
    let date = NaiveDate::from_num_days_from_ce_opt(1).expect("0001-01-01 is representable");
    Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
}

/// A calendar date, stored as its Julian Day Number.
///
/// A `Date` is a single `i64`, so it is `Copy`, hashes and compares like an integer, and sorts
/// chronologically. It has no time of day and no time zone.
///
/// The day number `0` is reserved as the *zero* date, [`Date::ZERO`], meaning "no date". (Julian
/// day 0 is in November of 4714 BCE, which no caller means to store.) The zero date displays as
/// an empty string, stores as `NULL`, and converts to and from [`zero_time`]. Use
/// [`Date::to_naive`] to get an `Option` instead of dealing with the sentinel.
///
/// # Examples
///
/// ```
/// use jdate::Date;
///
/// let date = Date::from_string("2010-11-12").unwrap();
/// assert_eq!("2013-09-13", date.add_date(3, -2, 1).to_string());
/// assert_eq!(1, date.add_date(0, 0, 1).sub(date));
/// assert!(date < date.add_date(0, 0, 1));
///
/// assert!(Date::from_string("").unwrap().is_zero());
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(i64);

impl Date {
    /// The zero date, meaning "no date".
    pub const ZERO: Date = Date(0);

    /// Wraps a Julian Day Number without any validation.
    pub const fn from_jd(jd: i64) -> Self {
        Self(jd)
    }

    /// Returns the Julian Day Number of this date.
    pub const fn jd(self) -> i64 {
        self.0
    }

    /// Returns true if this is [`Date::ZERO`].
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns result of a new [`Date`] for the given proleptic Gregorian year, month and day,
    /// or [`DateError::InvalidDate`].
    pub fn from_ymd(year: i64, month: u32, day: u32) -> Result<Self, DateError> {
        julian::ymd_to_jdn(year, month, day)
            .map(Self)
            .ok_or(DateError::InvalidDate {
                year,
                month: i64::from(month),
                day: i64::from(day),
            })
    }

    /// Returns the [`Date`] of a chrono [`NaiveDate`].
    pub fn from_naive(date: NaiveDate) -> Self {
        Self(julian::naive_to_jdn(date))
    }

    /// Returns the current date in UTC at the time of this call.
    pub fn today() -> Self {
        Self::from_naive(Utc::now().date_naive())
    }

    /// Parses a date in the format `YYYY-MM-DD`.
    ///
    /// An empty string is the zero date. Anything else must be exactly 10 bytes long, have `-` at
    /// positions 4 and 7, have numeric fields, and name a real day.
    ///
    /// # Errors
    ///
    /// - [`DateError::Malformed`] if the length or separators are wrong.
    /// - [`DateError::InvalidField`] if a field is not a number.
    /// - [`DateError::InvalidDate`] if the fields do not name a day (e.g. `2023-02-29`).
    pub fn from_string(s: &str) -> Result<Self, DateError> {
        if s.is_empty() {
            return Ok(Self::ZERO);
        }
        let bytes = s.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return Err(DateError::Malformed {
                input: s.to_string(),
            });
        }
        // the separators are ASCII, so these are all char boundaries
        let year: i64 = parse_field(&s[0..4], s)?;
        let month: u32 = parse_field(&s[5..7], s)?;
        let day: u32 = parse_field(&s[8..10], s)?;
        Self::from_ymd(year, month, day)
    }

    /// Like [`Date::from_string`], but panics on error. Meant for literals in code and tests.
    ///
    /// # Panics
    ///
    /// If `s` is not a valid `YYYY-MM-DD` date or empty.
    pub fn must_from_string(s: &str) -> Self {
        Self::from_string(s).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Parses `s` with a [`Layout`] string, keeping only the calendar day.
    ///
    /// Time-of-day and offset fields in the layout are matched, then thrown away. The day kept is
    /// the one written in `s`, not the UTC one.
    ///
    /// ```
    /// use jdate::Date;
    ///
    /// let date = Date::parse("01/02/06", "08/06/12").unwrap();
    /// assert_eq!("2012-08-06", date.to_string());
    ///
    /// let date = Date::parse("%d.%m.%Y %H:%M", "31.12.1999 23:59").unwrap();
    /// assert_eq!("1999-12-31", date.to_string());
    /// ```
    ///
    /// # Errors
    ///
    /// [`DateError::Layout`] if `s` does not match the layout.
    pub fn parse(layout: &str, s: &str) -> Result<Self, DateError> {
        Self::parse_with(&Layout::new(layout), s)
    }

    /// Like [`Date::parse`], with an already compiled [`Layout`].
    pub fn parse_with(layout: &Layout<'_>, s: &str) -> Result<Self, DateError> {
        layout
            .parse(s)
            .map(|stamp| Self::from_time(&stamp))
            .map_err(|source| DateError::Layout {
                layout: layout.to_string(),
                input: s.to_string(),
                source,
            })
    }

    /// Like [`Date::parse`], but panics on error. Meant for literals in code and tests.
    ///
    /// # Panics
    ///
    /// If `s` does not match `layout`.
    pub fn must_parse(layout: &str, s: &str) -> Self {
        Self::parse(layout, s).unwrap_or_else(|err| panic!("parse date: {err}"))
    }

    /// Returns the calendar day of a timestamp, as seen in the timestamp's own offset.
    ///
    /// [`zero_time`] becomes [`Date::ZERO`].
    pub fn from_time<Tz: TimeZone>(stamp: &DateTime<Tz>) -> Self {
        if stamp.naive_utc() == zero_time().naive_utc() {
            Self::ZERO
        } else {
            Self::from_naive(stamp.date_naive())
        }
    }

    /// Returns the proleptic Gregorian `(year, month, day)` of this date.
    ///
    /// This does not special-case the zero date; check [`Date::is_zero`] first if needed.
    pub fn ymd(self) -> (i64, u32, u32) {
        julian::jdn_to_ymd(self.0)
    }

    /// The year of this date.
    pub fn year(self) -> i64 {
        self.ymd().0
    }

    /// The month of this date, `1..=12`.
    pub fn month(self) -> u32 {
        self.ymd().1
    }

    /// The day of the month of this date, `1..=31`.
    pub fn day(self) -> u32 {
        self.ymd().2
    }

    /// The day of the week of this date.
    pub fn weekday(self) -> Weekday {
        // julian day 0 was a monday
        match self.0.rem_euclid(7) {
            0 => Weekday::Mon,
            1 => Weekday::Tue,
            2 => Weekday::Wed,
            3 => Weekday::Thu,
            4 => Weekday::Fri,
            5 => Weekday::Sat,
            _ => Weekday::Sun,
        }
    }

    /// Returns this date as a chrono [`NaiveDate`], or `None` for the zero date and for dates
    /// chrono cannot represent.
    pub fn to_naive(self) -> Option<NaiveDate> {
        if self.is_zero() {
            None
        } else {
            julian::jdn_to_naive(self.0)
        }
    }

    /// Returns midnight UTC at the start of this date, or [`zero_time`] for the zero date.
    ///
    /// Dates beyond the range chrono can represent saturate to [`NaiveDate::MIN`] or
    /// [`NaiveDate::MAX`].
    pub fn time(self) -> DateTime<Utc> {
        if self.is_zero() {
            return zero_time();
        }
        let date = julian::jdn_to_naive(self.0).unwrap_or(
            if self.0 < julian::naive_to_jdn(NaiveDate::MIN) {
                NaiveDate::MIN
            } else {
                NaiveDate::MAX
            },
        );
        Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
    }

    /// Renders [`Date::time`] with a [`Layout`] string.
    ///
    /// The zero date renders as [`zero_time`], i.e. year 1, January 1.
    ///
    /// ```
    /// use jdate::Date;
    ///
    /// let date = Date::must_from_string("2013-09-04");
    /// assert_eq!("9/4/13", date.format("1/2/06"));
    /// assert_eq!("Wed, 04 Sep 2013", date.format("%a, %d %b %Y"));
    /// ```
    pub fn format(self, layout: &str) -> String {
        self.format_with(&Layout::new(layout))
    }

    /// Like [`Date::format`], with an already compiled [`Layout`].
    pub fn format_with(self, layout: &Layout<'_>) -> String {
        layout.format(&self.time())
    }

    /// Returns the date `years`, `months` and `days` after this one.
    ///
    /// With `years` and `months` both zero this is plain day-number arithmetic, which also works
    /// on the zero date. Otherwise the years and months are added to the calendar fields first,
    /// with months outside `1..=12` carrying into the year, and then the day of the month plus
    /// `days` is counted forward from the first of the resulting month. So a day that does not
    /// exist in the target month spills over: January 31 plus one month is March 3 (March 2 in a
    /// leap year). The zero date is taken to be 0001-01-01 here, and landing on 0001-01-01 gives
    /// the zero date back.
    ///
    /// Results beyond the range of `i64` day numbers saturate.
    pub fn add_date(self, years: i32, months: i32, days: i64) -> Self {
        if years == 0 && months == 0 {
            return Self(self.0.saturating_add(days));
        }

        let (year, month, day) = if self.is_zero() {
            (1, 1, 1)
        } else {
            self.ymd()
        };
        let month_index = i64::from(month) - 1 + i64::from(months);
        let year = year + i64::from(years) + month_index.div_euclid(12);
        let month = (month_index.rem_euclid(12) + 1) as u32;

        let days_since_epoch =
            julian::days_from_civil(year, month, 1) + i128::from(day) - 1 + i128::from(days);
        let jd = julian::jdn_from_days_saturating(days_since_epoch);
        if jd == julian::CE_EPOCH_JDN {
            Self::ZERO
        } else {
            Self(jd)
        }
    }

    /// Returns the number of days from `other` to this date. Negative if `other` is later.
    ///
    /// The zero date is not special here: subtracting it yields a meaningless large number.
    /// Differences beyond the range of `i64` saturate.
    #[allow(clippy::should_implement_trait)]
    pub fn sub(self, other: Date) -> i64 {
        self.0.saturating_sub(other.0)
    }

    /// The next day.
    pub fn succ(self) -> Self {
        self.add_date(0, 0, 1)
    }

    /// The previous day.
    pub fn pred(self) -> Self {
        self.add_date(0, 0, -1)
    }

    /// Returns the UTF-8 bytes of this date's display string (empty for the zero date).
    pub fn marshal_text(self) -> Vec<u8> {
        self.to_string().into_bytes()
    }

    /// Overwrites this date with the [`Date::from_string`] parse of `text`. On error, this date is
    /// left untouched.
    ///
    /// # Errors
    ///
    /// [`DateError::InvalidUtf8`] if `text` is not UTF-8, or any [`Date::from_string`] error.
    pub fn unmarshal_text(&mut self, text: &[u8]) -> Result<(), DateError> {
        let parsed = core::str::from_utf8(text)
            .map_err(DateError::from)
            .and_then(Self::from_string);
        match parsed {
            Ok(date) => {
                *self = date;
                Ok(())
            }
            Err(err) => {
                tracing::debug!(len = text.len(), %err, "rejected date text");
                Err(err)
            }
        }
    }
}

impl FromStr for Date {
    type Err = DateError;

    /// See [`Date::from_string`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl Display for Date {
    /// Writes `YYYY-MM-DD`, or nothing for the zero date.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            Ok(())
        } else {
            julian::write_iso(f, self.0)
        }
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Self::from_naive(date)
    }
}

impl From<Option<NaiveDate>> for Date {
    fn from(date: Option<NaiveDate>) -> Self {
        date.map_or(Self::ZERO, Self::from_naive)
    }
}

impl Add<i64> for Date {
    type Output = Date;

    fn add(self, days: i64) -> Self::Output {
        self.add_date(0, 0, days)
    }
}

impl Sub<i64> for Date {
    type Output = Date;

    fn sub(self, days: i64) -> Self::Output {
        self.add_date(0, 0, days.saturating_neg())
    }
}

impl Sub for Date {
    type Output = i64;

    fn sub(self, other: Date) -> Self::Output {
        Date::sub(self, other)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Date {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Date {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct DateVisitor;

        impl<'de> serde::de::Visitor<'de> for DateVisitor {
            type Value = Date;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a date string in the format YYYY-MM-DD, or an empty string")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Date, E> {
                Date::from_string(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(DateVisitor)
    }
}
