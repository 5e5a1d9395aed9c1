use crate::{date::Date, error::DateError, julian};
use chrono::{DateTime, Utc};

/// A value as handed over by a database driver, to be read into a [`Date`] with [`Date::scan`].
///
/// Each variant has exactly one date interpretation, except [`DriverValue::Bool`], which has
/// none and is always rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriverValue<'a> {
    /// SQL `NULL`. Reads as [`Date::ZERO`].
    Null,
    /// A `YYYYMMDD` integer, e.g. `20210304`.
    Integer(i64),
    /// A `YYYYMMDD` number with a fractional part, which is dropped.
    Float(f64),
    /// Date text as raw bytes. Must be UTF-8.
    Bytes(&'a [u8]),
    /// Date text, read with [`julian::parse_flexible`].
    Text(&'a str),
    /// A timestamp. Only its calendar day is kept.
    Timestamp(DateTime<Utc>),
    /// A boolean.
    Bool(bool),
}

impl DriverValue<'_> {
    /// A short name for the kind of value, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            DriverValue::Null => "null",
            DriverValue::Integer(_) => "i64",
            DriverValue::Float(_) => "f64",
            DriverValue::Bytes(_) => "bytes",
            DriverValue::Text(_) => "string",
            DriverValue::Timestamp(_) => "timestamp",
            DriverValue::Bool(_) => "bool",
        }
    }
}

impl From<i64> for DriverValue<'_> {
    fn from(value: i64) -> Self {
        DriverValue::Integer(value)
    }
}

impl From<f64> for DriverValue<'_> {
    fn from(value: f64) -> Self {
        DriverValue::Float(value)
    }
}

impl<'a> From<&'a [u8]> for DriverValue<'a> {
    fn from(value: &'a [u8]) -> Self {
        DriverValue::Bytes(value)
    }
}

impl<'a> From<&'a str> for DriverValue<'a> {
    fn from(value: &'a str) -> Self {
        DriverValue::Text(value)
    }
}

impl From<DateTime<Utc>> for DriverValue<'_> {
    fn from(value: DateTime<Utc>) -> Self {
        DriverValue::Timestamp(value)
    }
}

impl From<bool> for DriverValue<'_> {
    fn from(value: bool) -> Self {
        DriverValue::Bool(value)
    }
}

impl<'a, T: Into<DriverValue<'a>>> From<Option<T>> for DriverValue<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(DriverValue::Null, Into::into)
    }
}

fn from_yyyymmdd(value: i64) -> Result<Date, DateError> {
    let (year, month, day) = (value / 10_000, (value % 10_000) / 100, value % 100);
    u32::try_from(month)
        .ok()
        .zip(u32::try_from(day).ok())
        .and_then(|(month, day)| julian::ymd_to_jdn(year, month, day))
        .map(Date::from_jd)
        .ok_or(DateError::InvalidDate { year, month, day })
}

impl Date {
    /// Converts a driver value into a [`Date`]. See [`Date::scan`] for the rules.
    pub fn from_driver_value(value: DriverValue<'_>) -> Result<Self, DateError> {
        match value {
            DriverValue::Null => Ok(Self::ZERO),
            DriverValue::Integer(value) => from_yyyymmdd(value),
            // `as` saturates, and NaN becomes 0, which is not a date
            DriverValue::Float(value) => from_yyyymmdd(value.trunc() as i64),
            DriverValue::Bytes(bytes) => {
                let text = core::str::from_utf8(bytes)?;
                julian::parse_flexible(text).map(Self::from_jd)
            }
            DriverValue::Text(text) => julian::parse_flexible(text).map(Self::from_jd),
            DriverValue::Timestamp(stamp) => Ok(Self::from_time(&stamp)),
            DriverValue::Bool(_) => Err(DateError::UnsupportedScanType {
                type_name: value.type_name(),
            }),
        }
    }

    /// Reads a driver value into this date, replacing it.
    ///
    /// - `NULL` is the zero date.
    /// - Integers are `YYYYMMDD` (`20210304`); floats are truncated first (`20220714.2`).
    /// - Text and bytes go through [`julian::parse_flexible`], which is more lenient than
    ///   [`Date::from_string`]: it also takes `YYYY/MM/DD`, `YYYYMMDD` and a trailing time of day.
    /// - Timestamps keep their calendar day, as [`Date::from_time`] does.
    ///
    /// On error, this date is left untouched.
    ///
    /// ```
    /// use jdate::{Date, DriverValue};
    ///
    /// let mut date = Date::ZERO;
    /// date.scan(DriverValue::Integer(20210304)).unwrap();
    /// assert_eq!("2021-03-04", date.to_string());
    ///
    /// date.scan(DriverValue::Null).unwrap();
    /// assert!(date.is_zero());
    ///
    /// assert!(date.scan(DriverValue::Bool(true)).is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// - [`DateError::UnsupportedScanType`] for values with no date interpretation.
    /// - [`DateError::InvalidDate`] for numbers that do not decompose into a real day.
    /// - [`DateError::InvalidUtf8`], [`DateError::Malformed`] or [`DateError::InvalidField`] for
    ///   text that cannot be read.
    pub fn scan(&mut self, value: DriverValue<'_>) -> Result<(), DateError> {
        match Self::from_driver_value(value) {
            Ok(date) => {
                *self = date;
                Ok(())
            }
            Err(err) => {
                tracing::debug!(kind = value.type_name(), error = %err, "rejected driver value");
                Err(err)
            }
        }
    }

    /// Returns what a database should store for this date: `None` (`NULL`) for the zero date,
    /// otherwise the `YYYY-MM-DD` text.
    pub fn value(self) -> Option<String> {
        if self.is_zero() {
            None
        } else {
            Some(self.to_string())
        }
    }
}

#[cfg(feature = "sqlite")]
mod sqlite {
    use super::DriverValue;
    use crate::date::Date;
    use rusqlite::types::{
        FromSql, FromSqlError, FromSqlResult, Null, ToSql, ToSqlOutput, ValueRef,
    };

    impl<'a> From<ValueRef<'a>> for DriverValue<'a> {
        fn from(value: ValueRef<'a>) -> Self {
            match value {
                ValueRef::Null => DriverValue::Null,
                ValueRef::Integer(value) => DriverValue::Integer(value),
                ValueRef::Real(value) => DriverValue::Float(value),
                ValueRef::Text(bytes) | ValueRef::Blob(bytes) => DriverValue::Bytes(bytes),
            }
        }
    }

    impl FromSql for Date {
        fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
            let value = DriverValue::from(value);
            Date::from_driver_value(value).map_err(|err| {
                tracing::debug!(kind = value.type_name(), error = %err, "rejected sqlite value");
                FromSqlError::Other(Box::new(err))
            })
        }
    }

    impl ToSql for Date {
        fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
            Ok(match self.value() {
                Some(text) => ToSqlOutput::from(text),
                None => ToSqlOutput::from(Null),
            })
        }
    }
}
