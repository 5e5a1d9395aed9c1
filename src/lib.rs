//! # jdate
//!
//! A compact, comparable date value backed by Julian Day Numbers.
//!
//! A [`Date`] is a single `i64` holding the Julian Day Number of a proleptic Gregorian calendar
//! day. Because of that, dates are `Copy`, sort chronologically with plain integer comparison,
//! work as map keys, and subtract into day counts. There is no time of day and no time zone.
//!
//! ## Examples
//!
//! Parse, shift and compare dates:
//!
//! ```
//! use jdate::prelude::*;
//!
//! let date = Date::from_string("2010-11-12").unwrap();
//! let later = date.add_date(3, -2, 1);
//! assert_eq!("2013-09-13", later.to_string());
//! assert_eq!(1036, later.sub(date));
//! assert!(date < later);
//! ```
//!
//! Parse and format with layouts:
//!
//! ```
//! use jdate::prelude::*;
//!
//! // reference-date layouts...
//! let date = Date::parse("01/02/06", "08/06/12").unwrap();
//! assert_eq!("2012-08-06", date.to_string());
//! assert_eq!("Aug  6, 2012", date.format("Jan _2, 2006"));
//!
//! // ...or strftime layouts
//! assert_eq!("06.08.2012", date.format("%d.%m.%Y"));
//! ```
//!
//! Read and write database values:
//!
//! ```
//! use jdate::prelude::*;
//!
//! let mut date = Date::ZERO;
//! date.scan(DriverValue::Float(20220714.2)).unwrap();
//! assert_eq!(Some("2022-07-14".to_string()), date.value());
//! assert_eq!(None, Date::ZERO.value());
//! ```
//!
//! ## The Zero Date
//!
//! Julian day `0` (November 24, 4714 BCE) is reserved to mean "no date". It is [`Date::ZERO`] and
//! [`Date::default`]. The zero date:
//!
//! - is what the empty string, SQL `NULL` and [`zero_time`] (`0001-01-01T00:00:00Z`) parse to,
//! - displays as the empty string and stores as `NULL`,
//! - converts to [`zero_time`] with [`Date::time`].
//!
//! Where an `Option` is more convenient, [`Date::to_naive`] returns `None` for it and
//! `Date::from(None::<NaiveDate>)` produces it.
//!
//! ## Layouts
//!
//! Layouts for [`Date::parse`] and [`Date::format`] are either strftime strings (anything
//! containing `%`, see [`chrono::format::strftime`]) or *reference-date* layouts, which write out
//! how the reference time `Mon Jan 2 15:04:05 MST 2006` would look:
//!
//! | Token | Meaning | Example |
//! |---|---|---|
//! | `2006` | Year | `2013` |
//! | `06` | Two-digit year, 69 to 99 meaning 19xx | `13` |
//! | `January` / `Jan` | Month name | `September` / `Sep` |
//! | `01` / `1` | Month, zero-padded / unpadded | `09` / `9` |
//! | `02` / `_2` / `2` | Day, zero-padded / space-padded / unpadded | `04` / ` 4` / `4` |
//! | `002` / `__2` | Day of the year, zero-padded / space-padded | `247` |
//! | `Monday` / `Mon` | Weekday name | `Wednesday` / `Wed` |
//! | `15` / `03` / `3` | Hour (24h / 12h zero-padded / 12h) | `00` / `12` / `12` |
//! | `04` / `4` | Minute | `00` / `0` |
//! | `05` / `5` | Second | `00` / `0` |
//! | `.000` / `.999` | Fractional second, only right after a seconds token | `.000` / (empty) |
//! | `PM` / `pm` | Meridiem | `AM` / `am` |
//! | `MST` | Zone name | `UTC` |
//! | `-0700` / `-07:00` / `Z0700` / `Z07:00` | Offset | `+0000` / `+00:00` / `Z` / `Z` |
//!
//! Everything else is literal text.
//!
//! ## Features
//!
//! - `serde` (default): `Serialize`/`Deserialize` as the `YYYY-MM-DD` string (empty for the zero
//!   date), so dates work as JSON map keys.
//! - `sqlite` (default): `rusqlite` `FromSql`/`ToSql`, following [`Date::scan`] and
//!   [`Date::value`].
//!
//! ## Prelude
//!
//! jdate provides a prelude module for convenience. Use it with:
//!
//! ```
//! use jdate::prelude::*;
//! ```
#![warn(missing_docs)]

mod date;
mod error;
pub mod julian;
mod layout;
mod scan;

pub use crate::date::{zero_time, Date};
pub use crate::error::DateError;
pub use crate::layout::Layout;
pub use crate::scan::DriverValue;

/// A convenience module appropriate for glob imports (`use jdate::prelude::*;`).
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::zero_time;
    #[doc(no_inline)]
    pub use crate::Date;
    #[doc(no_inline)]
    pub use crate::DateError;
    #[doc(no_inline)]
    pub use crate::DriverValue;
    #[doc(no_inline)]
    pub use crate::Layout;
    #[doc(no_inline)]
    pub use chrono::NaiveDate;
}
