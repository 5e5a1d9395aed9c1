use chrono::{
    format::{Fixed, Item, Numeric, Pad, Parsed, StrftimeItems},
    DateTime, FixedOffset, Utc,
};
use core::fmt::{self, Display};

/// Which calendar and clock fields a layout can supply when parsing. Anything missing is filled
/// in with a default before the parsed fields are resolved.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Coverage {
    year: bool,
    month: bool,
    day: bool,
    hour: bool,
    hour12: bool,
    ampm: bool,
    minute: bool,
    offset: bool,
}

impl Coverage {
    const ALL: Coverage = Coverage {
        year: true,
        month: true,
        day: true,
        hour: true,
        hour12: false,
        ampm: false,
        minute: true,
        offset: true,
    };

    fn of(items: &[Item<'_>]) -> Self {
        let mut coverage = Coverage::default();
        for item in items {
            match item {
                Item::Numeric(numeric, _) => match numeric {
                    Numeric::Year
                    | Numeric::YearDiv100
                    | Numeric::YearMod100
                    | Numeric::IsoYear
                    | Numeric::IsoYearDiv100
                    | Numeric::IsoYearMod100 => coverage.year = true,
                    Numeric::Month => coverage.month = true,
                    Numeric::Day => coverage.day = true,
                    // a day of the year or a week number pins down both month and day
                    Numeric::Ordinal
                    | Numeric::IsoWeek
                    | Numeric::WeekFromSun
                    | Numeric::WeekFromMon => {
                        coverage.month = true;
                        coverage.day = true;
                    }
                    Numeric::Hour => coverage.hour = true,
                    Numeric::Hour12 => coverage.hour12 = true,
                    Numeric::Minute => coverage.minute = true,
                    // seconds since the epoch are always UTC, but still need an offset to resolve
                    Numeric::Timestamp => {
                        coverage = Coverage {
                            offset: coverage.offset,
                            ..Coverage::ALL
                        }
                    }
                    _ => {}
                },
                Item::Fixed(fixed) => match fixed {
                    Fixed::ShortMonthName | Fixed::LongMonthName => coverage.month = true,
                    Fixed::LowerAmPm | Fixed::UpperAmPm => coverage.ampm = true,
                    Fixed::TimezoneOffset
                    | Fixed::TimezoneOffsetZ
                    | Fixed::TimezoneOffsetColon
                    | Fixed::TimezoneOffsetColonZ
                    | Fixed::TimezoneOffsetDoubleColon
                    | Fixed::TimezoneOffsetTripleColon => coverage.offset = true,
                    Fixed::RFC2822 | Fixed::RFC3339 => coverage = Coverage::ALL,
                    _ => {}
                },
                _ => {}
            }
        }
        coverage
    }
}

/// Tokens of a reference-date layout, in match priority order: a longer token must come before
/// any token that is a prefix of it.
static REFERENCE_TOKENS: &[(&str, Item<'static>)] = &[
    ("January", Item::Fixed(Fixed::LongMonthName)),
    ("Jan", Item::Fixed(Fixed::ShortMonthName)),
    ("Monday", Item::Fixed(Fixed::LongWeekdayName)),
    ("Mon", Item::Fixed(Fixed::ShortWeekdayName)),
    ("MST", Item::Fixed(Fixed::TimezoneName)),
    ("2006", Item::Numeric(Numeric::Year, Pad::Zero)),
    ("002", Item::Numeric(Numeric::Ordinal, Pad::Zero)),
    ("__2", Item::Numeric(Numeric::Ordinal, Pad::Space)),
    ("_2", Item::Numeric(Numeric::Day, Pad::Space)),
    ("01", Item::Numeric(Numeric::Month, Pad::Zero)),
    ("02", Item::Numeric(Numeric::Day, Pad::Zero)),
    ("03", Item::Numeric(Numeric::Hour12, Pad::Zero)),
    ("04", Item::Numeric(Numeric::Minute, Pad::Zero)),
    ("05", Item::Numeric(Numeric::Second, Pad::Zero)),
    ("06", Item::Numeric(Numeric::YearMod100, Pad::Zero)),
    ("15", Item::Numeric(Numeric::Hour, Pad::Zero)),
    ("1", Item::Numeric(Numeric::Month, Pad::None)),
    ("2", Item::Numeric(Numeric::Day, Pad::None)),
    ("3", Item::Numeric(Numeric::Hour12, Pad::None)),
    ("4", Item::Numeric(Numeric::Minute, Pad::None)),
    ("5", Item::Numeric(Numeric::Second, Pad::None)),
    ("PM", Item::Fixed(Fixed::UpperAmPm)),
    ("pm", Item::Fixed(Fixed::LowerAmPm)),
    ("Z07:00", Item::Fixed(Fixed::TimezoneOffsetColonZ)),
    ("Z0700", Item::Fixed(Fixed::TimezoneOffsetZ)),
    ("-07:00", Item::Fixed(Fixed::TimezoneOffsetColon)),
    ("-0700", Item::Fixed(Fixed::TimezoneOffset)),
];

fn is_second(item: Option<&Item<'_>>) -> bool {
    matches!(item, Some(Item::Numeric(Numeric::Second, _)))
}

/// Matches a fractional-second token (`.000`, `.000000`, `.000000000` or `.9...`) at the start
/// of `rest`. Returns the item and how many bytes it spans.
fn fractional_second(rest: &str) -> Option<(Item<'static>, usize)> {
    let digits = rest.strip_prefix('.')?;
    let run = digits.bytes().take_while(|b| *b == b'0').count();
    let item = match run {
        3 => Fixed::Nanosecond3,
        6 => Fixed::Nanosecond6,
        9 => Fixed::Nanosecond9,
        0 => {
            let nines = digits.bytes().take_while(|b| *b == b'9').count();
            if nines == 0 {
                return None;
            }
            return Some((Item::Fixed(Fixed::Nanosecond), nines + 1));
        }
        _ => return None,
    };
    Some((Item::Fixed(item), run + 1))
}

fn tokenize_reference(layout: &str) -> Vec<Item<'_>> {
    let mut items = Vec::new();
    let mut literal_start = 0;
    let mut index = 0;

    while index < layout.len() {
        let rest = &layout[index..];

        let matched = REFERENCE_TOKENS
            .iter()
            .find(|(token, _)| rest.starts_with(token))
            .map(|(token, item)| (item.clone(), token.len()))
            .or_else(|| {
                if is_second(items.last()) && literal_start == index {
                    fractional_second(rest)
                } else {
                    None
                }
            });

        match matched {
            Some((item, consume_len)) => {
                if literal_start < index {
                    items.push(Item::Literal(&layout[literal_start..index]));
                }
                items.push(item);
                index += consume_len;
                literal_start = index;
            }
            None => {
                // literal text grows one char at a time; it is only flushed when a token or the
                // end of the layout is reached.
                index += rest.chars().next().map_or(1, char::len_utf8);
            }
        }
    }

    if literal_start < layout.len() {
        items.push(Item::Literal(&layout[literal_start..]));
    }
    items
}

/// A compiled date layout.
///
/// A layout is written one of two ways:
///
/// - As a *reference-date* layout, which shows how the reference time
///   `Mon Jan 2 15:04:05 MST 2006` would be written: `2006-01-02`, `01/02/06`, `Jan _2, 2006`.
/// - As a strftime layout, recognized by containing a `%`: `%Y-%m-%d`, `%d/%m/%y`.
///
/// Text that is not a recognized token is matched (and rendered) literally, so compiling a
/// layout never fails. Time-of-day and offset tokens are accepted, but a [`Date`](crate::Date)
/// only keeps the calendar day.
///
/// # Examples
///
/// ```
/// use jdate::{Date, Layout};
///
/// let layout = Layout::new("01/02/06");
/// let date = Date::parse_with(&layout, "08/06/12").unwrap();
/// assert_eq!("2012-08-06", date.to_string());
/// assert_eq!("08/06/12", date.format_with(&layout));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout<'a> {
    source: &'a str,
    items: Vec<Item<'a>>,
    coverage: Coverage,
    reference: bool,
}

impl<'a> Layout<'a> {
    /// Compiles a layout string.
    pub fn new(source: &'a str) -> Self {
        let (items, reference) = if source.contains('%') {
            let items: Vec<Item<'a>> = StrftimeItems::new(source).collect();
            if items.iter().any(|item| matches!(item, Item::Error)) {
                tracing::trace!(
                    layout = source,
                    "not a valid strftime layout, using reference tokens"
                );
                (tokenize_reference(source), true)
            } else {
                (items, false)
            }
        } else {
            (tokenize_reference(source), true)
        };
        let coverage = Coverage::of(&items);
        tracing::trace!(layout = source, items = items.len(), "compiled layout");
        Self {
            source,
            items,
            coverage,
            reference,
        }
    }

    /// Returns the layout string this was compiled from.
    pub fn as_str(&self) -> &'a str {
        self.source
    }

    /// Parses `input` into a timestamp in the offset written in `input` (UTC if the layout has no
    /// offset token).
    ///
    /// Fields the layout does not mention default to year 0, January, day 1, midnight.
    ///
    /// A two-digit `06` year in a reference-date layout means 1969 to 2068. Strftime `%y` keeps
    /// chrono's 1970 to 2069.
    pub(crate) fn parse(&self, input: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
        let mut parsed = Parsed::new();
        chrono::format::parse(&mut parsed, input, self.items.iter())?;

        if self.reference && parsed.year.is_none() && parsed.year_div_100.is_none() {
            if let Some(year_mod_100) = parsed.year_mod_100 {
                parsed.set_year_div_100(if year_mod_100 >= 69 { 19 } else { 20 })?;
            }
        }

        let coverage = self.coverage;
        if !coverage.year {
            parsed.set_year(0)?;
        }
        if !coverage.month {
            parsed.set_month(1)?;
        }
        if !coverage.day {
            parsed.set_day(1)?;
        }
        if coverage.hour12 && !coverage.ampm {
            parsed.set_ampm(false)?;
        }
        if !coverage.hour && !coverage.hour12 {
            parsed.set_hour(0)?;
        }
        if !coverage.minute {
            parsed.set_minute(0)?;
        }
        if !coverage.offset {
            parsed.set_offset(0)?;
        }

        parsed.to_datetime()
    }

    /// Renders a timestamp with this layout.
    pub(crate) fn format(&self, stamp: &DateTime<Utc>) -> String {
        stamp.format_with_items(self.items.iter()).to_string()
    }
}

impl Display for Layout<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate, TimeZone, Timelike};
    use rstest::*;

    #[fixture]
    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2013, 9, 4, 0, 0, 0).unwrap()
    }

    #[rstest]
    #[case("2006-01-02", "2013-09-04")]
    #[case("1/2/06", "9/4/13")]
    #[case("01/02/06", "09/04/13")]
    #[case("Jan _2, 2006", "Sep  4, 2013")]
    #[case("January 2, 2006", "September 4, 2013")]
    #[case("Mon Monday", "Wed Wednesday")]
    #[case("002", "247")]
    #[case("15:04:05 PM", "00:00:00 AM")]
    #[case("2006-01-02T15:04:05Z07:00", "2013-09-04T00:00:00Z")]
    #[case("2006-01-02 -0700 MST", "2013-09-04 +0000 UTC")]
    #[case("05.000", "00.000")]
    #[case("%Y/%m/%d", "2013/09/04")]
    #[case("%e %b %Y", " 4 Sep 2013")]
    fn test_format(stamp: DateTime<Utc>, #[case] layout: &str, #[case] expected: &str) {
        assert_eq!(expected, Layout::new(layout).format(&stamp));
    }

    #[test]
    fn test_literals_pass_through() {
        let layout = Layout::new("day 02 of 01 (😉) in 2006!");
        let stamp = Utc.with_ymd_and_hms(2024, 11, 2, 0, 0, 0).unwrap();
        assert_eq!("day 02 of 11 (😉) in 2024!", layout.format(&stamp));
    }

    #[test]
    fn test_fraction_only_after_seconds() {
        // without a seconds token before it, `.000` is literal text
        let layout = Layout::new("2006.000");
        let stamp = Utc.with_ymd_and_hms(2024, 11, 2, 0, 0, 0).unwrap();
        assert_eq!("2024.000", layout.format(&stamp));
        assert_eq!(
            vec![
                Item::Numeric(Numeric::Year, Pad::Zero),
                Item::Literal(".000")
            ],
            layout.items
        );
    }

    #[test]
    fn test_invalid_strftime_falls_back_to_reference_tokens() {
        let layout = Layout::new("2006 %Q");
        let stamp = Utc.with_ymd_and_hms(2024, 11, 2, 0, 0, 0).unwrap();
        assert_eq!("2024 %Q", layout.format(&stamp));
    }

    #[rstest]
    #[case("01/02/06", "08/06/12", 2012, 8, 6)]
    #[case("2006/01/02", "2013/09/04", 2013, 9, 4)]
    #[case("Jan 2, 2006", "Feb 29, 2024", 2024, 2, 29)]
    #[case("2006-002", "2024-061", 2024, 3, 1)]
    #[case("%d.%m.%Y", "31.12.1999", 1999, 12, 31)]
    #[case("Jan 2006", "Mar 2021", 2021, 3, 1)]
    #[case("01-02", "07-14", 0, 7, 14)]
    #[case("01/02/06", "08/06/68", 2068, 8, 6)]
    #[case("01/02/06", "08/06/69", 1969, 8, 6)]
    #[case("%m/%d/%y", "08/06/69", 2069, 8, 6)]
    #[case("%+", "2024-11-02T10:00:00+00:00", 2024, 11, 2)]
    #[case("%s", "1730541600", 2024, 11, 2)]
    #[case("%G-W%V-%u", "2024-W44-6", 2024, 11, 2)]
    #[case("%G-W%V-%u", "2020-W53-5", 2021, 1, 1)]
    #[case("%Y %W %u", "2024 44 6", 2024, 11, 2)]
    fn test_parse_date(
        #[case] layout: &str,
        #[case] input: &str,
        #[case] year: i32,
        #[case] month: u32,
        #[case] day: u32,
    ) {
        let parsed = Layout::new(layout).parse(input).unwrap();
        assert_eq!(
            NaiveDate::from_ymd_opt(year, month, day),
            Some(parsed.date_naive())
        );
    }

    #[test]
    fn test_parse_keeps_written_offset() {
        let layout = Layout::new("2006-01-02T15:04:05Z07:00");
        let parsed = layout.parse("2024-11-02T23:30:00-05:00").unwrap();
        // the calendar day is the one written, not the UTC one
        assert_eq!(2, parsed.day());
        assert_eq!(23, parsed.hour());
        assert_eq!(-5 * 3600, parsed.offset().local_minus_utc());
    }

    #[test]
    fn test_parse_keeps_rfc3339_offset() {
        let parsed = Layout::new("%+").parse("2024-11-02T23:30:00-05:00").unwrap();
        assert_eq!(2, parsed.day());
        assert_eq!(-5 * 3600, parsed.offset().local_minus_utc());
    }

    #[test]
    fn test_parse_timestamp_is_utc() {
        let parsed = Layout::new("%s").parse("1730591999").unwrap();
        assert_eq!(0, parsed.offset().local_minus_utc());
        assert_eq!((2, 23), (parsed.day(), parsed.hour()));
    }

    #[test]
    fn test_parse_twelve_hour_clock() {
        let layout = Layout::new("2006-01-02 3:04PM");
        let parsed = layout.parse("2024-11-02 7:15PM").unwrap();
        assert_eq!(19, parsed.hour());
        assert_eq!(15, parsed.minute());
    }

    #[rstest]
    #[case("01/02/06", "2009-03-04")]
    #[case("2006-01-02", "2023-02-29")]
    #[case("2006-01-02", "not a date")]
    fn test_parse_rejects(#[case] layout: &str, #[case] input: &str) {
        assert!(Layout::new(layout).parse(input).is_err());
    }

    #[test]
    fn test_display_is_source() {
        assert_eq!("Jan _2", Layout::new("Jan _2").to_string());
        assert_eq!("Jan _2", Layout::new("Jan _2").as_str());
    }
}
