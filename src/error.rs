use core::{num::ParseIntError, str::Utf8Error};

/// Errors that can occur when building a [`Date`](crate::Date) from text, numbers, or driver
/// values.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DateError {
    /// The input is not shaped like `YYYY-MM-DD` (wrong length or separators).
    #[error("cannot convert '{input}' to date")]
    Malformed {
        /// The rejected input.
        input: String,
    },

    /// One of the numeric fields of a `YYYY-MM-DD` string is not an integer.
    #[error("cannot convert '{input}' to date: field '{field}' is not a number")]
    InvalidField {
        /// The offending substring.
        field: String,
        /// The whole input.
        input: String,
        /// The underlying integer parse failure.
        #[source]
        source: ParseIntError,
    },

    /// The input was rejected by a layout.
    #[error("cannot parse '{input}' as date with layout '{layout}': {source}")]
    Layout {
        /// The layout the input was parsed against.
        layout: String,
        /// The rejected input.
        input: String,
        /// The underlying layout parse failure.
        #[source]
        source: chrono::ParseError,
    },

    /// The year, month and day do not name a day of the proleptic Gregorian calendar.
    #[error("year ({year}), month ({month}), and day ({day}) cannot be made into a valid date")]
    InvalidDate {
        /// The year component.
        year: i64,
        /// The month component.
        month: i64,
        /// The day component.
        day: i64,
    },

    /// A driver value of a kind that has no date interpretation.
    #[error("Scan: unable to scan type {type_name} into Date")]
    UnsupportedScanType {
        /// The name of the rejected value kind.
        type_name: &'static str,
    },

    /// Byte input that is not valid UTF-8.
    #[error("date text is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] Utf8Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message() {
        let err = DateError::Malformed {
            input: "01/02/06".to_string(),
        };
        assert_eq!("cannot convert '01/02/06' to date", err.to_string());
    }

    #[test]
    fn test_invalid_field_keeps_source() {
        let source = "2x".parse::<i64>().unwrap_err();
        let err = DateError::InvalidField {
            field: "2x".to_string(),
            input: "2x10-11-12".to_string(),
            source: source.clone(),
        };
        assert!(err.to_string().contains("'2x'"));
        assert_eq!(
            Some(&source as &dyn std::error::Error).map(|e| e.to_string()),
            std::error::Error::source(&err).map(|e| e.to_string())
        );
    }

    #[test]
    fn test_unsupported_scan_type_message() {
        let err = DateError::UnsupportedScanType { type_name: "bool" };
        assert_eq!("Scan: unable to scan type bool into Date", err.to_string());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<DateError>();
    }
}
