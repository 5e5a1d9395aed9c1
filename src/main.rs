use clap::{ArgAction, Parser, Subcommand};
use jdate::{Date, DateError};

mod logging;

#[derive(thiserror::Error, Debug)]
pub enum DateCliError {
    #[error("{0}")]
    LibraryError(#[from] DateError),
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
#[command(arg_required_else_help(true))]
enum Commands {
    /// Prints the Julian Day Number of a `YYYY-MM-DD` date
    Jd {
        /// The date, as `YYYY-MM-DD`
        date: Date,
    },

    /// Prints the date of a Julian Day Number
    FromJd {
        /// The Julian Day Number
        #[arg(allow_negative_numbers = true)]
        jd: i64,
    },

    /// Shifts a date by years, months and days.
    ///
    /// Months past the end of the year roll into the next year, and days past the end of the
    /// month roll into the next month, so January 31st plus one month is March 2nd or 3rd.
    Add {
        /// The date, as `YYYY-MM-DD`
        date: Date,

        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        years: i32,

        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        months: i32,

        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        days: i64,
    },

    /// Prints the number of days from `B` to `A`
    Diff {
        /// The later date, as `YYYY-MM-DD`
        a: Date,

        /// The earlier date, as `YYYY-MM-DD`
        b: Date,
    },

    /// Formats a date with a layout.
    ///
    /// Layouts containing `%` are strftime strings. Anything else is written as the reference
    /// time `Mon Jan 2 15:04:05 MST 2006` would look, e.g. `Jan _2, 2006` or `02/01/2006`.
    Format {
        /// The date, as `YYYY-MM-DD`
        date: Date,

        /// The layout to format with
        #[arg(short, long)]
        layout: String,
    },

    /// Parses a date with a layout and prints it as `YYYY-MM-DD`
    Parse {
        /// The text to parse
        input: String,

        /// The layout `INPUT` is written in
        #[arg(short, long)]
        layout: String,
    },

    /// Prints today's UTC date
    Today,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli.command) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn run(command: Commands) -> Result<String, DateCliError> {
    tracing::debug!(?command, "running");
    let output = match command {
        Commands::Jd { date } => date.jd().to_string(),
        Commands::FromJd { jd } => Date::from_jd(jd).to_string(),
        Commands::Add {
            date,
            years,
            months,
            days,
        } => date.add_date(years, months, days).to_string(),
        Commands::Diff { a, b } => a.sub(b).to_string(),
        Commands::Format { date, layout } => date.format(&layout),
        Commands::Parse { input, layout } => Date::parse(&layout, &input)?.to_string(),
        Commands::Today => Date::today().to_string(),
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    fn parse_args(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("jdate").chain(args.iter().copied()))
    }

    fn run_args(args: &[&str]) -> Result<String, DateCliError> {
        run(parse_args(args).unwrap().command)
    }

    #[rstest]
    #[case(&["jd", "1970-01-01"], "2440588")]
    #[case(&["from-jd", "2440588"], "1970-01-01")]
    #[case(&["from-jd", "-1"], "-4713-11-23")]
    #[case(&["from-jd", "0"], "")]
    #[case(&["add", "2010-11-12", "--years", "3", "--months", "-2", "--days", "1"], "2013-09-13")]
    #[case(&["add", "2010-01-31", "-m", "1"], "2010-03-03")]
    #[case(&["diff", "2013-09-13", "2010-11-12"], "1036")]
    #[case(&["diff", "2010-11-12", "2013-09-13"], "-1036")]
    #[case(&["format", "2012-08-06", "--layout", "Jan _2, 2006"], "Aug  6, 2012")]
    #[case(&["format", "2012-08-06", "-l", "%d.%m.%Y"], "06.08.2012")]
    #[case(&["parse", "08/06/12", "--layout", "01/02/06"], "2012-08-06")]
    #[case(&["-vv", "jd", "2010-11-12"], "2455513")]
    fn test_run(#[case] args: &[&str], #[case] expected: &str) {
        assert_eq!(expected, run_args(args).unwrap());
    }

    #[test]
    fn test_today() {
        assert_eq!(Date::today().to_string(), run_args(&["today"]).unwrap());
    }

    #[test]
    fn test_parse_failure_is_library_error() {
        let err = run_args(&["parse", "2009-03-04", "--layout", "01/02/06"]).unwrap_err();
        assert!(matches!(
            err,
            DateCliError::LibraryError(DateError::Layout { .. })
        ));
    }

    #[rstest]
    #[case(&["jd", "2010-13-01"])]
    #[case(&["jd", "yesterday"])]
    #[case(&["format", "2012-08-06"])]
    #[case(&[])]
    fn test_bad_arguments_rejected(#[case] args: &[&str]) {
        assert!(parse_args(args).is_err());
    }

    #[test]
    fn test_verbose_counts() {
        let cli = parse_args(&["today", "-vvv"]).unwrap();
        assert_eq!(3, cli.verbose);
    }
}
