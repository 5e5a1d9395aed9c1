use tracing_subscriber::EnvFilter;

/// Initialize tracing for the `jdate` target from the CLI verbosity count.
///
/// - 0 (none) -> warn
/// - 1 (-v)   -> info
/// - 2 (-vv)  -> debug
/// - 3+ (-vvv)-> trace
///
/// `RUST_LOG` overrides the flag if set.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn default_directive(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("jdate={level}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(0, "jdate=warn")]
    #[case(1, "jdate=info")]
    #[case(2, "jdate=debug")]
    #[case(3, "jdate=trace")]
    #[case(9, "jdate=trace")]
    fn test_default_directive(#[case] verbosity: u8, #[case] expected: &str) {
        assert_eq!(expected, default_directive(verbosity));
    }
}
