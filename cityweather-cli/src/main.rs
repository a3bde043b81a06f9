//! Binary crate for the `cityweather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration and timezone picking
//! - Human-friendly output formatting

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod render;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    init_tracing(cmd.verbose);
    cmd.run().await
}

/// Log to stderr; `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_directive(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// `warn` by default, `debug` with `-v`, `trace` with `-vv` for our crates;
/// dependencies stay at `warn`.
fn log_directive(verbose: u8) -> String {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    format!("warn,cityweather_core={level},cityweather={level}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_verbosity_keeps_warnings() {
        assert_eq!(
            log_directive(0),
            "warn,cityweather_core=warn,cityweather=warn"
        );
    }

    #[test]
    fn verbose_flags_raise_crate_level() {
        assert!(log_directive(1).contains("cityweather_core=debug"));
        assert!(log_directive(2).contains("cityweather_core=trace"));
        assert!(log_directive(5).contains("cityweather=trace"));
        assert!(log_directive(2).starts_with("warn,"));
    }

    #[test]
    fn directives_parse_as_env_filter() {
        for verbose in 0..3 {
            assert!(EnvFilter::try_new(log_directive(verbose)).is_ok());
        }
    }
}
