//! csvsample - sample rows from CSV streams
//!
//! # Commands
//!
//! - `csvsample random <RATE>` - keep each row with probability RATE
//! - `csvsample hash <RATE> <COLUMN>` - keep rows whose COLUMN hashes below RATE
//! - `csvsample reservoir <SIZE>` - keep SIZE rows chosen uniformly
//!
//! Input is read from standard input unless `--input` names a file or an
//! `http(s)://` URL. Output goes to standard output, header first.

use std::io::{self, BufWriter};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use csvsample::sampling::validate_size;
use csvsample::{source, write_sample, MalformedRowPolicy, SampleConfig};

/// Create random samples from CSV data
#[derive(Parser)]
#[command(name = "csvsample")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Input file or http(s) URL; standard input when omitted or `-`
    #[arg(short, long, global = true)]
    input: Option<String>,

    /// Field delimiter used to locate the hash column
    #[arg(short, long, global = true, default_value = ",", value_parser = parse_delimiter)]
    delimiter: u8,

    /// Character encoding of the input, e.g. latin1 or utf-16le
    #[arg(short, long, global = true)]
    encoding: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Keep each row independently with the given probability
    Random {
        /// Probability of keeping a row, between 0.0 and 1.0
        sample_rate: f64,

        /// Seed for reproducible output
        #[arg(short, long, env = "CSVSAMPLE_SEED")]
        seed: Option<u64>,
    },

    /// Keep rows by hashing the value of one column
    Hash {
        /// Fraction of distinct keys to keep, between 0.0 and 1.0
        sample_rate: f64,

        /// Name of the column to hash
        column: String,

        /// Seed for reproducible output
        #[arg(short, long, env = "CSVSAMPLE_SEED")]
        seed: Option<u64>,

        /// Drop rows missing the column instead of failing
        #[arg(long)]
        skip_malformed: bool,
    },

    /// Keep a fixed number of rows chosen uniformly at random
    Reservoir {
        /// Number of rows to keep
        #[arg(allow_negative_numbers = true)]
        sample_size: i64,

        /// Seed for reproducible output
        #[arg(short, long, env = "CSVSAMPLE_SEED")]
        seed: Option<u64>,
    },
}

fn parse_delimiter(value: &str) -> Result<u8, String> {
    let value = match value {
        "\\t" | "tab" => "\t",
        other => other,
    };
    match value.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(format!("delimiter must be a single ASCII character, got {:?}", value)),
    }
}

impl Cli {
    fn sample_config(&self) -> csvsample::Result<SampleConfig> {
        let (config, seed) = match &self.command {
            Commands::Random { sample_rate, seed } => (SampleConfig::random(*sample_rate), *seed),
            Commands::Hash {
                sample_rate,
                column,
                seed,
                skip_malformed,
            } => {
                let policy = if *skip_malformed {
                    MalformedRowPolicy::Skip
                } else {
                    MalformedRowPolicy::Fail
                };
                let config = SampleConfig::hash(*sample_rate, column.clone())
                    .with_malformed_rows(policy);
                (config, *seed)
            }
            Commands::Reservoir { sample_size, seed } => {
                (SampleConfig::reservoir(validate_size(*sample_size)?), *seed)
            }
        };

        let mut config = config.with_delimiter(self.delimiter);
        config.seed = seed;
        config.encoding = self.encoding.clone();
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = cli.sample_config().context("invalid arguments")?;
    debug!(?config, "parsed arguments");

    let input = cli.input.as_deref();
    let lines = source::open(input, config.input_encoding()?)
        .with_context(|| format!("opening {}", input.unwrap_or("standard input")))?;
    let sample = csvsample::sample(lines, &config).context("starting sample")?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let written = write_sample(sample, &mut out).context("sampling failed")?;
    info!(lines = written, method = config.method.name(), "done");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use csvsample::Method;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_hash_command() {
        let cli = Cli::try_parse_from([
            "csvsample",
            "--delimiter",
            ";",
            "hash",
            "0.1",
            "user",
            "--seed",
            "7",
            "--skip-malformed",
        ])
        .unwrap();
        let config = cli.sample_config().unwrap();

        assert_eq!(
            config.method,
            Method::Hash {
                rate: 0.1,
                column: "user".into()
            }
        );
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.delimiter, b';');
        assert_eq!(config.malformed_rows, MalformedRowPolicy::Skip);
    }

    #[test]
    fn test_parse_encoding() {
        let cli =
            Cli::try_parse_from(["csvsample", "random", "0.5", "--encoding", "latin1"]).unwrap();
        let config = cli.sample_config().unwrap();
        assert_eq!(config.encoding.as_deref(), Some("latin1"));
        assert_eq!(config.input_encoding().unwrap().name(), "windows-1252");

        let cli = Cli::try_parse_from(["csvsample", "-e", "nope", "random", "0.5"]).unwrap();
        assert!(cli.sample_config().is_err());
    }

    #[test]
    fn test_negative_size_is_invalid_parameter() {
        let cli = Cli::try_parse_from(["csvsample", "reservoir", "-5"]).unwrap();
        let err = cli.sample_config().unwrap_err();
        assert!(matches!(err, csvsample::SampleError::InvalidParameter { .. }));
    }

    #[test]
    fn test_rate_out_of_range() {
        let cli = Cli::try_parse_from(["csvsample", "random", "1.5"]).unwrap();
        assert!(cli.sample_config().is_err());
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(",").unwrap(), b',');
        assert_eq!(parse_delimiter("\\t").unwrap(), b'\t');
        assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("é").is_err());
    }
}
