//! Command-line argument parsing.
//!
//! A small hand-rolled parser over `std::env::args` — the surface is two
//! positional URLs and four flags, which does not justify a parser
//! dependency.  Parsed flags override the values loaded from
//! `settings.toml` (see [`CliArgs::apply_to`]).

use std::fmt::Write as _;

use thiserror::Error;

use crate::config::AppConfig;

/// Usage text printed for `--help` and parse errors.
pub const USAGE: &str = "\
Compare two audio streams and report a similarity percentage.

Usage: stream-similarity [OPTIONS] <URL1> <URL2>

Arguments:
  <URL1>  First stream endpoint
  <URL2>  Second stream endpoint

Options:
  -d, --duration <SECS>    Seconds of audio to capture (default: 30)
      --max-offset <SECS>  Maximum alignment offset to search (default: 1.0)
      --step <SAMPLES>     Alignment search stride in samples (default: 1000)
  -v, --verbose            Increase verbosity (-v info, -vv debug)
  -h, --help               Print this message";

// ---------------------------------------------------------------------------
// CliError
// ---------------------------------------------------------------------------

/// Reason the command line could not be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("missing value for {0}")]
    MissingValue(&'static str),

    #[error("invalid value {value:?} for {flag}")]
    InvalidValue { flag: &'static str, value: String },

    #[error("unknown option {0:?}")]
    UnknownFlag(String),

    #[error("expected two stream URLs, got {0}")]
    MissingUrls(usize),

    #[error("unexpected extra argument {0:?}")]
    ExtraArgument(String),
}

// ---------------------------------------------------------------------------
// CliArgs
// ---------------------------------------------------------------------------

/// Outcome of parsing: either a run request or a help request.
#[derive(Debug, PartialEq)]
pub enum Parsed {
    Run(CliArgs),
    Help,
}

/// Parsed command-line arguments.
#[derive(Debug, Default, PartialEq)]
pub struct CliArgs {
    pub url1: String,
    pub url2: String,
    /// Capture duration override, seconds.
    pub duration_secs: Option<f64>,
    /// Alignment window override, seconds.
    pub max_offset_secs: Option<f64>,
    /// Alignment stride override, samples.
    pub step_samples: Option<usize>,
    /// Count of `-v` occurrences.
    pub verbosity: u8,
}

impl CliArgs {
    /// Parse arguments, excluding the program name
    /// (`std::env::args().skip(1)`).
    pub fn parse<I>(args: I) -> Result<Parsed, CliError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut iter = args.into_iter();
        let mut parsed = CliArgs::default();
        let mut urls: Vec<String> = Vec::new();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(Parsed::Help),

                "-d" | "--duration" => {
                    let value = iter.next().ok_or(CliError::MissingValue("--duration"))?;
                    parsed.duration_secs = Some(parse_number("--duration", &value)?);
                }

                "--max-offset" => {
                    let value = iter.next().ok_or(CliError::MissingValue("--max-offset"))?;
                    parsed.max_offset_secs = Some(parse_number("--max-offset", &value)?);
                }

                "--step" => {
                    let value = iter.next().ok_or(CliError::MissingValue("--step"))?;
                    let step: usize = value.parse().map_err(|_| CliError::InvalidValue {
                        flag: "--step",
                        value: value.clone(),
                    })?;
                    if step == 0 {
                        return Err(CliError::InvalidValue {
                            flag: "--step",
                            value,
                        });
                    }
                    parsed.step_samples = Some(step);
                }

                "-v" | "--verbose" => parsed.verbosity += 1,

                other if other.starts_with("-v") && other[1..].bytes().all(|b| b == b'v') => {
                    // Collapsed repetition: -vv, -vvv, …
                    parsed.verbosity += (other.len() - 1) as u8;
                }

                other if other.starts_with('-') && other.len() > 1 => {
                    return Err(CliError::UnknownFlag(other.to_owned()));
                }

                other => {
                    if urls.len() == 2 {
                        return Err(CliError::ExtraArgument(other.to_owned()));
                    }
                    urls.push(other.to_owned());
                }
            }
        }

        if urls.len() != 2 {
            return Err(CliError::MissingUrls(urls.len()));
        }
        parsed.url2 = urls.pop().unwrap_or_default();
        parsed.url1 = urls.pop().unwrap_or_default();
        Ok(Parsed::Run(parsed))
    }

    /// Fold flag overrides into a loaded configuration.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(duration) = self.duration_secs {
            config.capture.duration_secs = duration;
        }
        if let Some(max_offset) = self.max_offset_secs {
            config.alignment.max_offset_secs = max_offset;
        }
        if let Some(step) = self.step_samples {
            config.alignment.step_samples = step;
        }
    }

    /// One-line summary of the effective request, for `-v` logging.
    pub fn describe(&self, config: &AppConfig) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            "comparing {} vs {} ({}s capture, {}s window, {}-sample stride)",
            self.url1,
            self.url2,
            config.capture.duration_secs,
            config.alignment.max_offset_secs,
            config.alignment.step_samples
        );
        out
    }
}

/// Durations and offsets must be strictly positive: a zero or negative
/// window would silently collapse the search to no candidates at all.
fn parse_number(flag: &'static str, value: &str) -> Result<f64, CliError> {
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() && n > 0.0 => Ok(n),
        _ => Err(CliError::InvalidValue {
            flag,
            value: value.to_owned(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Parsed, CliError> {
        CliArgs::parse(args.iter().map(|s| s.to_string()))
    }

    fn run(args: &[&str]) -> CliArgs {
        match parse(args).expect("parse") {
            Parsed::Run(a) => a,
            Parsed::Help => panic!("unexpected help"),
        }
    }

    #[test]
    fn two_urls_only() {
        let args = run(&["http://a/stream", "http://b/stream"]);
        assert_eq!(args.url1, "http://a/stream");
        assert_eq!(args.url2, "http://b/stream");
        assert_eq!(args.duration_secs, None);
        assert_eq!(args.verbosity, 0);
    }

    #[test]
    fn all_flags() {
        let args = run(&[
            "-d",
            "12.5",
            "--max-offset",
            "2.0",
            "--step",
            "500",
            "-v",
            "http://a",
            "http://b",
        ]);
        assert_eq!(args.duration_secs, Some(12.5));
        assert_eq!(args.max_offset_secs, Some(2.0));
        assert_eq!(args.step_samples, Some(500));
        assert_eq!(args.verbosity, 1);
    }

    #[test]
    fn verbosity_accumulates() {
        assert_eq!(run(&["-v", "-v", "a", "b"]).verbosity, 2);
        assert_eq!(run(&["-vv", "a", "b"]).verbosity, 2);
        assert_eq!(run(&["-vvv", "a", "b"]).verbosity, 3);
    }

    #[test]
    fn help_short_circuits() {
        assert_eq!(parse(&["--help"]), Ok(Parsed::Help));
        assert_eq!(parse(&["-h", "http://a"]), Ok(Parsed::Help));
    }

    #[test]
    fn missing_urls() {
        assert_eq!(parse(&[]), Err(CliError::MissingUrls(0)));
        assert_eq!(parse(&["http://a"]), Err(CliError::MissingUrls(1)));
    }

    #[test]
    fn extra_positional_rejected() {
        assert_eq!(
            parse(&["a", "b", "c"]),
            Err(CliError::ExtraArgument("c".into()))
        );
    }

    #[test]
    fn unknown_flag_rejected() {
        assert_eq!(
            parse(&["--segments", "5", "a", "b"]),
            Err(CliError::UnknownFlag("--segments".into()))
        );
    }

    #[test]
    fn missing_and_invalid_values() {
        assert_eq!(
            parse(&["a", "b", "-d"]),
            Err(CliError::MissingValue("--duration"))
        );
        assert_eq!(
            parse(&["-d", "soon", "a", "b"]),
            Err(CliError::InvalidValue {
                flag: "--duration",
                value: "soon".into()
            })
        );
        assert_eq!(
            parse(&["--step", "-3", "a", "b"]),
            Err(CliError::InvalidValue {
                flag: "--step",
                value: "-3".into()
            })
        );
    }

    #[test]
    fn non_positive_values_rejected() {
        assert_eq!(
            parse(&["--max-offset", "-1", "a", "b"]),
            Err(CliError::InvalidValue {
                flag: "--max-offset",
                value: "-1".into()
            })
        );
        assert_eq!(
            parse(&["--max-offset", "0", "a", "b"]),
            Err(CliError::InvalidValue {
                flag: "--max-offset",
                value: "0".into()
            })
        );
        assert_eq!(
            parse(&["-d", "-5", "a", "b"]),
            Err(CliError::InvalidValue {
                flag: "--duration",
                value: "-5".into()
            })
        );
        assert_eq!(
            parse(&["--step", "0", "a", "b"]),
            Err(CliError::InvalidValue {
                flag: "--step",
                value: "0".into()
            })
        );
    }

    #[test]
    fn overrides_apply_to_config() {
        let args = run(&["-d", "10", "--max-offset", "0.5", "a", "b"]);
        let mut config = AppConfig::default();
        args.apply_to(&mut config);

        assert_eq!(config.capture.duration_secs, 10.0);
        assert_eq!(config.alignment.max_offset_secs, 0.5);
        // Untouched flag keeps the configured value.
        assert_eq!(config.alignment.step_samples, 1000);
    }

    #[test]
    fn defaults_survive_when_no_flags_given() {
        let args = run(&["a", "b"]);
        let mut config = AppConfig::default();
        args.apply_to(&mut config);
        assert_eq!(config, AppConfig::default());
    }
}
