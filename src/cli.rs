//! Command-line interface.

use crate::selector::Selection;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use std::vec::Vec;

use clap::Parser;
use url::Url;

/// Returns the local or the public IPv6 (or IPv4) addresses of this machine.
#[derive(Debug, Parser)]
#[clap(author, name = "myip", version)]
pub struct App {
    /// The addresses to get: "local" (network interfaces) or "remote" (as
    /// seen by the remote providers). The case is ignored.
    #[clap(value_name = "ACTION")]
    pub action: Action,

    /// Use IPv4 instead of IPv6.
    #[clap(short = '4', long = "ipv4")]
    pub ipv4: bool,

    /// Select one or more IPs when there are several available.
    ///
    /// Accepted values: "all", "first", "last" or a comma separated list of
    /// positions starting at 1 (e.g. "1" or "1,3").
    #[clap(short, long, default_value = "all", value_name = "SELECTION")]
    pub select: Selection,

    /// Maximum time, in seconds, to wait for any remote provider to answer.
    #[clap(long, default_value = "10", value_name = "SECONDS", parse(try_from_str = parse_seconds))]
    pub timeout: Duration,

    /// Maximum time, in seconds, that a request to a single remote provider
    /// may last.
    #[clap(long, default_value = "5", value_name = "SECONDS", parse(try_from_str = parse_seconds))]
    pub probe_timeout: Duration,

    /// Remote provider to use instead of the default ones; it can be indicated
    /// several times for racing several providers.
    ///
    /// The provider must answer with the IP address of the client in plain
    /// text.
    #[clap(long = "provider", value_name = "URL")]
    pub providers: Vec<Url>,

    /// Increase the logging verbosity; it's ignored when RUST_LOG is set.
    #[clap(short, long, parse(from_occurrences))]
    pub verbose: usize,
}

/// What the tool must do.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    /// Get your local IP address.
    Local,
    /// Get your remote IP address.
    Remote,
}

impl FromStr for Action {
    type Err = String;

    /// Parses the action name ignoring the surrounding whitespace and the case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Action::Local),
            "remote" => Ok(Action::Remote),
            name => Err(format!(
                r#"the action {:?} does not exist (expected "local" or "remote")"#,
                name
            )),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Action::Local => write!(f, "local"),
            Action::Remote => write!(f, "remote"),
        }
    }
}

/// Parses a positive number of seconds, which may have a fractional part.
fn parse_seconds(s: &str) -> Result<Duration, String> {
    let secs = s
        .parse::<f64>()
        .map_err(|_| format!("'{}' is not a number of seconds", s))?;

    if secs.is_nan() || secs <= 0.0 {
        return Err(format!("'{}' must be greater than 0", s));
    }

    Duration::try_from_secs_f64(secs).map_err(|_| format!("'{}' is too big", s))
}
