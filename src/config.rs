//! The configuration of a run, built once from the command-line arguments.

use crate::address::Family;
use crate::cli;
use crate::error::Error;
use crate::selector::Selection;
use crate::sources::remote::Endpoint;

use std::time::Duration;

/// Services which answer with the client's IP address in plain text and which
/// are reachable through IPv4 and IPv6; each of them is requested once per
/// family, forcing the connection to use that family.
const DUAL_STACK_PROVIDERS: [&str; 3] = [
    "https://icanhazip.com",
    "https://api64.ipify.org",
    "https://ident.me",
];

/// Services which are only reachable through IPv4.
const IPV4_PROVIDERS: [&str; 1] = ["https://ipv4.icanhazip.com"];

/// Services which are only reachable through IPv6.
const IPV6_PROVIDERS: [&str; 1] = ["https://ipv6.icanhazip.com"];

/// The maximum time that a request to a single provider lasts by default.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);
/// The maximum time to wait for the providers of a family by default.
pub const DEFAULT_RACE_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the addresses come from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Origin {
    /// The local network interfaces.
    Local,
    /// The remote providers.
    Remote,
}

/// The remote providers of each family and how long to wait for them.
#[derive(Clone, Debug, PartialEq)]
pub struct RemoteConfig {
    /// The providers raced for getting the IPv4 address.
    pub ipv4_endpoints: Vec<Endpoint>,
    /// The providers raced for getting the IPv6 address.
    pub ipv6_endpoints: Vec<Endpoint>,
    /// The maximum time to wait for any provider of a family to answer.
    pub race_timeout: Duration,
}

impl RemoteConfig {
    /// Creates the configuration with the default providers, whose requests
    /// last at most `probe_timeout`.
    pub fn with_default_providers(probe_timeout: Duration, race_timeout: Duration) -> Self {
        let endpoints = |family, specific: &[&str]| -> Vec<Endpoint> {
            DUAL_STACK_PROVIDERS
                .iter()
                .chain(specific)
                .map(|url| Endpoint::new(url, Some(family), probe_timeout))
                .collect()
        };

        Self {
            ipv4_endpoints: endpoints(Family::V4, &IPV4_PROVIDERS),
            ipv6_endpoints: endpoints(Family::V6, &IPV6_PROVIDERS),
            race_timeout,
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self::with_default_providers(DEFAULT_PROBE_TIMEOUT, DEFAULT_RACE_TIMEOUT)
    }
}

/// The immutable configuration which drives the [resolver](crate::resolver).
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Where the addresses come from.
    pub origin: Origin,
    /// The family of the addresses.
    pub family: Family,
    /// The addresses to print out of the found ones.
    pub selection: Selection,
    /// Only used when the origin is [`Origin::Remote`].
    pub remote: RemoteConfig,
}

impl Config {
    /// Builds the configuration from the command-line arguments.
    ///
    /// The providers indicated in the arguments replace the default providers
    /// of the requested family and their connections are forced to use it.
    pub fn from_app(app: cli::App) -> Result<Self, Error> {
        let family = if app.ipv4 { Family::V4 } else { Family::V6 };
        let mut remote = RemoteConfig::with_default_providers(app.probe_timeout, app.timeout);

        if !app.providers.is_empty() {
            let mut endpoints = Vec::with_capacity(app.providers.len());
            for (i, url) in app.providers.iter().enumerate() {
                if url.scheme() != "http" && url.scheme() != "https" {
                    return Err(Error::invalid_arguments(
                        &format!("providers[{}]", i),
                        &format!("'{}' must be an HTTP or HTTPS URL", url),
                    ));
                }

                endpoints.push(Endpoint::new(url.as_str(), Some(family), app.probe_timeout));
            }

            match family {
                Family::V4 => remote.ipv4_endpoints = endpoints,
                Family::V6 => remote.ipv6_endpoints = endpoints,
            }
        }

        Ok(Self {
            origin: match app.action {
                cli::Action::Local => Origin::Local,
                cli::Action::Remote => Origin::Remote,
            },
            family,
            selection: app.select,
            remote,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use clap::Parser;

    fn config(args: &[&str]) -> Result<Config, Error> {
        Config::from_app(cli::App::try_parse_from(args).expect("valid arguments"))
    }

    #[test]
    fn test_default_providers() {
        let remote = RemoteConfig::default();
        assert_eq!(remote.race_timeout, DEFAULT_RACE_TIMEOUT);
        assert_eq!(remote.ipv4_endpoints.len(), 4);
        assert_eq!(remote.ipv6_endpoints.len(), 4);

        for e in &remote.ipv4_endpoints {
            assert_eq!(e.transport, Some(Family::V4), "{}", e.url);
            assert_eq!(e.timeout, DEFAULT_PROBE_TIMEOUT, "{}", e.url);
        }
        for e in &remote.ipv6_endpoints {
            assert_eq!(e.transport, Some(Family::V6), "{}", e.url);
            assert_eq!(e.timeout, DEFAULT_PROBE_TIMEOUT, "{}", e.url);
        }

        assert!(remote
            .ipv4_endpoints
            .iter()
            .any(|e| e.url == "https://ipv4.icanhazip.com"));
        assert!(remote
            .ipv6_endpoints
            .iter()
            .any(|e| e.url == "https://ipv6.icanhazip.com"));
    }

    #[test]
    fn test_from_app() {
        let cfg = config(&["myip", "local"]).expect("valid configuration");
        assert_eq!(cfg.origin, Origin::Local);
        assert_eq!(cfg.family, Family::V6);
        assert_eq!(cfg.selection, Selection::All);
        assert_eq!(cfg.remote, RemoteConfig::default());

        let cfg = config(&["myip", "remote", "-4", "-s", "first", "--timeout", "3", "--probe-timeout", "1"])
            .expect("valid configuration");
        assert_eq!(cfg.origin, Origin::Remote);
        assert_eq!(cfg.family, Family::V4);
        assert_eq!(cfg.selection, Selection::First);
        assert_eq!(cfg.remote.race_timeout, Duration::from_secs(3));
        assert!(cfg
            .remote
            .ipv4_endpoints
            .iter()
            .chain(&cfg.remote.ipv6_endpoints)
            .all(|e| e.timeout == Duration::from_secs(1)));
    }

    #[test]
    fn test_from_app_providers() {
        let cfg = config(&[
            "myip",
            "remote",
            "-4",
            "--provider",
            "http://127.0.0.1:8080/ip",
            "--provider",
            "https://api.ipify.org",
        ])
        .expect("valid configuration");

        assert_eq!(
            cfg.remote.ipv4_endpoints,
            vec![
                Endpoint::new("http://127.0.0.1:8080/ip", Some(Family::V4), DEFAULT_PROBE_TIMEOUT),
                Endpoint::new("https://api.ipify.org/", Some(Family::V4), DEFAULT_PROBE_TIMEOUT),
            ]
        );
        assert_eq!(
            cfg.remote.ipv6_endpoints,
            RemoteConfig::default().ipv6_endpoints,
            "the providers of the other family are kept"
        );
    }

    #[test]
    fn test_from_app_provider_not_http() {
        let err = config(&["myip", "remote", "--provider", "ftp://example.com/ip"])
            .expect_err("FTP providers aren't supported");
        if let Error::InvalidArguments(args) = err {
            assert_eq!(args.names, "providers[0]");
        } else {
            panic!("expected invalid arguments, got: {:?}", err);
        }
    }
}
