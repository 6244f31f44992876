//! Concurrent requests to several redundant providers where the first valid
//! answer wins.

use super::probe::{Endpoint, Probe, ProbeOutcome};
use crate::address::Address;
use crate::error::{BoxError, Error as ErrorCommon, NetworkSide};
use crate::sources::Error;

use std::error as stderr;
use std::fmt;
use std::time::Duration;

use futures::{stream::FuturesUnordered, StreamExt};
use tracing::{debug, info, warn};

/// The reasons why a race doesn't produce any address.
#[derive(Debug)]
pub enum RaceError {
    /// The race didn't have any endpoint to probe.
    NoProviders,
    /// Every probe failed before any of them succeeded.
    AllFailed {
        /// The URL of each endpoint with its failure, in arrival order.
        failures: Vec<(String, Error)>,
    },
    /// No probe succeeded before the race's timeout.
    Timeout {
        /// The race's timeout.
        after: Duration,
    },
}

impl stderr::Error for RaceError {}

impl fmt::Display for RaceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            RaceError::NoProviders => write!(f, "there isn't any provider to request the IP address"),
            RaceError::AllFailed { failures } => {
                write!(f, "all the providers failed")?;
                for (i, (url, err)) in failures.iter().enumerate() {
                    let sep = if i == 0 { ": " } else { "; " };
                    write!(f, "{}{} ({})", sep, url, err)?;
                }
                Ok(())
            }
            RaceError::Timeout { after } => write!(
                f,
                "none of the providers returned an IP address in {:?}",
                after
            ),
        }
    }
}

/// Probes all the endpoints at the same time and returns the first address
/// that any of them returns.
///
/// The outcomes are consumed in the order that they arrive. The probes which
/// are still in flight when the winner arrives, or when `timeout` elapses, are
/// dropped and their outcomes are never observed.
///
/// Each probe is bounded by the timeout of its endpoint; a probe which exceeds
/// it counts as a failed probe, not as the race's timeout.
pub async fn race(
    probe: &dyn Probe,
    endpoints: &[Endpoint],
    timeout: Duration,
) -> Result<Address, RaceError> {
    if endpoints.is_empty() {
        return Err(RaceError::NoProviders);
    }

    let mut in_flight: FuturesUnordered<_> = endpoints
        .iter()
        .map(|endpoint| async move {
            debug!(url = %endpoint.url, "launching probe");
            (endpoint, bounded_probe(probe, endpoint).await)
        })
        .collect();

    let mut failures = Vec::with_capacity(endpoints.len());
    let first_success = async {
        while let Some((endpoint, outcome)) = in_flight.next().await {
            match outcome {
                Ok(address) => {
                    info!(url = %endpoint.url, %address, "provider answered first");
                    return Some(address);
                }
                Err(err) => {
                    warn!(url = %endpoint.url, error = %err, "probe failed");
                    failures.push((endpoint.url.clone(), err));
                }
            }
        }

        None
    };

    let winner = tokio::time::timeout(timeout, first_success).await;
    match winner {
        Ok(Some(address)) => Ok(address),
        Ok(None) => Err(RaceError::AllFailed { failures }),
        Err(_) => {
            warn!(?timeout, failed = failures.len(), "race timed out");
            Err(RaceError::Timeout { after: timeout })
        }
    }
}

/// Probes the endpoint, failing when it lasts longer than the endpoint's
/// timeout.
async fn bounded_probe(probe: &dyn Probe, endpoint: &Endpoint) -> ProbeOutcome {
    match tokio::time::timeout(endpoint.timeout, probe.probe(endpoint)).await {
        Ok(outcome) => outcome,
        Err(elapsed) => Err(Error::Common(ErrorCommon::network(
            BoxError::from(elapsed),
            NetworkSide::Server,
            true,
        ))),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::address::Family;
    use crate::error::ExternalService;
    use crate::sources::remote::HttpProbe;

    use std::collections::HashMap;
    use std::str::FromStr;
    use std::time::Instant;

    use async_trait::async_trait;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// A probe which answers after a delay with the configured outcome of each
    /// URL.
    struct ScriptedProbe {
        answers: HashMap<&'static str, (Duration, Option<&'static str>)>,
    }

    impl ScriptedProbe {
        fn new(answers: &[(&'static str, u64, Option<&'static str>)]) -> Self {
            Self {
                answers: answers
                    .iter()
                    .map(|(url, delay, ip)| (*url, (Duration::from_millis(*delay), *ip)))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl Probe for ScriptedProbe {
        async fn probe(&self, endpoint: &Endpoint) -> ProbeOutcome {
            let (delay, ip) = self.answers[endpoint.url.as_str()];
            tokio::time::sleep(delay).await;
            match ip {
                Some(ip) => Ok(Address::from_str(ip).unwrap()),
                None => Err(Error::Provider(ExternalService::Internal {
                    reason: String::from("scripted failure"),
                })),
            }
        }
    }

    fn endpoints(urls: &[&str]) -> Vec<Endpoint> {
        urls.iter()
            .map(|url| Endpoint::new(url, Some(Family::V4), Duration::from_secs(5)))
            .collect()
    }

    #[tokio::test]
    async fn test_race_no_providers() {
        let probe = ScriptedProbe::new(&[]);
        let started = Instant::now();
        let err = race(&probe, &[], Duration::from_secs(10))
            .await
            .expect_err("a race without endpoints must fail");

        assert!(matches!(err, RaceError::NoProviders), "got: {:?}", err);
        assert!(
            started.elapsed() < Duration::from_millis(100),
            "a race without endpoints must not wait"
        );
    }

    #[tokio::test]
    async fn test_race_single_success_not_first() {
        let probe = ScriptedProbe::new(&[
            ("a", 10, None),
            ("b", 0, None),
            ("c", 50, Some("1.2.3.4")),
        ]);

        let addr = race(&probe, &endpoints(&["a", "b", "c"]), Duration::from_secs(5))
            .await
            .expect("one endpoint succeeds");
        assert_eq!(addr, Address::from_str("1.2.3.4").unwrap());
    }

    #[tokio::test]
    async fn test_race_does_not_wait_for_slow_probes() {
        let probe = ScriptedProbe::new(&[("slow", 3_000, Some("5.6.7.8")), ("fast", 10, Some("1.2.3.4"))]);

        let started = Instant::now();
        let addr = race(&probe, &endpoints(&["slow", "fast"]), Duration::from_secs(5))
            .await
            .expect("the fast endpoint succeeds");

        assert_eq!(addr, Address::from_str("1.2.3.4").unwrap());
        assert!(
            started.elapsed() < Duration::from_secs(1),
            "the race waited for the slow probe, elapsed: {:?}",
            started.elapsed()
        );
    }

    #[tokio::test]
    async fn test_race_any_success() {
        let probe = ScriptedProbe::new(&[
            ("a", 20, Some("1.1.1.1")),
            ("b", 20, Some("2.2.2.2")),
            ("c", 0, None),
        ]);

        let addr = race(&probe, &endpoints(&["a", "b", "c"]), Duration::from_secs(5))
            .await
            .expect("two endpoints succeed");
        assert!(
            [
                Address::from_str("1.1.1.1").unwrap(),
                Address::from_str("2.2.2.2").unwrap()
            ]
            .contains(&addr),
            "the winner must be one of the successful endpoints, got: {}",
            addr
        );
    }

    #[tokio::test]
    async fn test_race_all_failed() {
        let probe = ScriptedProbe::new(&[("a", 30, None), ("b", 0, None), ("c", 10, None)]);

        let err = race(&probe, &endpoints(&["a", "b", "c"]), Duration::from_secs(5))
            .await
            .expect_err("every endpoint fails");

        if let RaceError::AllFailed { failures } = err {
            let mut urls: Vec<_> = failures.iter().map(|(url, _)| url.as_str()).collect();
            urls.sort_unstable();
            assert_eq!(urls, ["a", "b", "c"], "every failure is reported");
        } else {
            panic!("expected all failed, got: {:?}", err);
        }
    }

    #[tokio::test]
    async fn test_race_timeout() {
        let probe = ScriptedProbe::new(&[("a", 3_000, Some("1.1.1.1")), ("b", 3_000, Some("2.2.2.2"))]);

        let started = Instant::now();
        let err = race(&probe, &endpoints(&["a", "b"]), Duration::from_millis(200))
            .await
            .expect_err("no endpoint answers in time");

        assert!(matches!(err, RaceError::Timeout { .. }), "got: {:?}", err);
        let elapsed = started.elapsed();
        assert!(
            elapsed >= Duration::from_millis(200) && elapsed < Duration::from_secs(2),
            "the race must last about its timeout, elapsed: {:?}",
            elapsed
        );
    }

    #[tokio::test]
    async fn test_race_probe_timeout_is_a_failure() {
        let probe = ScriptedProbe::new(&[("a", 2_000, Some("1.1.1.1"))]);
        let endpoints = vec![Endpoint::new("a", Some(Family::V4), Duration::from_millis(50))];

        let err = race(&probe, &endpoints, Duration::from_secs(5))
            .await
            .expect_err("the probe exceeds its own timeout");

        if let RaceError::AllFailed { failures } = err {
            assert_eq!(failures.len(), 1);
            assert!(
                matches!(failures[0].1, Error::Common(ErrorCommon::Network(_))),
                "a probe's timeout is a network failure, got: {:?}",
                failures[0].1
            );
        } else {
            panic!("expected all failed, got: {:?}", err);
        }
    }

    #[tokio::test]
    async fn test_race_http_providers() {
        let failing = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&failing)
            .await;

        let gibberish = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("aaa"))
            .mount(&gibberish)
            .await;

        let answering = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("192.168.22.1\n"))
            .mount(&answering)
            .await;

        let urls = [failing.uri(), gibberish.uri(), answering.uri()];
        let endpoints: Vec<_> = urls
            .iter()
            .map(|url| Endpoint::new(url, Some(Family::V4), Duration::from_secs(3)))
            .collect();

        let probe = HttpProbe::new().expect("HTTP client");
        let addr = race(&probe, &endpoints, Duration::from_secs(5))
            .await
            .expect("one provider answers with a valid IP");
        assert_eq!(addr, Address::from_str("192.168.22.1").unwrap());
    }

    #[test]
    fn test_all_failed_display() {
        let err = RaceError::AllFailed {
            failures: vec![
                (
                    String::from("https://a.test"),
                    Error::Provider(ExternalService::Internal {
                        reason: String::from("boom"),
                    }),
                ),
                (
                    String::from("https://b.test"),
                    Error::Provider(ExternalService::InvalidResponse {
                        reason: String::from("\"aaa\" is not a valid IP address"),
                    }),
                ),
            ],
        };

        assert_eq!(
            err.to_string(),
            "all the providers failed: https://a.test (service had an internal error: boom); \
             https://b.test (service returned an invalid response: \"aaa\" is not a valid IP address)"
        );
    }
}
