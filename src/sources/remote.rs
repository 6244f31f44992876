//! Addresses as seen by remote "what is my IP" services.

mod probe;
mod race;

pub use probe::{Endpoint, HttpProbe, Probe};
pub use race::{race, RaceError};

use super::{Error, IpAddresses};
use crate::address::{Address, Family};
use crate::config::RemoteConfig;

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

/// The public addresses of the machine, found out by racing the configured
/// providers of each family.
pub struct RemoteSource {
    ipv4_endpoints: Vec<Endpoint>,
    ipv6_endpoints: Vec<Endpoint>,
    race_timeout: Duration,
    probe: Box<dyn Probe>,
}

impl RemoteSource {
    /// Creates a source which requests the providers through HTTP(S).
    pub fn new(config: &RemoteConfig) -> Result<Self, Error> {
        Ok(Self::with_probe(config, Box::new(HttpProbe::new()?)))
    }

    /// Creates a source which uses `probe` for requesting the providers.
    pub fn with_probe(config: &RemoteConfig, probe: Box<dyn Probe>) -> Self {
        Self {
            ipv4_endpoints: config.ipv4_endpoints.clone(),
            ipv6_endpoints: config.ipv6_endpoints.clone(),
            race_timeout: config.race_timeout,
            probe,
        }
    }

    /// Races `endpoints` and checks that the winner belongs to `family` because
    /// a misbehaving provider may answer with an address of the other one.
    async fn winner(&self, endpoints: &[Endpoint], family: Family) -> Result<Vec<Address>, Error> {
        let address = race(self.probe.as_ref(), endpoints, self.race_timeout).await?;

        if address.family() != family {
            warn!(%address, expected = %family, "provider answered with an address of another family");
            return Err(Error::FamilyMismatch {
                expected: family,
                address,
            });
        }

        Ok(vec![address])
    }
}

#[async_trait]
impl IpAddresses for RemoteSource {
    async fn ipv4_addresses(&self) -> Result<Vec<Address>, Error> {
        self.winner(&self.ipv4_endpoints, Family::V4).await
    }

    async fn ipv6_addresses(&self) -> Result<Vec<Address>, Error> {
        self.winner(&self.ipv6_endpoints, Family::V6).await
    }
}
