//! Addresses bound to the local network interfaces.

use super::{Error, IpAddresses};
use crate::address::{Address, Family};
use crate::interfaces::{InterfaceAddresses, SystemInterfaces};

use async_trait::async_trait;
use tracing::trace;

/// The addresses of the local network interfaces, except the loopback and
/// link-local ones.
pub struct LocalSource<I = SystemInterfaces> {
    interfaces: I,
}

impl LocalSource<SystemInterfaces> {
    /// Creates a source which lists the network interfaces of the machine.
    pub fn new() -> Self {
        Self::with_interfaces(SystemInterfaces)
    }
}

impl Default for LocalSource<SystemInterfaces> {
    fn default() -> Self {
        LocalSource::new()
    }
}

impl<I: InterfaceAddresses> LocalSource<I> {
    /// Creates a source which gets the addresses from `interfaces`.
    pub fn with_interfaces(interfaces: I) -> Self {
        Self { interfaces }
    }

    /// Returns the interfaces' addresses of `family` in the enumeration order.
    /// An empty list isn't an error.
    fn filtered(&self, family: Family) -> Result<Vec<Address>, Error> {
        let all = self
            .interfaces
            .list_interface_addresses()
            .map_err(Error::Common)?;

        Ok(all
            .into_iter()
            .filter(|addr| {
                let keep = !addr.is_excluded_local() && addr.family() == family;
                if !keep {
                    trace!(%addr, "discarding interface address");
                }
                keep
            })
            .collect())
    }
}

#[async_trait]
impl<I: InterfaceAddresses + Send + Sync> IpAddresses for LocalSource<I> {
    async fn ipv4_addresses(&self) -> Result<Vec<Address>, Error> {
        self.filtered(Family::V4)
    }

    async fn ipv6_addresses(&self) -> Result<Vec<Address>, Error> {
        self.filtered(Family::V6)
    }
}
