//! Available sources of IP addresses: the local network interfaces and the
//! remote "what is my IP" services.

mod error;
pub mod local;
pub mod remote;

pub use error::Error;

use crate::address::{Address, Family};

use async_trait::async_trait;

/// Each implementation finds out the IPv4 and IPv6 addresses of the machine
/// from a specific source.
///
/// The addresses are returned in the order defined by the source.
#[async_trait]
pub trait IpAddresses: Send + Sync {
    /// Gets the IPv4 addresses of the machine.
    async fn ipv4_addresses(&self) -> Result<Vec<Address>, Error>;

    /// Gets the IPv6 addresses of the machine.
    async fn ipv6_addresses(&self) -> Result<Vec<Address>, Error>;

    /// Gets the addresses of the machine which belong to `family`.
    async fn addresses(&self, family: Family) -> Result<Vec<Address>, Error> {
        match family {
            Family::V4 => self.ipv4_addresses().await,
            Family::V6 => self.ipv6_addresses().await,
        }
    }
}
