//! Access to the addresses bound to the local network interfaces.

use crate::address::Address;
use crate::error::{BoxError, Error};

use tracing::trace;

/// Each implementation lists the addresses bound to the network interfaces
/// of the machine, in the order in which the interfaces are enumerated.
pub trait InterfaceAddresses {
    /// Lists every address of every interface, without any filtering.
    fn list_interface_addresses(&self) -> Result<Vec<Address>, Error>;
}

/// The network interfaces of the machine as reported by the OS.
#[derive(Debug, Default)]
pub struct SystemInterfaces;

impl InterfaceAddresses for SystemInterfaces {
    fn list_interface_addresses(&self) -> Result<Vec<Address>, Error> {
        let interfaces = if_addrs::get_if_addrs().map_err(|err| {
            Error::internal(
                "unable to list the local network interfaces",
                BoxError::from(err),
            )
        })?;

        Ok(interfaces
            .into_iter()
            .map(|iface| {
                trace!(interface = %iface.name, ip = %iface.ip(), "found interface address");
                Address::from(iface.ip())
            })
            .collect())
    }
}
