//! Validated IP addresses and their classification.

use std::error as stderr;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// The family of an IP address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Family {
    /// IP version 4.
    V4,
    /// IP version 6.
    V6,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Family::V4 => write!(f, "IPv4"),
            Family::V6 => write!(f, "IPv6"),
        }
    }
}

/// An IP address which has been validated and which family is known.
///
/// The family is derived from the address bytes: IPv4-mapped IPv6 addresses
/// (`::ffff:a.b.c.d`) are IPv4 addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Address(IpAddr);

impl Address {
    /// Returns the family of the address.
    pub fn family(&self) -> Family {
        match self.0 {
            IpAddr::V4(_) => Family::V4,
            IpAddr::V6(ip) if ip.to_ipv4_mapped().is_some() => Family::V4,
            IpAddr::V6(_) => Family::V6,
        }
    }

    /// Returns true if the address is a loopback address or a link-local
    /// unicast or multicast address, regardless of its family.
    pub fn is_excluded_local(&self) -> bool {
        match self.0.to_canonical() {
            IpAddr::V4(ip) => ip.is_loopback() || ip.is_link_local() || is_link_local_multicast_v4(ip),
            IpAddr::V6(ip) => {
                ip.is_loopback() || is_link_local_unicast_v6(ip) || is_link_local_multicast_v6(ip)
            }
        }
    }
}

/// 224.0.0.0/24
fn is_link_local_multicast_v4(ip: Ipv4Addr) -> bool {
    let octets = ip.octets();
    octets[0] == 224 && octets[1] == 0 && octets[2] == 0
}

/// fe80::/10
fn is_link_local_unicast_v6(ip: Ipv6Addr) -> bool {
    (ip.segments()[0] & 0xffc0) == 0xfe80
}

/// ff02::/16 and any other multicast address with link-local scope.
fn is_link_local_multicast_v6(ip: Ipv6Addr) -> bool {
    let octets = ip.octets();
    octets[0] == 0xff && (octets[1] & 0x0f) == 0x02
}

impl From<IpAddr> for Address {
    fn from(ip: IpAddr) -> Self {
        Address(ip)
    }
}

impl From<Ipv4Addr> for Address {
    fn from(ip: Ipv4Addr) -> Self {
        Address(IpAddr::V4(ip))
    }
}

impl From<Ipv6Addr> for Address {
    fn from(ip: Ipv6Addr) -> Self {
        Address(IpAddr::V6(ip))
    }
}

impl FromStr for Address {
    type Err = ParseError;

    /// Parses a dotted-quad or colon-hex address, ignoring the surrounding
    /// whitespace. Anything else in the text makes the parsing fail.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        IpAddr::from_str(text)
            .map(Address)
            .map_err(|_| ParseError {
                text: String::from(text),
            })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        fmt::Display::fmt(&self.0.to_canonical(), f)
    }
}

/// The error returned when a text isn't a valid IP address.
#[derive(Debug, PartialEq)]
pub struct ParseError {
    /// The offending text, without the surrounding whitespace.
    pub text: String,
}

impl stderr::Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{:?} is not a valid IP address", self.text)
    }
}
