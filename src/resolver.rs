//! Resolution of the addresses requested by the configuration.

use crate::address::{Address, Family};
use crate::config::{Config, Origin};
use crate::selector::{self, select};
use crate::sources::{self, local::LocalSource, remote::RemoteSource, IpAddresses};

use std::error as stderr;
use std::fmt;

use tracing::debug;

/// The error type of the resolver. It carries, unchanged, the first error
/// returned by any of the stages.
#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// The source failed to get the addresses.
    Source(sources::Error),
    /// The source didn't find any address of the family.
    NoAddresses(Family),
    /// The selection isn't applicable to the addresses.
    Selection(selector::Error),
}

impl From<sources::Error> for Error {
    fn from(err: sources::Error) -> Self {
        Error::Source(err)
    }
}

impl From<selector::Error> for Error {
    fn from(err: selector::Error) -> Self {
        Error::Selection(err)
    }
}

impl stderr::Error for Error {
    fn source(&self) -> Option<&(dyn stderr::Error + 'static)> {
        match self {
            Error::Source(s) => s.source(),
            Error::Selection(s) => s.source(),
            Error::NoAddresses(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Error::Source(s) => fmt::Display::fmt(s, f),
            Error::NoAddresses(family) => write!(f, "No {} IPs available.", family),
            Error::Selection(s) => fmt::Display::fmt(s, f),
        }
    }
}

/// Finds out the addresses of the configured origin and family and selects
/// the configured ones.
pub struct Resolver {
    config: Config,
}

impl Resolver {
    /// Creates a resolver which runs with `config`.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Resolves the addresses using the source of the configured origin.
    pub async fn resolve(&self) -> Result<Vec<Address>, Error> {
        debug!(origin = ?self.config.origin, family = %self.config.family, "resolving addresses");

        match self.config.origin {
            Origin::Local => self.resolve_from(&LocalSource::new()).await,
            Origin::Remote => {
                let source = RemoteSource::new(&self.config.remote)?;
                self.resolve_from(&source).await
            }
        }
    }

    /// Resolves the addresses using `source`.
    pub async fn resolve_from<S>(&self, source: &S) -> Result<Vec<Address>, Error>
    where
        S: IpAddresses + ?Sized,
    {
        let family = self.config.family;
        let candidates = source.addresses(family).await?;
        if candidates.is_empty() {
            return Err(Error::NoAddresses(family));
        }

        debug!(count = candidates.len(), selection = %self.config.selection, "selecting addresses");
        Ok(select(&candidates, &self.config.selection)?)
    }
}
