//! Defines an error which any "sources" implementation must return.
//! The error type extends the [common error type](crate::error) to provide
//! kinds of errors to their specific domain.

use super::remote::RaceError;
use crate::address::{Address, Family, ParseError};
use crate::error::{Error as ErrorCommon, ExternalService, NetworkSide};

use std::error as stderr;
use std::fmt;

use isahc::error::Error as IsahcError;

/// The error type to wrap the errors returned by the [sources and its
/// descendants modules](crate::sources).
#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// Common error kinds which are shared across all the modules of this
    /// crate.
    Common(ErrorCommon),
    /// Identifies an error caused by a remote provider which answered but not
    /// with what it was expected.
    Provider(ExternalService),
    /// Identifies that none of the remote providers found out the address.
    Race(RaceError),
    /// Identifies an address whose family isn't the requested one.
    FamilyMismatch {
        /// The requested family.
        expected: Family,
        /// The received address.
        address: Address,
    },
}

impl Error {
    /// Convenient constructor for creating the appropriated Error from the
    /// Error type of the isahc module.
    ///
    /// Every error kind is mapped because a failing request is never a reason
    /// for aborting the program; the caller decides what to do with it.
    pub(crate) fn from_isahc(err: IsahcError) -> Self {
        use isahc::error::ErrorKind;

        let side = if err.is_client() {
            NetworkSide::Client
        } else {
            NetworkSide::Server
        };

        let (side, should_retry) = match err.kind() {
            ErrorKind::BadServerCertificate
            | ErrorKind::InvalidContentEncoding
            | ErrorKind::ProtocolViolation
            | ErrorKind::TooManyRedirects => {
                return Error::Provider(ExternalService::InvalidResponse {
                    reason: err.to_string(),
                })
            }
            ErrorKind::ConnectionFailed | ErrorKind::Timeout => (side, true),
            ErrorKind::Io => match side {
                NetworkSide::Client => (side, false),
                NetworkSide::Server => (side, true),
            },
            // NameResolution error is returned indicating that's a server
            // side error when the host name cannot be resolved, but we
            // don't consider it that should be a server side error, hence
            // we always indicate that's a client side error.
            ErrorKind::NameResolution => (NetworkSide::Client, false),
            _ => (side, false),
        };

        Error::Common(ErrorCommon::network(err.into(), side, should_retry))
    }

    /// Convenient constructor for a provider's response body which isn't an IP
    /// address.
    pub(crate) fn from_parse(err: ParseError) -> Self {
        Error::Provider(ExternalService::InvalidResponse {
            reason: err.to_string(),
        })
    }
}

impl From<RaceError> for Error {
    fn from(err: RaceError) -> Self {
        Error::Race(err)
    }
}

impl stderr::Error for Error {
    fn source(&self) -> Option<&(dyn stderr::Error + 'static)> {
        match self {
            Error::Common(c) => c.source(),
            Error::Race(r) => Some(r),
            Error::Provider(_) | Error::FamilyMismatch { .. } => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Error::Common(c) => fmt::Display::fmt(c, f),
            Error::Provider(es) => fmt::Display::fmt(es, f),
            Error::Race(r) => fmt::Display::fmt(r, f),
            Error::FamilyMismatch { expected, address } => write!(
                f,
                "the returned IP address ({}) is not an {} address",
                address, expected
            ),
        }
    }
}
