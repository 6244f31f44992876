//! Defines a common error type that exposes kinds of errors that any submodule
//! may return.
//! Every submodule creates a specific error type which wraps this one and adds
//! the kinds of errors of its own domain (e.g. [`crate::sources::Error`],
//! [`crate::selector::Error`]), so new kinds can be added later without
//! changing the return values of their functions and methods.

use std::error as stderr;
use std::fmt;

/// Convenient type for making more concise wrapping the standard error trait
/// object into a Box.
pub type BoxError = Box<dyn stderr::Error + Send + Sync>;

/// The error type that expose general kinds of errors that are common to all
/// the modules of this crate.
#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// Identify unexpected errors which happen because of the state of the
    /// system where the application is running, for example, the OS refusing
    /// to list the network interfaces.
    Internal(Internal),
    /// Identify errors due to invalid arguments passed to function or methods
    /// or assigned values to configurations.
    InvalidArguments(Args),
    /// Identify errors related with the network produced by the client or
    /// server side and informs if retrying the operation may succeed.
    Network(Network),
}

impl Error {
    /// Convenient constructor for creating an InvalidArguments Error.
    /// See [`Args`] documentation to know about the convention for the value of
    /// the `names` parameter.
    pub(crate) fn invalid_arguments(names: &str, msg: &str) -> Self {
        Self::InvalidArguments(Args::new(names, msg))
    }

    /// Convenient constructor for creating a Network Error.
    pub(crate) fn network(origin: BoxError, side: NetworkSide, should_retry: bool) -> Self {
        Self::Network(Network {
            side,
            should_retry,
            inner: origin,
        })
    }

    /// Convenient constructor for creating an Internal Error.
    pub(crate) fn internal(ctx_msg: &'static str, error: BoxError) -> Self {
        Self::Internal(Internal { ctx_msg, error })
    }
}

impl stderr::Error for Error {
    fn source(&self) -> Option<&(dyn stderr::Error + 'static)> {
        match self {
            Error::InvalidArguments { .. } => None,
            Error::Internal(i) => i.source(),
            Error::Network(n) => n.source(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Error::InvalidArguments(a) => fmt::Display::fmt(a, f),
            Error::Internal(i) => fmt::Display::fmt(i, f),
            Error::Network(n) => fmt::Display::fmt(n, f),
        }
    }
}

/// Represents invalid arguments error regarding the business domain.
#[derive(Debug)]
pub struct Args {
    /// `names` is one or several parameters names; it has several conventions
    /// for expressing the involved parameters.
    ///
    /// * When a specific parameter is invalid its value is the exact parameter
    ///   name.
    /// * When the parameter is a list (vector, array, etc.), the invalid items
    ///   can be __optionally__ indicated using square brackets (e.g. `l[3,5,7]`).
    /// * When several parameters are invalid, its value is the parameters names
    ///   wrapped in round brackets (e.g. `(p1,p3)`).
    /// * When all the function parameters are invalid, `<all>` is used.
    pub names: String,
    /// `msg` is a human friendly message that explains why the argument(s) are
    /// invalid.
    pub msg: String,
}

impl Args {
    pub(crate) fn new(names: &str, msg: &str) -> Self {
        Args {
            names: String::from(names),
            msg: String::from(msg),
        }
    }
}

impl fmt::Display for Args {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{} has an invalid value. {}", self.names, self.msg)
    }
}

/// An unexpected error which happens due to the state of the system where the
/// application is running; for example, insufficient resources, OS failure,
/// etc.
#[derive(Debug)]
pub struct Internal {
    /// A human friendly message to provide context of the error.
    pub ctx_msg: &'static str,
    /// The received error which cannot be handled by the application and get
    /// wrapped by this instance.
    pub(crate) error: BoxError,
}

impl stderr::Error for Internal {
    fn source(&self) -> Option<&(dyn stderr::Error + 'static)> {
        Some(self.error.as_ref())
    }
}

impl fmt::Display for Internal {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}: {}", self.ctx_msg, self.error)
    }
}

/// An error caused by the network when performing a requested operation.
#[derive(Debug)]
pub struct Network {
    /// The side which originated the error.
    pub side: NetworkSide,
    /// Indicates if repeating the operation may succeed.
    pub should_retry: bool,
    pub(crate) inner: BoxError,
}

impl stderr::Error for Network {
    fn source(&self) -> Option<&(dyn stderr::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(
            f,
            "network error produced by the {} side: {}",
            self.side, self.inner,
        )
    }
}

/// Indicates the network side which originated the error.
#[derive(Debug, PartialEq)]
pub enum NetworkSide {
    /// Indicates that the error is in the client side.
    Client,
    /// Indicates that the error is in the server side.
    Server,
}

impl fmt::Display for NetworkSide {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            NetworkSide::Client => write!(f, "client"),
            NetworkSide::Server => write!(f, "server"),
        }
    }
}

/// An error caused by an external service which didn't answer as expected.
#[derive(Debug, PartialEq)]
pub enum ExternalService {
    /// Indicates that the service has returned an internal error.
    Internal {
        /// The description of the failure.
        reason: String,
    },
    /// Indicates that the service answered with something that it isn't
    /// specified by its API, for example a body which isn't an IP address.
    InvalidResponse {
        /// The description of what's wrong with the response.
        reason: String,
    },
}

impl fmt::Display for ExternalService {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            ExternalService::Internal { reason } => {
                write!(f, "service had an internal error: {}", reason)
            }
            ExternalService::InvalidResponse { reason } => {
                write!(f, "service returned an invalid response: {}", reason)
            }
        }
    }
}
