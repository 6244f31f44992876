//! Defines the error returned by the [selector](crate::selector).

use super::Selection;
use crate::error::Error as ErrorCommon;

use std::error as stderr;
use std::fmt;

/// The error type of the selector.
#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// Common error kinds which are shared across all the modules of this
    /// crate; a selection with an invalid syntax is an invalid argument.
    Common(ErrorCommon),
    /// A selection other than [`Selection::All`] over an empty list.
    NoCandidates {
        /// The requested selection.
        selection: Selection,
    },
    /// A position which is out of range of the candidates.
    OutOfRange {
        /// The requested position.
        position: usize,
        /// The number of candidates.
        max: usize,
    },
}

impl stderr::Error for Error {
    fn source(&self) -> Option<&(dyn stderr::Error + 'static)> {
        match self {
            Error::Common(c) => c.source(),
            Error::NoCandidates { .. } | Error::OutOfRange { .. } => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Error::Common(c) => fmt::Display::fmt(c, f),
            Error::NoCandidates { selection } => {
                write!(f, "invalid selection {:?}, no IPs available", selection.to_string())
            }
            Error::OutOfRange { position, max } => write!(
                f,
                "invalid IP selection index {} (min: 1, max: {})",
                position, max
            ),
        }
    }
}
