//! Selection of a subset of the candidate addresses.

mod error;

pub use error::Error;

use crate::address::Address;
use crate::error::Error as ErrorCommon;

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

/// The addresses to select from a list of candidates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    /// Every candidate.
    All,
    /// The first candidate.
    First,
    /// The last candidate.
    Last,
    /// The candidates at the indicated 1-based positions, in the indicated
    /// order; a position may appear several times.
    Positions(Vec<usize>),
}

impl Default for Selection {
    fn default() -> Self {
        Selection::All
    }
}

impl FromStr for Selection {
    type Err = Error;

    /// Parses `all`, `first`, `last` or a list of positions separated by
    /// commas (e.g. `3,1,1`). An empty string is `all`.
    ///
    /// The text isn't trimmed; any whitespace makes it invalid.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lazy_static! {
            static ref POSITIONS: Regex = Regex::new(r"^[0-9]+(,[0-9]+)*$").unwrap();
        }

        match s {
            "" | "all" => Ok(Selection::All),
            "first" => Ok(Selection::First),
            "last" => Ok(Selection::Last),
            _ if POSITIONS.is_match(s) => s
                .split(',')
                .map(|p| {
                    // Only the overflow can make the parsing fail.
                    p.parse::<usize>().map_err(|_| {
                        Error::Common(ErrorCommon::invalid_arguments(
                            "selection",
                            &format!("IP selection index {} is out of range", p),
                        ))
                    })
                })
                .collect::<Result<_, _>>()
                .map(Selection::Positions),
            _ => Err(Error::Common(ErrorCommon::invalid_arguments(
                "selection",
                &format!(
                    r#"{:?} is not a valid value for the IP selection (expected "all", "first", "last" or positions such as "1,3")"#,
                    s
                ),
            ))),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Selection::All => write!(f, "all"),
            Selection::First => write!(f, "first"),
            Selection::Last => write!(f, "last"),
            Selection::Positions(positions) => {
                let positions: Vec<_> = positions.iter().map(|p| p.to_string()).collect();
                write!(f, "{}", positions.join(","))
            }
        }
    }
}

/// Returns the candidates indicated by `selection`, in the order that the
/// selection indicates.
///
/// Selecting from an empty list only succeeds with [`Selection::All`]. Any
/// position out of the range of the candidates makes the whole selection fail.
pub fn select(candidates: &[Address], selection: &Selection) -> Result<Vec<Address>, Error> {
    if candidates.is_empty() {
        if *selection == Selection::All {
            return Ok(Vec::new());
        }

        return Err(Error::NoCandidates {
            selection: selection.clone(),
        });
    }

    match selection {
        Selection::All => Ok(candidates.to_vec()),
        Selection::First => Ok(candidates[..1].to_vec()),
        Selection::Last => Ok(candidates[candidates.len() - 1..].to_vec()),
        Selection::Positions(positions) => positions
            .iter()
            .map(|&position| {
                if position < 1 || position > candidates.len() {
                    return Err(Error::OutOfRange {
                        position,
                        max: candidates.len(),
                    });
                }

                Ok(candidates[position - 1])
            })
            .collect(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn candidates(n: usize) -> Vec<Address> {
        (1..=n)
            .map(|i| Address::from_str(&format!("10.0.0.{}", i)).unwrap())
            .collect()
    }

    fn select_str(candidates: &[Address], selection: &str) -> Result<Vec<Address>, Error> {
        select(candidates, &Selection::from_str(selection)?)
    }

    #[test]
    fn test_parse() {
        assert_eq!(Selection::from_str("all").unwrap(), Selection::All);
        assert_eq!(Selection::from_str("").unwrap(), Selection::All);
        assert_eq!(Selection::from_str("first").unwrap(), Selection::First);
        assert_eq!(Selection::from_str("last").unwrap(), Selection::Last);
        assert_eq!(
            Selection::from_str("3,1,1").unwrap(),
            Selection::Positions(vec![3, 1, 1])
        );
        assert_eq!(
            Selection::from_str("0").unwrap(),
            Selection::Positions(vec![0]),
            "0 is syntactically valid, it's out of range of any list"
        );
    }

    #[test]
    fn test_parse_position_overflow() {
        let err = Selection::from_str("1,99999999999999999999999")
            .expect_err("the position doesn't fit in any list");
        assert!(matches!(err, Error::Common(_)), "got: {:?}", err);
        assert_eq!(
            err.to_string(),
            "selection has an invalid value. IP selection index 99999999999999999999999 is out of range"
        );
    }

    #[test]
    fn test_parse_invalid() {
        for s in [
            " ", " all", "all ", "ALL", "1 2 3", "1;2;3", "1,", ",1,2,3", "1,,2", "-1", "+1",
            "1.5", "١", "first,last", "a",
        ] {
            let err = Selection::from_str(s).expect_err(&format!("'{}' is an invalid selection", s));
            assert!(
                matches!(err, Error::Common(ErrorCommon::InvalidArguments(_))),
                "'{}' got: {:?}",
                s,
                err
            );
        }
    }

    #[test]
    fn test_display() {
        for s in ["all", "first", "last", "3,1,1"] {
            assert_eq!(Selection::from_str(s).unwrap().to_string(), s);
        }
    }

    #[test]
    fn test_select_all_is_identity() {
        for n in 1..=5 {
            let c = candidates(n);
            assert_eq!(select(&c, &Selection::All).unwrap(), c);
        }
    }

    #[test]
    fn test_select_first_and_last() {
        for n in 1..=5 {
            let c = candidates(n);
            assert_eq!(select(&c, &Selection::First).unwrap(), vec![c[0]]);
            assert_eq!(select(&c, &Selection::Last).unwrap(), vec![c[n - 1]]);
        }
    }

    #[test]
    fn test_select_positions() {
        let c = candidates(3);
        assert_eq!(select_str(&c, "3,1").unwrap(), vec![c[2], c[0]]);
        assert_eq!(select_str(&c, "1,1,1,1").unwrap(), vec![c[0]; 4]);
        assert_eq!(select_str(&c, "1,2,3").unwrap(), c);
        assert_eq!(select_str(&c, "2").unwrap(), vec![c[1]]);
    }

    #[test]
    fn test_select_positions_out_of_range() {
        let c = candidates(3);
        for s in ["0", "4", "1,2,4", "4,1", "0,1"] {
            let err = select_str(&c, s).expect_err(&format!("'{}' is out of range", s));
            assert!(
                matches!(err, Error::OutOfRange { max: 3, .. }),
                "'{}' got: {:?}",
                s,
                err
            );
        }

        assert_eq!(
            select_str(&c, "1,5").unwrap_err().to_string(),
            "invalid IP selection index 5 (min: 1, max: 3)"
        );
    }

    #[test]
    fn test_select_empty_candidates() {
        assert!(select(&[], &Selection::All).unwrap().is_empty());
        assert!(select_str(&[], "").unwrap().is_empty());

        for selection in [
            Selection::First,
            Selection::Last,
            Selection::Positions(vec![1]),
        ] {
            let err = select(&[], &selection).expect_err("nothing to select");
            assert!(
                matches!(err, Error::NoCandidates { .. }),
                "'{}' got: {:?}",
                selection,
                err
            );
        }
    }

    #[test]
    fn test_select_malformed_with_any_candidates() {
        for n in 0..=3 {
            let c = candidates(n);
            for s in [" ", " all", "all ", "1 2 3", "1;2;3", "1,", ",1,2,3"] {
                assert!(
                    select_str(&c, s).is_err(),
                    "'{}' must fail over {} candidates",
                    s,
                    n
                );
            }
        }
    }
}
