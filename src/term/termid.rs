use core::fmt::Debug;
use std::fmt::Display;

use crate::{GoError, GoResult};

/// Numeric identifier of a term
///
/// The identifier is stable for one run. Loaders usually derive it from the
/// numeric part of the GO accession, e.g. `GO:0008150` becomes `8150`, but
/// any unique `u32` works.
#[derive(Copy, Clone, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TermId {
    inner: u32,
}

impl TermId {
    /// Returns the integer representation of the `TermId`
    pub fn as_u32(&self) -> u32 {
        self.inner
    }
}

impl TryFrom<&str> for TermId {
    type Error = GoError;
    /// Parses an accession in the form `GO:0008150`
    ///
    /// # Errors
    ///
    /// Returns [`GoError::InvalidTermId`] if the prefix is missing or the
    /// numeric part is not an integer
    fn try_from(s: &str) -> GoResult<Self> {
        let digits = s
            .strip_prefix("GO:")
            .or_else(|| s.strip_prefix("GO_"))
            .ok_or_else(|| GoError::InvalidTermId(s.to_string()))?;
        Ok(TermId {
            inner: digits.parse::<u32>()?,
        })
    }
}

impl From<u32> for TermId {
    fn from(inner: u32) -> Self {
        Self { inner }
    }
}

impl From<u16> for TermId {
    fn from(n: u16) -> Self {
        Self { inner: n.into() }
    }
}

impl Debug for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TermId({})", self)
    }
}

impl Display for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GO:{:07}", self.inner)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_accession() {
        let id = TermId::try_from("GO:0008150").unwrap();
        assert_eq!(id.as_u32(), 8150);
        assert_eq!(id.to_string(), "GO:0008150");
        assert_eq!(TermId::try_from("GO_0005575").unwrap(), TermId::from(5575u32));
    }

    #[test]
    fn invalid_accession() {
        assert_eq!(
            TermId::try_from("HP:0000001"),
            Err(GoError::InvalidTermId("HP:0000001".to_string()))
        );
        assert_eq!(TermId::try_from("GO:abc"), Err(GoError::ParseIntError));
    }

    #[test]
    fn compare_to_converted_ids() {
        let id = TermId::from(3674u32);
        assert_eq!(id, TermId::from(3674u32));
        assert_eq!(TermId::try_from("GO:0003674"), Ok(id));
        assert_ne!(id, TermId::from(3675u32));
    }
}
