//! This module provides [`Tier`], the three levels of naming specificity a locale's dictionary can
//! carry. Tiers are totally ordered from coarsest to finest, and a query that asks to search "up to"
//! a tier always includes every coarser one.

use std::fmt;
use std::str::FromStr;

static SEARCH_ORDER: [Tier; 3] = Tier::ALL;

/// A level of color naming specificity within a locale.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// The universal, coarse names every speaker knows: "red", "blue", "grey".
    Basic,
    /// Common but more specific names: "teal", "maroon", "beige".
    Extended,
    /// Cultural and traditional names, often tied to pigments, dyes, or historical usage.
    Traditional,
}

impl Tier {
    /// Every tier, in specificity order. This is also the order in which tiers are scanned.
    pub const ALL: [Tier; 3] = [Tier::Basic, Tier::Extended, Tier::Traditional];

    /// The tiers a search capped at `level` covers: everything from [`Tier::Basic`] up to and
    /// including `level`, or all three if there is no cap.
    /// # Example
    /// ```
    /// # use colorlex::tier::Tier;
    /// assert_eq!(Tier::up_to(Some(Tier::Extended)), &[Tier::Basic, Tier::Extended]);
    /// assert_eq!(Tier::up_to(None), &Tier::ALL);
    /// ```
    pub fn up_to(level: Option<Tier>) -> &'static [Tier] {
        match level {
            Some(tier) => &SEARCH_ORDER[..=tier.index()],
            None => &SEARCH_ORDER,
        }
    }

    /// The position of this tier in [`Tier::ALL`].
    pub fn index(self) -> usize {
        match self {
            Tier::Basic => 0,
            Tier::Extended => 1,
            Tier::Traditional => 2,
        }
    }

    /// The lowercase name of the tier, as used in configuration and data files.
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Basic => "basic",
            Tier::Extended => "extended",
            Tier::Traditional => "traditional",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error from parsing a string that names no tier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown color name tier: {0:?}")]
pub struct ParseTierError(pub String);

impl FromStr for Tier {
    type Err = ParseTierError;

    /// Parses a tier name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Tier, ParseTierError> {
        Tier::ALL
            .iter()
            .copied()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseTierError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    #[allow(unused_imports)]
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(Tier::Basic < Tier::Extended);
        assert!(Tier::Extended < Tier::Traditional);
        for (i, tier) in Tier::ALL.iter().enumerate() {
            assert_eq!(tier.index(), i);
        }
    }

    #[test]
    fn test_up_to() {
        assert_eq!(Tier::up_to(Some(Tier::Basic)), &[Tier::Basic]);
        assert_eq!(Tier::up_to(Some(Tier::Traditional)), &Tier::ALL);
        assert_eq!(Tier::up_to(None).len(), 3);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("basic".parse::<Tier>(), Ok(Tier::Basic));
        assert_eq!("Extended".parse::<Tier>(), Ok(Tier::Extended));
        assert_eq!(" TRADITIONAL ".parse::<Tier>(), Ok(Tier::Traditional));
        assert_eq!("fancy".parse::<Tier>(), Err(ParseTierError("fancy".to_string())));
        for tier in Tier::ALL.iter() {
            assert_eq!(tier.to_string().parse::<Tier>(), Ok(*tier));
        }
    }
}
