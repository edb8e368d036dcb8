//! This module provides [`LocaleDictionary`], the named colors of one locale: up to three
//! [`ColorNameSet`]s, one per [`Tier`], plus a line of attribution for where the names came from.
//! Dictionaries for the same locale can be layered with [`LocaleDictionary::merge_missing`], which
//! only ever fills in tiers that are not there yet.

use std::io;

use crate::coord::Coord;
use crate::nameset::{ColorNameSet, LoadError};
use crate::tier::Tier;

/// The color names of one locale, split into tiers of increasing specificity. Any tier may be
/// missing: a locale can have only basic names, or only traditional ones.
///
/// # Example
/// ```
/// # use colorlex::dictionary::LocaleDictionary;
/// # use colorlex::nameset::ColorNameSet;
/// # use colorlex::tier::Tier;
/// let basic = ColorNameSet::from_pairs(vec![("black", [0., 0., 0.])]).unwrap();
/// let dict = LocaleDictionary::new("en", "example").with_tier(Tier::Basic, basic);
/// assert!(dict.has_tier(Tier::Basic));
/// assert!(!dict.has_tier(Tier::Traditional));
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LocaleDictionary {
    /// The locale identifier, such as a language code or a cultural-variant tag.
    pub locale: String,
    /// Attribution for the names: the survey, standard, or reference they come from.
    #[serde(default)]
    pub source: String,
    /// Universal, coarse names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic: Option<ColorNameSet>,
    /// Common, more specific names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended: Option<ColorNameSet>,
    /// Cultural and traditional names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traditional: Option<ColorNameSet>,
}

/// One row of a dictionary CSV file: a tier, a name, and the name's coordinates.
#[derive(Debug, Deserialize)]
struct CsvRow {
    tier: Tier,
    name: String,
    x: f64,
    y: f64,
    z: f64,
}

impl LocaleDictionary {
    /// Creates a dictionary with no tiers.
    pub fn new<L: Into<String>, S: Into<String>>(locale: L, source: S) -> LocaleDictionary {
        LocaleDictionary {
            locale: locale.into(),
            source: source.into(),
            basic: None,
            extended: None,
            traditional: None,
        }
    }

    /// Sets a tier, replacing whatever was there, and returns the dictionary.
    pub fn with_tier(mut self, tier: Tier, set: ColorNameSet) -> LocaleDictionary {
        *self.slot(tier) = Some(set);
        self
    }

    fn slot(&mut self, tier: Tier) -> &mut Option<ColorNameSet> {
        match tier {
            Tier::Basic => &mut self.basic,
            Tier::Extended => &mut self.extended,
            Tier::Traditional => &mut self.traditional,
        }
    }

    /// Gets a tier's names, if the tier is present. The set may still be empty.
    pub fn tier(&self, tier: Tier) -> Option<&ColorNameSet> {
        match tier {
            Tier::Basic => self.basic.as_ref(),
            Tier::Extended => self.extended.as_ref(),
            Tier::Traditional => self.traditional.as_ref(),
        }
    }

    /// Returns true if the tier is present and has at least one name. An empty tier is treated
    /// the same as a missing one everywhere in the crate.
    pub fn has_tier(&self, tier: Tier) -> bool {
        self.tier(tier).map_or(false, |set| !set.is_empty())
    }

    /// Iterates over the non-empty tiers, coarsest first.
    pub fn tiers(&self) -> impl Iterator<Item = (Tier, &ColorNameSet)> + '_ {
        Tier::up_to(None)
            .iter()
            .filter_map(move |&tier| self.tier(tier).filter(|set| !set.is_empty()).map(|set| (tier, set)))
    }

    /// The total number of names across all tiers.
    pub fn len(&self) -> usize {
        self.tiers().map(|(_, set)| set.len()).sum()
    }

    /// Returns true if no tier has any names.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies in every tier of `other` that this dictionary is missing, and returns the tiers that
    /// were added, coarsest first. Tiers this dictionary already has are never touched, and the
    /// attribution stays as it was.
    ///
    /// # Example
    /// ```
    /// # use colorlex::dictionary::LocaleDictionary;
    /// # use colorlex::nameset::ColorNameSet;
    /// # use colorlex::tier::Tier;
    /// let survey = ColorNameSet::from_pairs(vec![("red", [0.63, 0.23, 0.13])]).unwrap();
    /// let curated = ColorNameSet::from_pairs(vec![("scarlet", [0.6, 0.2, 0.1])]).unwrap();
    /// let mut dict = LocaleDictionary::new("en", "survey").with_tier(Tier::Basic, survey.clone());
    /// let layer = LocaleDictionary::new("en", "curated")
    ///     .with_tier(Tier::Basic, curated.clone())
    ///     .with_tier(Tier::Extended, curated);
    /// assert_eq!(dict.merge_missing(layer), vec![Tier::Extended]);
    /// assert_eq!(dict.basic, Some(survey));
    /// ```
    pub fn merge_missing(&mut self, other: LocaleDictionary) -> Vec<Tier> {
        let mut other = other;
        let mut added = vec![];
        for &tier in Tier::ALL.iter() {
            if !self.has_tier(tier) && other.has_tier(tier) {
                *self.slot(tier) = other.slot(tier).take();
                added.push(tier);
            }
        }
        added
    }

    /// Finds a name, ignoring case, by scanning the tiers from basic to traditional and each tier
    /// in storage order. Returns the tier and position of the first match.
    pub fn find(&self, name: &str) -> Option<(Tier, usize)> {
        self.tiers()
            .find_map(|(tier, set)| set.find(name).map(|index| (tier, index)))
    }

    /// Reads a dictionary from CSV with a header row and the columns `tier`, `name`, `x`, `y`, and
    /// `z`, where `tier` is one of `basic`, `extended`, or `traditional`. Rows of each tier keep
    /// their relative order.
    pub fn from_csv_reader<R, L, S>(locale: L, source: S, reader: R) -> Result<LocaleDictionary, LoadError>
    where
        R: io::Read,
        L: Into<String>,
        S: Into<String>,
    {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut rows: [Vec<(String, Coord)>; 3] = [vec![], vec![], vec![]];
        for result in rdr.deserialize() {
            let row: CsvRow = result?;
            rows[row.tier.index()].push((row.name, Coord{x: row.x, y: row.y, z: row.z}));
        }
        let mut dict = LocaleDictionary::new(locale, source);
        for (&tier, tier_rows) in Tier::ALL.iter().zip(rows.iter_mut()) {
            if !tier_rows.is_empty() {
                let set = ColorNameSet::from_pairs(tier_rows.drain(..))?;
                dict = dict.with_tier(tier, set);
            }
        }
        Ok(dict)
    }
}
