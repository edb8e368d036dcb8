//! This module provides [`ColorNameSet`], one tier's worth of named colors: a list of names and a
//! list of perceptual coordinates, aligned so that the i-th name belongs to the i-th coordinate. The
//! k-d tree built over a set only stores indices into it, so that alignment is checked once here,
//! when the set is made, and never again.

use std::convert::TryFrom;
use std::io;
use std::path::Path;

use crate::coord::Coord;
use crate::kdtree::KdTree;

/// An error in the shape of color name data. These are caught when a [`ColorNameSet`] is built,
/// before any index sees the data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DictionaryError {
    /// The names and the coordinates have different lengths, so they cannot be aligned.
    #[error("{names} names cannot be aligned with {coords} coordinates")]
    Misaligned {
        /// How many names were given.
        names: usize,
        /// How many coordinates were given.
        coords: usize,
    },
    /// A flat coordinate list whose length is not a multiple of 3.
    #[error("flat coordinate list of length {0} is not a multiple of 3")]
    NotTriples(usize),
    /// A coordinate with a NaN or infinite component.
    #[error("coordinate for {name:?} is not finite")]
    NonFinite {
        /// The name the bad coordinate belongs to.
        name: String,
    },
}

/// An error in loading color name data from a CSV source.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The CSV could not be read or a row could not be deserialized.
    #[error("could not read color name CSV: {0}")]
    Csv(#[from] csv::Error),
    /// The rows were readable but did not form a valid name set.
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),
}

/// A single named color, as it appears when a set is serialized.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ColorNameEntry {
    /// The name of the color.
    pub name: String,
    /// The representative point of the color in perceptual space.
    pub coord: Coord,
}

/// One row of a color name CSV file: a name followed by its three coordinates.
#[derive(Debug, Deserialize)]
struct CsvRow {
    name: String,
    x: f64,
    y: f64,
    z: f64,
}

/// An ordered list of color names and their aligned perceptual coordinates.
///
/// # Example
/// ```
/// # use colorlex::nameset::ColorNameSet;
/// let set = ColorNameSet::from_pairs(vec![
///     ("black", [0., 0., 0.]),
///     ("white", [1., 0., 0.]),
/// ]).unwrap();
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.find("WHITE"), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "Vec<ColorNameEntry>", into = "Vec<ColorNameEntry>")]
pub struct ColorNameSet {
    names: Vec<String>,
    coords: Vec<Coord>,
}

impl ColorNameSet {
    /// Builds a set from names and coordinates, which must be the same length and finite.
    pub fn new(names: Vec<String>, coords: Vec<Coord>) -> Result<ColorNameSet, DictionaryError> {
        if names.len() != coords.len() {
            return Err(DictionaryError::Misaligned {
                names: names.len(),
                coords: coords.len(),
            });
        }
        if let Some(i) = coords.iter().position(|c| !c.is_finite()) {
            return Err(DictionaryError::NonFinite {
                name: names[i].clone(),
            });
        }
        Ok(ColorNameSet { names, coords })
    }

    /// Builds a set from names and a flat list of coordinates, three values per name.
    pub fn from_flat(names: Vec<String>, flat: &[f64]) -> Result<ColorNameSet, DictionaryError> {
        if flat.len() % Coord::DIM != 0 {
            return Err(DictionaryError::NotTriples(flat.len()));
        }
        let coords = flat
            .chunks_exact(Coord::DIM)
            .map(|c| Coord{x: c[0], y: c[1], z: c[2]})
            .collect();
        ColorNameSet::new(names, coords)
    }

    /// Builds a set from (name, coordinate) pairs, in order.
    pub fn from_pairs<I, S, C>(pairs: I) -> Result<ColorNameSet, DictionaryError>
    where
        I: IntoIterator<Item = (S, C)>,
        S: Into<String>,
        C: Into<Coord>,
    {
        let (names, coords) = pairs
            .into_iter()
            .map(|(name, coord)| (name.into(), coord.into()))
            .unzip();
        ColorNameSet::new(names, coords)
    }

    /// Reads a set from CSV with a header row and the columns `name`, `x`, `y`, and `z`.
    pub fn from_csv_reader<R: io::Read>(reader: R) -> Result<ColorNameSet, LoadError> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut names = vec![];
        let mut coords = vec![];
        for result in rdr.deserialize() {
            let row: CsvRow = result?;
            names.push(row.name);
            coords.push(Coord{x: row.x, y: row.y, z: row.z});
        }
        Ok(ColorNameSet::new(names, coords)?)
    }

    /// Reads a set from a CSV file. See [`ColorNameSet::from_csv_reader`] for the format.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<ColorNameSet, LoadError> {
        let file = std::fs::File::open(path).map_err(csv::Error::from)?;
        ColorNameSet::from_csv_reader(file)
    }

    /// The number of names in the set.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if the set has no names.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The names, in storage order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The coordinates, aligned with [`ColorNameSet::names`].
    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    /// Gets the name and coordinate at a given position.
    pub fn get(&self, index: usize) -> Option<(&str, Coord)> {
        let name = self.names.get(index)?;
        Some((name.as_str(), self.coords[index]))
    }

    /// Iterates over (name, coordinate) pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Coord)> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.coords.iter().copied())
    }

    /// Finds the position of the first name equal to `name`, ignoring case. Duplicate names are
    /// legal; the earliest one wins.
    pub fn find(&self, name: &str) -> Option<usize> {
        let needle = name.to_lowercase();
        self.names.iter().position(|n| n.to_lowercase() == needle)
    }

    /// Builds a k-d tree over a snapshot of this set's coordinates. Indices in the tree's results
    /// refer back to positions in this set.
    pub fn build_index(&self) -> KdTree {
        KdTree::new(&self.coords)
    }
}

impl TryFrom<Vec<ColorNameEntry>> for ColorNameSet {
    type Error = DictionaryError;

    fn try_from(entries: Vec<ColorNameEntry>) -> Result<ColorNameSet, DictionaryError> {
        ColorNameSet::from_pairs(entries.into_iter().map(|e| (e.name, e.coord)))
    }
}

impl From<ColorNameSet> for Vec<ColorNameEntry> {
    fn from(set: ColorNameSet) -> Vec<ColorNameEntry> {
        set.names
            .into_iter()
            .zip(set.coords)
            .map(|(name, coord)| ColorNameEntry { name, coord })
            .collect()
    }
}
