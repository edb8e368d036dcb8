//! This module contains a struct, [`Coord`], that models a single point of a perceptual color space:
//! three channels chosen so that Euclidean distance between two points tracks how different the two
//! colors look. Every other part of the crate speaks in `Coord`s. Anything that can describe a color
//! as such a point plugs in through `Into<Coord>`, and anything that can be rebuilt from one through
//! `From<Coord>`.

use std::ops::{Add, Sub};

/// A point in a perceptual 3D color space. By convention `x` is the achromatic (lightness) channel,
/// usually near [0, 1], and `y` and `z` are the two opponent channels, which may be negative. None of
/// this is enforced: the axes are only ever compared with each other by distance.
///
/// # Examples
/// ```
/// # use colorlex::coord::Coord;
/// let red = Coord{x: 0.63, y: 0.23, z: 0.13};
/// let query: Coord = [0.6, 0.2, 0.1].into();
/// // the difference is (0.03, 0.03, 0.03)
/// let diff = red - query;
/// assert!((diff.y - 0.03).abs() <= 1e-10);
/// assert!((red.euclidean_distance(&query) - 0.0027f64.sqrt()).abs() <= 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Coord {
    /// The first axis: lightness.
    pub x: f64,
    /// The second axis: the first opponent channel.
    pub y: f64,
    /// The third axis: the second opponent channel.
    pub z: f64,
}

impl Add for Coord {
    type Output = Coord;
    fn add(self, rhs: Coord) -> Coord {
        Coord {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

/// Componentwise difference. For any Coords c1 and c2, `(c1 - c2) + c2 == c1` down to floating
/// point error.
impl Sub for Coord {
    type Output = Coord;
    fn sub(self, rhs: Coord) -> Coord {
        Coord {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl From<[f64; 3]> for Coord {
    fn from(arr: [f64; 3]) -> Coord {
        Coord {
            x: arr[0],
            y: arr[1],
            z: arr[2],
        }
    }
}

impl From<(f64, f64, f64)> for Coord {
    fn from(tup: (f64, f64, f64)) -> Coord {
        Coord {
            x: tup.0,
            y: tup.1,
            z: tup.2,
        }
    }
}

impl From<Coord> for [f64; 3] {
    fn from(coord: Coord) -> [f64; 3] {
        [coord.x, coord.y, coord.z]
    }
}

impl Coord {
    /// The number of axes. A `Coord` never has any other arity.
    pub const DIM: usize = 3;

    /// Gets the component along the given axis: 0 is `x`, 1 is `y`, 2 is `z`. Panics on any other
    /// axis, which would be a bug in the caller.
    pub fn axis(&self, axis: usize) -> f64 {
        match axis {
            0 => self.x,
            1 => self.y,
            2 => self.z,
            _ => panic!("Axis {} out of range for a 3D coordinate", axis),
        }
    }

    /// Returns true if every component is a finite number (not NaN or infinite).
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// The squared Euclidean distance between two points. This is what the index compares against
    /// internally, since it orders points exactly like [`Coord::euclidean_distance`] without taking
    /// a square root.
    /// # Example
    /// ```
    /// # use colorlex::coord::Coord;
    /// let point1 = Coord{x: 0., y: 0., z: -1.};
    /// let point2 = Coord{x: 2., y: 3., z: 5.};
    /// assert!((point1.squared_distance(&point2) - 49.).abs() <= 1e-10);
    /// ```
    pub fn squared_distance(&self, other: &Coord) -> f64 {
        let diff = *self - *other;
        diff.x * diff.x + diff.y * diff.y + diff.z * diff.z
    }

    /// The Euclidean distance between two 3D points, defined as the square root of the sum of
    /// squares of differences in each axis. In a perceptual space this is the crate's measure of how
    /// different two colors look, and it is the distance every query reports.
    /// # Example
    /// ```
    /// # use colorlex::coord::Coord;
    /// let point1 = Coord{x: 0., y: 0., z: -1.};
    /// let point2 = Coord{x: 2., y: 3., z: 5.};
    /// let dist = point1.euclidean_distance(&point2);
    /// assert!((dist - 7.).abs() <= 1e-10);
    /// ```
    pub fn euclidean_distance(&self, other: &Coord) -> f64 {
        self.squared_distance(other).sqrt()
    }
}
