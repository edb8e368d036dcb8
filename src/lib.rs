//! Colorlex names colors. Given a point in a perceptual color space (one where straight-line
//! distance tracks how different two colors look) and a locale, it finds the closest human color
//! name that locale has, lists the closest few, looks names back up, and carries a name from one
//! locale to another by way of the color it stands for.
//!
//! Each locale's names live in a [`LocaleDictionary`](dictionary::LocaleDictionary) of up to three
//! tiers, from universal basic terms to cultural traditional ones. A
//! [`Registry`](registry::Registry) owns the dictionaries and lazily builds a k-d tree per tier,
//! dropping trees whenever a later registration adds tiers to a locale. Parsing and converting
//! colors is left to other crates: everything here takes a ready-made [`Coord`](coord::Coord).

#![doc(html_root_url = "https://docs.rs/colorlex/0.1.0")]
// we don't mess around with documentation
#![deny(missing_docs)]
// Clippy doesn't like long decimals, but adding separators in decimals isn't any more readable
#![allow(clippy::unreadable_literal)]

extern crate csv;
extern crate parking_lot;
extern crate serde;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate lazy_static;

pub mod builtin;
pub mod coord;
pub mod dictionary;
pub mod kdtree;
pub mod nameset;
pub mod naming;
pub mod prelude;
pub mod registry;
pub mod tier;

pub use registry::default_registry;
