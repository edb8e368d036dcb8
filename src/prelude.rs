//! This module simply brings the most common functionality under a single namespace, to prevent
//! excessive imports. It includes the coordinate type, the data types a registry is loaded with, the
//! registry itself, and the options and results of naming queries. The k-d tree and the built-in
//! data are not included.

pub use crate::coord::Coord;
pub use crate::dictionary::LocaleDictionary;
pub use crate::nameset::{ColorNameSet, DictionaryError, LoadError};
pub use crate::naming::{NameMatch, NamingOptions, Translation};
pub use crate::registry::{default_registry, DictionarySource, Registry};
pub use crate::tier::Tier;
