//! This file provides the one dictionary that ships with the crate: the eleven basic color terms of
//! English, with OKLab coordinates for a reference sRGB swatch of each. It seeds the
//! [default registry](crate::registry::default_registry) so the crate answers something useful
//! before any data is loaded.

use crate::coord::Coord;
use crate::dictionary::LocaleDictionary;
use crate::nameset::ColorNameSet;
use crate::tier::Tier;

/// The locale identifier the built-in dictionary is registered under.
pub const ENGLISH_LOCALE: &str = "en";

const ENGLISH_SOURCE: &str = "Berlin & Kay basic color terms, OKLab of reference sRGB swatches";

// swatches: #000000, #ffffff, #ff0000, #008000, #ffff00, #0000ff, #8b4513, #ffa500, #ffc0cb,
// #800080, #808080
const ENGLISH_BASIC_NAMES: [&str; 11] = [
    "black", "white", "red", "green", "yellow", "blue", "brown", "orange", "pink", "purple", "grey",
];
const ENGLISH_BASIC_COORDS: [[f64; 3]; 11] = [
    [0.0000, 0.0000, 0.0000],
    [1.0000, 0.0000, 0.0000],
    [0.6280, 0.2249, 0.1258],
    [0.5198, -0.1403, 0.1077],
    [0.9680, -0.0714, 0.1986],
    [0.4520, -0.0325, -0.3115],
    [0.4708, 0.0708, 0.0870],
    [0.7927, 0.0566, 0.1614],
    [0.8677, 0.0730, 0.0091],
    [0.4209, 0.1647, -0.1015],
    [0.5999, 0.0000, 0.0000],
];

/// Builds the built-in English dictionary, which only has a basic tier.
pub fn english() -> LocaleDictionary {
    let names = ENGLISH_BASIC_NAMES.iter().map(|s| s.to_string()).collect();
    let coords = ENGLISH_BASIC_COORDS.iter().map(|&c| Coord::from(c)).collect();
    let basic = ColorNameSet::new(names, coords);
    let dict = LocaleDictionary::new(ENGLISH_LOCALE, ENGLISH_SOURCE);
    match basic {
        Ok(set) => dict.with_tier(Tier::Basic, set),
        // unreachable while the two tables above stay aligned
        Err(e) => {
            tracing::error!(error = %e, "built-in English dictionary is malformed");
            dict
        }
    }
}

#[cfg(test)]
mod tests {
    #[allow(unused_imports)]
    use super::*;

    #[test]
    fn test_english_shape() {
        let dict = english();
        assert_eq!(dict.locale, "en");
        assert_eq!(dict.basic.as_ref().map(|s| s.len()), Some(11));
        assert!(dict.extended.is_none());
        assert!(dict.traditional.is_none());
    }

    #[test]
    fn test_english_swatches_are_their_own_names() {
        let dict = english();
        let basic = dict.basic.unwrap();
        let tree = basic.build_index();
        for (i, (_, coord)) in basic.iter().enumerate() {
            assert_eq!(tree.nearest(&coord).map(|n| n.index), Some(i));
        }
    }
}
