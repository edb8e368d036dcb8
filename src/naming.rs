//! This module is the query side of the crate: given a perceptual coordinate and a locale, find the
//! closest color name, list the closest few, look a name's color up, or carry a name from one
//! locale to another through the shared perceptual space. Everything here is an inherent method on
//! [`Registry`], built on [`Registry::resolve`] and [`Registry::index`].
//!
//! None of these queries fail loudly. An unknown locale, a missing tier, an unknown name, or a match
//! farther away than the allowed threshold all come back as `None` or an empty list.
//!
//! # Example
//! ```
//! # use colorlex::prelude::*;
//! let registry = Registry::new();
//! let basic = ColorNameSet::from_pairs(vec![
//!     ("black", [0., 0., 0.]),
//!     ("white", [1., 0., 0.]),
//!     ("red", [0.63, 0.23, 0.13]),
//! ]).unwrap();
//! registry.register(LocaleDictionary::new("en", "example").with_tier(Tier::Basic, basic));
//!
//! let best = registry.name([0.6, 0.2, 0.1], "en", NamingOptions::default()).unwrap();
//! assert_eq!(best.name, "red");
//! assert_eq!(registry.lookup("RED", "en"), Some(Coord{x: 0.63, y: 0.23, z: 0.13}));
//! let strict = NamingOptions::default().with_threshold(0.00001);
//! assert!(registry.name([0.01, 0., 0.], "en", strict).is_none());
//! ```

use crate::coord::Coord;
use crate::dictionary::LocaleDictionary;
use crate::kdtree::Neighbor;
use crate::registry::{DictionarySource, Registry};
use crate::tier::Tier;

/// Options for [`Registry::name`]. The default searches every tier with no distance limit.
#[derive(Debug, Copy, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct NamingOptions {
    /// The finest tier to search. Coarser tiers are always searched too. `None` searches all.
    pub level: Option<Tier>,
    /// The largest distance a match may have. `None` accepts any distance.
    pub threshold: Option<f64>,
}

impl NamingOptions {
    /// Caps the search at the given tier.
    pub fn with_level(mut self, level: Tier) -> NamingOptions {
        self.level = Some(level);
        self
    }

    /// Rejects matches farther away than `threshold`.
    pub fn with_threshold(mut self, threshold: f64) -> NamingOptions {
        self.threshold = Some(threshold);
        self
    }

    fn accepts(&self, distance: f64) -> bool {
        self.threshold.map_or(true, |max| distance <= max)
    }
}

/// A color name that matched a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameMatch {
    /// The matched name.
    pub name: String,
    /// The name's own coordinate, not the query's.
    pub color: Coord,
    /// The distance from the query to `color`.
    pub distance: f64,
    /// The attribution of the dictionary the name came from.
    pub source: String,
    /// The tier the name came from.
    pub tier: Tier,
}

impl NameMatch {
    fn from_neighbor(dict: &LocaleDictionary, tier: Tier, neighbor: Neighbor) -> Option<NameMatch> {
        let (name, color) = dict.tier(tier)?.get(neighbor.index)?;
        Some(NameMatch {
            name: name.to_string(),
            color,
            distance: neighbor.distance,
            source: dict.source.clone(),
            tier,
        })
    }

    /// Converts the matched name's coordinate into any color type that can be built from one.
    pub fn to_color<T: From<Coord>>(&self) -> T {
        T::from(self.color)
    }
}

/// The result of carrying a color name from one locale to another.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Translation {
    /// The closest name in the target locale.
    pub name: String,
    /// The coordinate of the original name in the source locale.
    pub source_color: Coord,
    /// The coordinate of the translated name in the target locale.
    pub target_color: Coord,
    /// The distance between `source_color` and `target_color`: how faithful the translation is.
    pub distance: f64,
    /// The target locale tier the name came from.
    pub tier: Tier,
}

impl Translation {
    /// Converts the source name's coordinate into any color type that can be built from one.
    pub fn source_to<T: From<Coord>>(&self) -> T {
        T::from(self.source_color)
    }

    /// Converts the translated name's coordinate into any color type that can be built from one.
    pub fn target_to<T: From<Coord>>(&self) -> T {
        T::from(self.target_color)
    }
}

impl Registry {
    /// Names a color: searches every tier up to `options.level` for its closest name, and returns
    /// the closest across those tiers. Matches farther than `options.threshold` are dropped before
    /// the tiers are compared. Returns `None` if the locale is unknown or nothing qualifies. When two
    /// tiers tie, the coarser one wins.
    pub fn name<'a, C, S>(&self, color: C, locale: S, options: NamingOptions) -> Option<NameMatch>
    where
        C: Into<Coord>,
        S: Into<DictionarySource<'a>>,
    {
        let query = color.into();
        let dict = self.resolve(locale)?;
        let mut best: Option<(Tier, Neighbor)> = None;
        for &tier in Tier::up_to(options.level) {
            let found = match self.index(&dict, tier).and_then(|tree| tree.nearest(&query)) {
                Some(found) => found,
                None => continue,
            };
            if !options.accepts(found.distance) {
                continue;
            }
            if best.map_or(true, |(_, current)| found.distance < current.distance) {
                best = Some((tier, found));
            }
        }
        let (tier, found) = best?;
        NameMatch::from_neighbor(&dict, tier, found)
    }

    /// Lists up to `count` of the closest names to a color across all three tiers, closest first.
    /// There is no tier cap. Returns fewer than `count` if the locale has fewer names, and nothing if
    /// the locale is unknown. Panics if `count` is 0.
    pub fn nearest<'a, C, S>(&self, color: C, locale: S, count: usize) -> Vec<NameMatch>
    where
        C: Into<Coord>,
        S: Into<DictionarySource<'a>>,
    {
        assert!(count > 0, "asked for the 0 nearest names");
        let query = color.into();
        let dict = match self.resolve(locale) {
            Some(dict) => dict,
            None => return vec![],
        };
        let mut matches: Vec<NameMatch> = vec![];
        for &tier in Tier::ALL.iter() {
            if let Some(tree) = self.index(&dict, tier) {
                matches.extend(
                    tree.nearest_n(&query, count)
                        .into_iter()
                        .filter_map(|neighbor| NameMatch::from_neighbor(&dict, tier, neighbor)),
                );
            }
        }
        // stable, so equal distances keep tier order
        matches.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        matches.truncate(count);
        matches
    }

    /// Looks up the coordinate of a name, ignoring case. Tiers are scanned from basic to
    /// traditional and the first match wins. Returns `None` if the locale or the name is unknown.
    pub fn lookup<'a, S>(&self, name: &str, locale: S) -> Option<Coord>
    where
        S: Into<DictionarySource<'a>>,
    {
        let dict = self.resolve(locale)?;
        let (tier, index) = dict.find(name)?;
        dict.tier(tier)?.get(index).map(|(_, coord)| coord)
    }

    /// Translates a color name from one locale to another: looks the name up in `from`, then names
    /// that coordinate in `to` with every tier allowed. The result's distance is the gap between the
    /// two names' coordinates. Returns `None` if the name is unknown in `from` or `to` has no names.
    ///
    /// # Example
    /// ```
    /// # use colorlex::prelude::*;
    /// let en = LocaleDictionary::new("en", "").with_tier(
    ///     Tier::Basic,
    ///     ColorNameSet::from_pairs(vec![("red", [0.63, 0.23, 0.13]), ("white", [1., 0., 0.])]).unwrap(),
    /// );
    /// let fr = LocaleDictionary::new("fr", "").with_tier(
    ///     Tier::Basic,
    ///     ColorNameSet::from_pairs(vec![("rouge", [0.62, 0.22, 0.12]), ("blanc", [0.99, 0., 0.])]).unwrap(),
    /// );
    /// let registry = Registry::with_dictionaries(vec![en, fr]);
    /// let translated = registry.translate("White", "en", "fr").unwrap();
    /// assert_eq!(translated.name, "blanc");
    /// assert!((translated.distance - 0.01).abs() <= 1e-10);
    /// ```
    pub fn translate<'f, 't, F, T>(&self, name: &str, from: F, to: T) -> Option<Translation>
    where
        F: Into<DictionarySource<'f>>,
        T: Into<DictionarySource<'t>>,
    {
        let source_color = self.lookup(name, from)?;
        let found = self.name(source_color, to, NamingOptions::default())?;
        Some(Translation {
            distance: source_color.euclidean_distance(&found.color),
            name: found.name,
            source_color,
            target_color: found.color,
            tier: found.tier,
        })
    }
}

#[cfg(test)]
mod tests {
    #[allow(unused_imports)]
    use super::*;
    use crate::nameset::ColorNameSet;
    use float_cmp::approx_eq;
    use maplit::btreemap;
    use proptest::prelude::*;

    fn set(pairs: &[(&str, [f64; 3])]) -> ColorNameSet {
        ColorNameSet::from_pairs(pairs.iter().map(|&(name, coord)| (name, coord))).unwrap()
    }

    fn scenario() -> Registry {
        let basic = set(&[("black", [0., 0., 0.]), ("white", [1., 0., 0.]), ("red", [0.63, 0.23, 0.13])]);
        Registry::with_dictionaries(vec![LocaleDictionary::new("en", "survey").with_tier(Tier::Basic, basic)])
    }

    fn tiered() -> LocaleDictionary {
        LocaleDictionary::new("en", "layered")
            .with_tier(Tier::Basic, set(&[("red", [0.63, 0.23, 0.13]), ("grey", [0.6, 0., 0.])]))
            .with_tier(Tier::Extended, set(&[("crimson", [0.55, 0.2, 0.07])]))
            .with_tier(Tier::Traditional, set(&[("vermilion", [0.6, 0.2, 0.12])]))
    }

    #[test]
    fn test_scenario_nearest_red() {
        let registry = scenario();
        let found = registry.nearest([0.6, 0.2, 0.1], "en", 1);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "red");
        assert!(approx_eq!(f64, found[0].distance, 0.0027f64.sqrt(), epsilon = 1e-12));
        assert_eq!(found[0].source, "survey");
        assert_eq!(found[0].tier, Tier::Basic);
    }

    #[test]
    fn test_scenario_lookup() {
        let registry = scenario();
        assert_eq!(registry.lookup("RED", "en"), Some(Coord{x: 0.63, y: 0.23, z: 0.13}));
        assert_eq!(registry.lookup("blue", "en"), None);
        assert_eq!(registry.lookup("red", "fr"), None);
    }

    #[test]
    fn test_scenario_thresholds() {
        let registry = scenario();
        let black = registry
            .name([0., 0., 0.], "en", NamingOptions::default().with_threshold(0.001))
            .unwrap();
        assert_eq!(black.name, "black");
        assert_eq!(black.distance, 0.);
        assert!(registry
            .name([0.01, 0., 0.], "en", NamingOptions::default().with_threshold(0.00001))
            .is_none());
    }

    #[test]
    fn test_threshold_flip() {
        let registry = scenario();
        let query = [0.6, 0.2, 0.1];
        let open = registry.name(query, "en", NamingOptions::default()).unwrap();
        let at = NamingOptions::default().with_threshold(open.distance);
        assert_eq!(registry.name(query, "en", at).map(|m| m.name), Some("red".to_string()));
        let below = NamingOptions::default().with_threshold(open.distance * 0.99);
        assert!(registry.name(query, "en", below).is_none());
    }

    #[test]
    fn test_unknown_locale() {
        let registry = scenario();
        assert!(registry.name([0., 0., 0.], "xx", NamingOptions::default()).is_none());
        assert!(registry.nearest([0., 0., 0.], "xx", 3).is_empty());
        assert!(registry.translate("red", "en", "xx").is_none());
        assert!(registry.translate("red", "xx", "en").is_none());
    }

    #[test]
    fn test_tier_escalation() {
        let registry = Registry::with_dictionaries(vec![tiered()]);
        // vermilion (traditional) is closest, then red (basic), then crimson (extended)
        let query = [0.6, 0.2, 0.11];
        let basic_only = registry.name(query, "en", NamingOptions::default().with_level(Tier::Basic)).unwrap();
        assert_eq!((basic_only.name.as_str(), basic_only.tier), ("red", Tier::Basic));
        let up_to_extended = registry.name(query, "en", NamingOptions::default().with_level(Tier::Extended)).unwrap();
        assert_ne!(up_to_extended.tier, Tier::Traditional);
        let any = registry.name(query, "en", NamingOptions::default()).unwrap();
        assert_eq!((any.name.as_str(), any.tier), ("vermilion", Tier::Traditional));
    }

    #[test]
    fn test_threshold_filters_per_tier() {
        let registry = Registry::with_dictionaries(vec![tiered()]);
        // only the basic grey is close enough
        let options = NamingOptions::default().with_threshold(0.05);
        let found = registry.name([0.62, 0., 0.], "en", options).unwrap();
        assert_eq!(found.name, "grey");
    }

    #[test]
    fn test_nearest_spans_all_tiers() {
        let registry = Registry::with_dictionaries(vec![tiered()]);
        let found = registry.nearest([0.6, 0.2, 0.11], "en", 10);
        assert_eq!(found.len(), 4);
        assert_eq!(found[0].name, "vermilion");
        for pair in found.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
        let tiers: Vec<Tier> = found.iter().map(|m| m.tier).collect();
        for tier in Tier::ALL.iter() {
            assert!(tiers.contains(tier));
        }
        assert_eq!(registry.nearest([0.6, 0.2, 0.11], "en", 2).len(), 2);
    }

    #[test]
    #[should_panic]
    fn test_nearest_zero_count() {
        scenario().nearest([0., 0., 0.], "en", 0);
    }

    #[test]
    fn test_lookup_tier_order_and_duplicates() {
        let dict = LocaleDictionary::new("en", "")
            .with_tier(Tier::Traditional, set(&[("Red", [0.5, 0.2, 0.1])]))
            .with_tier(Tier::Basic, set(&[("red", [0.63, 0.23, 0.13]), ("RED", [0.7, 0.2, 0.1])]));
        let registry = Registry::new();
        assert_eq!(registry.lookup("Red", &dict), Some(Coord{x: 0.63, y: 0.23, z: 0.13}));
    }

    #[test]
    fn test_inline_dictionary_queries() {
        let registry = Registry::new();
        let dict = tiered();
        let found = registry.name([0.6, 0., 0.], &dict, NamingOptions::default()).unwrap();
        assert_eq!(found.name, "grey");
        assert_eq!(registry.nearest([0.6, 0., 0.], &dict, 2).len(), 2);
        assert!(registry.locales().is_empty());
        assert!(!registry.is_cached("en", Tier::Basic));
    }

    #[test]
    fn test_queries_fill_cache() {
        let registry = Registry::with_dictionaries(vec![tiered()]);
        registry.name([0.6, 0., 0.], "en", NamingOptions::default().with_level(Tier::Extended));
        assert!(registry.is_cached("en", Tier::Basic));
        assert!(registry.is_cached("en", Tier::Extended));
        assert!(!registry.is_cached("en", Tier::Traditional));
    }

    #[test]
    fn test_translate_same_locale() {
        let registry = Registry::with_dictionaries(vec![tiered()]);
        for name in &["red", "grey", "crimson", "vermilion"] {
            let translated = registry.translate(name, "en", "en").unwrap();
            assert_eq!(&translated.name, name);
            assert_eq!(translated.distance, 0.);
            assert_eq!(translated.source_color, translated.target_color);
        }
    }

    #[test]
    fn test_translate_across_locales() {
        let palettes = btreemap! {
            "en" => vec![("red", [0.63, 0.23, 0.13]), ("blue", [0.45, -0.03, -0.31])],
            "de" => vec![("rot", [0.62, 0.22, 0.12]), ("blau", [0.46, -0.03, -0.3])],
            "ja" => vec![],
        };
        let registry = Registry::new();
        for (locale, pairs) in palettes {
            registry.register(LocaleDictionary::new(locale, "").with_tier(Tier::Basic, set(&pairs)));
        }
        let translated = registry.translate("BLUE", "en", "de").unwrap();
        assert_eq!(translated.name, "blau");
        assert_eq!(translated.source_color, Coord{x: 0.45, y: -0.03, z: -0.31});
        assert_eq!(translated.target_color, Coord{x: 0.46, y: -0.03, z: -0.3});
        let expected = translated.source_color.euclidean_distance(&translated.target_color);
        assert!(approx_eq!(f64, translated.distance, expected, epsilon = 1e-12));
        let arr: [f64; 3] = translated.target_to();
        assert_eq!(arr, [0.46, -0.03, -0.3]);
        // the target has no names at all
        assert!(registry.translate("red", "en", "ja").is_none());
        assert!(registry.translate("purple", "en", "de").is_none());
    }

    #[test]
    fn test_to_color() {
        let registry = scenario();
        let found = registry.name((0.9, 0., 0.), "en", NamingOptions::default()).unwrap();
        let arr: [f64; 3] = found.to_color();
        assert_eq!(arr, [1., 0., 0.]);
    }

    #[test]
    fn test_merge_invalidates_queries() {
        let registry = scenario();
        let query = [0.55, 0.2, 0.07];
        assert_eq!(registry.name(query, "en", NamingOptions::default()).unwrap().name, "red");
        registry.register(LocaleDictionary::new("en", "").with_tier(Tier::Extended, set(&[("crimson", [0.55, 0.2, 0.07])])));
        let found = registry.name(query, "en", NamingOptions::default()).unwrap();
        assert_eq!((found.name.as_str(), found.tier), ("crimson", Tier::Extended));
    }

    fn coord_strategy() -> impl Strategy<Value = [f64; 3]> {
        (0.0..1.0f64, -0.4..0.4f64, -0.4..0.4f64).prop_map(|(x, y, z)| [x, y, z])
    }

    proptest! {
        #[test]
        fn name_is_global_minimum(
            basic in prop::collection::vec(coord_strategy(), 0..20),
            extended in prop::collection::vec(coord_strategy(), 0..20),
            traditional in prop::collection::vec(coord_strategy(), 0..20),
            query in coord_strategy(),
            threshold in prop::option::of(0.0..0.6f64),
        ) {
            let tiers = [basic, extended, traditional];
            let mut dict = LocaleDictionary::new("xx", "");
            for (&tier, coords) in Tier::ALL.iter().zip(tiers.iter()) {
                let pairs = coords.iter().enumerate().map(|(i, &c)| (format!("{}-{}", tier, i), c));
                dict = dict.with_tier(tier, ColorNameSet::from_pairs(pairs).unwrap());
            }
            let query_coord = Coord::from(query);
            let all_distances: Vec<f64> = tiers
                .iter()
                .flat_map(|coords| coords.iter().map(|&c| Coord::from(c).euclidean_distance(&query_coord)))
                .collect();
            let within: Vec<f64> = all_distances
                .iter()
                .copied()
                .filter(|&d| threshold.map_or(true, |t| d <= t))
                .collect();

            let registry = Registry::new();
            let mut options = NamingOptions::default();
            options.threshold = threshold;
            match registry.name(query, &dict, options) {
                None => prop_assert!(within.is_empty()),
                Some(found) => {
                    let min = within.iter().copied().fold(std::f64::INFINITY, f64::min);
                    prop_assert!(approx_eq!(f64, found.distance, min, epsilon = 1e-12));
                }
            }

            let count = 5;
            let listed = registry.nearest(query, &dict, count);
            let mut sorted = all_distances.clone();
            sorted.sort_by(|a, b| a.total_cmp(b));
            prop_assert_eq!(listed.len(), count.min(sorted.len()));
            for (got, want) in listed.iter().zip(sorted.iter()) {
                prop_assert!(approx_eq!(f64, got.distance, *want, epsilon = 1e-12));
            }
        }
    }
}
