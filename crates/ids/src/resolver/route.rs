//! Route ID normalization.
//!
//! The feed encodes route variants as `<base>-<branch>[-<sub-branch>]`. The
//! schedule database wants one route per base, so the trailing numeric groups
//! are stripped and the variants merge. Routes still using a retired
//! alphabetic prefix resolve to the number they had before the renumbering.

use std::collections::{HashMap, HashSet};

use regex::Regex;

use crate::identifiers::{NormalizedRouteId, RouteKey};
use crate::models::traits::RouteSource;
use crate::models::types::{RawRouteRecord, RouteDecision};

#[derive(Clone, Debug)]
pub struct RouteIdentifierNormalizer {
    excluded_short_names: HashSet<String>,
    legacy_prefixes: HashMap<String, u32>,
    suffix: Regex,
}

impl RouteIdentifierNormalizer {
    pub fn new(
        excluded_short_names: HashSet<String>,
        legacy_prefixes: HashMap<String, u32>,
        suffix: Regex,
    ) -> Self {
        Self {
            excluded_short_names,
            legacy_prefixes,
            suffix,
        }
    }

    pub fn is_excluded(&self, short_name: &str) -> bool {
        self.excluded_short_names.contains(short_name)
    }

    pub fn normalize(&self, route: &RawRouteRecord) -> RouteDecision {
        if self.is_excluded(&route.short_name) {
            return RouteDecision::Excluded;
        }

        if let Some(&id) = self.legacy_prefixes.get(&route.legacy_id_prefix) {
            return RouteDecision::Included(NormalizedRouteId::Numeric(id));
        }

        RouteDecision::Included(NormalizedRouteId::Key(self.strip_suffix(&route.raw_route_id)))
    }

    pub fn normalize_source<R: RouteSource + ?Sized>(&self, route: &R) -> RouteDecision {
        self.normalize(&route.to_raw())
    }

    /// Remove the first match of the suffix pattern. An ID made only of a
    /// suffix keeps its raw form rather than collapsing to an empty key.
    fn strip_suffix(&self, raw_route_id: &str) -> RouteKey {
        let stripped = self.suffix.replace(raw_route_id, "");
        if stripped.is_empty() {
            RouteKey::new(raw_route_id)
        } else {
            RouteKey::new(stripped)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer(pattern: &str) -> RouteIdentifierNormalizer {
        RouteIdentifierNormalizer::new(
            ["1", "2"].into_iter().map(String::from).collect(),
            HashMap::from([("SNO".to_string(), 506)]),
            Regex::new(pattern).unwrap(),
        )
    }

    fn key(s: &str) -> RouteDecision {
        RouteDecision::Included(NormalizedRouteId::Key(RouteKey::new(s)))
    }

    #[test]
    fn test_excluded_short_names() {
        let n = normalizer(r"-\d+(-\d+)?$");
        assert_eq!(n.normalize(&RawRouteRecord::new("1", "1-345")), RouteDecision::Excluded);
        // Exclusion wins over the legacy prefix
        assert_eq!(n.normalize(&RawRouteRecord::new("2", "SNO-1")), RouteDecision::Excluded);
        assert!(n.normalize(&RawRouteRecord::new("12", "12-345")).is_included());
    }

    #[test]
    fn test_legacy_prefix() {
        let n = normalizer(r"-\d+(-\d+)?$");
        let expected = RouteDecision::Included(NormalizedRouteId::Numeric(506));
        assert_eq!(n.normalize(&RawRouteRecord::new("SNO", "SNO")), expected);
        assert_eq!(n.normalize(&RawRouteRecord::new("", "SNO-345")), expected);
        assert_eq!(n.normalize(&RawRouteRecord::new("", "SNO12-7-2")), expected);
        // Exact prefix only
        assert_eq!(n.normalize(&RawRouteRecord::new("", "SNOW-3")), key("SNOW"));
    }

    #[test]
    fn test_strips_up_to_two_groups() {
        let n = normalizer(r"-\d+(-\d+)?$");
        assert_eq!(n.normalize(&RawRouteRecord::new("100", "100-5-2")), key("100"));
        assert_eq!(n.normalize(&RawRouteRecord::new("100", "100-5")), key("100"));
        assert_eq!(n.normalize(&RawRouteRecord::new("100", "100")), key("100"));
        assert_eq!(n.normalize(&RawRouteRecord::new("100", "100-5-2-1")), key("100-5"));
        assert_eq!(n.normalize(&RawRouteRecord::new("E1", "E1-345")), key("E1"));
    }

    #[test]
    fn test_single_group_strip_is_idempotent() {
        let n = normalizer(r"-\d+(-\d+)?$");
        let once = n.normalize(&RawRouteRecord::new("95", "95-345"));
        let twice = n.normalize(&RawRouteRecord::new("95", once.id().unwrap().to_string()));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_narrow_pattern() {
        let n = normalizer(r"-\d+$");
        assert_eq!(n.normalize(&RawRouteRecord::new("100", "100-5-2")), key("100-5"));
        assert_eq!(n.normalize(&RawRouteRecord::new("100", "100-5")), key("100"));
    }

    #[test]
    fn test_unanchored_pattern_removes_only_the_match() {
        let n = normalizer(r"-\d+");
        assert_eq!(n.normalize(&RawRouteRecord::new("E1", "E1-5X")), key("E1X"));
        assert_eq!(n.normalize(&RawRouteRecord::new("95", "95-345-2")), key("95-2"));
        assert_eq!(n.normalize(&RawRouteRecord::new("", "-5")), key("-5"));
    }

    #[test]
    fn test_suffix_only_id_kept() {
        let n = normalizer(r"-\d+(-\d+)?$");
        assert_eq!(n.normalize(&RawRouteRecord::new("", "-5")), key("-5"));
    }

    #[test]
    fn test_supplied_prefix_is_used() {
        let n = normalizer(r"-\d+(-\d+)?$");
        let route = RawRouteRecord {
            short_name: "95".into(),
            legacy_id_prefix: "SNO".into(),
            raw_route_id: "95-345".into(),
        };
        assert_eq!(
            n.normalize_source(&route),
            RouteDecision::Included(NormalizedRouteId::Numeric(506))
        );
    }
}
