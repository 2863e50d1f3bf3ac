//! Agency configuration: the static tables the resolvers run on.
//!
//! [`AgencyConfigData`] is plain data, loadable from JSON with the `serde`
//! feature. [`AgencyConfig`] is the validated form; it is built once before
//! any record is resolved and is never mutated afterwards.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use regex::Regex;

use crate::bands::{BandAllocationTable, PrefixBand};
use crate::cleanup::{IdCleanup, SCHEDULE_PERIOD_PATTERN};
use crate::models::types::ConfigError;
use crate::resolver::{RouteIdentifierNormalizer, StopIdentifierResolver};

/// Strips one trailing `-<digits>` group
pub const SINGLE_SUFFIX_PATTERN: &str = r"-\d+$";

/// Strips up to two trailing `-<digits>` groups
pub const DOUBLE_SUFFIX_PATTERN: &str = r"-\d+(-\d+)?$";

const BASELINE_BANDS: &[(&str, u32)] = &[
    ("AA", 100_000),
    ("AB", 200_000),
    ("AC", 300_000),
    ("AD", 400_000),
    ("WA", 500_000),
    ("AF", 600_000),
    ("AG", 700_000),
    ("AK", 800_000),
    ("AL", 900_000),
    ("BA", 1_000_000),
    ("CA", 1_100_000),
    ("CB", 1_200_000),
    ("CD", 1_300_000),
    ("CE", 1_400_000),
    ("CK", 1_500_000),
    ("EA", 1_600_000),
    ("EB", 1_700_000),
    ("EE", 1_800_000),
    ("NA", 1_900_000),
    ("RF", 2_000_000),
];

// Appended to the baseline bands; existing offsets never move.
const EXTENDED_BANDS: &[(&str, u32)] = &[
    ("WB", 2_100_000),
    ("WD", 2_200_000),
    ("WE", 2_300_000),
    ("WG", 2_400_000),
    ("WJ", 2_500_000),
    ("WL", 2_600_000),
    ("WR", 2_700_000),
    ("WT", 2_800_000),
    ("NB", 2_900_000),
    ("NC", 3_000_000),
    ("ND", 3_100_000),
    ("NF", 3_200_000),
    ("NG", 3_300_000),
    ("RA", 3_400_000),
    ("RB", 3_500_000),
    ("RD", 3_600_000),
    ("RE", 3_700_000),
    ("SA", 3_800_000),
    ("SB", 3_900_000),
    ("SC", 4_000_000),
];

// Kept clear of every band above.
const SPECIAL_CASES: &[(&str, u32)] = &[
    ("SNO CAFÉ", 9_900_001),
    ("CK.155", 9_900_002),
    ("STOP - 6", 9_900_003),
    ("STOP - 8", 9_900_004),
];

const LEGACY_ROUTE_PREFIXES: &[(&str, u32)] = &[("SNO", 506)];

/// Raw configuration values, before validation
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgencyConfigData {
    /// Routes administratively misclassified in the feed
    pub excluded_route_short_names: BTreeSet<String>,
    pub legacy_route_prefix_overrides: BTreeMap<String, u32>,
    /// Matching order is decided by prefix length, not by position here
    pub stop_id_bands: Vec<PrefixBand>,
    /// Keys are compared ignoring case
    pub stop_id_special_cases: BTreeMap<String, u32>,
    #[cfg_attr(feature = "serde", serde(default = "default_suffix_pattern"))]
    pub route_id_suffix_pattern: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub trip_id_cleanup_pattern: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub service_id_cleanup_pattern: Option<String>,
    /// When false, route variants merging onto one ID is expected
    #[cfg_attr(feature = "serde", serde(default))]
    pub verify_route_id_uniqueness: bool,
}

#[cfg(feature = "serde")]
fn default_suffix_pattern() -> String {
    DOUBLE_SUFFIX_PATTERN.to_string()
}

fn bands(entries: &[&[(&str, u32)]]) -> Vec<PrefixBand> {
    entries
        .iter()
        .flat_map(|e| e.iter())
        .map(|&(prefix, offset)| PrefixBand::new(prefix, offset))
        .collect()
}

fn pairs(entries: &[(&str, u32)]) -> BTreeMap<String, u32> {
    entries.iter().map(|&(k, v)| (k.to_string(), v)).collect()
}

fn names(entries: &[&str]) -> BTreeSet<String> {
    entries.iter().map(|s| s.to_string()).collect()
}

impl AgencyConfigData {
    /// Earlier tables: rail lines 1 and 2 excluded, a single suffix group
    /// stripped, baseline bands only.
    pub fn baseline() -> Self {
        Self {
            excluded_route_short_names: names(&["1", "2"]),
            legacy_route_prefix_overrides: pairs(LEGACY_ROUTE_PREFIXES),
            stop_id_bands: bands(&[BASELINE_BANDS]),
            stop_id_special_cases: pairs(SPECIAL_CASES),
            route_id_suffix_pattern: SINGLE_SUFFIX_PATTERN.to_string(),
            trip_id_cleanup_pattern: None,
            service_id_cleanup_pattern: None,
            verify_route_id_uniqueness: false,
        }
    }

    /// Current tables: route 4 excluded too, up to two suffix groups
    /// stripped, extended bands, schedule period tags removed from trip and
    /// service IDs.
    pub fn extended() -> Self {
        Self {
            excluded_route_short_names: names(&["1", "2", "4"]),
            legacy_route_prefix_overrides: pairs(LEGACY_ROUTE_PREFIXES),
            stop_id_bands: bands(&[BASELINE_BANDS, EXTENDED_BANDS]),
            stop_id_special_cases: pairs(SPECIAL_CASES),
            route_id_suffix_pattern: DOUBLE_SUFFIX_PATTERN.to_string(),
            trip_id_cleanup_pattern: Some(SCHEDULE_PERIOD_PATTERN.to_string()),
            service_id_cleanup_pattern: Some(SCHEDULE_PERIOD_PATTERN.to_string()),
            verify_route_id_uniqueness: false,
        }
    }
}

impl Default for AgencyConfigData {
    fn default() -> Self {
        Self::extended()
    }
}

fn compile(field: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
        field,
        pattern: pattern.to_string(),
        source,
    })
}

fn cleanup(field: &'static str, pattern: Option<&str>) -> Result<IdCleanup, ConfigError> {
    pattern
        .map(|p| compile(field, p))
        .transpose()
        .map(IdCleanup::new)
}

/// Validated, immutable configuration
///
/// Cheap to clone: the band table is shared.
#[derive(Clone, Debug)]
pub struct AgencyConfig {
    stops: StopIdentifierResolver,
    routes: RouteIdentifierNormalizer,
    trip_ids: IdCleanup,
    service_ids: IdCleanup,
    verify_route_id_uniqueness: bool,
}

impl AgencyConfig {
    pub fn from_data(data: &AgencyConfigData) -> Result<Self, ConfigError> {
        let table = BandAllocationTable::new(
            data.stop_id_bands.clone(),
            data.stop_id_special_cases
                .iter()
                .map(|(k, &v)| (k.as_str(), v)),
        )?;

        let routes = RouteIdentifierNormalizer::new(
            data.excluded_route_short_names.iter().cloned().collect(),
            data.legacy_route_prefix_overrides
                .iter()
                .map(|(k, &v)| (k.clone(), v))
                .collect(),
            compile("route ID suffix", &data.route_id_suffix_pattern)?,
        );

        Ok(Self {
            stops: StopIdentifierResolver::new(Arc::new(table)),
            routes,
            trip_ids: cleanup("trip ID cleanup", data.trip_id_cleanup_pattern.as_deref())?,
            service_ids: cleanup(
                "service ID cleanup",
                data.service_id_cleanup_pattern.as_deref(),
            )?,
            verify_route_id_uniqueness: data.verify_route_id_uniqueness,
        })
    }

    pub fn baseline() -> Result<Self, ConfigError> {
        Self::from_data(&AgencyConfigData::baseline())
    }

    pub fn extended() -> Result<Self, ConfigError> {
        Self::from_data(&AgencyConfigData::extended())
    }

    /// Parse and validate a JSON configuration
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let data: AgencyConfigData = serde_json::from_str(json)?;
        Self::from_data(&data)
    }

    pub fn stops(&self) -> &StopIdentifierResolver {
        &self.stops
    }

    pub fn routes(&self) -> &RouteIdentifierNormalizer {
        &self.routes
    }

    pub fn trip_ids(&self) -> &IdCleanup {
        &self.trip_ids
    }

    pub fn service_ids(&self) -> &IdCleanup {
        &self.service_ids
    }

    pub fn verify_route_id_uniqueness(&self) -> bool {
        self.verify_route_id_uniqueness
    }
}
