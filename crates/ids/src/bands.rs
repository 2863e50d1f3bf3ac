//! Prefix bands for stop ID derivation.
//!
//! Every registered stop ID prefix owns a block of [`BAND_WIDTH`] numeric IDs
//! starting at its offset. A stop `WA045` with `WA` at offset 500 000 becomes
//! 500 045. A handful of stop IDs that cannot be banded (no digits, stray
//! punctuation, one-off kiosks) are wired to constants instead.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use crate::models::types::ConfigError;

/// Size of the ID block reserved for one prefix.
///
/// Embedded stop numbers must stay below this for bands not to overlap.
pub const BAND_WIDTH: u32 = 100_000;

/// One prefix and the start of its ID block
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrefixBand {
    pub prefix: String,
    pub offset: u32,
}

impl PrefixBand {
    pub fn new(prefix: impl Into<String>, offset: u32) -> Self {
        Self {
            prefix: prefix.into(),
            offset,
        }
    }

    /// Whether `value` falls inside this band's ID block
    pub fn contains(&self, value: u32) -> bool {
        value >= self.offset && value - self.offset < BAND_WIDTH
    }
}

/// Immutable registry of prefix bands and special-case stop IDs.
///
/// Bands are kept longest prefix first, so a prefix is never shadowed by a
/// shorter one it starts with (`CKL` is tried before `CK`). Prefixes of equal
/// length keep their registration order; at most one of them can match.
#[derive(Clone, Debug)]
pub struct BandAllocationTable {
    bands: Vec<PrefixBand>,
    // Keys are lowercased.
    special_cases: HashMap<String, u32>,
}

impl BandAllocationTable {
    /// Validate and build the table.
    ///
    /// Rejects empty, duplicated or misaligned prefixes, shared offsets,
    /// bands running past `u32::MAX`, special cases that collide once case is
    /// ignored and special-case values that land inside a band.
    pub fn new<S>(
        bands: Vec<PrefixBand>,
        special_cases: impl IntoIterator<Item = (S, u32)>,
    ) -> Result<Self, ConfigError>
    where
        S: AsRef<str>,
    {
        Self::check_bands(&bands)?;

        let mut folded: HashMap<String, u32> = HashMap::new();
        let mut originals: HashMap<String, String> = HashMap::new();
        for (raw, value) in special_cases {
            let raw = raw.as_ref();
            if let Some(band) = bands.iter().find(|b| b.contains(value)) {
                return Err(ConfigError::SpecialCaseInBand {
                    raw: raw.to_owned(),
                    value,
                    prefix: band.prefix.clone(),
                });
            }
            let key = raw.to_lowercase();
            if let Some(first) = originals.get(&key) {
                return Err(ConfigError::DuplicateSpecialCase {
                    first: first.clone(),
                    second: raw.to_owned(),
                });
            }
            originals.insert(key.clone(), raw.to_owned());
            folded.insert(key, value);
        }

        let mut bands = bands;
        bands.sort_by_key(|b| Reverse(b.prefix.chars().count()));

        Ok(Self {
            bands,
            special_cases: folded,
        })
    }

    fn check_bands(bands: &[PrefixBand]) -> Result<(), ConfigError> {
        let mut prefixes: HashSet<&str> = HashSet::new();
        let mut offsets: HashMap<u32, &str> = HashMap::new();

        for band in bands {
            if band.prefix.is_empty() {
                return Err(ConfigError::EmptyPrefix(band.offset));
            }
            if band.offset % BAND_WIDTH != 0 {
                return Err(ConfigError::UnalignedOffset {
                    prefix: band.prefix.clone(),
                    offset: band.offset,
                    band_width: BAND_WIDTH,
                });
            }
            if band.offset.checked_add(BAND_WIDTH - 1).is_none() {
                return Err(ConfigError::OffsetOutOfRange {
                    prefix: band.prefix.clone(),
                    offset: band.offset,
                });
            }
            if !prefixes.insert(&band.prefix) {
                return Err(ConfigError::AmbiguousPrefix(band.prefix.clone()));
            }
            if let Some(first) = offsets.insert(band.offset, &band.prefix) {
                return Err(ConfigError::DuplicateOffset {
                    offset: band.offset,
                    first: first.to_owned(),
                    second: band.prefix.clone(),
                });
            }
        }
        Ok(())
    }

    /// The band whose prefix `stop_id` starts with, longest prefix first
    pub fn band_for(&self, stop_id: &str) -> Option<&PrefixBand> {
        self.bands.iter().find(|b| stop_id.starts_with(b.prefix.as_str()))
    }

    /// Constant wired to `stop_id`, compared ignoring case
    pub fn special_case(&self, stop_id: &str) -> Option<u32> {
        self.special_cases.get(&stop_id.to_lowercase()).copied()
    }

    /// The band owning a derived ID, if any
    pub fn band_of_value(&self, value: u32) -> Option<&PrefixBand> {
        self.bands.iter().find(|b| b.contains(value))
    }

    /// Bands in matching order
    pub fn bands(&self) -> &[PrefixBand] {
        &self.bands
    }

    pub fn special_case_count(&self) -> usize {
        self.special_cases.len()
    }

    /// Pairs `(shorter, longer)` where the longer prefix starts with the
    /// shorter one. Matching order resolves these, but each one is worth
    /// knowing about when a new prefix is registered.
    pub fn nested_prefixes(&self) -> Vec<(&PrefixBand, &PrefixBand)> {
        let mut nested = Vec::new();
        for longer in &self.bands {
            for shorter in &self.bands {
                if shorter.prefix.len() < longer.prefix.len()
                    && longer.prefix.starts_with(shorter.prefix.as_str())
                {
                    nested.push((shorter, longer));
                }
            }
        }
        nested
    }
}
