//! Raw feed records, resolution outcomes and errors.

use std::fmt;

use crate::identifiers::*;

// ============================================================================
// Raw Records
// ============================================================================

/// A stop as read from the feed, before any ID derivation.
///
/// An empty `stop_code` means the feed carried none.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct RawStopRecord {
    pub stop_id: String,
    pub stop_code: String,
}

impl RawStopRecord {
    pub fn new(stop_id: impl Into<String>, stop_code: impl Into<String>) -> Self {
        Self {
            stop_id: stop_id.into(),
            stop_code: stop_code.into(),
        }
    }

    /// The stop code, if it is an authoritative numeric code.
    pub fn numeric_code(&self) -> Option<&str> {
        let code = self.stop_code.as_str();
        (!code.is_empty() && code.bytes().all(|b| b.is_ascii_digit())).then_some(code)
    }
}

impl fmt::Display for RawStopRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stop_id={:?} stop_code={:?}", self.stop_id, self.stop_code)
    }
}

/// A route as read from the feed.
///
/// `legacy_id_prefix` holds the leading alphabetic characters of the raw
/// route ID; [`RawRouteRecord::new`] derives it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct RawRouteRecord {
    pub short_name: String,
    pub legacy_id_prefix: String,
    pub raw_route_id: String,
}

impl RawRouteRecord {
    pub fn new(short_name: impl Into<String>, raw_route_id: impl Into<String>) -> Self {
        let raw_route_id = raw_route_id.into();
        let legacy_id_prefix = leading_letters(&raw_route_id).to_owned();
        Self {
            short_name: short_name.into(),
            legacy_id_prefix,
            raw_route_id,
        }
    }
}

impl fmt::Display for RawRouteRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "route_id={:?} short_name={:?}",
            self.raw_route_id, self.short_name
        )
    }
}

fn leading_letters(s: &str) -> &str {
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_alphabetic())
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    &s[..end]
}

/// Whether a route makes it into the schedule database, and under which ID
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RouteDecision {
    Excluded,
    Included(NormalizedRouteId),
}

impl RouteDecision {
    pub fn is_included(&self) -> bool {
        matches!(self, Self::Included(_))
    }

    pub fn id(&self) -> Option<&NormalizedRouteId> {
        match self {
            Self::Excluded => None,
            Self::Included(id) => Some(id),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Fatal failure to derive a stop ID. Each variant carries the whole record
/// so the band table can be extended.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("Stop has no digits to derive an ID from: {0}")]
    MissingDigits(RawStopRecord),

    #[error("Stop ID prefix is not registered in the band table: {0}")]
    UnknownPrefix(RawStopRecord),

    #[error("Stop number does not fit in a stop ID: {0}")]
    NumericOverflow(RawStopRecord),
}

impl ResolveError {
    pub fn record(&self) -> &RawStopRecord {
        match self {
            Self::MissingDigits(r) | Self::UnknownPrefix(r) | Self::NumericOverflow(r) => r,
        }
    }
}

/// Rejected configuration, detected once at construction time.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Band prefix must not be empty (offset {0})")]
    EmptyPrefix(u32),

    #[error("Band prefix {0:?} is registered more than once")]
    AmbiguousPrefix(String),

    #[error("Offset {offset} is used by both {first:?} and {second:?}")]
    DuplicateOffset {
        offset: u32,
        first: String,
        second: String,
    },

    #[error("Offset {offset} of prefix {prefix:?} is not a multiple of {band_width}")]
    UnalignedOffset {
        prefix: String,
        offset: u32,
        band_width: u32,
    },

    #[error("Band of prefix {prefix:?} at offset {offset} overflows the stop ID range")]
    OffsetOutOfRange { prefix: String, offset: u32 },

    #[error("Special case {raw:?} -> {value} falls inside the band of prefix {prefix:?}")]
    SpecialCaseInBand {
        raw: String,
        value: u32,
        prefix: String,
    },

    #[error("Special cases {first:?} and {second:?} are the same ignoring case")]
    DuplicateSpecialCase { first: String, second: String },

    #[error("Invalid {field} pattern {pattern:?}")]
    InvalidPattern {
        field: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[cfg(feature = "serde")]
    #[error("Could not parse configuration")]
    Parse(#[from] serde_json::Error),
}

/// Failure of a whole conversion run. Nothing is emitted when one occurs.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error(transparent)]
    Stop(#[from] ResolveError),

    #[error("Stop ID {id} derived for both {first} and {second}")]
    StopIdCollision {
        id: StopId,
        first: RawStopRecord,
        second: RawStopRecord,
    },

    #[error("Route ID {id} derived for both {first} and {second}")]
    RouteIdCollision {
        id: NormalizedRouteId,
        first: RawRouteRecord,
        second: RawRouteRecord,
    },
}

pub type Result<T> = std::result::Result<T, ConversionError>;
