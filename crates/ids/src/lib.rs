//! # transit-ids
//!
//! Stable numeric stop IDs and normalized route keys for a schedule database,
//! derived from the raw identifiers of a transit feed.
//!
//! ## Features
//!
//! - **Authoritative stop codes**: an all-digit stop code is the stop ID
//! - **Prefix bands**: every stop ID prefix owns a block of 100 000 IDs
//! - **Special cases**: one-off stop IDs wired to constants
//! - **Route merging**: trailing variant groups stripped from route IDs
//! - **All-or-nothing**: an unknown stop fails the whole run, never falls back
//! - **GTFS input**: read a `gtfs_structures::Gtfs` directly (`compiler` feature)
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use transit_ids::prelude::*;
//!
//! let config = Arc::new(AgencyConfig::extended().unwrap());
//!
//! let stop = RawStopRecord::new("WA045", "");
//! assert_eq!(config.stops().resolve(&stop).unwrap(), StopId(500_045));
//!
//! let route = RawRouteRecord::new("100", "100-5-2");
//! assert_eq!(config.routes().normalize(&route).id().unwrap().to_string(), "100");
//!
//! let converter = FeedConverter::new(config);
//! let records = FeedRecords {
//!     stops: vec![RawStopRecord::new("XY100", "")],
//!     ..Default::default()
//! };
//! assert!(converter.convert(&records).is_err());
//! ```

pub mod bands;
pub mod cleanup;
pub mod config;
pub mod conversion;
#[cfg(feature = "compiler")]
pub mod gtfs;
pub mod identifiers;
pub mod models;
pub mod resolver;

// Re-exports for convenience
pub mod prelude {
    pub use crate::bands::{BandAllocationTable, PrefixBand, BAND_WIDTH};
    pub use crate::cleanup::IdCleanup;
    pub use crate::config::{AgencyConfig, AgencyConfigData};
    pub use crate::conversion::{ConvertedFeed, FeedConverter, FeedRecords};
    pub use crate::identifiers::*;
    pub use crate::models::{traits::*, types::*};
    pub use crate::resolver::{RouteIdentifierNormalizer, StopIdentifierResolver};
}

pub use prelude::*;
