//! Raw records, outcomes, errors and the feed reader traits.

pub mod traits;
pub mod types;

// Re-exports for convenience
pub use traits::{RouteSource, StopSource};
pub use types::{
    ConfigError, ConversionError, RawRouteRecord, RawStopRecord, ResolveError, Result,
    RouteDecision,
};
