//! Interface of the feed reader.
//!
//! Anything that can hand out the raw text fields of a stop or a route can be
//! fed to the resolvers. The raw records implement these directly; the GTFS
//! objects implement them behind the `compiler` feature.

use crate::models::types::*;

/// A stop as seen by the feed reader
pub trait StopSource {
    fn stop_id(&self) -> &str;

    /// Externally assigned code, empty when absent
    fn stop_code(&self) -> &str;

    fn to_raw(&self) -> RawStopRecord {
        RawStopRecord::new(self.stop_id(), self.stop_code())
    }
}

/// A route as seen by the feed reader
pub trait RouteSource {
    fn route_id(&self) -> &str;
    fn short_name(&self) -> &str;

    fn to_raw(&self) -> RawRouteRecord {
        RawRouteRecord::new(self.short_name(), self.route_id())
    }
}

impl StopSource for RawStopRecord {
    fn stop_id(&self) -> &str {
        &self.stop_id
    }

    fn stop_code(&self) -> &str {
        &self.stop_code
    }

    fn to_raw(&self) -> RawStopRecord {
        self.clone()
    }
}

impl RouteSource for RawRouteRecord {
    fn route_id(&self) -> &str {
        &self.raw_route_id
    }

    fn short_name(&self) -> &str {
        &self.short_name
    }

    // Keeps a collaborator-supplied legacy prefix instead of re-deriving it.
    fn to_raw(&self) -> RawRouteRecord {
        self.clone()
    }
}

#[cfg(feature = "compiler")]
impl StopSource for gtfs_structures::Stop {
    fn stop_id(&self) -> &str {
        &self.id
    }

    fn stop_code(&self) -> &str {
        self.code.as_deref().unwrap_or_default()
    }
}

#[cfg(feature = "compiler")]
impl RouteSource for gtfs_structures::Route {
    fn route_id(&self) -> &str {
        &self.id
    }

    fn short_name(&self) -> &str {
        self.short_name.as_deref().unwrap_or_default()
    }
}
