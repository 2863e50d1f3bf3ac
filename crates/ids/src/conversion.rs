//! All-or-nothing conversion of a whole feed's identifiers.
//!
//! Every record is resolved on its own; the first failure aborts the run and
//! nothing is returned for the records already converted. A failure means a
//! table is missing an entry, so retrying or skipping the record would only
//! hide the gap.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::config::AgencyConfig;
use crate::identifiers::*;
use crate::models::traits::{RouteSource, StopSource};
use crate::models::types::*;

/// Everything the feed reader hands over for one run
#[derive(Clone, Debug, Default)]
pub struct FeedRecords {
    pub stops: Vec<RawStopRecord>,
    pub routes: Vec<RawRouteRecord>,
    pub trip_ids: Vec<String>,
    pub service_ids: Vec<String>,
}

/// Identifiers for the schedule database, keyed by raw feed ID
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ConvertedFeed {
    pub stops: BTreeMap<String, StopId>,
    pub routes: BTreeMap<String, NormalizedRouteId>,
    pub excluded_routes: BTreeSet<String>,
    pub trip_ids: BTreeMap<String, String>,
    pub service_ids: BTreeMap<String, String>,
}

impl ConvertedFeed {
    /// Normalized route IDs shared by more than one raw route ID
    pub fn merged_routes(&self) -> BTreeMap<&NormalizedRouteId, Vec<&str>> {
        let mut groups: BTreeMap<&NormalizedRouteId, Vec<&str>> = BTreeMap::new();
        for (raw, id) in &self.routes {
            groups.entry(id).or_default().push(raw);
        }
        groups.retain(|_, raws| raws.len() > 1);
        groups
    }
}

#[derive(Clone, Debug)]
pub struct FeedConverter {
    config: Arc<AgencyConfig>,
}

impl FeedConverter {
    pub fn new(config: Arc<AgencyConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AgencyConfig {
        &self.config
    }

    pub fn convert(&self, records: &FeedRecords) -> Result<ConvertedFeed> {
        let stops = self.convert_stops(&records.stops)?;
        let (routes, excluded_routes) = self.convert_routes(&records.routes)?;
        let converted = ConvertedFeed {
            stops,
            routes,
            excluded_routes,
            trip_ids: self.clean_trip_ids(records.trip_ids.iter().map(String::as_str)),
            service_ids: self.clean_service_ids(records.service_ids.iter().map(String::as_str)),
        };

        info!(
            stops = converted.stops.len(),
            routes = converted.routes.len(),
            excluded_routes = converted.excluded_routes.len(),
            merged_routes = converted.merged_routes().len(),
            trips = converted.trip_ids.len(),
            services = converted.service_ids.len(),
            "Converted feed identifiers"
        );
        Ok(converted)
    }

    /// Resolve every stop, rejecting two stops that land on the same ID.
    ///
    /// Stops sharing one numeric stop code are the same stop to the agency
    /// and may share an ID.
    pub fn convert_stops<'a, S, I>(&self, stops: I) -> Result<BTreeMap<String, StopId>>
    where
        S: StopSource + ?Sized + 'a,
        I: IntoIterator<Item = &'a S>,
    {
        let resolver = self.config.stops();
        let mut ids = BTreeMap::new();
        let mut owners: HashMap<StopId, RawStopRecord> = HashMap::new();

        for stop in stops {
            let raw = stop.to_raw();
            let id = resolver.resolve(&raw).map_err(|e| {
                error!(error = %e, "Stop ID resolution failed");
                e
            })?;

            if let Some(first) = owners.get(&id) {
                let shared_code =
                    first.numeric_code().is_some() && first.numeric_code() == raw.numeric_code();
                if first.stop_id != raw.stop_id && !shared_code {
                    error!(%id, first = %first, second = %raw, "Stop ID collision");
                    return Err(ConversionError::StopIdCollision {
                        id,
                        first: first.clone(),
                        second: raw,
                    });
                }
            } else {
                owners.insert(id, raw.clone());
            }
            ids.insert(raw.stop_id, id);
        }

        Ok(ids)
    }

    /// Normalize every route. Returns the included routes and the raw IDs of
    /// the excluded ones.
    pub fn convert_routes<'a, R, I>(
        &self,
        routes: I,
    ) -> Result<(BTreeMap<String, NormalizedRouteId>, BTreeSet<String>)>
    where
        R: RouteSource + ?Sized + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let normalizer = self.config.routes();
        let verify = self.config.verify_route_id_uniqueness();
        let mut ids = BTreeMap::new();
        let mut excluded = BTreeSet::new();
        let mut owners: HashMap<NormalizedRouteId, RawRouteRecord> = HashMap::new();

        for route in routes {
            let raw = route.to_raw();
            let id = match normalizer.normalize(&raw) {
                RouteDecision::Excluded => {
                    debug!(route = %raw, "Excluding route");
                    excluded.insert(raw.raw_route_id);
                    continue;
                }
                RouteDecision::Included(id) => id,
            };

            if verify {
                if let Some(first) = owners.get(&id) {
                    if first.raw_route_id != raw.raw_route_id {
                        error!(%id, first = %first, second = %raw, "Route ID collision");
                        return Err(ConversionError::RouteIdCollision {
                            id,
                            first: first.clone(),
                            second: raw,
                        });
                    }
                } else {
                    owners.insert(id.clone(), raw.clone());
                }
            }
            ids.insert(raw.raw_route_id, id);
        }

        Ok((ids, excluded))
    }

    pub fn clean_trip_ids<'a>(
        &self,
        ids: impl IntoIterator<Item = &'a str>,
    ) -> BTreeMap<String, String> {
        let cleanup = self.config.trip_ids();
        ids.into_iter()
            .map(|id| (id.to_string(), cleanup.clean(id).into_owned()))
            .collect()
    }

    pub fn clean_service_ids<'a>(
        &self,
        ids: impl IntoIterator<Item = &'a str>,
    ) -> BTreeMap<String, String> {
        let cleanup = self.config.service_ids();
        ids.into_iter()
            .map(|id| (id.to_string(), cleanup.clean(id).into_owned()))
            .collect()
    }
}
