//! Reading identifiers out of a parsed GTFS feed.

use std::collections::BTreeSet;

use gtfs_structures::Gtfs;

use crate::conversion::{ConvertedFeed, FeedConverter, FeedRecords};
use crate::models::traits::{RouteSource, StopSource};
use crate::models::types::Result;

/// Collect the raw records of a feed, sorted by ID so runs are reproducible
pub fn feed_records(gtfs: &Gtfs) -> FeedRecords {
    let mut stops: Vec<_> = gtfs.stops.values().map(|s| StopSource::to_raw(s.as_ref())).collect();
    stops.sort_by(|a, b| a.stop_id.cmp(&b.stop_id));

    let mut routes: Vec<_> = gtfs.routes.values().map(RouteSource::to_raw).collect();
    routes.sort_by(|a, b| a.raw_route_id.cmp(&b.raw_route_id));

    let trip_ids: BTreeSet<&String> = gtfs.trips.keys().collect();
    let service_ids: BTreeSet<&String> = gtfs
        .calendar
        .keys()
        .chain(gtfs.calendar_dates.keys())
        .collect();

    FeedRecords {
        stops,
        routes,
        trip_ids: trip_ids.into_iter().cloned().collect(),
        service_ids: service_ids.into_iter().cloned().collect(),
    }
}

impl FeedConverter {
    pub fn convert_gtfs(&self, gtfs: &Gtfs) -> Result<ConvertedFeed> {
        self.convert(&feed_records(gtfs))
    }
}
