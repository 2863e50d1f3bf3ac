use std::sync::Arc;

use transit_ids::prelude::*;

fn config() -> AgencyConfig {
    AgencyConfig::extended().unwrap()
}

#[test]
fn stop_code_wins_over_any_stop_id() {
    let config = config();
    for stop_id in ["WA045", "XY100", "SNO CAFÉ", "", "no digits"] {
        let stop = RawStopRecord::new(stop_id, "1234");
        assert_eq!(config.stops().resolve(&stop).unwrap(), StopId(1234), "{}", stop_id);
    }
}

#[test]
fn banded_stop() {
    let stop = RawStopRecord::new("WA045", "");
    assert_eq!(config().stops().resolve(&stop).unwrap(), StopId(500_045));
}

#[test]
fn special_case_stop() {
    let config = config();
    for (stop_id, expected) in [
        ("STOP - 8", 9_900_004),
        ("SNO CAFÉ", 9_900_001),
        ("sno café", 9_900_001),
    ] {
        let stop = RawStopRecord::new(stop_id, "");
        assert_eq!(config.stops().resolve(&stop).unwrap(), StopId(expected));
    }
}

#[test]
fn unknown_prefix_is_fatal() {
    let stop = RawStopRecord::new("XY100", "");
    let err = config().stops().resolve(&stop).unwrap_err();
    assert_eq!(err, ResolveError::UnknownPrefix(stop));
    assert!(err.to_string().contains("XY100"));
}

#[test]
fn no_digits_is_fatal() {
    let stop = RawStopRecord::new("WAXX", "N/A");
    let err = config().stops().resolve(&stop).unwrap_err();
    assert_eq!(err, ResolveError::MissingDigits(stop));
}

#[test]
fn every_band_resolves_inside_itself() {
    let config = config();
    let table = config.stops().table();
    for band in table.bands() {
        let stop = RawStopRecord::new(format!("{}99999", band.prefix), "");
        let id = config.stops().resolve(&stop).unwrap();
        assert_eq!(id, StopId(band.offset + 99_999));
        assert_eq!(table.band_of_value(id.get()), Some(band));
    }
}

#[test]
fn rail_lines_are_excluded() {
    for config in [AgencyConfig::baseline().unwrap(), AgencyConfig::extended().unwrap()] {
        for short_name in ["1", "2"] {
            let route = RawRouteRecord::new(short_name, "SNO-100-5-2");
            assert_eq!(config.routes().normalize(&route), RouteDecision::Excluded);
        }
    }
}

#[test]
fn legacy_prefix_ignores_suffix() {
    let config = config();
    for raw in ["SNO", "SNO-1", "SNO-99-3", "SNO7"] {
        let route = RawRouteRecord::new("", raw);
        assert_eq!(
            config.routes().normalize(&route),
            RouteDecision::Included(NormalizedRouteId::Numeric(506)),
            "{}",
            raw
        );
    }
}

#[test]
fn whole_feed_conversion() {
    let converter = FeedConverter::new(Arc::new(config()));
    let records = FeedRecords {
        stops: vec![
            RawStopRecord::new("AA010", "3000"),
            RawStopRecord::new("WA045", ""),
            RawStopRecord::new("STOP - 8", ""),
        ],
        routes: vec![
            RawRouteRecord::new("1", "1-345"),
            RawRouteRecord::new("100", "100-5-2"),
            RawRouteRecord::new("SNO", "SNO-12"),
        ],
        trip_ids: vec!["SEPT25-99".to_string()],
        service_ids: vec![],
    };

    let converted = converter.convert(&records).unwrap();
    assert_eq!(converted.stops["WA045"], StopId(500_045));
    assert_eq!(converted.routes["100-5-2"].to_string(), "100");
    assert_eq!(converted.routes["SNO-12"], NormalizedRouteId::Numeric(506));
    assert!(converted.excluded_routes.contains("1-345"));
    assert!(!converted.routes.contains_key("1-345"));
    assert_eq!(converted.trip_ids["SEPT25-99"], "99");
}

#[test]
fn resolvers_work_across_threads() {
    let config = Arc::new(config());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let config = Arc::clone(&config);
            std::thread::spawn(move || {
                let stop = RawStopRecord::new(format!("WA{:03}", i), "");
                config.stops().resolve(&stop).unwrap()
            })
        })
        .collect();

    let ids: Vec<StopId> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(ids, vec![StopId(500_000), StopId(500_001), StopId(500_002), StopId(500_003)]);
}
