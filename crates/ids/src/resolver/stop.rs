//! Numeric stop ID derivation.
//!
//! Three paths, tried in order:
//!
//! 1. an all-digit stop code is authoritative and used as is;
//! 2. a special-case stop ID maps to its configured constant;
//! 3. otherwise the stop ID's prefix band offset is added to the first number
//!    embedded in the stop ID.
//!
//! Anything else is a hard error. There is no fallback ID, so a stop from a
//! prefix nobody registered can never collide silently with another one.

use std::sync::Arc;

use crate::bands::BandAllocationTable;
use crate::identifiers::StopId;
use crate::models::traits::StopSource;
use crate::models::types::{RawStopRecord, ResolveError};

/// Stateless resolver over a shared band table
#[derive(Clone, Debug)]
pub struct StopIdentifierResolver {
    table: Arc<BandAllocationTable>,
}

impl StopIdentifierResolver {
    pub fn new(table: Arc<BandAllocationTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &BandAllocationTable {
        &self.table
    }

    pub fn resolve(&self, record: &RawStopRecord) -> Result<StopId, ResolveError> {
        if let Some(code) = record.numeric_code() {
            return code
                .parse::<u32>()
                .map(StopId)
                .map_err(|_| ResolveError::NumericOverflow(record.clone()));
        }

        if let Some(value) = self.table.special_case(&record.stop_id) {
            return Ok(StopId(value));
        }

        let digits = first_digit_run(&record.stop_id)
            .ok_or_else(|| ResolveError::MissingDigits(record.clone()))?;
        let band = self
            .table
            .band_for(&record.stop_id)
            .ok_or_else(|| ResolveError::UnknownPrefix(record.clone()))?;

        digits
            .parse::<u32>()
            .ok()
            .and_then(|n| band.offset.checked_add(n))
            .map(StopId)
            .ok_or_else(|| ResolveError::NumericOverflow(record.clone()))
    }

    /// Resolve anything the feed reader hands out
    pub fn resolve_source<S: StopSource + ?Sized>(&self, stop: &S) -> Result<StopId, ResolveError> {
        self.resolve(&stop.to_raw())
    }
}

/// Leftmost maximal run of ASCII digits
fn first_digit_run(s: &str) -> Option<&str> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let rest = &s[start..];
    let len = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..len])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bands::PrefixBand;

    fn resolver() -> StopIdentifierResolver {
        let table = BandAllocationTable::new(
            vec![
                PrefixBand::new("AA", 100_000),
                PrefixBand::new("CK", 200_000),
                PrefixBand::new("CKL", 300_000),
                PrefixBand::new("WA", 500_000),
            ],
            vec![("SNO CAFÉ", 9_900_001), ("STOP - 8", 9_900_004)],
        )
        .unwrap();
        StopIdentifierResolver::new(Arc::new(table))
    }

    fn stop(stop_id: &str, stop_code: &str) -> RawStopRecord {
        RawStopRecord::new(stop_id, stop_code)
    }

    #[test]
    fn test_first_digit_run() {
        assert_eq!(first_digit_run("WA045"), Some("045"));
        assert_eq!(first_digit_run("CK12X34"), Some("12"));
        assert_eq!(first_digit_run("STOP - 8"), Some("8"));
        assert_eq!(first_digit_run("SNO CAFÉ"), None);
        assert_eq!(first_digit_run(""), None);
    }

    #[test]
    fn test_stop_code_is_authoritative() {
        let r = resolver();
        assert_eq!(r.resolve(&stop("WA045", "1234")).unwrap(), StopId(1234));
        assert_eq!(r.resolve(&stop("XY100", "1234")).unwrap(), StopId(1234));
        assert_eq!(r.resolve(&stop("", "0042")).unwrap(), StopId(42));
        assert_eq!(r.resolve(&stop("SNO CAFÉ", "7")).unwrap(), StopId(7));
    }

    #[test]
    fn test_non_numeric_code_is_ignored() {
        let r = resolver();
        assert_eq!(r.resolve(&stop("WA045", "A12")).unwrap(), StopId(500_045));
    }

    #[test]
    fn test_special_cases() {
        let r = resolver();
        assert_eq!(r.resolve(&stop("SNO CAFÉ", "")).unwrap(), StopId(9_900_001));
        assert_eq!(r.resolve(&stop("sno café", "")).unwrap(), StopId(9_900_001));
        assert_eq!(r.resolve(&stop("STOP - 8", "")).unwrap(), StopId(9_900_004));
    }

    #[test]
    fn test_banded() {
        let r = resolver();
        assert_eq!(r.resolve(&stop("WA045", "")).unwrap(), StopId(500_045));
        assert_eq!(r.resolve(&stop("AA0", "")).unwrap(), StopId(100_000));
        assert_eq!(r.resolve(&stop("AA99999", "")).unwrap(), StopId(199_999));
        // Only the first run counts
        assert_eq!(r.resolve(&stop("CK12X34", "")).unwrap(), StopId(200_012));
    }

    #[test]
    fn test_longer_prefix_is_not_shadowed() {
        let r = resolver();
        assert_eq!(r.resolve(&stop("CKL015", "")).unwrap(), StopId(300_015));
        assert_eq!(r.resolve(&stop("CK015", "")).unwrap(), StopId(200_015));
    }

    #[test]
    fn test_missing_digits() {
        let r = resolver();
        let err = r.resolve(&stop("WAXX", "")).unwrap_err();
        assert_eq!(err, ResolveError::MissingDigits(stop("WAXX", "")));

        let err = r.resolve(&stop("KIOSK", "N/A")).unwrap_err();
        assert_eq!(err, ResolveError::MissingDigits(stop("KIOSK", "N/A")));
    }

    #[test]
    fn test_unknown_prefix() {
        let r = resolver();
        let err = r.resolve(&stop("XY100", "")).unwrap_err();
        assert_eq!(err, ResolveError::UnknownPrefix(stop("XY100", "")));

        // Digits first means no prefix at all
        let err = r.resolve(&stop("100WA", "")).unwrap_err();
        assert!(matches!(err, ResolveError::UnknownPrefix(_)));
    }

    #[test]
    fn test_numeric_overflow() {
        let r = resolver();
        let err = r.resolve(&stop("", "99999999999")).unwrap_err();
        assert!(matches!(err, ResolveError::NumericOverflow(_)));

        let err = r.resolve(&stop("WA4294967295", "")).unwrap_err();
        assert!(matches!(err, ResolveError::NumericOverflow(_)));
    }

    #[test]
    fn test_resolve_source() {
        let r = resolver();
        let record = stop("WA045", "");
        assert_eq!(r.resolve_source(&record).unwrap(), StopId(500_045));
    }

    #[test]
    fn test_resolver_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StopIdentifierResolver>();
    }
}
