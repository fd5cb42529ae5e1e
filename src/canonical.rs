//! Canonical form and canonical ordering of records.
//!
//! Records are ordered as in [RFC 4034, section 6](https://tools.ietf.org/html/rfc4034#section-6):
//!
//! ```text
//! 6.1.  Canonical DNS Name Order
//!
//!    For the purposes of DNS security, owner names are ordered by treating
//!    individual labels as unsigned left-justified octet strings.  The
//!    absence of a octet sorts before a zero value octet, and uppercase
//!    US-ASCII letters are treated as if they were lowercase US-ASCII
//!    letters.
//!
//!    To compute the canonical ordering of a set of DNS names, start by
//!    sorting the names according to their most significant (rightmost)
//!    labels.  For names in which the most significant label is identical,
//!    continue sorting according to their next most significant label, and
//!    so forth.
//! ```
//!
//! Within one owner name, records sort by numeric type, then class, then
//! the uncompressed wire form of their record data. TTLs are ignored.

use std::cmp::Ordering;

use tracing::{debug, warn};

use crate::rr::{Record, Zone};

/// Sort key of a record in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CanonicalKey {
    owner: Vec<Vec<u8>>,
    record_type: u16,
    dns_class: u16,
    rdata: Vec<u8>,
}

impl CanonicalKey {
    pub fn new(record: &Record) -> Self {
        let rdata = record.rdata_wire().unwrap_or_else(|error| {
            warn!(
                "unable to encode {} record at {}: {error}",
                record.record_type(),
                record.name()
            );
            Vec::new()
        });

        CanonicalKey {
            owner: record.name().canonical_key(),
            record_type: record.record_type().into(),
            dns_class: record.dns_class().into(),
            rdata,
        }
    }
}

/// Put a record in canonical form by lower-casing its owner name.
pub fn canonicalize(record: &mut Record) {
    if !record.name().is_canonical() {
        let name = record.name().to_canonical();
        record.set_name(name);
    }
}

/// Compare two records in canonical order.
pub fn canonical_cmp(a: &Record, b: &Record) -> Ordering {
    CanonicalKey::new(a).cmp(&CanonicalKey::new(b))
}

/// Canonicalize, then stable-sort records in canonical order.
///
/// Records that compare equal keep their relative input order.
pub fn sort(records: &mut [Record]) {
    records.iter_mut().for_each(canonicalize);
    records.sort_by_cached_key(CanonicalKey::new);
}

/// Canonicalize the SOA and every record of a zone.
pub fn canonicalize_zone(zone: &mut Zone) {
    if let Some(soa) = zone.soa_mut() {
        canonicalize(soa);
    }
    zone.records_mut().iter_mut().for_each(canonicalize);
    debug!("canonicalized {} records", zone.len());
}

/// Canonicalize a zone and sort its records.
pub fn sort_zone(zone: &mut Zone) {
    canonicalize_zone(zone);
    zone.records_mut().sort_by_cached_key(CanonicalKey::new);
    debug!("sorted {} records", zone.records().len());
}
