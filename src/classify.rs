//! Classification of records by DNSSEC relevance.
//!
//! Records carrying DNSSEC metadata (signatures and denial-of-existence
//! chains) become invalid as soon as the zone content changes. The filter
//! here removes them, or keeps only them, without ever touching the SOA.

use hickory_proto::rr::RecordType;
use tracing::{debug, warn};

use crate::error::ConfigurationConflict;
use crate::rr::Record;

/// DNSSEC relevance of a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordClass {
    /// RRSIG, NSEC, NSEC3 or NSEC3PARAM.
    Dnssec,
    /// Everything else, including types this crate does not know.
    Other,
}

impl RecordClass {
    pub fn of_type(record_type: RecordType) -> Self {
        match record_type {
            RecordType::RRSIG | RecordType::NSEC | RecordType::NSEC3 | RecordType::NSEC3PARAM => {
                RecordClass::Dnssec
            }
            _ => RecordClass::Other,
        }
    }

    pub fn is_dnssec(&self) -> bool {
        matches!(self, RecordClass::Dnssec)
    }
}

/// Classify a record by its type.
pub fn classify(record: &Record) -> RecordClass {
    RecordClass::of_type(record.record_type())
}

/// Combination of the strip and only-dnssec modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordFilter {
    strip: bool,
    only_dnssec: bool,
}

impl RecordFilter {
    pub fn new(strip: bool, only_dnssec: bool) -> Self {
        Self { strip, only_dnssec }
    }

    /// Keep only records which are not DNSSEC metadata.
    pub fn strip() -> Self {
        Self::new(true, false)
    }

    /// Keep only DNSSEC metadata records.
    pub fn only_dnssec() -> Self {
        Self::new(false, true)
    }

    pub fn is_strip(&self) -> bool {
        self.strip
    }

    pub fn is_only_dnssec(&self) -> bool {
        self.only_dnssec
    }

    /// True if neither mode is set and every record passes.
    pub fn is_passthrough(&self) -> bool {
        !self.strip && !self.only_dnssec
    }

    /// Both modes requested: nothing can pass.
    pub fn conflict(&self) -> Option<ConfigurationConflict> {
        (self.strip && self.only_dnssec).then_some(ConfigurationConflict)
    }

    /// Whether a record of the given class survives the filter.
    pub fn admits(&self, class: RecordClass) -> bool {
        let dnssec = class.is_dnssec();
        !(self.strip && dnssec) && !(self.only_dnssec && !dnssec)
    }

    /// Filter a record list, preserving the relative order of survivors.
    pub fn apply(&self, records: Vec<Record>) -> Vec<Record> {
        if self.is_passthrough() {
            return records;
        }

        if let Some(conflict) = self.conflict() {
            warn!("{conflict}");
        }

        let before = records.len();
        let kept: Vec<Record> = records
            .into_iter()
            .filter(|record| self.admits(classify(record)))
            .collect();

        debug!(
            strip = self.strip,
            only_dnssec = self.only_dnssec,
            "filtered {} of {} records",
            before - kept.len(),
            before
        );
        kept
    }
}
