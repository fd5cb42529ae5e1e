//! The read-zone processing pipeline.
//!
//! A zone passes through a fixed sequence of stages:
//!
//! 1. the record list is filtered by DNSSEC relevance,
//! 2. the SOA and all records are canonicalized,
//! 3. the record list is sorted in canonical order,
//! 4. the SOA serial is rewritten.
//!
//! Each stage is optional. The SOA itself is never filtered or sorted.

use std::io;

use chrono::{DateTime, Local};
use serde::Deserialize;
use tracing::{debug, info};

use crate::canonical;
use crate::classify::RecordFilter;
use crate::error::ConfigurationConflict;
use crate::format::{OutputFormat, print_record, print_record_list};
use crate::rr::Zone;
use crate::serial::SerialPolicy;

/// Options for reading, transforming and printing a zone.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReadZoneOptions {
    strip: bool,
    only_dnssec: bool,
    canonicalize: bool,
    sort: bool,
    print_soa: bool,
    serial: Option<SerialPolicy>,
    format: OutputFormat,
}

impl Default for ReadZoneOptions {
    fn default() -> Self {
        Self {
            strip: false,
            only_dnssec: false,
            canonicalize: false,
            sort: false,
            print_soa: true,
            serial: None,
            format: OutputFormat::default(),
        }
    }
}

impl ReadZoneOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop DNSSEC metadata records.
    pub fn set_strip(&mut self, strip: bool) -> &mut Self {
        self.strip = strip;
        self
    }

    /// Keep only DNSSEC metadata records.
    pub fn set_only_dnssec(&mut self, only_dnssec: bool) -> &mut Self {
        self.only_dnssec = only_dnssec;
        self
    }

    pub fn set_canonicalize(&mut self, canonicalize: bool) -> &mut Self {
        self.canonicalize = canonicalize;
        self
    }

    /// Sort records in canonical order. Sorting implies canonicalization.
    pub fn set_sort(&mut self, sort: bool) -> &mut Self {
        self.sort = sort;
        self
    }

    pub fn set_print_soa(&mut self, print_soa: bool) -> &mut Self {
        self.print_soa = print_soa;
        self
    }

    /// Rewrite the SOA serial. A serial policy implies stripping, since
    /// existing signatures no longer match the new SOA.
    pub fn set_serial_policy(&mut self, policy: SerialPolicy) -> &mut Self {
        self.serial = Some(policy);
        self.strip = true;
        self
    }

    pub fn set_format(&mut self, format: OutputFormat) -> &mut Self {
        self.format = format;
        self
    }

    pub fn format(&self) -> &OutputFormat {
        &self.format
    }

    pub fn format_mut(&mut self) -> &mut OutputFormat {
        &mut self.format
    }

    pub fn serial_policy(&self) -> Option<SerialPolicy> {
        self.serial
    }

    pub fn print_soa(&self) -> bool {
        self.print_soa
    }

    /// Whether records are canonicalized, either directly or for sorting.
    pub fn canonicalizes(&self) -> bool {
        self.canonicalize || self.sort
    }

    pub fn sorts(&self) -> bool {
        self.sort
    }

    /// The effective record filter.
    pub fn filter(&self) -> RecordFilter {
        RecordFilter::new(self.strip || self.serial.is_some(), self.only_dnssec)
    }

    /// Reported when the effective filter can pass no record at all.
    pub fn conflict(&self) -> Option<ConfigurationConflict> {
        self.filter().conflict()
    }

    /// Run every enabled stage using the local clock.
    pub fn process(&self, zone: Zone) -> Zone {
        self.process_at(zone, Local::now())
    }

    /// Run every enabled stage as if the current time were `now`.
    pub fn process_at(&self, mut zone: Zone, now: DateTime<Local>) -> Zone {
        let filter = self.filter();
        if !filter.is_passthrough() {
            let records = zone.take_records();
            zone.set_records(filter.apply(records));
        }

        if self.sort {
            canonical::sort_zone(&mut zone);
        } else if self.canonicalize {
            canonical::canonicalize_zone(&mut zone);
        }

        if let Some(policy) = self.serial.filter(|_| self.print_soa) {
            rewrite_serial(&mut zone, policy, now);
        }

        zone
    }

    /// Print the SOA, unless disabled, followed by the record list.
    pub fn write_zone<W: io::Write>(&self, writer: &mut W, zone: &Zone) -> io::Result<()> {
        if self.print_soa {
            if let Some(soa) = zone.soa() {
                print_record(writer, soa, &self.format)?;
            }
        }
        print_record_list(writer, zone.records(), &self.format)
    }
}

fn rewrite_serial(zone: &mut Zone, policy: SerialPolicy, now: DateTime<Local>) {
    let Some(old) = zone.serial() else {
        debug!("zone {} has no SOA, serial left alone", zone.origin());
        return;
    };

    let new = policy.next_serial_at(old, now);
    zone.set_serial(new);
    info!("serial of {} changed from {old} to {new}", zone.origin());
}
