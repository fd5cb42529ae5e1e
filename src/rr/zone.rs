use hickory_proto::rr::{DNSClass, RecordType, rdata::SOA};
use tracing::warn;

use super::{Name, Record, SerialNumber, TimeToLive};

/// A zone as read from a zone file.
///
/// The SOA record is held apart from the remaining records, so that
/// filtering the record list can never drop it by accident.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    origin: Name,
    dns_class: DNSClass,
    soa: Option<Record>,
    records: Vec<Record>,
}

impl Zone {
    /// Create a new empty zone without a SOA record.
    pub fn new(origin: Name) -> Self {
        Self {
            origin,
            dns_class: DNSClass::IN,
            soa: None,
            records: Vec::new(),
        }
    }

    /// Build a zone from an ordered sequence of records.
    ///
    /// The first SOA record becomes the zone SOA. Additional SOA records
    /// are dropped.
    pub fn from_records(origin: Name, records: impl IntoIterator<Item = Record>) -> Self {
        let mut zone = Zone::new(origin);
        for record in records {
            zone.push(record);
        }
        zone
    }

    /// Append a record, routing a SOA into its designated slot.
    pub fn push(&mut self, record: Record) {
        if record.record_type() != RecordType::SOA {
            self.records.push(record);
            return;
        }

        if self.soa.is_some() {
            warn!("dropping additional SOA record at {}", record.name());
            return;
        }

        self.dns_class = record.dns_class();
        self.soa = Some(record);
    }
}

impl Zone {
    /// The origin of this zone.
    pub fn origin(&self) -> &Name {
        &self.origin
    }

    pub fn set_origin(&mut self, origin: Name) -> &mut Self {
        self.origin = origin;
        self
    }

    /// The DNS class of this zone, taken from the SOA when present.
    pub fn dns_class(&self) -> DNSClass {
        self.dns_class
    }

    pub fn soa(&self) -> Option<&Record> {
        self.soa.as_ref()
    }

    pub fn soa_mut(&mut self) -> Option<&mut Record> {
        self.soa.as_mut()
    }

    /// Records other than the SOA, in zone order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut Vec<Record> {
        &mut self.records
    }

    pub fn set_records(&mut self, records: Vec<Record>) -> &mut Self {
        self.records = records;
        self
    }

    /// Take the record list, leaving the zone with only its SOA.
    pub fn take_records(&mut self) -> Vec<Record> {
        std::mem::take(&mut self.records)
    }

    /// Number of records, including the SOA.
    pub fn len(&self) -> usize {
        self.records.len() + usize::from(self.soa.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The serial number of this zone, from the SOA record.
    pub fn serial(&self) -> Option<SerialNumber> {
        self.soa
            .as_ref()
            .and_then(|soa| soa.rdata().as_soa())
            .map(|soa| SerialNumber::from(soa.serial()))
    }

    /// Replace the serial number of the SOA record.
    ///
    /// Returns the previous serial, or `None` if the zone has no SOA.
    pub fn set_serial(&mut self, serial: SerialNumber) -> Option<SerialNumber> {
        let soa = self.soa.as_mut()?.rdata_mut().as_soa_mut()?;
        let previous = SerialNumber::from(soa.serial());

        *soa = SOA::new(
            soa.mname().clone(),
            soa.rname().clone(),
            serial.get(),
            soa.refresh(),
            soa.retry(),
            soa.expire(),
            soa.minimum(),
        );

        Some(previous)
    }
}
