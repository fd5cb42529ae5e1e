use std::fmt;

use hickory_proto::{
    ProtoError,
    rr::{DNSClass, RData, RecordType},
    serialize::binary::{BinDecoder, BinEncodable, BinEncoder, Restrict},
};

use super::{name::Name, ttl::TimeToLive};

/// DNS Resource Record
///
/// The record data is hickory's closed set of typed payloads, so dispatch
/// over record types is plain pattern matching on [`RData`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    name_labels: Name,
    dns_class: DNSClass,
    ttl: TimeToLive,
    rdata: RData,
}

/// [RFC 1033](https://tools.ietf.org/html/rfc1033)
///
/// ```text
///           <name>   [<ttl>]   [<class>]   <type>   <data>
/// ```
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(
            f,
            "{name}\t{ttl}\t{class}\t{ty}\t{rdata}",
            name = self.name_labels,
            ttl = self.ttl,
            class = self.dns_class,
            ty = self.record_type(),
            rdata = self.rdata,
        )
    }
}

impl Record {
    pub fn from_rdata(name: Name, ttl: TimeToLive, rdata: RData) -> Self {
        Record {
            name_labels: name,
            dns_class: DNSClass::IN,
            ttl,
            rdata,
        }
    }

    /// Sets the TTL, in seconds, to the specified value
    pub fn set_ttl(&mut self, ttl: TimeToLive) {
        self.ttl = ttl;
    }

    pub fn set_name(&mut self, name: Name) {
        self.name_labels = name;
    }

    pub fn set_dns_class(&mut self, dns_class: DNSClass) {
        self.dns_class = dns_class;
    }

    /// Build a record from the wire form of its record data.
    pub fn from_wire(
        name: Name,
        ttl: TimeToLive,
        record_type: RecordType,
        wire: &[u8],
    ) -> Result<Self, ProtoError> {
        let length = u16::try_from(wire.len())
            .map_err(|_| ProtoError::from("record data exceeds 65535 octets"))?;
        let mut decoder = BinDecoder::new(wire);
        let rdata = RData::read(&mut decoder, record_type, Restrict::new(length))?;
        Ok(Record::from_rdata(name, ttl, rdata))
    }

    /// Record data in uncompressed wire format.
    ///
    /// Domain names embedded in the data are written without compression
    /// pointers, as required for canonical form and RFC 3597 output.
    pub fn rdata_wire(&self) -> Result<Vec<u8>, ProtoError> {
        let mut bytes = Vec::new();
        {
            let mut encoder = BinEncoder::new(&mut bytes);
            encoder.set_canonical_names(true);
            self.rdata.emit(&mut encoder)?;
        }
        Ok(bytes)
    }
}

impl Record {
    /// Label of the record resource
    pub fn name(&self) -> &Name {
        &self.name_labels
    }

    /// DNS Class of the record resource
    pub fn dns_class(&self) -> DNSClass {
        self.dns_class
    }

    /// Time to Live of the record resource
    pub fn ttl(&self) -> TimeToLive {
        self.ttl
    }

    /// Record Data of the record resource
    pub fn rdata(&self) -> &RData {
        &self.rdata
    }

    pub(crate) fn rdata_mut(&mut self) -> &mut RData {
        &mut self.rdata
    }

    /// Record Type of the record resource
    pub fn record_type(&self) -> RecordType {
        self.rdata.record_type()
    }
}
