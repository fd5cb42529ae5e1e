//! Reading records and zones from master file text.
//!
//! Scanning is done by the in-place zone file scanner of the `domain`
//! crate, which yields entries in file order and understands DNSSEC and
//! RFC 3597 generic record data. Each scanned record is composed into wire
//! format and decoded into a hickory record.

use std::{fs, io::Read, path::Path};

use bytes::Bytes;
use domain::base::{ToName, rdata::ComposeRecordData};
use domain::zonefile::inplace::{self, Entry, ScannedRecord, Zonefile};
use hickory_proto::{
    rr::{DNSClass, RData, RecordType, rdata::NULL},
    serialize::binary::{BinDecodable, BinEncodable},
};
use octseq::builder::infallible;
use tracing::{debug, error, info};

use crate::error::{ParseError, ZoneError};
use crate::rr::{Name, Record, TimeToLive, Zone};

/// Lines placed ahead of the input, see [`scanner`].
const PRELUDE_LINES: usize = 1;

/// A scanner over `data`.
///
/// A `$TTL` directive with the default TTL is placed ahead of the data for
/// records that carry none. Without an origin, relative names are taken
/// relative to the root.
fn scanner(data: &[u8], origin: Option<&Name>) -> Result<Zonefile, ParseError> {
    let prelude = format!("$TTL {}\n", TimeToLive::DEFAULT);
    debug_assert_eq!(prelude.lines().count(), PRELUDE_LINES);

    let mut zonefile = Zonefile::with_capacity(prelude.len() + data.len() + 1);
    zonefile.extend_from_slice(prelude.as_bytes());
    zonefile.extend_from_slice(data);
    if !data.ends_with(b"\n") {
        zonefile.extend_from_slice(b"\n");
    }

    let origin = origin.cloned().unwrap_or_else(Name::root);
    zonefile.set_origin(scanner_name(&origin)?);
    Ok(zonefile)
}

fn scanner_name(name: &Name) -> Result<domain::base::Name<Bytes>, ParseError> {
    let invalid = |error: &dyn std::fmt::Display| ParseError::new(format!("invalid origin {name}: {error}"), None);
    let wire = name.to_bytes().map_err(|error| invalid(&error))?;
    domain::base::Name::from_octets(Bytes::from(wire)).map_err(|error| invalid(&error))
}

/// Convert a scanner error, moving its line number past the prelude.
///
/// The scanner exposes positions only through its `line:column: message`
/// display form.
fn scan_error(error: inplace::Error) -> ParseError {
    let text = error.to_string();
    let mut parts = text.splitn(3, ':');
    let line = parts.next().and_then(|line| line.trim().parse::<usize>().ok());
    let column = parts.next();

    match (line, column, parts.next()) {
        (Some(line), Some(_), Some(message)) => ParseError::new(
            message.trim(),
            Some(line.saturating_sub(PRELUDE_LINES).max(1)),
        ),
        _ => ParseError::new(text, None),
    }
}

/// Convert a scanned record into a hickory backed [`Record`].
///
/// Record data hickory can not decode is kept as generic data of the same
/// type, so that it still prints in RFC 3597 form.
fn convert(scanned: &ScannedRecord) -> Result<Record, ParseError> {
    let mut owner = Vec::new();
    infallible(scanned.owner().compose(&mut owner));
    let name = hickory_proto::rr::Name::from_bytes(&owner)
        .map(Name::from)
        .map_err(|error| ParseError::new(format!("invalid owner name: {error}"), None))?;

    let mut wire = Vec::new();
    infallible(scanned.data().compose_rdata(&mut wire));

    let record_type = RecordType::from(scanned.rtype().to_int());
    let ttl = TimeToLive::from(scanned.ttl().as_secs());

    let mut record = match Record::from_wire(name.clone(), ttl, record_type, &wire) {
        Ok(record) => record,
        Err(error) => {
            debug!("keeping {record_type} record at {name} as generic data: {error}");
            let rdata = if wire.is_empty() {
                NULL::new()
            } else {
                NULL::with(wire)
            };
            Record::from_rdata(
                name,
                ttl,
                RData::Unknown {
                    code: record_type,
                    rdata,
                },
            )
        }
    };
    record.set_dns_class(DNSClass::from(scanned.class().to_int()));
    Ok(record)
}

/// Parse master file data into records, in file order.
///
/// Duplicate records are kept.
fn parse_records(data: &[u8], origin: Option<&Name>) -> Result<Vec<Record>, ParseError> {
    let mut zonefile = scanner(data, origin)?;
    let mut records = Vec::new();

    while let Some(entry) = zonefile.next_entry().map_err(scan_error)? {
        match entry {
            Entry::Record(scanned) => records.push(convert(&scanned)?),
            Entry::Include { path, .. } => {
                return Err(ParseError::new(
                    format!("$INCLUDE {path} is not supported"),
                    None,
                ));
            }
        }
    }

    Ok(records)
}

/// Parse a single record, e.g. the contents of a `.key` file.
///
/// Directives such as `$ORIGIN` and `$TTL` are honoured. When the text holds
/// several records, the first DNSKEY is preferred.
pub fn parse_record(text: &str, origin: Option<&Name>) -> Result<Record, ParseError> {
    let records = parse_records(text.as_bytes(), origin)?;

    let position = records
        .iter()
        .position(|record| record.record_type() == RecordType::DNSKEY)
        .unwrap_or(0);

    records
        .into_iter()
        .nth(position)
        .ok_or_else(|| ParseError::new("no resource record found", None))
}

/// Parse zone text into a [`Zone`].
///
/// `origin` is used for relative names until a `$ORIGIN` directive
/// changes it. Without it, the zone origin is the owner of the SOA record.
pub fn parse_zone(text: &str, origin: Option<&Name>) -> Result<Zone, ParseError> {
    parse_zone_data(text.as_bytes(), origin)
}

fn parse_zone_data(data: &[u8], origin: Option<&Name>) -> Result<Zone, ParseError> {
    let records = parse_records(data, origin)?;
    let mut zone = Zone::from_records(origin.cloned().unwrap_or_else(Name::root), records);
    if origin.is_none() {
        if let Some(apex) = zone.soa().map(|soa| soa.name().clone()) {
            zone.set_origin(apex);
        }
    }
    debug!("parsed {} records for {}", zone.len(), zone.origin());
    Ok(zone)
}

/// Read and parse a zone file from disk.
pub fn read_zone_file(path: impl AsRef<Path>, origin: Option<Name>) -> Result<Zone, ZoneError> {
    let zone_path = path.as_ref();
    info!("loading zone file: {:?}", zone_path);

    let buf = fs::read(zone_path).map_err(|source| {
        error!("failed to read {}: {:?}", zone_path.display(), source);
        ZoneError::Io {
            path: zone_path.to_path_buf(),
            source,
        }
    })?;

    let zone = parse_zone_data(&buf, origin.as_ref()).inspect_err(|e| {
        error!("failed to parse {}: {}", zone_path.display(), e);
    })?;

    info!(
        "zone file loaded: {} with {} records",
        zone.origin(),
        zone.len()
    );
    Ok(zone)
}

/// Read and parse a zone from any reader, e.g. standard input.
pub fn read_zone(mut reader: impl Read, origin: Option<Name>) -> Result<Zone, ZoneError> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).map_err(ZoneError::Read)?;

    let zone = parse_zone_data(&buf, origin.as_ref())?;
    info!("zone loaded: {} with {} records", zone.origin(), zone.len());
    Ok(zone)
}

/// Read the first record of a file, e.g. a public key file.
pub fn read_record_file(path: impl AsRef<Path>, origin: Option<Name>) -> Result<Record, ZoneError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ZoneError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_record(&text, origin.as_ref())?)
}
