//! Presentation format output of records.
//!
//! Records print one per line as `owner ttl class type rdata`, tab
//! separated. [`OutputFormat`] adjusts the output: types can be forced
//! into the generic RFC 3597 form, RRSIG timestamps and signatures can be
//! blanked so that signed zones diff cleanly, and DS and DNSKEY records can
//! carry comments.

use std::{collections::BTreeSet, io};

use chrono::DateTime;
use data_encoding::{BASE64, HEXLOWER};
use hickory_proto::{
    rr::{Name, RData, RecordType},
    serialize::binary::{BinDecodable, BinDecoder},
};
use serde::Deserialize;
use tracing::warn;

use crate::digest::DnsKey;
use crate::rr::Record;

/// Length of the DS fixed fields preceding the digest: key tag, algorithm and digest type.
const DS_HEADER_LEN: usize = 4;

/// Width of a padded SOA serial.
const SOA_SERIAL_WIDTH: usize = 10;

/// Placeholder printed for blanked RRSIG fields.
const NULL_FIELD: &str = "(null)";

/// Length of the RRSIG fixed fields preceding the signer name.
const RRSIG_HEADER_LEN: usize = 18;

/// Presentation form of RRSIG expiration and inception times.
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Boolean output options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormatFlags {
    /// Print RRSIG expiration, inception and signature as `(null)`.
    pub zeroize_rrsig: bool,

    /// Right-align the SOA serial in a ten character field.
    pub pad_soa_serial: bool,

    /// Comment DS records with the bubble babble form of their digest, and
    /// DNSKEY records with their key tag.
    pub bubblebabble: bool,
}

/// Record types to print in the generic RFC 3597 form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeSelection {
    /// No type is marked.
    #[default]
    None,
    /// Only the listed types are marked.
    Only(BTreeSet<u16>),
    /// Every type except the listed ones is marked.
    AllExcept(BTreeSet<u16>),
}

impl TypeSelection {
    /// Mark a type. The first mark starts from an empty selection.
    pub fn mark(&mut self, record_type: RecordType) {
        let code = u16::from(record_type);
        match self {
            TypeSelection::None => *self = TypeSelection::Only(BTreeSet::from([code])),
            TypeSelection::Only(types) => {
                types.insert(code);
            }
            TypeSelection::AllExcept(types) => {
                types.remove(&code);
            }
        }
    }

    /// Unmark a type. Unmarking first starts from a selection of all types.
    pub fn unmark(&mut self, record_type: RecordType) {
        let code = u16::from(record_type);
        match self {
            TypeSelection::None => *self = TypeSelection::AllExcept(BTreeSet::from([code])),
            TypeSelection::Only(types) => {
                types.remove(&code);
            }
            TypeSelection::AllExcept(types) => {
                types.insert(code);
            }
        }
    }

    pub fn is_marked(&self, record_type: RecordType) -> bool {
        let code = u16::from(record_type);
        match self {
            TypeSelection::None => false,
            TypeSelection::Only(types) => types.contains(&code),
            TypeSelection::AllExcept(types) => !types.contains(&code),
        }
    }
}

/// How records are written out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputFormat {
    flags: FormatFlags,
    unknown_types: TypeSelection,
}

impl OutputFormat {
    pub fn new(flags: FormatFlags) -> Self {
        Self {
            flags,
            unknown_types: TypeSelection::None,
        }
    }

    pub fn flags(&self) -> FormatFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: FormatFlags) -> &mut Self {
        self.flags = flags;
        self
    }

    pub fn unknown_types(&self) -> &TypeSelection {
        &self.unknown_types
    }

    /// Print records of this type as if the type were unknown.
    pub fn mark_unknown_type(&mut self, record_type: RecordType) -> &mut Self {
        self.unknown_types.mark(record_type);
        self
    }

    /// Print records of this type in their usual form.
    pub fn unmark_unknown_type(&mut self, record_type: RecordType) -> &mut Self {
        self.unknown_types.unmark(record_type);
        self
    }

    fn prints_generic(&self, record: &Record) -> bool {
        matches!(record.rdata(), RData::Unknown { .. })
            || matches!(record.record_type(), RecordType::Unknown(_))
            || self.unknown_types.is_marked(record.record_type())
    }
}

/// A record in presentation format, without a trailing newline.
pub fn format_record(record: &Record, format: &OutputFormat) -> String {
    let record_type = record.record_type();

    let (type_text, rdata) = if format.prints_generic(record) {
        (
            format!("TYPE{}", u16::from(record_type)),
            generic_rdata(record),
        )
    } else {
        (type_mnemonic(record_type), typed_rdata(record, format.flags))
    };

    let mut line = format!(
        "{}\t{}\t{}\t{}\t{}",
        record.name(),
        record.ttl(),
        record.dns_class(),
        type_text,
        rdata
    );

    if format.flags.bubblebabble {
        if let Some(comment) = comment(record) {
            line.push(' ');
            line.push_str(&comment);
        }
    }

    line
}

/// Write a single record followed by a newline.
pub fn print_record<W: io::Write>(
    writer: &mut W,
    record: &Record,
    format: &OutputFormat,
) -> io::Result<()> {
    writeln!(writer, "{}", format_record(record, format))
}

/// Write every record, in order.
pub fn print_record_list<W: io::Write>(
    writer: &mut W,
    records: &[Record],
    format: &OutputFormat,
) -> io::Result<()> {
    for record in records {
        print_record(writer, record, format)?;
    }
    Ok(())
}

/// RFC 3597 record data: `\# <length> <hex>`.
fn generic_rdata(record: &Record) -> String {
    match record.rdata_wire() {
        Ok(wire) if wire.is_empty() => "\\# 0".to_owned(),
        Ok(wire) => format!("\\# {} {}", wire.len(), HEXLOWER.encode(&wire)),
        Err(error) => {
            warn!(
                "unable to encode {} record at {}: {error}",
                record.record_type(),
                record.name()
            );
            record.rdata().to_string()
        }
    }
}

/// Type mnemonic, or `TYPE<n>` for types without one.
fn type_mnemonic(record_type: RecordType) -> String {
    match record_type {
        RecordType::Unknown(code) => format!("TYPE{code}"),
        known => known.to_string(),
    }
}

fn typed_rdata(record: &Record, flags: FormatFlags) -> String {
    match record.record_type() {
        RecordType::SOA if flags.pad_soa_serial => padded_soa(record),
        RecordType::RRSIG => rrsig_rdata(record, flags.zeroize_rrsig),
        _ => record.rdata().to_string(),
    }
}

fn padded_soa(record: &Record) -> String {
    let Some(soa) = record.rdata().as_soa() else {
        return record.rdata().to_string();
    };

    format!(
        "{} {} {:>width$} {} {} {} {}",
        soa.mname(),
        soa.rname(),
        soa.serial(),
        soa.refresh(),
        soa.retry(),
        soa.expire(),
        soa.minimum(),
        width = SOA_SERIAL_WIDTH
    )
}

/// RRSIG record data, read field by field from the wire form.
///
/// Fields: type covered, algorithm, labels, original TTL, expiration,
/// inception, key tag, signer, signature. With `zeroize` the expiration,
/// inception and signature print as `(null)`.
fn rrsig_rdata(record: &Record, zeroize: bool) -> String {
    match record.rdata_wire() {
        Ok(wire) => match RrsigFields::from_wire(&wire) {
            Some(fields) => fields.present(zeroize),
            None => {
                warn!("malformed RRSIG record at {}", record.name());
                record.rdata().to_string()
            }
        },
        Err(error) => {
            warn!("unable to encode RRSIG record at {}: {error}", record.name());
            record.rdata().to_string()
        }
    }
}

struct RrsigFields<'a> {
    type_covered: RecordType,
    algorithm: u8,
    labels: u8,
    original_ttl: u32,
    expiration: u32,
    inception: u32,
    key_tag: u16,
    signer: Name,
    signature: &'a [u8],
}

impl<'a> RrsigFields<'a> {
    fn from_wire(wire: &'a [u8]) -> Option<Self> {
        let header = wire.get(..RRSIG_HEADER_LEN)?;
        let u16_at = |at: usize| u16::from_be_bytes([header[at], header[at + 1]]);
        let u32_at = |at: usize| {
            u32::from_be_bytes([header[at], header[at + 1], header[at + 2], header[at + 3]])
        };

        let mut decoder = BinDecoder::new(&wire[RRSIG_HEADER_LEN..]);
        let signer = Name::read(&mut decoder).ok()?;
        let signature = &wire[RRSIG_HEADER_LEN + decoder.index()..];

        Some(Self {
            type_covered: RecordType::from(u16_at(0)),
            algorithm: header[2],
            labels: header[3],
            original_ttl: u32_at(4),
            expiration: u32_at(8),
            inception: u32_at(12),
            key_tag: u16_at(16),
            signer,
            signature,
        })
    }

    fn present(&self, zeroize: bool) -> String {
        let (expiration, inception, signature) = if zeroize {
            (NULL_FIELD.to_owned(), NULL_FIELD.to_owned(), NULL_FIELD.to_owned())
        } else {
            (
                timestamp(self.expiration),
                timestamp(self.inception),
                BASE64.encode(self.signature),
            )
        };

        format!(
            "{} {} {} {} {expiration} {inception} {} {} {signature}",
            type_mnemonic(self.type_covered),
            self.algorithm,
            self.labels,
            self.original_ttl,
            self.key_tag,
            self.signer,
        )
    }
}

/// `YYYYMMDDHHmmSS` in UTC.
fn timestamp(seconds: u32) -> String {
    match DateTime::from_timestamp(i64::from(seconds), 0) {
        Some(time) => time.format(TIMESTAMP_FORMAT).to_string(),
        None => seconds.to_string(),
    }
}

fn comment(record: &Record) -> Option<String> {
    match record.record_type() {
        RecordType::DS => {
            let wire = record.rdata_wire().ok()?;
            let digest = wire.get(DS_HEADER_LEN..)?;
            Some(format!(";{{{}}}", bubblebabble(digest)))
        }
        RecordType::DNSKEY => {
            let key = DnsKey::new(record).ok()?;
            let role = if key.is_key_signing_key() { "ksk" } else { "zsk" };
            Some(format!(";{{id = {} ({role})}}", key.key_tag()))
        }
        _ => None,
    }
}

/// Bubble babble encoding of binary data, as used for DS digests.
pub fn bubblebabble(data: &[u8]) -> String {
    const VOWELS: &[u8; 6] = b"aeiouy";
    const CONSONANTS: &[u8; 17] = b"bcdfghklmnprstvzx";

    let rounds = data.len() / 2 + 1;
    let mut seed = 1usize;
    let mut out = String::with_capacity(rounds * 6);
    out.push('x');

    for round in 0..rounds {
        let last = round + 1 == rounds;
        if !last || data.len() % 2 == 1 {
            let byte = usize::from(data[2 * round]);
            out.push(char::from(VOWELS[(((byte >> 6) & 3) + seed) % 6]));
            out.push(char::from(CONSONANTS[(byte >> 2) & 15]));
            out.push(char::from(VOWELS[((byte & 3) + seed / 6) % 6]));

            if !last {
                let next = usize::from(data[2 * round + 1]);
                out.push(char::from(CONSONANTS[(next >> 4) & 15]));
                out.push('-');
                out.push(char::from(CONSONANTS[next & 15]));
                seed = (seed * 5 + byte * 7 + next) % 36;
            }
        } else {
            out.push(char::from(VOWELS[seed % 6]));
            out.push(char::from(CONSONANTS[16]));
            out.push(char::from(VOWELS[seed / 6]));
        }
    }

    out.push('x');
    out
}
