//! Delegation Signer derivation from DNSKEY records.
//!
//! A DS record commits the parent zone to one key of the child zone
//! ([RFC 4034, section 5](https://tools.ietf.org/html/rfc4034#section-5)):
//!
//! ```text
//! digest = digest_algorithm( DNSKEY owner name | DNSKEY RDATA);
//!
//!    "|" denotes concatenation
//!
//! DNSKEY RDATA = Flags | Protocol | Algorithm | Public Key.
//! ```

use std::{fmt, str::FromStr};

use camino::Utf8PathBuf;
use data_encoding::HEXLOWER;
use hickory_proto::rr::{DNSClass, RecordType};
use tracing::debug;

use crate::error::{ConversionError, DigestAlgorithmError};
use crate::rr::{Name, Record, TimeToLive};

/// Length of the DNSKEY RDATA header: flags, protocol and algorithm.
const DNSKEY_HEADER_LEN: usize = 4;

/// RSA/MD5, whose key tag is taken from the key modulus.
const ALGORITHM_RSAMD5: u8 = 1;

/// DNSKEY flag marking a key signing key (secure entry point).
const FLAG_SEP: u16 = 0x0001;

/// Digest algorithms for DS records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DigestAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

impl DigestAlgorithm {
    /// IANA digest type number.
    pub fn digest_type(&self) -> u8 {
        match self {
            DigestAlgorithm::Sha1 => 1,
            DigestAlgorithm::Sha256 => 2,
        }
    }

    /// Whether the crypto backend was built with this algorithm.
    pub fn is_available(&self) -> bool {
        match self {
            DigestAlgorithm::Sha1 => true,
            DigestAlgorithm::Sha256 => cfg!(feature = "sha256"),
        }
    }

    fn ring_algorithm(&self) -> Result<&'static ring::digest::Algorithm, ConversionError> {
        if !self.is_available() {
            return Err(ConversionError::UnsupportedDigest(*self));
        }

        match self {
            DigestAlgorithm::Sha1 => Ok(&ring::digest::SHA1_FOR_LEGACY_USE_ONLY),
            DigestAlgorithm::Sha256 => Ok(&ring::digest::SHA256),
        }
    }

    /// Hash `data`, failing if the algorithm is unavailable.
    pub fn digest(&self, data: &[u8]) -> Result<Vec<u8>, ConversionError> {
        let algorithm = self.ring_algorithm()?;
        Ok(ring::digest::digest(algorithm, data).as_ref().to_vec())
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestAlgorithm::Sha1 => f.write_str("SHA1"),
            DigestAlgorithm::Sha256 => f.write_str("SHA256"),
        }
    }
}

impl FromStr for DigestAlgorithm {
    type Err = DigestAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "").as_str() {
            "SHA1" | "1" => Ok(DigestAlgorithm::Sha1),
            "SHA256" | "2" => Ok(DigestAlgorithm::Sha256),
            _ => Err(DigestAlgorithmError(s.to_owned())),
        }
    }
}

/// Key tag of DNSKEY record data, see RFC 4034, Appendix B.
///
/// For algorithm 1 the tag is the two octets before the last octet of
/// the record data. Data with no public key octets yields 0.
pub fn key_tag(rdata: &[u8]) -> u16 {
    if rdata.get(3) == Some(&ALGORITHM_RSAMD5) {
        let len = rdata.len();
        if len <= DNSKEY_HEADER_LEN {
            return 0;
        }
        return u16::from_be_bytes([rdata[len - 3], rdata[len - 2]]);
    }

    let mut ac: u32 = rdata
        .chunks(2)
        .map(|pair| match *pair {
            [hi, lo] => u32::from(u16::from_be_bytes([hi, lo])),
            [hi] => u32::from(hi) << 8,
            _ => 0,
        })
        .fold(0u32, u32::wrapping_add);
    ac = ac.wrapping_add((ac >> 16) & 0xFFFF);
    (ac & 0xFFFF) as u16
}

/// Fields of a DNSKEY record needed to derive its DS.
#[derive(Debug, Clone)]
pub struct DnsKey<'r> {
    record: &'r Record,
    rdata: Vec<u8>,
}

impl<'r> DnsKey<'r> {
    /// Check that `record` is a DNSKEY with at least a complete header.
    pub fn new(record: &'r Record) -> Result<Self, ConversionError> {
        if record.record_type() != RecordType::DNSKEY {
            return Err(ConversionError::NotDnsKey(record.record_type()));
        }

        let rdata = record.rdata_wire()?;
        if rdata.len() < DNSKEY_HEADER_LEN {
            return Err(ConversionError::Truncated(rdata.len()));
        }

        Ok(Self { record, rdata })
    }

    pub fn owner(&self) -> &Name {
        self.record.name()
    }

    pub fn flags(&self) -> u16 {
        u16::from_be_bytes([self.rdata[0], self.rdata[1]])
    }

    pub fn is_key_signing_key(&self) -> bool {
        self.flags() & FLAG_SEP != 0
    }

    pub fn algorithm(&self) -> u8 {
        self.rdata[3]
    }

    pub fn rdata(&self) -> &[u8] {
        &self.rdata
    }

    pub fn key_tag(&self) -> u16 {
        key_tag(&self.rdata)
    }

    /// File naming label for this key.
    pub fn label(&self) -> KeyLabel {
        KeyLabel::new(self.owner().clone(), self.algorithm(), self.key_tag())
    }

    /// Digest over the canonical owner name followed by the record data.
    pub fn digest(&self, algorithm: DigestAlgorithm) -> Result<Vec<u8>, ConversionError> {
        let mut input = self.owner().canonical_wire();
        input.extend_from_slice(&self.rdata);
        algorithm.digest(&input)
    }
}

/// `K<owner>+<algorithm>+<key tag>`, the base name of key and DS files.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyLabel {
    owner: Name,
    algorithm: u8,
    key_tag: u16,
}

impl KeyLabel {
    pub fn new(owner: Name, algorithm: u8, key_tag: u16) -> Self {
        Self {
            owner,
            algorithm,
            key_tag,
        }
    }

    pub fn owner(&self) -> &Name {
        &self.owner
    }

    pub fn algorithm(&self) -> u8 {
        self.algorithm
    }

    pub fn key_tag(&self) -> u16 {
        self.key_tag
    }

    /// File name with the given extension, e.g. `ds` or `key`.
    pub fn file_name(&self, extension: &str) -> Utf8PathBuf {
        Utf8PathBuf::from(format!("{self}.{extension}"))
    }

    /// Name of the file a derived DS record is written to.
    pub fn ds_file_name(&self) -> Utf8PathBuf {
        self.file_name("ds")
    }
}

impl fmt::Display for KeyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "K{}+{:03}+{:05}",
            self.owner, self.algorithm, self.key_tag
        )
    }
}

/// A Delegation Signer record derived from a DNSKEY.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DsRecord {
    owner: Name,
    dns_class: DNSClass,
    ttl: TimeToLive,
    key_tag: u16,
    algorithm: u8,
    digest_type: DigestAlgorithm,
    digest: Vec<u8>,
}

impl DsRecord {
    /// Derive the DS record for a DNSKEY record.
    ///
    /// The digest algorithm is checked for availability before any
    /// hashing happens; either a complete record is produced or an error.
    pub fn derive(dnskey: &Record, algorithm: DigestAlgorithm) -> Result<Self, ConversionError> {
        if !algorithm.is_available() {
            return Err(ConversionError::UnsupportedDigest(algorithm));
        }

        let key = DnsKey::new(dnskey)?;
        let digest = key.digest(algorithm)?;

        let ds = DsRecord {
            owner: dnskey.name().clone(),
            dns_class: dnskey.dns_class(),
            ttl: dnskey.ttl(),
            key_tag: key.key_tag(),
            algorithm: key.algorithm(),
            digest_type: algorithm,
            digest,
        };
        debug!("derived DS for {}", ds.label());
        Ok(ds)
    }

    pub fn owner(&self) -> &Name {
        &self.owner
    }

    pub fn dns_class(&self) -> DNSClass {
        self.dns_class
    }

    pub fn ttl(&self) -> TimeToLive {
        self.ttl
    }

    pub fn key_tag(&self) -> u16 {
        self.key_tag
    }

    pub fn algorithm(&self) -> u8 {
        self.algorithm
    }

    pub fn digest_type(&self) -> DigestAlgorithm {
        self.digest_type
    }

    pub fn digest(&self) -> &[u8] {
        &self.digest
    }

    /// Label of the DNSKEY this record was derived from.
    pub fn label(&self) -> KeyLabel {
        KeyLabel::new(self.owner.clone(), self.algorithm, self.key_tag)
    }

    /// DS record data in wire format.
    pub fn rdata_wire(&self) -> Vec<u8> {
        let mut wire = Vec::with_capacity(4 + self.digest.len());
        wire.extend_from_slice(&self.key_tag.to_be_bytes());
        wire.push(self.algorithm);
        wire.push(self.digest_type.digest_type());
        wire.extend_from_slice(&self.digest);
        wire
    }

    /// Convert into a generic record, e.g. for printing with a format.
    pub fn to_record(&self) -> Result<Record, ConversionError> {
        let mut record = Record::from_wire(
            self.owner.clone(),
            self.ttl,
            RecordType::DS,
            &self.rdata_wire(),
        )?;
        record.set_dns_class(self.dns_class);
        Ok(record)
    }
}

impl fmt::Display for DsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\tDS\t{} {} {} {}",
            self.owner,
            self.ttl,
            self.dns_class,
            self.key_tag,
            self.algorithm,
            self.digest_type.digest_type(),
            HEXLOWER.encode(&self.digest)
        )
    }
}
