use std::{fmt, io, path::PathBuf};

use hickory_proto::{ProtoError, rr::RecordType};

use crate::digest::DigestAlgorithm;

/// Malformed record or zone text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct ParseError {
    message: String,
    line: Option<usize>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, line: Option<usize>) -> Self {
        Self {
            message: message.into(),
            line,
        }
    }

    /// One-based line number where parsing failed, when it could be located.
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} at line {line}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Errors reading a zone or key file.
#[derive(Debug, thiserror::Error)]
pub enum ZoneError {
    #[error("unable to open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to read zone input: {0}")]
    Read(#[source] io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A DS record could not be derived from the input record.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("expected a DNSKEY record, found {0}")]
    NotDnsKey(RecordType),

    #[error("DNSKEY record data is truncated ({0} octets)")]
    Truncated(usize),

    #[error("crypto library does not support {0} digests")]
    UnsupportedDigest(DigestAlgorithm),

    #[error("unable to encode DNSKEY record data: {0}")]
    Encode(#[from] ProtoError),
}

/// Strip and only-dnssec were both requested.
///
/// Not fatal: every record is dropped and processing continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("stripping both DNSSEC and non-DNSSEC records. Output will be sparse.")]
pub struct ConfigurationConflict;

/// Unrecognized serial policy text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "expected a number optionally preceded by a + or - sign to indicate an offset, or the text YYYYMMDDxx or unixtime, got {0:?}"
)]
pub struct SerialPolicyError(pub String);

/// Unrecognized digest algorithm name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown digest algorithm {0:?}")]
pub struct DigestAlgorithmError(pub String);
