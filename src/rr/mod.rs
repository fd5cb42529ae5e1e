//! Resource Record Definitions for DNS

mod name;
mod record;
mod sequence;
mod ttl;
mod zone;

pub use self::name::Name;
pub use self::record::Record;
pub use self::sequence::SerialNumber;
pub use self::ttl::TimeToLive;
pub use self::zone::Zone;

use std::str::FromStr as _;

use hickory_proto::{ProtoError, rr::RecordType};

/// Parse a record type mnemonic, or the generic `TYPE<n>` form of RFC 3597.
pub fn parse_record_type(text: &str) -> Result<RecordType, ProtoError> {
    let upper = text.to_ascii_uppercase();
    if let Some(code) = upper.strip_prefix("TYPE").and_then(|n| n.parse::<u16>().ok()) {
        return Ok(RecordType::from(code));
    }
    RecordType::from_str(&upper)
}
