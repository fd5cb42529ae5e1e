pub mod canonical;
pub mod classify;
pub mod digest;
pub mod error;
pub mod format;
pub mod pipeline;
pub mod rr;
pub mod serial;
pub mod zonefile;

pub use self::classify::{RecordClass, RecordFilter};
pub use self::digest::{DigestAlgorithm, DsRecord, KeyLabel};
pub use self::error::{ConfigurationConflict, ConversionError, ParseError, ZoneError};
pub use self::format::OutputFormat;
pub use self::pipeline::ReadZoneOptions;
pub use self::serial::SerialPolicy;
