use std::{fmt, ops::Deref, str::FromStr};

use hickory_proto::ProtoError;

/// DNS owner name with case preserved.
///
/// Wraps the hickory name and adds the canonical views used when ordering
/// and digesting records (RFC 4034, section 6).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name(hickory_proto::rr::Name);

impl Deref for Name {
    type Target = hickory_proto::rr::Name;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Name {
    /// Parse a name, preserving the case of ASCII labels.
    ///
    /// Internationalized names fall back to their punycode form.
    pub fn from_utf8(value: impl AsRef<str>) -> Result<Self, ProtoError> {
        let value = value.as_ref();
        hickory_proto::rr::Name::from_ascii(value)
            .or_else(|_| hickory_proto::rr::Name::from_utf8(value))
            .map(Name)
    }

    pub fn root() -> Self {
        Name(hickory_proto::rr::Name::root())
    }

    /// The name with every US-ASCII letter lower-cased.
    pub fn to_canonical(&self) -> Name {
        Name(self.0.to_lowercase())
    }

    /// True if the name contains no upper-case US-ASCII letters.
    pub fn is_canonical(&self) -> bool {
        self.0
            .iter()
            .all(|label| !label.iter().any(u8::is_ascii_uppercase))
    }

    /// Lower-cased labels, leftmost first, without the root label.
    pub fn canonical_labels(&self) -> impl DoubleEndedIterator<Item = Vec<u8>> + '_ {
        self.0.iter().map(|label| label.to_ascii_lowercase())
    }

    /// Uncompressed, lower-cased wire format of the name.
    ///
    /// Every label is prefixed with its length and the name is terminated
    /// by the empty root label.
    pub fn canonical_wire(&self) -> Vec<u8> {
        let mut wire = Vec::with_capacity(self.0.len() + 2);
        for label in self.canonical_labels() {
            wire.push(label.len() as u8);
            wire.extend_from_slice(&label);
        }
        wire.push(0);
        wire
    }

    /// Canonical DNS name key: labels from the rightmost one inwards.
    ///
    /// Comparing two keys lexicographically yields the canonical name order
    /// of RFC 4034, section 6.1.
    pub fn canonical_key(&self) -> Vec<Vec<u8>> {
        self.canonical_labels().rev().collect()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Name {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Name)
    }
}

impl From<hickory_proto::rr::Name> for Name {
    fn from(value: hickory_proto::rr::Name) -> Self {
        Name(value)
    }
}

impl From<Name> for hickory_proto::rr::Name {
    fn from(value: Name) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_lowercases() {
        let name = Name::from_utf8("WWW.Example.COM.").unwrap();
        assert!(!name.is_canonical());

        let canonical = name.to_canonical();
        assert!(canonical.is_canonical());
        assert_eq!(canonical.to_string(), "www.example.com.");
        assert_eq!(canonical.to_canonical(), canonical);
    }

    #[test]
    fn test_from_utf8_preserves_case() {
        let name = Name::from_utf8("Mail.Example.COM.").unwrap();
        assert_eq!(name.to_string(), "Mail.Example.COM.");
        assert_eq!(name, Name::from_utf8("mail.example.com.").unwrap());
    }

    #[test]
    fn test_canonical_wire() {
        let name = Name::from_utf8("Dskey.Example.com.").unwrap();
        assert_eq!(
            name.canonical_wire(),
            b"\x05dskey\x07example\x03com\x00".to_vec()
        );
        assert_eq!(Name::root().canonical_wire(), vec![0]);
    }

    #[test]
    fn test_canonical_key_order() {
        // RFC 4034, section 6.1 example ordering
        let ordered = [
            "example.",
            "a.example.",
            "yljkjljk.a.example.",
            "Z.a.example.",
            "zABC.a.EXAMPLE.",
            "z.example.",
            "*.z.example.",
            "a.z.example.",
        ];

        let keys: Vec<_> = ordered
            .iter()
            .map(|name| Name::from_utf8(name).unwrap().canonical_key())
            .collect();

        for pair in keys.windows(2) {
            assert!(pair[0] < pair[1], "{:?} !< {:?}", pair[0], pair[1]);
        }
    }
}
