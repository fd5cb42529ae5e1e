use std::{cmp::Ordering, fmt, ops::Add};

/// SOA serial number with RFC 1982 arithmetic.
///
/// Serial numbers only have a partial order: two values exactly `2^31`
/// apart are neither greater nor less than each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SerialNumber(u32);

impl SerialNumber {
    pub const ZERO: SerialNumber = SerialNumber(0);

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Move the serial by a signed offset, wrapping modulo `2^32`.
    pub fn offset(self, delta: i32) -> Self {
        Self(self.0.wrapping_add_signed(delta))
    }

    /// The next serial number, `self + 1` with wraparound.
    pub fn next(self) -> Self {
        self + SerialNumber(1)
    }

    /// True if `self` is strictly after `other` under serial arithmetic.
    pub fn is_after(&self, other: &SerialNumber) -> bool {
        self.partial_cmp(other) == Some(Ordering::Greater)
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SerialNumber {
    fn from(value: u32) -> Self {
        SerialNumber(value)
    }
}

impl From<SerialNumber> for u32 {
    fn from(value: SerialNumber) -> Self {
        value.0
    }
}

/// Serial Number Addition, see RFC 1982, section 3.1
///
/// The result is a wrapping add.
impl Add for SerialNumber {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.wrapping_add(rhs.0))
    }
}

/// Serial Number Comparison, see RFC 1982, section 3.2
impl PartialOrd for SerialNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        const SERIAL_BITS_HALF: u32 = 1 << (u32::BITS - 1);

        let i1 = self.0;
        let i2 = other.0;

        if i1 == i2 {
            Some(Ordering::Equal)
        } else if (i1 < i2 && (i2 - i1) < SERIAL_BITS_HALF)
            || (i1 > i2 && (i1 - i2) > SERIAL_BITS_HALF)
        {
            Some(Ordering::Less)
        } else if (i1 < i2 && (i2 - i1) > SERIAL_BITS_HALF)
            || (i1 > i2 && (i1 - i2) < SERIAL_BITS_HALF)
        {
            Some(Ordering::Greater)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraparound_is_after() {
        let max = SerialNumber::from(u32::MAX);
        let zero = max.next();

        assert_eq!(zero, SerialNumber::ZERO);
        assert!(zero.is_after(&max));
        assert!(!max.is_after(&zero));
    }

    #[test]
    fn test_half_distance_is_unordered() {
        let a = SerialNumber::from(0);
        let b = SerialNumber::from(1 << 31);

        assert_eq!(a.partial_cmp(&b), None);
        assert!(!a.is_after(&b));
        assert!(!b.is_after(&a));
    }

    #[test]
    fn test_offset() {
        let serial = SerialNumber::from(10);
        assert_eq!(serial.offset(5).get(), 15);
        assert_eq!(serial.offset(-11).get(), u32::MAX);
        assert!(!serial.offset(-1).is_after(&serial));
    }

    #[test]
    fn test_equal_is_not_after() {
        let serial = SerialNumber::from(2024010100);
        assert!(!serial.is_after(&serial));
        assert_eq!(serial.partial_cmp(&serial), Some(Ordering::Equal));
    }
}
