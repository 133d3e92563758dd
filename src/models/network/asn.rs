use crate::error::ModelError;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// AS number length: 16 or 32 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum AsnLength {
    Bits16,
    Bits32,
}

/// ASN -- Autonomous System Number
///
/// Two ASNs are equal when their numeric values are equal, regardless of the width they were
/// encoded with on the wire.
#[derive(Debug, Clone, Copy, Eq, Ord, PartialOrd)]
pub struct Asn {
    pub asn: u32,
    pub len: AsnLength,
}

/// AS_TRANS, the placeholder 2-octet speakers see in place of a 4-octet ASN.
///
/// <https://datatracker.ietf.org/doc/html/rfc6793#section-9>
pub const AS_TRANS: Asn = Asn::new_16bit(23456);

impl Asn {
    /// Constructs a new 2-octet `Asn` with `AsnLength::Bits16`.
    pub const fn new_16bit(asn: u16) -> Self {
        Asn {
            asn: asn as u32,
            len: AsnLength::Bits16,
        }
    }

    /// Constructs a new 4-octet `Asn` with `AsnLength::Bits32`.
    pub const fn new_32bit(asn: u32) -> Self {
        Asn {
            asn,
            len: AsnLength::Bits32,
        }
    }
}

impl PartialEq for Asn {
    fn eq(&self, other: &Self) -> bool {
        self.asn == other.asn
    }
}

impl Hash for Asn {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.asn.hash(state);
    }
}

impl PartialEq<u32> for Asn {
    fn eq(&self, other: &u32) -> bool {
        self.asn == *other
    }
}

impl From<u32> for Asn {
    fn from(v: u32) -> Self {
        Asn::new_32bit(v)
    }
}

impl From<Asn> for u32 {
    fn from(value: Asn) -> Self {
        value.asn
    }
}

/// Parses `65000`, `AS65000` (any case) and asdot notation (`1.10` is `65546`).
impl FromStr for Asn {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::InvalidAsn(s.to_string());

        let trimmed = s.trim();
        let digits = match trimmed.get(..2) {
            Some(p) if p.eq_ignore_ascii_case("as") => &trimmed[2..],
            _ => trimmed,
        };

        match digits.split_once('.') {
            None => digits.parse::<u32>().map(Asn::new_32bit).map_err(|_| invalid()),
            Some((high, low)) => {
                let high = high.parse::<u16>().map_err(|_| invalid())?;
                let low = low.parse::<u16>().map_err(|_| invalid())?;
                Ok(Asn::new_32bit(((high as u32) << 16) | low as u32))
            }
        }
    }
}

impl Display for Asn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.asn)
    }
}
