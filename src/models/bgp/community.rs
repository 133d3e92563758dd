use crate::models::Asn;
use std::fmt::{Display, Formatter};

/// Standard (RFC 1997) community value.
#[derive(Debug, PartialEq, Copy, Clone, Eq)]
pub enum Community {
    NoExport,
    NoAdvertise,
    NoExportSubConfed,
    Custom(Asn, u16),
}

impl From<u32> for Community {
    fn from(value: u32) -> Self {
        match value {
            0xFFFFFF01 => Community::NoExport,
            0xFFFFFF02 => Community::NoAdvertise,
            0xFFFFFF03 => Community::NoExportSubConfed,
            v => Community::Custom(Asn::new_16bit((v >> 16) as u16), (v & 0xFFFF) as u16),
        }
    }
}

impl Display for Community {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Community::NoExport => write!(f, "no-export"),
            Community::NoAdvertise => write!(f, "no-advertise"),
            Community::NoExportSubConfed => write!(f, "no-export-sub-confed"),
            Community::Custom(asn, value) => write!(f, "{}:{}", asn, value),
        }
    }
}
