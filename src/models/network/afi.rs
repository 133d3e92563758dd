use ipnet::IpNet;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Address family of a prefix or address on the wire.
///
/// Decides how many octets an address occupies when reading BGP4MP session headers, peer index
/// tables and MP_REACH/MP_UNREACH attributes, and which of `-4`/`-6` a decoded prefix answers to.
///
/// <https://www.iana.org/assignments/address-family-numbers/address-family-numbers.xhtml>
#[derive(Debug, PartialEq, TryFromPrimitive, IntoPrimitive, Clone, Copy, Eq, Hash)]
#[repr(u16)]
pub enum Afi {
    Ipv4 = 1,
    Ipv6 = 2,
}

impl From<&IpNet> for Afi {
    #[inline]
    fn from(value: &IpNet) -> Self {
        match value {
            IpNet::V4(_) => Afi::Ipv4,
            IpNet::V6(_) => Afi::Ipv6,
        }
    }
}

/// Subsequent address family of MP_REACH/MP_UNREACH NLRI. Only the unicast and multicast
/// families carry plain prefixes; any other value makes the attribute's routes skipped.
#[derive(Debug, PartialEq, TryFromPrimitive, IntoPrimitive, Clone, Copy, Eq, Hash)]
#[repr(u8)]
pub enum Safi {
    Unicast = 1,
    Multicast = 2,
    UnicastMulticast = 3,
}
