//! Common network-related structs.

mod afi;
mod asn;
mod prefix;

pub use afi::*;
pub use asn::*;
pub use prefix::*;
