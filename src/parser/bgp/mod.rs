/*!
Provides parsing of BGP messages carried in MRT records.
*/
pub mod attributes;
pub mod messages;

pub use attributes::{AttributeParser, MpReach, ParsedAttributes};
pub use messages::{parse_bgp_message, BgpMessage};
