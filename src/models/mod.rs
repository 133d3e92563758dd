/*!
Data models: network primitives, BGP attributes, MRT framing and the decoded [Record] sum type.
*/
pub mod bgp;
pub mod mrt;
pub mod network;
pub mod record;

pub use bgp::*;
pub use mrt::*;
pub use network::*;
pub use record::*;
