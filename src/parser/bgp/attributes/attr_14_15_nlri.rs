use crate::models::*;
use crate::parser::bgp::attributes::attr_03_next_hop::parse_mp_next_hop;
use crate::parser::{parse_nlri_list, ReadUtils};
use crate::ParserError;
use bytes::{Buf, Bytes};
use log::{debug, warn};
use std::net::IpAddr;

/// Reachable routes carried in MP_REACH_NLRI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MpReach {
    pub next_hop: Option<IpAddr>,
    pub prefixes: Vec<NetworkPrefix>,
}

/// Reads AFI and SAFI, returning `None` for families this crate does not decode.
fn read_address_family(input: &mut Bytes) -> Result<Option<Afi>, ParserError> {
    let afi = input.read_afi();
    let safi = input.read_safi();
    match (afi, safi) {
        (Ok(afi), Ok(_)) => Ok(Some(afi)),
        (Err(e @ ParserError::NotEnoughBytes { .. }), _)
        | (_, Err(e @ ParserError::NotEnoughBytes { .. })) => Err(e),
        (Err(e), _) | (_, Err(e)) => {
            debug!("skipping NLRI: {}", e);
            Ok(None)
        }
    }
}

///
/// <https://datatracker.ietf.org/doc/html/rfc4760#section-3>
/// The attribute is encoded as shown below:
/// +---------------------------------------------------------+
/// | Address Family Identifier (2 octets)                    |
/// +---------------------------------------------------------+
/// | Subsequent Address Family Identifier (1 octet)          |
/// +---------------------------------------------------------+
/// | Length of Next Hop Network Address (1 octet)            |
/// +---------------------------------------------------------+
/// | Network Address of Next Hop (variable)                  |
/// +---------------------------------------------------------+
/// | Reserved (1 octet)                                      |
/// +---------------------------------------------------------+
/// | Network Layer Reachability Information (variable)       |
/// +---------------------------------------------------------+
///
/// Inside a TABLE_DUMP_V2 RIB entry (`rib_entry` set) the attribute is normally cut down to the
/// next hop length and address, the prefix being carried by the RIB record itself
/// (<https://datatracker.ietf.org/doc/html/rfc6396#section-4.3.4>). Some dumpers still write the
/// full form, which is recognised by its leading zero byte.
pub fn parse_mp_reach(
    mut input: Bytes,
    additional_paths: bool,
    rib_entry: bool,
) -> Result<Option<MpReach>, ParserError> {
    let first_byte_zero = input.first() == Some(&0);

    if rib_entry && !first_byte_zero {
        let next_hop_length = input.read_u8()? as usize;
        let next_hop = parse_mp_next_hop(input.read_n_bytes(next_hop_length)?)?;
        return Ok(Some(MpReach {
            next_hop,
            prefixes: vec![],
        }));
    }

    let Some(afi) = read_address_family(&mut input)? else {
        return Ok(None);
    };

    let next_hop_length = input.read_u8()? as usize;
    let next_hop = parse_mp_next_hop(input.read_n_bytes(next_hop_length)?)?;

    if input.read_u8()? != 0 {
        warn!("NLRI reserved byte not 0");
    }

    let prefixes = match rib_entry {
        true => vec![],
        false => parse_nlri_list(input, additional_paths, &afi)?,
    };

    Ok(Some(MpReach { next_hop, prefixes }))
}

/// Withdrawn routes carried in MP_UNREACH_NLRI: AFI, SAFI, then the withdrawn prefixes.
pub fn parse_mp_unreach(
    mut input: Bytes,
    additional_paths: bool,
) -> Result<Vec<NetworkPrefix>, ParserError> {
    match read_address_family(&mut input)? {
        Some(afi) if input.remaining() > 0 => parse_nlri_list(input, additional_paths, &afi),
        _ => Ok(vec![]),
    }
}
