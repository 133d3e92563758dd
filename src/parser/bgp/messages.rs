use bytes::{Buf, Bytes};
use log::debug;
use std::net::Ipv4Addr;

use crate::error::ParserError;
use crate::models::*;
use crate::parser::bgp::attributes::{AttributeParser, ParsedAttributes};
use crate::parser::{parse_nlri_list, ReadUtils};

/// A decoded BGP message, before it is attached to the peer it was received from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BgpMessage {
    Open(BgpOpenMessage),
    Update(Box<BgpUpdateMessage>),
    Notification(BgpNotificationMessage),
    KeepAlive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BgpOpenMessage {
    pub version: u8,
    /// Sender AS, taken from the 4-octet AS capability when present.
    pub asn: Asn,
    pub hold_time: u16,
    pub bgp_id: Ipv4Addr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BgpNotificationMessage {
    pub error_code: u8,
    pub error_subcode: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BgpUpdateMessage {
    pub withdrawn_prefixes: Vec<NetworkPrefix>,
    pub attributes: ParsedAttributes,
    pub announced_prefixes: Vec<NetworkPrefix>,
}

impl BgpUpdateMessage {
    /// Every withdrawn prefix: IPv4 withdrawn routes then MP_UNREACH_NLRI.
    pub fn withdrawn(&self) -> impl Iterator<Item = &NetworkPrefix> {
        self.withdrawn_prefixes
            .iter()
            .chain(self.attributes.mp_unreach.iter())
    }

    /// Every announced prefix paired with its route attributes: IPv4 NLRI then MP_REACH_NLRI. The
    /// MP_REACH_NLRI next hop replaces the NEXT_HOP attribute for the prefixes it carries.
    pub fn announced(&self) -> Vec<(NetworkPrefix, RouteAttributes)> {
        let base = &self.attributes.attributes;
        let mut routes: Vec<(NetworkPrefix, RouteAttributes)> = self
            .announced_prefixes
            .iter()
            .map(|p| (*p, base.clone()))
            .collect();
        if let Some(reach) = &self.attributes.mp_reach {
            let mut mp_attributes = base.clone();
            if reach.next_hop.is_some() {
                mp_attributes.next_hop = reach.next_hop;
            }
            routes.extend(reach.prefixes.iter().map(|p| (*p, mp_attributes.clone())));
        }
        routes
    }
}

/// BGP message
///
/// Format:
/// ```text
/// 0                   1                   2                   3
/// 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// +                                                               +
/// |                                                               |
/// +                                                               +
/// |                           Marker                              |
/// +                                                               +
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |          Length               |      Type     |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
pub fn parse_bgp_message(
    data: &mut Bytes,
    add_path: bool,
    asn_len: AsnLength,
) -> Result<BgpMessage, ParserError> {
    let total_size = data.len();
    data.has_n_remaining(19)?;
    // https://tools.ietf.org/html/rfc4271#section-4
    // 16 octets marker
    data.advance(16);
    /*
     This 2-octet unsigned integer indicates the total length of the
     message, including the header in octets.  Thus, it allows one
     to locate the (Marker field of the) next message in the TCP
     stream.  The value of the Length field MUST always be at least
     19 and no greater than 4096, and MAY be further constrained,
     depending on the message type.

     RFC 8654 extends the maximum to 65535 for all messages except
     OPEN and KEEPALIVE.
    */
    let length = data.get_u16();
    if length < 19 {
        return Err(ParserError::ParseError(format!(
            "invalid BGP message length {length}"
        )));
    }

    let bgp_msg_length = if (length as usize) > total_size {
        debug!(
            "BGP message length {} exceeds the {} bytes available",
            length, total_size
        );
        total_size - 19
    } else {
        length as usize - 19
    };

    let msg_type = BgpMessageType::try_from(data.get_u8())?;
    let msg_data = data.split_to(bgp_msg_length);

    Ok(match msg_type {
        BgpMessageType::OPEN => BgpMessage::Open(parse_bgp_open_message(msg_data)?),
        BgpMessageType::UPDATE => {
            BgpMessage::Update(Box::new(parse_bgp_update_message(
                msg_data, add_path, asn_len,
            )?))
        }
        BgpMessageType::NOTIFICATION => {
            BgpMessage::Notification(parse_bgp_notification_message(msg_data)?)
        }
        BgpMessageType::KEEPALIVE => BgpMessage::KeepAlive,
    })
}

pub fn parse_bgp_notification_message(
    mut input: Bytes,
) -> Result<BgpNotificationMessage, ParserError> {
    let error_code = input.read_u8()?;
    let error_subcode = input.read_u8()?;
    // the diagnostic data that follows is not kept
    Ok(BgpNotificationMessage {
        error_code,
        error_subcode,
    })
}

/// OPEN message. Optional parameters are walked only to find the 4-octet AS number capability
/// (<https://datatracker.ietf.org/doc/html/rfc6793#section-3>).
pub fn parse_bgp_open_message(mut input: Bytes) -> Result<BgpOpenMessage, ParserError> {
    let version = input.read_u8()?;
    let mut asn = Asn::new_16bit(input.read_u16()?);
    let hold_time = input.read_u16()?;
    let bgp_id = input.read_ipv4_address()?;
    let opt_params_len = input.read_u8()? as usize;
    let mut params = input.read_n_bytes(opt_params_len)?;

    while params.remaining() > 0 {
        let param_type = params.read_u8()?;
        let param_len = params.read_u8()? as usize;
        let mut param = params.read_n_bytes(param_len)?;
        // https://tools.ietf.org/html/rfc3392
        if param_type != 2 {
            continue;
        }
        while param.remaining() > 0 {
            let code = param.read_u8()?;
            let len = param.read_u8()? as usize;
            let mut value = param.read_n_bytes(len)?;
            if code == 65 && len == 4 {
                asn = Asn::new_32bit(value.read_u32()?);
            }
        }
    }

    Ok(BgpOpenMessage {
        version,
        asn,
        hold_time,
        bgp_id,
    })
}

/// read bgp update message.
pub fn parse_bgp_update_message(
    mut input: Bytes,
    add_path: bool,
    asn_len: AsnLength,
) -> Result<BgpUpdateMessage, ParserError> {
    // AFI for routes out side attributes are IPv4 ONLY.
    let afi = Afi::Ipv4;

    // parse withdrawn prefixes nlri
    let withdrawn_length = input.read_u16()? as usize;
    let withdrawn_bytes = input.read_n_bytes(withdrawn_length)?;
    let withdrawn_prefixes = parse_nlri_list(withdrawn_bytes, add_path, &afi)?;

    // parse attributes
    let attribute_length = input.read_u16()? as usize;
    let attr_data = input.read_n_bytes(attribute_length)?;
    let attributes =
        AttributeParser::new(asn_len, add_path).parse_attributes(attr_data)?;

    // parse announced prefixes nlri: the remainder of the message
    let announced_prefixes = parse_nlri_list(input, add_path, &afi)?;

    Ok(BgpUpdateMessage {
        withdrawn_prefixes,
        attributes,
        announced_prefixes,
    })
}
