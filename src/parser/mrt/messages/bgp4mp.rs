use crate::error::ParserError;
use crate::models::*;
use crate::parser::bgp::messages::{parse_bgp_message, BgpMessage};
use crate::parser::ReadUtils;
use bytes::Bytes;
use std::net::IpAddr;

/// Remote end of the session a BGP4MP record was captured on.
struct Bgp4MpPeer {
    peer_asn: Asn,
    peer_ip: IpAddr,
}

/// Parse MRT BGP4MP type, expanding the message into records.
///
/// RFC: <https://www.rfc-editor.org/rfc/rfc6396#section-4.4>
pub fn parse_bgp4mp(
    sub_type: u16,
    timestamp: u32,
    input: Bytes,
) -> Result<Vec<Record>, ParserError> {
    let bgp4mp_type: Bgp4MpType = Bgp4MpType::try_from(sub_type)?;
    let records = match bgp4mp_type {
        Bgp4MpType::StateChange => {
            vec![parse_bgp4mp_state_change(input, AsnLength::Bits16, timestamp)?]
        }
        Bgp4MpType::StateChangeAs4 => {
            vec![parse_bgp4mp_state_change(input, AsnLength::Bits32, timestamp)?]
        }
        Bgp4MpType::Message | Bgp4MpType::MessageLocal => {
            parse_bgp4mp_message(input, false, AsnLength::Bits16, timestamp)?
        }
        Bgp4MpType::MessageAs4 | Bgp4MpType::MessageAs4Local => {
            parse_bgp4mp_message(input, false, AsnLength::Bits32, timestamp)?
        }
        Bgp4MpType::MessageAddpath | Bgp4MpType::MessageLocalAddpath => {
            parse_bgp4mp_message(input, true, AsnLength::Bits16, timestamp)?
        }
        Bgp4MpType::MessageAs4Addpath | Bgp4MpType::MessageLocalAs4Addpath => {
            parse_bgp4mp_message(input, true, AsnLength::Bits32, timestamp)?
        }
    };

    Ok(records)
}

/*
   0                   1                   2                   3
   0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
  |         Peer AS Number        |        Local AS Number        |
  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
  |        Interface Index        |        Address Family         |
  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
  |                      Peer IP Address (variable)               |
  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
  |                      Local IP Address (variable)              |
  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
*/
fn parse_bgp4mp_peer(data: &mut Bytes, asn_len: AsnLength) -> Result<Bgp4MpPeer, ParserError> {
    let peer_asn: Asn = data.read_asn(asn_len)?;
    let _local_asn: Asn = data.read_asn(asn_len)?;
    let _interface_index: u16 = data.read_u16()?;
    let afi: Afi = data.read_afi()?;
    let peer_ip: IpAddr = data.read_address(&afi)?;
    let _local_ip: IpAddr = data.read_address(&afi)?;
    Ok(Bgp4MpPeer { peer_asn, peer_ip })
}

/*
  |                    BGP Message... (variable)
  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
*/
fn parse_bgp4mp_message(
    mut data: Bytes,
    add_path: bool,
    asn_len: AsnLength,
    timestamp: u32,
) -> Result<Vec<Record>, ParserError> {
    let Bgp4MpPeer { peer_asn, peer_ip } = parse_bgp4mp_peer(&mut data, asn_len)?;
    let msg = parse_bgp_message(&mut data, add_path, asn_len)?;

    let records = match msg {
        BgpMessage::Open(open) => vec![Record::Open(OpenRecord {
            timestamp,
            peer_ip,
            peer_asn,
            version: open.version,
            asn: open.asn,
            hold_time: open.hold_time,
            bgp_id: open.bgp_id,
        })],
        BgpMessage::KeepAlive => vec![Record::KeepAlive(KeepAliveRecord {
            timestamp,
            peer_ip,
            peer_asn,
        })],
        BgpMessage::Notification(n) => vec![Record::Notification(NotificationRecord {
            timestamp,
            peer_ip,
            peer_asn,
            error_code: n.error_code,
            error_subcode: n.error_subcode,
        })],
        BgpMessage::Update(update) => {
            let entry = |prefix: NetworkPrefix, change: RouteChange| {
                Record::UpdateEntry(UpdateEntry {
                    timestamp,
                    prefix,
                    peer_ip,
                    peer_asn,
                    change,
                })
            };
            let mut records: Vec<Record> = update
                .withdrawn()
                .map(|p| entry(*p, RouteChange::Withdraw))
                .collect();
            records.extend(
                update
                    .announced()
                    .into_iter()
                    .map(|(p, attributes)| entry(p, RouteChange::Announce(attributes))),
            );
            records
        }
    };
    Ok(records)
}

/*
  |            Old State          |          New State            |
  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
*/
fn parse_bgp4mp_state_change(
    mut input: Bytes,
    asn_len: AsnLength,
    timestamp: u32,
) -> Result<Record, ParserError> {
    let Bgp4MpPeer { peer_asn, peer_ip } = parse_bgp4mp_peer(&mut input, asn_len)?;
    let old_state = BgpState::try_from(input.read_u16()?)?;
    let new_state = BgpState::try_from(input.read_u16()?)?;
    Ok(Record::StateChange(StateChangeRecord {
        timestamp,
        peer_ip,
        peer_asn,
        old_state,
        new_state,
    }))
}
