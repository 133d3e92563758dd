use crate::models::*;
use crate::parser::bgp::attributes::AttributeParser;
use crate::parser::ReadUtils;
use crate::ParserError;
use bytes::Bytes;

/// Address family and add-path flag of a RIB subtype.
fn rib_type_family(rib_type: TableDumpV2Type) -> Result<(Afi, bool), ParserError> {
    match rib_type {
        TableDumpV2Type::RibIpv4Unicast | TableDumpV2Type::RibIpv4Multicast => {
            Ok((Afi::Ipv4, false))
        }
        TableDumpV2Type::RibIpv6Unicast | TableDumpV2Type::RibIpv6Multicast => {
            Ok((Afi::Ipv6, false))
        }
        TableDumpV2Type::RibIpv4UnicastAddPath | TableDumpV2Type::RibIpv4MulticastAddPath => {
            Ok((Afi::Ipv4, true))
        }
        TableDumpV2Type::RibIpv6UnicastAddPath | TableDumpV2Type::RibIpv6MulticastAddPath => {
            Ok((Afi::Ipv6, true))
        }
        _ => Err(ParserError::ParseError(format!(
            "wrong RIB type for parsing: {:?}",
            rib_type
        ))),
    }
}

/// RIB AFI-specific entries, one [TableDumpEntry] per RIB entry.
///
/// https://tools.ietf.org/html/rfc6396#section-4.3
///
/// ```text
///         0                   1                   2                   3
///         0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///        +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///        |                         Sequence Number                       |
///        +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///        | Prefix Length |
///        +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///        |                        Prefix (variable)                      |
///        +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///        |         Entry Count           |  RIB Entries (variable)
///        +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
pub fn parse_rib_afi_entries(
    mut data: Bytes,
    rib_type: TableDumpV2Type,
    timestamp: u32,
    peer_table: Option<&PeerIndexTable>,
) -> Result<Vec<TableDumpEntry>, ParserError> {
    let (afi, add_path) = rib_type_family(rib_type)?;
    let peer_table = peer_table.ok_or_else(|| {
        ParserError::ParseError("RIB entry found before the peer index table".to_string())
    })?;

    let _sequence_number = data.read_u32()?;

    // the path identifier of add-path entries is carried by each RIB entry, not here
    // https://www.rfc-editor.org/rfc/rfc8050#section-4
    let prefix = data.read_nlri_prefix(&afi, false)?;

    let entry_count = data.read_u16()?;
    let mut entries = Vec::with_capacity(entry_count as usize);
    for _ in 0..entry_count {
        entries.push(parse_rib_entry(
            &mut data, add_path, prefix, timestamp, peer_table,
        )?);
    }

    Ok(entries)
}

/// RIB entry: one prefix per entry
///
/// https://datatracker.ietf.org/doc/html/rfc6396#section-4.3.4
/// ```text
///         0                   1                   2                   3
///         0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///        +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///        |         Peer Index            |
///        +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///        |                         Originated Time                       |
///        +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///        |      Attribute Length         |
///        +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///        |                    BGP Attributes... (variable)
///        +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
fn parse_rib_entry(
    input: &mut Bytes,
    add_path: bool,
    prefix: NetworkPrefix,
    timestamp: u32,
    peer_table: &PeerIndexTable,
) -> Result<TableDumpEntry, ParserError> {
    let peer_index = input.read_u16()?;
    let _originated_time = input.read_u32()?;
    let path_id = match add_path {
        true => Some(input.read_u32()?),
        false => None,
    };
    let attribute_length = input.read_u16()? as usize;
    let attr_data = input.read_n_bytes(attribute_length)?;

    let peer = peer_table.id_peer_map.get(&peer_index).ok_or_else(|| {
        ParserError::ParseError(format!("RIB entry refers to unknown peer index {peer_index}"))
    })?;

    let parsed = AttributeParser::for_rib_entry().parse_attributes(attr_data)?;
    let mut attributes = parsed.attributes;
    if let Some(next_hop) = parsed.mp_reach.and_then(|reach| reach.next_hop) {
        attributes.next_hop = Some(next_hop);
    }

    Ok(TableDumpEntry {
        version: TableDumpVersion::V2,
        timestamp,
        prefix: NetworkPrefix::new(prefix.prefix, path_id),
        peer_ip: peer.peer_address,
        peer_asn: peer.peer_asn,
        attributes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::{BufMut, BytesMut};
    use std::collections::HashMap;
    use std::net::{IpAddr, Ipv4Addr};
    use std::str::FromStr;

    fn peer_table() -> PeerIndexTable {
        let mut id_peer_map = HashMap::new();
        id_peer_map.insert(
            0,
            Peer {
                peer_type: PeerType::AS_SIZE_32BIT,
                peer_bgp_id: Ipv4Addr::new(10, 0, 0, 2),
                peer_address: IpAddr::from_str("192.0.2.1").unwrap(),
                peer_asn: Asn::from(65001),
            },
        );
        PeerIndexTable {
            collector_bgp_id: Ipv4Addr::new(10, 0, 0, 1),
            view_name: String::new(),
            id_peer_map,
        }
    }

    fn rib_v6(peer_index: u16, add_path: bool) -> Bytes {
        let mut buf = BytesMut::new();
        buf.put_u32(7); // sequence
        buf.put_slice(&[32, 0x20, 0x01, 0x0d, 0xb8]); // 2001:db8::/32
        buf.put_u16(1);
        buf.put_u16(peer_index);
        buf.put_u32(0); // originated
        if add_path {
            buf.put_u32(9);
        }
        let mut attrs = vec![
            0x40, 1, 1, 0, // ORIGIN
            0x40, 2, 6, 2, 1, 0, 0, 0xFD, 0xE9, // AS_PATH 65001
            0x80, 14, 17, 16, // MP_REACH_NLRI, abbreviated
        ];
        attrs.extend_from_slice(&[0x20, 0x01, 0x0d, 0xb8]);
        attrs.extend_from_slice(&[0; 11]);
        attrs.push(1);
        buf.put_u16(attrs.len() as u16);
        buf.put_slice(&attrs);
        buf.freeze()
    }

    #[test]
    fn test_parse_rib_afi_entries() {
        let table = peer_table();
        let entries =
            parse_rib_afi_entries(rib_v6(0, false), TableDumpV2Type::RibIpv6Unicast, 5, Some(&table))
                .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].to_string(),
            "TABLE_DUMP2|5|B|192.0.2.1|65001|2001:db8::/32|65001|IGP|2001:db8::1|0|0||NAG||"
        );
    }

    #[test]
    fn test_parse_rib_afi_entries_add_path() {
        let table = peer_table();
        let entries = parse_rib_afi_entries(
            rib_v6(0, true),
            TableDumpV2Type::RibIpv6UnicastAddPath,
            5,
            Some(&table),
        )
        .unwrap();
        assert_eq!(entries[0].prefix.path_id, Some(9));
    }

    #[test]
    fn test_rib_without_peer_table() {
        assert!(matches!(
            parse_rib_afi_entries(rib_v6(0, false), TableDumpV2Type::RibIpv6Unicast, 5, None),
            Err(ParserError::ParseError(_))
        ));

        let table = peer_table();
        let err = parse_rib_afi_entries(
            rib_v6(3, false),
            TableDumpV2Type::RibIpv6Unicast,
            5,
            Some(&table),
        )
        .unwrap_err();
        assert!(err.is_protocol_violation());
    }
}
