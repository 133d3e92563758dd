mod peer_index_table;
mod rib_afi_entries;

use crate::error::ParserError;
use crate::models::*;
use bytes::Bytes;
use log::debug;

pub use peer_index_table::parse_peer_index_table;
pub use rib_afi_entries::parse_rib_afi_entries;

/// Parse TABLE_DUMP V2 format MRT message.
///
/// RFC: <https://www.rfc-editor.org/rfc/rfc6396#section-4.3>
///
/// Subtypes include
/// 1. PEER_INDEX_TABLE
/// 2. RIB_IPV4_UNICAST
/// 3. RIB_IPV4_MULTICAST
/// 4. RIB_IPV6_UNICAST
/// 5. RIB_IPV6_MULTICAST
/// 6. RIB_GENERIC
/// 7. GEO_PEER_TABLE
///
/// and the add-path RIB variants 8 to 12 from RFC 8050.
///
/// A peer index table replaces `peer_table` and yields no record; RIB subtypes resolve their
/// peers through it.
pub fn parse_table_dump_v2_message(
    sub_type: u16,
    timestamp: u32,
    input: Bytes,
    peer_table: &mut Option<PeerIndexTable>,
) -> Result<Vec<Record>, ParserError> {
    let v2_type: TableDumpV2Type = TableDumpV2Type::try_from(sub_type)?;

    let records = match v2_type {
        TableDumpV2Type::PeerIndexTable => {
            let table = parse_peer_index_table(input)?;
            debug!(
                "peer index table of collector {} with {} peers",
                table.collector_bgp_id,
                table.id_peer_map.len()
            );
            *peer_table = Some(table);
            vec![]
        }
        TableDumpV2Type::RibIpv4Unicast
        | TableDumpV2Type::RibIpv4Multicast
        | TableDumpV2Type::RibIpv6Unicast
        | TableDumpV2Type::RibIpv6Multicast
        | TableDumpV2Type::RibIpv4UnicastAddPath
        | TableDumpV2Type::RibIpv4MulticastAddPath
        | TableDumpV2Type::RibIpv6UnicastAddPath
        | TableDumpV2Type::RibIpv6MulticastAddPath => {
            parse_rib_afi_entries(input, v2_type, timestamp, peer_table.as_ref())?
                .into_iter()
                .map(Record::TableDumpEntry)
                .collect()
        }
        TableDumpV2Type::RibGeneric
        | TableDumpV2Type::RibGenericAddPath
        | TableDumpV2Type::GeoPeerTable => {
            return Err(ParserError::UnsupportedMrtType {
                entry_type: u16::from(EntryType::TABLE_DUMP_V2),
                subtype: sub_type,
            })
        }
    };

    Ok(records)
}
