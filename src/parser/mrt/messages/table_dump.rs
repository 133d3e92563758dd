use crate::error::*;
use crate::models::*;
use crate::parser::bgp::attributes::AttributeParser;
use crate::parser::ReadUtils;
use ipnet::IpNet;
use std::net::IpAddr;

/// Parse MRT TABLE_DUMP type message.
///
/// <https://www.rfc-editor.org/rfc/rfc6396#section-4.2>
///
/// ```text
/// The TABLE_DUMP Type does not permit 4-byte Peer AS numbers, nor does
//  it allow the AFI of the peer IP to differ from the AFI of the Prefix
//  field.  The TABLE_DUMP_V2 Type MUST be used in these situations.
/// ```
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |         View Number           |       Sequence Number         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                        Prefix (variable)                      |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// | Prefix Length |    Status     |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                         Originated Time                       |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                    Peer IP Address (variable)                 |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |           Peer AS             |       Attribute Length        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                   BGP Attribute... (variable)
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
pub fn parse_table_dump_message(
    sub_type: u16,
    timestamp: u32,
    mut data: bytes::Bytes,
) -> Result<TableDumpEntry, ParserError> {
    // determine address family based on the sub_type value defined in the MRT [CommonHeader].
    let afi = match sub_type {
        1 => Afi::Ipv4,
        2 => Afi::Ipv6,
        _ => {
            return Err(ParserError::UnsupportedMrtType {
                entry_type: u16::from(EntryType::TABLE_DUMP),
                subtype: sub_type,
            })
        }
    };

    let _view_number = data.read_u16()?;
    let _sequence_number = data.read_u16()?;
    let address = data.read_address(&afi)?;
    let prefix_len = data.read_u8()?;
    let prefix = IpNet::new(address, prefix_len)?;

    let _status = data.read_u8()?;
    let _originated_time = data.read_u32()?;

    let peer_ip: IpAddr = data.read_address(&afi)?;
    let peer_asn = data.read_asn(AsnLength::Bits16)?;

    let attribute_length = data.read_u16()? as usize;
    let attr_data = data.read_n_bytes(attribute_length)?;

    // for TABLE_DUMP type, the AS number length is always 2-byte.
    let parsed = AttributeParser::new(AsnLength::Bits16, false).parse_attributes(attr_data)?;

    Ok(TableDumpEntry {
        version: TableDumpVersion::V1,
        timestamp,
        prefix: NetworkPrefix::new(prefix, None),
        peer_ip,
        peer_asn,
        attributes: parsed.attributes,
    })
}
