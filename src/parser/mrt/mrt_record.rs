use super::mrt_header::parse_common_header;
use crate::error::ParserError;
use crate::models::*;
use crate::parser::mrt::messages::bgp4mp::parse_bgp4mp;
use crate::parser::mrt::messages::table_dump::parse_table_dump_message;
use crate::parser::mrt::messages::table_dump_v2::parse_table_dump_v2_message;
use bytes::Bytes;
use std::io::{self, Read};

/// Reads one MRT record, header and body, without interpreting the body.
///
/// Returns `Ok(None)` at a clean end of input. A body shorter than announced in the header is an
/// [io::ErrorKind::UnexpectedEof] error: the stream is no longer aligned on record boundaries.
pub fn read_raw_record(input: &mut impl Read) -> Result<Option<(CommonHeader, Bytes)>, ParserError> {
    let common_header = match parse_common_header(input)? {
        Some(header) => header,
        None => return Ok(None),
    };

    // read the whole message bytes to buffer; growing the buffer as data arrives keeps a bogus
    // length from allocating gigabytes up front
    let mut buffer = Vec::new();
    let read = input
        .take(common_header.length as u64)
        .read_to_end(&mut buffer)?;
    if read < common_header.length as usize {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!(
                "MRT record body truncated: {} of {} bytes",
                read, common_header.length
            ),
        )
        .into());
    }

    Ok(Some((common_header, Bytes::from(buffer))))
}

/// Parse MRT message body with given common header, expanding it into records.
///
/// `peer_table` is the TABLE_DUMP_V2 peer index table seen so far in this input; a
/// PEER_INDEX_TABLE record replaces it.
pub fn parse_mrt_body(
    header: &CommonHeader,
    data: Bytes,
    peer_table: &mut Option<PeerIndexTable>,
) -> Result<Vec<Record>, ParserError> {
    let unsupported = || ParserError::UnsupportedMrtType {
        entry_type: header.entry_type,
        subtype: header.entry_subtype,
    };
    let etype = EntryType::try_from(header.entry_type).map_err(|_| unsupported())?;

    match etype {
        EntryType::TABLE_DUMP => {
            parse_table_dump_message(header.entry_subtype, header.timestamp, data)
                .map(|entry| vec![Record::TableDumpEntry(entry)])
        }
        EntryType::TABLE_DUMP_V2 => parse_table_dump_v2_message(
            header.entry_subtype,
            header.timestamp,
            data,
            peer_table,
        ),
        EntryType::BGP4MP | EntryType::BGP4MP_ET => {
            parse_bgp4mp(header.entry_subtype, header.timestamp, data)
        }
        _ => Err(unsupported()),
    }
}
