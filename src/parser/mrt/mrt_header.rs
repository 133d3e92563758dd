use crate::models::{CommonHeader, EntryType};
use crate::ParserError;
use bytes::Buf;
use std::io::{self, Read};

/// MRT common header [RFC6396][header].
///
/// [header]: https://tools.ietf.org/html/rfc6396#section-4.1
///
/// A MRT record is constructed as the following:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                           Timestamp                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |             Type              |            Subtype            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                             Length                            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                      Message... (variable)
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// With extended timestamp, a 4-byte microsecond timestamp follows the length field and is
/// counted in it.
///
/// Returns `Ok(None)` when the input ends exactly at a record boundary. A header cut short is an
/// [io::ErrorKind::UnexpectedEof] error.
pub fn parse_common_header<T: Read>(input: &mut T) -> Result<Option<CommonHeader>, ParserError> {
    let mut raw_bytes = [0u8; 12];
    let mut filled = 0;
    while filled < raw_bytes.len() {
        match input.read(&mut raw_bytes[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    match filled {
        0 => return Ok(None),
        12 => {}
        n => {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("MRT header truncated after {n} bytes"),
            )
            .into())
        }
    }
    let mut data = &raw_bytes[..];

    let timestamp = data.get_u32();
    let entry_type = data.get_u16();
    let entry_subtype = data.get_u16();
    // the length field does not include the length of the common header
    let mut length = data.get_u32();

    let microsecond_timestamp = match EntryType::try_from(entry_type) {
        Ok(EntryType::BGP4MP_ET | EntryType::ISIS_ET | EntryType::OSPFv3_ET) => {
            if length < 4 {
                return Err(ParserError::InvalidHeader(format!(
                    "extended timestamp record with length {length}"
                )));
            }
            length -= 4;
            let mut raw_bytes = [0u8; 4];
            input.read_exact(&mut raw_bytes)?;
            Some(u32::from_be_bytes(raw_bytes))
        }
        _ => None,
    };

    Ok(Some(CommonHeader {
        timestamp,
        microsecond_timestamp,
        entry_type,
        entry_subtype,
        length,
    }))
}
