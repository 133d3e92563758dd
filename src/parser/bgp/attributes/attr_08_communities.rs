use crate::models::*;
use crate::parser::ReadUtils;
use crate::ParserError;
use bytes::{Buf, Bytes};

pub fn parse_regular_communities(mut input: Bytes) -> Result<Vec<Community>, ParserError> {
    if !input.remaining().is_multiple_of(4) {
        return Err(ParserError::ParseError(format!(
            "COMMUNITIES attribute length {} is not a multiple of 4",
            input.remaining()
        )));
    }

    let mut communities = Vec::with_capacity(input.remaining() / 4);
    while input.remaining() > 0 {
        communities.push(Community::from(input.read_u32()?));
    }

    Ok(communities)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test parsing of communities values, as defined in RFC1997.
    #[test]
    fn test_parse_communities() {
        let communities = parse_regular_communities(Bytes::from_static(&[
            0xFF, 0xFF, 0xFF, 0x01, // NoExport
            0xFF, 0xFF, 0xFF, 0x02, // NoAdvertise
            0xFF, 0xFF, 0xFF, 0x03, // NoExportSubConfed
            0x00, 0x7B, 0x01, 0xC8, // Custom(123, 456)
        ]))
        .unwrap();

        assert_eq!(
            communities,
            vec![
                Community::NoExport,
                Community::NoAdvertise,
                Community::NoExportSubConfed,
                Community::Custom(Asn::from(123), 456),
            ]
        );
        assert_eq!(communities[3].to_string(), "123:456");
    }

    #[test]
    fn test_parse_communities_bad_length() {
        assert!(parse_regular_communities(Bytes::from_static(&[0xFF, 0xFF, 0xFF])).is_err());
    }
}
