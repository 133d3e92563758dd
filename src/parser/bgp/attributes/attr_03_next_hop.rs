use crate::models::*;
use crate::parser::ReadUtils;
use crate::ParserError;
use bytes::{Buf, Bytes};
use std::net::IpAddr;

/// NEXT_HOP attribute: always an IPv4 address.
pub fn parse_next_hop(mut input: Bytes) -> Result<IpAddr, ParserError> {
    if input.remaining() != 4 {
        return Err(ParserError::ParseError(format!(
            "NEXT_HOP attribute length is invalid: found {}, should be 4",
            input.remaining()
        )));
    }
    input.read_address(&Afi::Ipv4)
}

/// Next hop carried in MP_REACH_NLRI. With a global and a link-local IPv6 address only the global
/// one is kept.
pub fn parse_mp_next_hop(mut input: Bytes) -> Result<Option<IpAddr>, ParserError> {
    let output = match input.len() {
        0 => None,
        4 => Some(input.read_address(&Afi::Ipv4)?),
        16 | 32 => Some(input.read_address(&Afi::Ipv6)?),
        v => {
            return Err(ParserError::ParseError(format!(
                "Invalid next hop length found: {v}"
            )));
        }
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_next_hop() {
        assert_eq!(
            parse_next_hop(Bytes::from_static(&[10, 0, 0, 1])).unwrap(),
            IpAddr::from_str("10.0.0.1").unwrap()
        );
        assert!(parse_next_hop(Bytes::from_static(&[10, 0, 0])).is_err());
    }

    #[test]
    fn test_parse_mp_next_hop() {
        assert_eq!(parse_mp_next_hop(Bytes::new()).unwrap(), None);

        let mut data = vec![0x20, 0x01, 0x0d, 0xb8];
        data.extend_from_slice(&[0; 11]);
        data.push(1);
        // link-local half
        data.extend_from_slice(&[0xfe, 0x80]);
        data.extend_from_slice(&[0; 13]);
        data.push(1);
        assert_eq!(
            parse_mp_next_hop(Bytes::from(data)).unwrap(),
            Some(IpAddr::from_str("2001:db8::1").unwrap())
        );

        assert!(parse_mp_next_hop(Bytes::from_static(&[1, 2, 3, 4, 5])).is_err());
    }
}
