mod attr_01_origin;
mod attr_02_17_as_path;
mod attr_03_next_hop;
mod attr_07_18_aggregator;
mod attr_08_communities;
mod attr_14_15_nlri;

use bytes::{Buf, Bytes};
use log::debug;

use crate::models::*;

use crate::error::ParserError;
use crate::parser::bgp::attributes::attr_01_origin::parse_origin;
use crate::parser::bgp::attributes::attr_02_17_as_path::parse_as_path;
use crate::parser::bgp::attributes::attr_03_next_hop::parse_next_hop;
use crate::parser::bgp::attributes::attr_07_18_aggregator::parse_aggregator;
use crate::parser::bgp::attributes::attr_08_communities::parse_regular_communities;
use crate::parser::bgp::attributes::attr_14_15_nlri::{parse_mp_reach, parse_mp_unreach};
use crate::parser::ReadUtils;

pub use attr_14_15_nlri::MpReach;

/// Path attributes of one UPDATE message or RIB entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedAttributes {
    /// Route attributes with AS4_PATH and AS4_AGGREGATOR already folded in.
    pub attributes: RouteAttributes,
    pub mp_reach: Option<MpReach>,
    pub mp_unreach: Vec<NetworkPrefix>,
}

pub struct AttributeParser {
    asn_len: AsnLength,
    additional_paths: bool,
    rib_entry: bool,
}

impl AttributeParser {
    /// Parser for attributes of a BGP UPDATE exchanged over a session using `asn_len` AS numbers.
    pub fn new(asn_len: AsnLength, has_add_path: bool) -> AttributeParser {
        AttributeParser {
            asn_len,
            additional_paths: has_add_path,
            rib_entry: false,
        }
    }

    /// Parser for attributes of a TABLE_DUMP_V2 RIB entry, which always use 4-octet AS numbers and
    /// an abbreviated MP_REACH_NLRI.
    pub fn for_rib_entry() -> AttributeParser {
        AttributeParser {
            asn_len: AsnLength::Bits32,
            additional_paths: false,
            rib_entry: true,
        }
    }

    /// Parse BGP attributes.
    ///
    /// The `data` contains the entirety of the attributes bytes, therefore the size of the buffer
    /// is the total byte length of the attributes section of the message.
    pub fn parse_attributes(&self, mut data: Bytes) -> Result<ParsedAttributes, ParserError> {
        let mut parsed = ParsedAttributes::default();
        let mut as4_path: Option<AsPath> = None;
        let mut as4_aggregator: Option<Aggregator> = None;

        while data.remaining() > 0 {
            let flag = AttrFlags::from_bits_retain(data.read_u8()?);
            let attr_type = data.read_u8()?;
            let attr_length = match flag.contains(AttrFlags::EXTENDED) {
                false => data.read_u8()? as usize,
                true => data.read_u16()? as usize,
            };
            data.has_n_remaining(attr_length)?;
            let attr_data = data.split_to(attr_length);

            let attr_type = match AttrType::try_from(attr_type) {
                Ok(t) => t,
                Err(_) => {
                    debug!(
                        "skipping attribute type {} of length {}",
                        attr_type, attr_length
                    );
                    continue;
                }
            };

            let attributes = &mut parsed.attributes;
            let result = match attr_type {
                AttrType::ORIGIN => parse_origin(attr_data).map(|v| attributes.origin = Some(v)),
                AttrType::AS_PATH => {
                    parse_as_path(attr_data, self.asn_len).map(|v| attributes.as_path = v)
                }
                AttrType::NEXT_HOP => {
                    parse_next_hop(attr_data).map(|v| attributes.next_hop = Some(v))
                }
                AttrType::MULTI_EXIT_DISCRIMINATOR => {
                    parse_u32_attribute(attr_data, "MULTI_EXIT_DISC")
                        .map(|v| attributes.med = Some(v))
                }
                AttrType::LOCAL_PREFERENCE => parse_u32_attribute(attr_data, "LOCAL_PREF")
                    .map(|v| attributes.local_pref = Some(v)),
                AttrType::ATOMIC_AGGREGATE => {
                    attributes.atomic_aggregate = true;
                    Ok(())
                }
                AttrType::AGGREGATOR => parse_aggregator(attr_data, self.asn_len)
                    .map(|v| attributes.aggregator = Some(v)),
                AttrType::COMMUNITIES => {
                    parse_regular_communities(attr_data).map(|v| attributes.communities = v)
                }
                AttrType::MP_REACHABLE_NLRI => {
                    parse_mp_reach(attr_data, self.additional_paths, self.rib_entry)
                        .map(|v| parsed.mp_reach = v)
                }
                AttrType::MP_UNREACHABLE_NLRI => {
                    parse_mp_unreach(attr_data, self.additional_paths)
                        .map(|v| parsed.mp_unreach = v)
                }
                AttrType::AS4_PATH => {
                    parse_as_path(attr_data, AsnLength::Bits32).map(|v| as4_path = Some(v))
                }
                AttrType::AS4_AGGREGATOR => {
                    if attr_length != 8 {
                        Err(ParserError::ParseError(format!(
                            "AS4_AGGREGATOR attribute length is invalid: found {attr_length}, should be 8"
                        )))
                    } else {
                        parse_aggregator(attr_data, AsnLength::Bits32)
                            .map(|v| as4_aggregator = Some(v))
                    }
                }
            };

            match result {
                Ok(()) => {}
                Err(e) if flag.contains(AttrFlags::PARTIAL) => {
                    // it's ok to have errors when reading partial bytes
                    debug!("PARTIAL {:?} attribute dropped: {}", attr_type, e);
                }
                Err(e) => return Err(e),
            }
        }

        self.reconcile_as4(&mut parsed.attributes, as4_path, as4_aggregator)?;
        Ok(parsed)
    }

    /// Folds AS4_PATH and AS4_AGGREGATOR into the route attributes.
    ///
    /// <https://datatracker.ietf.org/doc/html/rfc6793#section-4.2.3>
    fn reconcile_as4(
        &self,
        attributes: &mut RouteAttributes,
        as4_path: Option<AsPath>,
        as4_aggregator: Option<Aggregator>,
    ) -> Result<(), ParserError> {
        if as4_path.is_none() && as4_aggregator.is_none() {
            return Ok(());
        }

        if self.asn_len == AsnLength::Bits32 {
            // a NEW BGP speaker never sends these to another NEW speaker
            if self.rib_entry {
                debug!("ignoring AS4_PATH/AS4_AGGREGATOR in RIB entry");
                return Ok(());
            }
            return Err(ParserError::As4Violation(
                "AS4_PATH or AS4_AGGREGATOR received over a 4-octet AS session".to_string(),
            ));
        }

        if let Some(as4_aggregator) = as4_aggregator {
            match attributes.aggregator {
                Some(aggregator) if aggregator.asn != AS_TRANS => {
                    debug!(
                        "AGGREGATOR AS {} is not AS_TRANS, ignoring AS4_AGGREGATOR and AS4_PATH",
                        aggregator.asn
                    );
                    return Ok(());
                }
                _ => attributes.aggregator = Some(as4_aggregator),
            }
        }

        if let Some(as4_path) = as4_path {
            match AsPath::merge_aspath_as4path(&attributes.as_path, &as4_path) {
                Some(merged) => attributes.as_path = merged,
                None => {
                    return Err(ParserError::As4Violation(format!(
                        "AS4_PATH '{}' is longer than AS_PATH '{}'",
                        as4_path, attributes.as_path
                    )))
                }
            }
        }

        Ok(())
    }
}

fn parse_u32_attribute(mut input: Bytes, name: &str) -> Result<u32, ParserError> {
    if input.remaining() != 4 {
        return Err(ParserError::ParseError(format!(
            "{} attribute length is invalid: found {}, should be 4",
            name,
            input.remaining()
        )));
    }
    input.read_u32()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::IpAddr;
    use std::str::FromStr;

    fn attr(flags: u8, attr_type: u8, value: &[u8]) -> Vec<u8> {
        let mut out = vec![flags, attr_type, value.len() as u8];
        out.extend_from_slice(value);
        out
    }

    fn as_path_16(asns: &[u16]) -> Vec<u8> {
        let mut out = vec![2, asns.len() as u8];
        for asn in asns {
            out.extend_from_slice(&asn.to_be_bytes());
        }
        out
    }

    fn as_path_32(asns: &[u32]) -> Vec<u8> {
        let mut out = vec![2, asns.len() as u8];
        for asn in asns {
            out.extend_from_slice(&asn.to_be_bytes());
        }
        out
    }

    #[test]
    fn test_parse_route_attributes() {
        let mut data = vec![];
        data.extend(attr(0x40, 1, &[0]));
        data.extend(attr(0x40, 2, &as_path_32(&[65001, 3356])));
        data.extend(attr(0x40, 3, &[192, 0, 2, 1]));
        data.extend(attr(0x80, 4, &[0, 0, 0, 10]));
        data.extend(attr(0x40, 5, &[0, 0, 0, 100]));
        data.extend(attr(0x40, 6, &[]));
        data.extend(attr(0xC0, 7, &[0, 0, 0x0D, 0x1C, 10, 0, 0, 1]));
        data.extend(attr(0xC0, 8, &[0x0D, 0x1C, 0x00, 0x64]));
        // ORIGINATOR_ID, skipped
        data.extend(attr(0x80, 9, &[1, 2, 3, 4]));

        let parsed = AttributeParser::new(AsnLength::Bits32, false)
            .parse_attributes(Bytes::from(data))
            .unwrap();
        let attributes = parsed.attributes;
        assert_eq!(attributes.origin, Some(Origin::IGP));
        assert_eq!(attributes.as_path, AsPath::from_sequence([65001, 3356]));
        assert_eq!(
            attributes.next_hop,
            Some(IpAddr::from_str("192.0.2.1").unwrap())
        );
        assert_eq!(attributes.med, Some(10));
        assert_eq!(attributes.local_pref, Some(100));
        assert!(attributes.atomic_aggregate);
        assert_eq!(attributes.aggregator.unwrap().asn, Asn::from(3356));
        assert_eq!(
            attributes.communities,
            vec![Community::Custom(Asn::from(3356), 100)]
        );
        assert!(parsed.mp_reach.is_none());
    }

    #[test]
    fn test_extended_length_attribute() {
        let path = as_path_16(&[1, 2]);
        let mut data = vec![0x50, 2, 0, path.len() as u8];
        data.extend(path);
        let parsed = AttributeParser::new(AsnLength::Bits16, false)
            .parse_attributes(Bytes::from(data))
            .unwrap();
        assert_eq!(parsed.attributes.as_path, AsPath::from_sequence([1, 2]));
    }

    #[test]
    fn test_truncated_attribute() {
        let data = vec![0x40, 1, 4, 0];
        assert!(matches!(
            AttributeParser::new(AsnLength::Bits32, false).parse_attributes(Bytes::from(data)),
            Err(ParserError::NotEnoughBytes { .. })
        ));
    }

    #[test]
    fn test_as4_path_merge() {
        let mut data = vec![];
        data.extend(attr(0x40, 2, &as_path_16(&[65001, 23456, 23456])));
        data.extend(attr(0xC0, 17, &as_path_32(&[4200000000, 4200000001])));
        let parsed = AttributeParser::new(AsnLength::Bits16, false)
            .parse_attributes(Bytes::from(data))
            .unwrap();
        assert_eq!(
            parsed.attributes.as_path,
            AsPath::from_sequence([65001, 4200000000, 4200000001])
        );
    }

    #[test]
    fn test_as4_path_longer_than_as_path() {
        let mut data = vec![];
        data.extend(attr(0x40, 2, &as_path_16(&[23456])));
        data.extend(attr(0xC0, 17, &as_path_32(&[4200000000, 4200000001])));
        let err = AttributeParser::new(AsnLength::Bits16, false)
            .parse_attributes(Bytes::from(data))
            .unwrap_err();
        assert!(matches!(err, ParserError::As4Violation(_)));
        assert!(err.is_protocol_violation());
    }

    #[test]
    fn test_as4_attributes_in_as4_session() {
        let mut data = vec![];
        data.extend(attr(0x40, 2, &as_path_32(&[4200000000])));
        data.extend(attr(0xC0, 17, &as_path_32(&[4200000000])));
        let bytes = Bytes::from(data);

        assert!(matches!(
            AttributeParser::new(AsnLength::Bits32, false).parse_attributes(bytes.clone()),
            Err(ParserError::As4Violation(_))
        ));
        let parsed = AttributeParser::for_rib_entry()
            .parse_attributes(bytes)
            .unwrap();
        assert_eq!(parsed.attributes.as_path, AsPath::from_sequence([4200000000]));
    }

    #[test]
    fn test_as4_aggregator() {
        let mut data = vec![];
        data.extend(attr(0x40, 2, &as_path_16(&[23456])));
        data.extend(attr(0xC0, 7, &[0x5B, 0xA0, 10, 0, 0, 1]));
        data.extend(attr(0xC0, 18, &[0xFA, 0x56, 0xEA, 0x00, 10, 0, 0, 1]));
        data.extend(attr(0xC0, 17, &as_path_32(&[4200000000])));
        let parsed = AttributeParser::new(AsnLength::Bits16, false)
            .parse_attributes(Bytes::from(data))
            .unwrap();
        assert_eq!(
            parsed.attributes.aggregator.unwrap().asn,
            Asn::from(4200000000)
        );
        assert_eq!(parsed.attributes.as_path, AsPath::from_sequence([4200000000]));

        // AGGREGATOR not AS_TRANS: both AS4 attributes are ignored
        let mut data = vec![];
        data.extend(attr(0x40, 2, &as_path_16(&[23456])));
        data.extend(attr(0xC0, 7, &[0x0D, 0x1C, 10, 0, 0, 1]));
        data.extend(attr(0xC0, 18, &[0xFA, 0x56, 0xEA, 0x00, 10, 0, 0, 1]));
        data.extend(attr(0xC0, 17, &as_path_32(&[4200000000])));
        let parsed = AttributeParser::new(AsnLength::Bits16, false)
            .parse_attributes(Bytes::from(data))
            .unwrap();
        assert_eq!(parsed.attributes.aggregator.unwrap().asn, Asn::from(3356));
        assert_eq!(parsed.attributes.as_path, AsPath::from_sequence([23456]));
    }

    #[test]
    fn test_partial_attribute_error_is_dropped() {
        // malformed COMMUNITIES flagged partial
        let data = attr(0xE0, 8, &[0, 1, 2]);
        let parsed = AttributeParser::new(AsnLength::Bits32, false)
            .parse_attributes(Bytes::from(data))
            .unwrap();
        assert!(parsed.attributes.communities.is_empty());
    }
}
