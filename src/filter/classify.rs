use crate::models::*;
use std::net::IpAddr;

/// What the filter does with a record, decided from its variant alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification<'a> {
    /// Session control messages are never printed.
    Skip,
    /// Printed only in legacy mode, subject to the peer filter alone.
    LegacyOnly(&'a StateChangeRecord),
    /// Route data subject to the whole filter chain.
    Filterable(FilterableRecord<'a>),
}

/// The fields of a route record the filter chain looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterableRecord<'a> {
    pub prefix: &'a NetworkPrefix,
    pub peer: IpAddr,
    pub as_path: &'a AsPath,
}

pub fn classify(record: &Record) -> Classification<'_> {
    match record {
        Record::Open(_) | Record::KeepAlive(_) | Record::Notification(_) => Classification::Skip,
        Record::StateChange(r) => Classification::LegacyOnly(r),
        Record::TableDumpEntry(r) => Classification::Filterable(FilterableRecord {
            prefix: &r.prefix,
            peer: r.peer_ip,
            as_path: &r.attributes.as_path,
        }),
        Record::UpdateEntry(r) => Classification::Filterable(FilterableRecord {
            prefix: &r.prefix,
            peer: r.peer_ip,
            as_path: r.as_path(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn peer() -> IpAddr {
        IpAddr::from_str("192.0.2.1").unwrap()
    }

    #[test]
    fn test_control_records_are_skipped() {
        let keepalive = Record::KeepAlive(KeepAliveRecord {
            timestamp: 0,
            peer_ip: peer(),
            peer_asn: Asn::from(1),
        });
        assert_eq!(classify(&keepalive), Classification::Skip);

        let notification = Record::Notification(NotificationRecord {
            timestamp: 0,
            peer_ip: peer(),
            peer_asn: Asn::from(1),
            error_code: 6,
            error_subcode: 4,
        });
        assert_eq!(classify(&notification), Classification::Skip);

        let open = Record::Open(OpenRecord {
            timestamp: 0,
            peer_ip: peer(),
            peer_asn: Asn::from(1),
            version: 4,
            asn: Asn::from(1),
            hold_time: 90,
            bgp_id: std::net::Ipv4Addr::new(10, 0, 0, 1),
        });
        assert_eq!(classify(&open), Classification::Skip);
    }

    #[test]
    fn test_state_change_is_legacy_only() {
        let state = StateChangeRecord {
            timestamp: 0,
            peer_ip: peer(),
            peer_asn: Asn::from(1),
            old_state: BgpState::Active,
            new_state: BgpState::Idle,
        };
        let record = Record::StateChange(state.clone());
        assert_eq!(classify(&record), Classification::LegacyOnly(&state));
    }

    #[test]
    fn test_withdraw_has_empty_path() {
        let record = Record::UpdateEntry(UpdateEntry {
            timestamp: 0,
            prefix: NetworkPrefix::from_str("10.0.0.0/8").unwrap(),
            peer_ip: peer(),
            peer_asn: Asn::from(1),
            change: RouteChange::Withdraw,
        });
        match classify(&record) {
            Classification::Filterable(r) => {
                assert!(r.as_path.is_empty());
                assert_eq!(r.peer, peer());
                assert!(r.prefix.is_ipv4());
            }
            other => panic!("unexpected classification {other:?}"),
        }
    }
}
