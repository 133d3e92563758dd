//! Decoded dump records.
//!
//! A [Record] is one entry of a dump after decoding. MRT entries carrying several routes (a BGP
//! UPDATE announcing many prefixes, a TABLE_DUMP_V2 RIB entry seen by many peers) are expanded
//! into one record per route.
//!
//! The `Display` implementations produce the machine-readable `bgpdump -m` line format.
use crate::models::*;
use itertools::Itertools;
use std::fmt::{Display, Formatter};
use std::net::{IpAddr, Ipv4Addr};

static EMPTY_AS_PATH: AsPath = AsPath {
    segments: Vec::new(),
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Open(OpenRecord),
    KeepAlive(KeepAliveRecord),
    Notification(NotificationRecord),
    StateChange(StateChangeRecord),
    TableDumpEntry(TableDumpEntry),
    UpdateEntry(UpdateEntry),
}

/// BGP OPEN message seen on a monitored session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRecord {
    pub timestamp: u32,
    pub peer_ip: IpAddr,
    pub peer_asn: Asn,
    pub version: u8,
    pub asn: Asn,
    pub hold_time: u16,
    pub bgp_id: Ipv4Addr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeepAliveRecord {
    pub timestamp: u32,
    pub peer_ip: IpAddr,
    pub peer_asn: Asn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRecord {
    pub timestamp: u32,
    pub peer_ip: IpAddr,
    pub peer_asn: Asn,
    pub error_code: u8,
    pub error_subcode: u8,
}

/// Peer session state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChangeRecord {
    pub timestamp: u32,
    pub peer_ip: IpAddr,
    pub peer_asn: Asn,
    pub old_state: BgpState,
    pub new_state: BgpState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableDumpVersion {
    V1,
    V2,
}

/// One route of a RIB snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDumpEntry {
    pub version: TableDumpVersion,
    pub timestamp: u32,
    pub prefix: NetworkPrefix,
    pub peer_ip: IpAddr,
    pub peer_asn: Asn,
    pub attributes: RouteAttributes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteChange {
    Announce(RouteAttributes),
    Withdraw,
}

/// One announced or withdrawn prefix of a BGP UPDATE message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateEntry {
    pub timestamp: u32,
    pub prefix: NetworkPrefix,
    pub peer_ip: IpAddr,
    pub peer_asn: Asn,
    pub change: RouteChange,
}

impl UpdateEntry {
    /// The announced AS path, or an empty path for a withdrawal.
    pub fn as_path(&self) -> &AsPath {
        match &self.change {
            RouteChange::Announce(attributes) => &attributes.as_path,
            RouteChange::Withdraw => &EMPTY_AS_PATH,
        }
    }

    pub fn is_withdraw(&self) -> bool {
        matches!(self.change, RouteChange::Withdraw)
    }
}

/// Writes the attribute columns shared by table dump and announcement lines, including the
/// trailing separator.
fn write_route_attributes(f: &mut Formatter<'_>, attributes: &RouteAttributes) -> std::fmt::Result {
    let origin = attributes.origin.map(|o| o.to_string()).unwrap_or_default();
    let next_hop = attributes
        .next_hop
        .map(|n| n.to_string())
        .unwrap_or_default();
    let aggregator = attributes
        .aggregator
        .map(|a| a.to_string())
        .unwrap_or_default();
    write!(
        f,
        "{}|{}|{}|{}|{}|{}|{}|{}|",
        attributes.as_path,
        origin,
        next_hop,
        attributes.local_pref.unwrap_or(0),
        attributes.med.unwrap_or(0),
        attributes.communities.iter().join(" "),
        if attributes.atomic_aggregate { "AG" } else { "NAG" },
        aggregator,
    )
}

impl Display for TableDumpEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let tag = match self.version {
            TableDumpVersion::V1 => "TABLE_DUMP",
            TableDumpVersion::V2 => "TABLE_DUMP2",
        };
        write!(
            f,
            "{}|{}|B|{}|{}|{}|",
            tag, self.timestamp, self.peer_ip, self.peer_asn, self.prefix
        )?;
        write_route_attributes(f, &self.attributes)
    }
}

impl Display for UpdateEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.change {
            RouteChange::Announce(attributes) => {
                write!(
                    f,
                    "BGP4MP|{}|A|{}|{}|{}|",
                    self.timestamp, self.peer_ip, self.peer_asn, self.prefix
                )?;
                write_route_attributes(f, attributes)
            }
            RouteChange::Withdraw => write!(
                f,
                "BGP4MP|{}|W|{}|{}|{}",
                self.timestamp, self.peer_ip, self.peer_asn, self.prefix
            ),
        }
    }
}

impl Display for StateChangeRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BGP4MP|{}|STATE|{}|{}|{}|{}",
            self.timestamp, self.peer_ip, self.peer_asn, self.old_state, self.new_state
        )
    }
}

impl Display for OpenRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BGP4MP|{}|OPEN|{}|{}|{}|{}|{}|{}",
            self.timestamp,
            self.peer_ip,
            self.peer_asn,
            self.version,
            self.asn,
            self.hold_time,
            self.bgp_id
        )
    }
}

impl Display for KeepAliveRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BGP4MP|{}|KEEPALIVE|{}|{}",
            self.timestamp, self.peer_ip, self.peer_asn
        )
    }
}

impl Display for NotificationRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BGP4MP|{}|NOTIFICATION|{}|{}|{}|{}",
            self.timestamp, self.peer_ip, self.peer_asn, self.error_code, self.error_subcode
        )
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Record::Open(r) => Display::fmt(r, f),
            Record::KeepAlive(r) => Display::fmt(r, f),
            Record::Notification(r) => Display::fmt(r, f),
            Record::StateChange(r) => Display::fmt(r, f),
            Record::TableDumpEntry(r) => Display::fmt(r, f),
            Record::UpdateEntry(r) => Display::fmt(r, f),
        }
    }
}
