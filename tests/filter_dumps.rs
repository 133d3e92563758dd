//! End-to-end runs over MRT files written to a temporary directory.
use bytes::{BufMut, BytesMut};
use mrtfilter::models::Asn;
use mrtfilter::{FilterConfig, MrtOpener, Runner, SourceOutcome};
use std::path::Path;

const PEER: [u8; 4] = [192, 0, 2, 1];
const LOCAL: [u8; 4] = [192, 0, 2, 254];

fn mrt_record(timestamp: u32, entry_type: u16, subtype: u16, body: &[u8]) -> Vec<u8> {
    let mut buf = BytesMut::new();
    buf.put_u32(timestamp);
    buf.put_u16(entry_type);
    buf.put_u16(subtype);
    buf.put_u32(body.len() as u32);
    buf.put_slice(body);
    buf.to_vec()
}

/// BGP4MP_MESSAGE_AS4 wrapping a BGP message of the given type.
fn bgp4mp_message(timestamp: u32, msg_type: u8, msg: &[u8]) -> Vec<u8> {
    let mut buf = BytesMut::new();
    buf.put_u32(64500); // peer AS
    buf.put_u32(64511); // local AS
    buf.put_u16(0);
    buf.put_u16(1);
    buf.put_slice(&PEER);
    buf.put_slice(&LOCAL);
    buf.put_slice(&[0xFF; 16]);
    buf.put_u16(19 + msg.len() as u16);
    buf.put_u8(msg_type);
    buf.put_slice(msg);
    mrt_record(timestamp, 16, 4, &buf)
}

fn as_path_attribute(path: &[u32]) -> Vec<u8> {
    let mut buf = BytesMut::new();
    buf.put_u8(2); // AS_SEQUENCE
    buf.put_u8(path.len() as u8);
    for asn in path {
        buf.put_u32(*asn);
    }
    let mut attr = vec![0x40, 2, buf.len() as u8];
    attr.extend_from_slice(&buf);
    attr
}

fn route_attributes(path: &[u32]) -> Vec<u8> {
    let mut attrs = vec![0x40, 1, 1, 0];
    attrs.extend(as_path_attribute(path));
    attrs.extend_from_slice(&[0x40, 3, 4]);
    attrs.extend_from_slice(&PEER);
    attrs
}

/// UPDATE announcing IPv4 prefixes given as (length, significant octets).
fn announcement(timestamp: u32, path: &[u32], nlri: &[(u8, &[u8])]) -> Vec<u8> {
    let attrs = route_attributes(path);
    let mut msg = BytesMut::new();
    msg.put_u16(0);
    msg.put_u16(attrs.len() as u16);
    msg.put_slice(&attrs);
    for (len, octets) in nlri {
        msg.put_u8(*len);
        msg.put_slice(octets);
    }
    bgp4mp_message(timestamp, 2, &msg)
}

fn withdrawal(timestamp: u32, len: u8, octets: &[u8]) -> Vec<u8> {
    let mut msg = BytesMut::new();
    msg.put_u16(1 + octets.len() as u16);
    msg.put_u8(len);
    msg.put_slice(octets);
    msg.put_u16(0);
    bgp4mp_message(timestamp, 2, &msg)
}

fn state_change(timestamp: u32, peer: [u8; 4], old: u16, new: u16) -> Vec<u8> {
    let mut buf = BytesMut::new();
    buf.put_u16(64500);
    buf.put_u16(64511);
    buf.put_u16(0);
    buf.put_u16(1);
    buf.put_slice(&peer);
    buf.put_slice(&LOCAL);
    buf.put_u16(old);
    buf.put_u16(new);
    mrt_record(timestamp, 16, 0, &buf)
}

fn write_dump(dir: &Path, name: &str, records: &[Vec<u8>]) -> String {
    let path = dir.join(name);
    std::fs::write(&path, records.concat()).unwrap();
    path.to_str().unwrap().to_string()
}

fn run(config: &FilterConfig, sources: &[String]) -> (String, String) {
    let mut runner = Runner::new(config, Vec::new(), Vec::new());
    runner.run(&MrtOpener, sources).unwrap();
    let (out, err) = runner.into_inner();
    (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
}

#[test]
fn test_resilience_across_sources() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_dump(
        dir.path(),
        "first.mrt",
        &[announcement(100, &[64500, 13335], &[(24, &[1, 1, 1])])],
    );
    let missing = dir.path().join("missing.mrt").to_str().unwrap().to_string();
    let third = write_dump(
        dir.path(),
        "third.mrt",
        &[
            // BGP message type 9 does not exist
            bgp4mp_message(200, 9, &[]),
            announcement(201, &[64500, 13335], &[(24, &[1, 0, 0])]),
            announcement(202, &[64500, 13335], &[(16, &[10, 1])]),
        ],
    );
    let sources = vec![first, missing.clone(), third.clone()];

    let (out, err) = run(&FilterConfig::default(), &sources);
    assert_eq!(
        out.lines().collect::<Vec<_>>(),
        vec![
            "BGP4MP|100|A|192.0.2.1|64500|1.1.1.0/24|64500 13335|IGP|192.0.2.1|0|0||NAG||",
            "BGP4MP|201|A|192.0.2.1|64500|1.0.0.0/24|64500 13335|IGP|192.0.2.1|0|0||NAG||",
            "BGP4MP|202|A|192.0.2.1|64500|10.1.0.0/16|64500 13335|IGP|192.0.2.1|0|0||NAG||",
        ]
    );
    assert_eq!(err, format!("File not found: {}\n", missing));

    let config = FilterConfig::builder()
        .report_violations(true)
        .build()
        .unwrap();
    let (verbose_out, err) = run(&config, &sources);
    assert_eq!(verbose_out, out);
    let lines: Vec<&str> = err.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], format!("File not found: {}", missing));
    assert_eq!(
        lines[1],
        format!("{}: unrecognized value 9 for BgpMessageType", third)
    );
}

#[test]
fn test_truncated_source_is_aborted() {
    let dir = tempfile::tempdir().unwrap();
    let mut truncated = announcement(100, &[64500, 13335], &[(24, &[1, 1, 1])]);
    truncated.extend(announcement(101, &[64500, 13335], &[(24, &[1, 0, 0])]));
    truncated.truncate(truncated.len() - 5);
    let broken = write_dump(dir.path(), "broken.mrt", &[truncated]);

    let config = FilterConfig::default();
    let mut runner = Runner::new(&config, Vec::new(), Vec::new());
    let outcome = runner.process_source(&MrtOpener, &broken).unwrap();
    assert!(matches!(outcome, SourceOutcome::Aborted(stats) if stats.printed == 1));
    let (out, err) = runner.into_inner();
    assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    assert!(String::from_utf8(err)
        .unwrap()
        .starts_with(&format!("Error reading {}", broken)));
}

#[test]
fn test_legacy_state_changes() {
    let dir = tempfile::tempdir().unwrap();
    let dump = write_dump(
        dir.path(),
        "states.mrt",
        &[
            state_change(10, PEER, 6, 1),
            state_change(11, [192, 0, 2, 2], 1, 2),
            announcement(12, &[64500, 13335], &[(24, &[1, 1, 1])]),
        ],
    );
    let sources = vec![dump];

    let (out, _) = run(&FilterConfig::default(), &sources);
    assert!(!out.contains("STATE"));

    let legacy = FilterConfig::builder()
        .legacy(true)
        .peer(Some("192.0.2.1".parse().unwrap()))
        .originator(Some(Asn::from(3356)))
        .build()
        .unwrap();
    let (out, _) = run(&legacy, &sources);
    assert_eq!(out, "BGP4MP|10|STATE|192.0.2.1|64500|6|1\n");
}

#[test]
fn test_control_records_are_never_printed() {
    let dir = tempfile::tempdir().unwrap();
    let dump = write_dump(
        dir.path(),
        "control.mrt",
        &[
            bgp4mp_message(1, 4, &[]),
            bgp4mp_message(2, 3, &[6, 2]),
            withdrawal(3, 8, &[10]),
        ],
    );
    let legacy = FilterConfig::builder().legacy(true).build().unwrap();
    let (out, err) = run(&legacy, &[dump]);
    assert_eq!(out, "BGP4MP|3|W|192.0.2.1|64500|10.0.0.0/8\n");
    assert!(err.is_empty());
}

#[test]
fn test_path_and_prefix_filters() {
    let dir = tempfile::tempdir().unwrap();
    let dump = write_dump(
        dir.path(),
        "updates.mrt",
        &[
            announcement(1, &[64500, 3356, 13335], &[(24, &[1, 1, 1]), (16, &[10, 1])]),
            announcement(2, &[64500, 174, 15169], &[(24, &[8, 8, 8])]),
            withdrawal(3, 24, &[1, 1, 1]),
        ],
    );
    let sources = vec![dump];

    let traverses = FilterConfig::builder()
        .traverses(Some(Asn::from(3356)))
        .build()
        .unwrap();
    let (out, _) = run(&traverses, &sources);
    assert_eq!(out.lines().count(), 2);
    assert!(out.lines().all(|l| l.contains("64500 3356 13335")));

    let originator = FilterConfig::builder()
        .originator(Some(Asn::from(15169)))
        .traverses(Some(Asn::from(3356)))
        .build()
        .unwrap();
    let (out, _) = run(&originator, &sources);
    assert_eq!(
        out,
        "BGP4MP|2|A|192.0.2.1|64500|8.8.8.0/24|64500 174 15169|IGP|192.0.2.1|0|0||NAG||\n"
    );

    let prefix = FilterConfig::builder()
        .prefix(Some("1.1.1.0/24".parse().unwrap()))
        .build()
        .unwrap();
    let (out, _) = run(&prefix, &sources);
    assert_eq!(
        out.lines().collect::<Vec<_>>(),
        vec![
            "BGP4MP|1|A|192.0.2.1|64500|1.1.1.0/24|64500 3356 13335|IGP|192.0.2.1|0|0||NAG||",
            "BGP4MP|3|W|192.0.2.1|64500|1.1.1.0/24",
        ]
    );

    let ipv6_only = FilterConfig::builder().ipv6_only(true).build().unwrap();
    let (out, _) = run(&ipv6_only, &sources);
    assert!(out.is_empty());
}

#[test]
fn test_rib_dump() {
    let mut peers = BytesMut::new();
    peers.put_u32(0x0A000001);
    peers.put_u16(0);
    peers.put_u16(2);
    for (address, asn) in [([192, 0, 2, 1], 64500u32), ([192, 0, 2, 2], 64501)] {
        peers.put_u8(0x02); // IPv4 address, 32-bit AS
        peers.put_slice(&address);
        peers.put_slice(&address);
        peers.put_u32(asn);
    }

    let mut rib = BytesMut::new();
    rib.put_u32(0);
    rib.put_u8(24);
    rib.put_slice(&[1, 1, 1]);
    rib.put_u16(2);
    for (index, path) in [(0u16, vec![64500, 13335]), (1, vec![64501, 174, 13335])] {
        let attrs = route_attributes(&path);
        rib.put_u16(index);
        rib.put_u32(0);
        rib.put_u16(attrs.len() as u16);
        rib.put_slice(&attrs);
    }

    let dir = tempfile::tempdir().unwrap();
    let dump = write_dump(
        dir.path(),
        "rib.mrt",
        &[mrt_record(500, 13, 1, &peers), mrt_record(500, 13, 2, &rib)],
    );

    let config = FilterConfig::builder()
        .peer(Some("192.0.2.2".parse().unwrap()))
        .build()
        .unwrap();
    let (out, err) = run(&config, &[dump]);
    assert_eq!(
        out,
        "TABLE_DUMP2|500|B|192.0.2.2|64501|1.1.1.0/24|64501 174 13335|IGP|192.0.2.1|0|0||NAG||\n"
    );
    assert!(err.is_empty());
}
