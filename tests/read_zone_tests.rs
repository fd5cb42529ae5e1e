use std::io::Cursor;

use chrono::{Local, TimeZone as _};
use hickory_proto::rr::RecordType;
use zonetool::format::FormatFlags;
use zonetool::rr::{Record, SerialNumber, Zone};
use zonetool::zonefile::{parse_zone, read_zone, read_zone_file};
use zonetool::{ReadZoneOptions, SerialPolicy, ZoneError};

mod support;
use support::{SIGNED_ZONE, capture, subscribe, write_file};

fn signed_zone() -> Zone {
    parse_zone(SIGNED_ZONE, None).unwrap()
}

fn output(options: &ReadZoneOptions, zone: Zone) -> String {
    let now = Local.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let zone = options.process_at(zone, now);

    let mut out = Vec::new();
    options.write_zone(&mut out, &zone).unwrap();
    String::from_utf8(out).unwrap()
}

fn owner_and_type(record: &Record) -> (String, RecordType) {
    (record.name().to_string(), record.record_type())
}

#[test]
fn read_zone_from_file() {
    subscribe();
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "example.com.zone", SIGNED_ZONE);

    let zone = read_zone_file(&path, None).unwrap();
    assert_eq!(zone.origin().to_string(), "example.com.");
    assert_eq!(zone.serial(), Some(SerialNumber::from(2024010100)));
    assert_eq!(zone.records().len(), 8);

    let text = output(&ReadZoneOptions::default(), zone);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 9);
    assert!(lines[0].starts_with("example.com.\t3600\tIN\tSOA\t"));
}

#[test]
fn read_zone_from_reader() {
    subscribe();
    let zone = read_zone(Cursor::new(SIGNED_ZONE), None).unwrap();
    assert_eq!(zone, signed_zone());
}

#[test]
fn read_zone_parse_error() {
    subscribe();
    let dir = tempfile::tempdir().unwrap();
    let text = format!("{SIGNED_ZONE}bad IN A 192.0.2.256\n");
    let path = write_file(dir.path(), "broken.zone", &text);

    match read_zone_file(&path, None) {
        Err(ZoneError::Parse(error)) => assert_eq!(error.line(), Some(17)),
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn strip_dnssec_records() {
    subscribe();
    let mut options = ReadZoneOptions::new();
    options.set_strip(true);

    let text = output(&options, signed_zone());
    assert_eq!(text.lines().count(), 6);
    assert!(!text.contains("\tRRSIG\t"));
    assert!(!text.contains("\tNSEC\t"));
}

#[test]
fn only_dnssec_records() {
    subscribe();
    let mut options = ReadZoneOptions::new();
    options.set_only_dnssec(true).set_print_soa(false);

    let text = output(&options, signed_zone());
    let types: Vec<&str> = text
        .lines()
        .map(|line| line.split('\t').nth(3).unwrap())
        .collect();

    assert_eq!(types.len(), 3);
    assert!(types.iter().all(|ty| *ty == "RRSIG" || *ty == "NSEC"));
}

#[test]
fn strip_and_only_dnssec_is_sparse() {
    subscribe();
    let mut options = ReadZoneOptions::new();
    options.set_strip(true).set_only_dnssec(true);
    assert!(options.conflict().is_some());

    let (text, logs) = capture(|| output(&options, signed_zone()));
    assert_eq!(text.lines().count(), 1);
    assert!(text.contains("\tSOA\t"));
    assert!(logs.contains("WARN"), "{logs}");
    assert!(
        logs.contains("stripping both DNSSEC and non-DNSSEC records. Output will be sparse."),
        "{logs}"
    );
}

#[test]
fn single_filter_does_not_warn() {
    let mut options = ReadZoneOptions::new();
    options.set_strip(true);

    let (_, logs) = capture(|| output(&options, signed_zone()));
    assert!(!logs.contains("WARN"), "{logs}");
}

#[test]
fn file_order_and_duplicates_survive_output() {
    subscribe();
    let text = "\
$ORIGIN example.com.
@      3600 IN SOA ns1 hostmaster 1 7200 3600 1209600 300
zeta   300  IN A   192.0.2.9
alpha  300  IN A   192.0.2.1
zeta   300  IN A   192.0.2.9
alpha  300  IN TXT \"second\"
";
    let mut options = ReadZoneOptions::new();
    options.set_print_soa(false);

    let printed = output(&options, parse_zone(text, None).unwrap());
    let owners: Vec<&str> = printed
        .lines()
        .map(|line| line.split('\t').next().unwrap())
        .collect();
    assert_eq!(
        owners,
        vec![
            "zeta.example.com.",
            "alpha.example.com.",
            "zeta.example.com.",
            "alpha.example.com.",
        ]
    );
}

#[test]
fn soa_ttl_is_printed_as_written() {
    subscribe();
    let text = "example.com. 7200 IN SOA ns1.example.com. hostmaster.example.com. 1 3600 600 99999 300\n";

    let printed = output(&ReadZoneOptions::default(), parse_zone(text, None).unwrap());
    assert!(printed.starts_with("example.com.\t7200\tIN\tSOA\t"), "{printed}");
}

#[test]
fn sort_in_canonical_order() {
    subscribe();
    let mut options = ReadZoneOptions::new();
    options.set_strip(true).set_sort(true);

    let now = Local.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let zone = options.process_at(signed_zone(), now);
    let order: Vec<(String, RecordType)> = zone.records().iter().map(owner_and_type).collect();

    assert_eq!(
        order,
        vec![
            ("example.com.".to_string(), RecordType::NS),
            ("example.com.".to_string(), RecordType::MX),
            ("mail.example.com.".to_string(), RecordType::A),
            ("ns1.example.com.".to_string(), RecordType::A),
            ("www.example.com.".to_string(), RecordType::A),
        ]
    );
}

#[test]
fn sorted_output_reads_back_in_the_same_order() {
    subscribe();
    let mut options = ReadZoneOptions::new();
    options.set_strip(true).set_sort(true);

    let first = output(&options, signed_zone());
    let second = output(&options, parse_zone(&first, None).unwrap());
    assert_eq!(first, second);
}

#[test]
fn serial_increment() {
    subscribe();
    let mut options = ReadZoneOptions::new();
    options.set_serial_policy(SerialPolicy::Offset(1));

    let text = output(&options, signed_zone());
    let soa = text.lines().next().unwrap();
    assert!(soa.contains(" 2024010101 "), "{soa}");
    assert!(!text.contains("\tRRSIG\t"));
}

#[test]
fn serial_date_counter_on_same_day() {
    subscribe();
    let mut options = ReadZoneOptions::new();
    options.set_serial_policy("YYYYMMDDxx".parse().unwrap());

    let text = output(&options, signed_zone());
    assert!(text.lines().next().unwrap().contains(" 2024010101 "));
}

#[test]
fn serial_untouched_without_soa() {
    subscribe();
    let mut options = ReadZoneOptions::new();
    options
        .set_serial_policy(SerialPolicy::Offset(5))
        .set_print_soa(false);

    let text = output(&options, signed_zone());
    assert!(!text.contains("\tSOA\t"));
    assert_eq!(text.lines().count(), 5);
}

#[test]
fn zeroize_signatures() {
    subscribe();
    let mut options = ReadZoneOptions::new();
    options.format_mut().set_flags(FormatFlags {
        zeroize_rrsig: true,
        ..FormatFlags::default()
    });

    let text = output(&options, signed_zone());
    let rrsigs: Vec<&str> = text.lines().filter(|line| line.contains("\tRRSIG\t")).collect();

    assert_eq!(rrsigs.len(), 2);
    for line in rrsigs {
        assert_eq!(line.matches("(null)").count(), 3, "{line}");
        assert!(!line.contains("AQIDBA=="));
    }
}

#[test]
fn unknown_type_format() {
    subscribe();
    let mut options = ReadZoneOptions::new();
    options.set_strip(true);
    options.format_mut().mark_unknown_type(RecordType::A);

    let text = output(&options, signed_zone());
    assert!(text.contains("\tTYPE1\t\\# 4 c0000250"), "{text}");
    assert!(text.contains("\tMX\t"));
}

#[test]
fn unknown_type_output_reads_back() {
    subscribe();
    let mut options = ReadZoneOptions::new();
    options.set_strip(true);
    options.format_mut().mark_unknown_type(RecordType::A);

    let first = output(&options, signed_zone());
    let reread = parse_zone(&first, None).unwrap();
    assert_eq!(reread.len(), signed_zone().len() - 3);
    assert!(
        reread
            .records()
            .iter()
            .any(|record| record.record_type() == RecordType::A)
    );

    let second = output(&options, reread);
    assert_eq!(first, second);
}

#[test]
fn private_type_reads_back() {
    subscribe();
    let text = "example.com. 300 IN TYPE65534 \\# 4 c0000201\n";

    let printed = output(&ReadZoneOptions::default(), parse_zone(text, None).unwrap());
    assert_eq!(printed, "example.com.\t300\tIN\tTYPE65534\t\\# 4 c0000201\n");
}
