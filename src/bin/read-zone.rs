#![cfg(feature = "cli")]

use std::{
    io::{self, Write as _},
    path::PathBuf,
    process::ExitCode,
};

use clap::{Arg, ArgAction, ArgMatches, arg};
use hickory_proto::rr::RecordType;
use tracing_subscriber::EnvFilter;
use zonetool::{
    ReadZoneOptions, SerialPolicy,
    format::FormatFlags,
    rr::parse_record_type,
    zonefile,
};

fn main() -> ExitCode {
    match read_zone() {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

fn command() -> clap::Command {
    clap::Command::new("read-zone")
        .about("Read a DNS zone file and print it")
        .long_about(
            "Read a DNS zone file and print it, one record per line. \
             Without a file, the zone is read from standard input.",
        )
        .version(env!("CARGO_PKG_VERSION"))
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .short('v')
                .action(ArgAction::Version)
                .help("Print version"),
        )
        .arg(arg!([ZONEFILE] "Zone file to read").value_parser(clap::value_parser!(PathBuf)))
        .arg(flag("b", 'b', "Include bubble babble encoding of DS digests and DNSKEY ids as comments"))
        .arg(flag("0", '0', "Zeroize the timestamps and signature in RRSIG records"))
        .arg(flag("c", 'c', "Canonicalize all resource records"))
        .arg(flag("d", 'd', "Only print DNSSEC data"))
        .arg(flag("n", 'n', "Do not print the SOA record"))
        .arg(flag("p", 'p', "Pad the SOA serial number to ten characters"))
        .arg(flag("s", 's', "Strip DNSSEC data from the zone"))
        .arg(
            Arg::new("S")
                .short('S')
                .value_name("POLICY")
                .allow_hyphen_values(true)
                .help("Update the SOA serial: [+|-]<number>, <number>, YYYYMMDDxx or unixtime (implies -s)")
                .value_parser(clap::value_parser!(SerialPolicy)),
        )
        .arg(
            Arg::new("u")
                .short('u')
                .value_name("TYPE")
                .help("Mark a record type for printing in unknown type format")
                .action(ArgAction::Append)
                .value_parser(parse_record_type),
        )
        .arg(
            Arg::new("U")
                .short('U')
                .value_name("TYPE")
                .help("Unmark a record type for printing in unknown type format")
                .action(ArgAction::Append)
                .value_parser(parse_record_type),
        )
        .arg(flag("z", 'z', "Sort the zone in canonical order (implies -c)"))
}

fn flag(id: &'static str, short: char, help: &'static str) -> Arg {
    Arg::new(id)
        .short(short)
        .action(ArgAction::SetTrue)
        .help(help)
}

fn read_zone() -> Result<(), ()> {
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = command().get_matches();
    let options = options(&args);

    if let Some(conflict) = options.conflict() {
        eprintln!("Warning: {conflict}");
    }

    let zone = match args.get_one::<PathBuf>("ZONEFILE") {
        Some(path) => zonefile::read_zone_file(path, None),
        None => zonefile::read_zone(io::stdin().lock(), None),
    }
    .map_err(|error| {
        eprintln!("Error reading zone: {error}");
    })?;

    let zone = options.process(zone);

    let mut out = io::BufWriter::new(io::stdout().lock());
    options
        .write_zone(&mut out, &zone)
        .and_then(|_| out.flush())
        .map_err(|error| {
            eprintln!("Error writing zone: {error}");
        })
}

fn options(args: &ArgMatches) -> ReadZoneOptions {
    let mut options = ReadZoneOptions::new();
    options
        .set_strip(args.get_flag("s"))
        .set_only_dnssec(args.get_flag("d"))
        .set_canonicalize(args.get_flag("c"))
        .set_sort(args.get_flag("z"))
        .set_print_soa(!args.get_flag("n"));

    if let Some(policy) = args.get_one::<SerialPolicy>("S") {
        options.set_serial_policy(*policy);
    }

    let format = options.format_mut();
    format.set_flags(FormatFlags {
        zeroize_rrsig: args.get_flag("0"),
        pad_soa_serial: args.get_flag("p"),
        bubblebabble: args.get_flag("b"),
    });

    // -u and -U apply in command line order
    for (_, mark, record_type) in type_marks(args) {
        if mark {
            format.mark_unknown_type(record_type);
        } else {
            format.unmark_unknown_type(record_type);
        }
    }

    options
}

fn type_marks(args: &ArgMatches) -> Vec<(usize, bool, RecordType)> {
    let occurrences = |id: &str, mark: bool| -> Vec<(usize, bool, RecordType)> {
        match (args.indices_of(id), args.get_many::<RecordType>(id)) {
            (Some(indices), Some(types)) => indices
                .zip(types)
                .map(|(index, record_type)| (index, mark, *record_type))
                .collect(),
            _ => Vec::new(),
        }
    };

    let mut marks = occurrences("u", true);
    marks.extend(occurrences("U", false));
    marks.sort_by_key(|&(index, _, _)| index);
    marks
}
