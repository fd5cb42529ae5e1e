#![cfg(feature = "cli")]

use std::{fs, path::PathBuf, process::ExitCode};

use clap::{Arg, ArgAction, ArgMatches, arg};
use tracing_subscriber::EnvFilter;
use zonetool::{DigestAlgorithm, DsRecord, zonefile};

fn main() -> ExitCode {
    match key2ds() {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

fn command() -> clap::Command {
    clap::Command::new("key2ds")
        .about("Generate a DS record from a DNSKEY record")
        .long_about(
            "Generate a DS record from the first DNSKEY record in a key file. \
             The DS record is written to K<name>+<alg>+<id>.ds and the base \
             name is printed on standard output.",
        )
        .version(env!("CARGO_PKG_VERSION"))
        .arg(arg!(<KEYFILE> "File holding the DNSKEY record").value_parser(clap::value_parser!(PathBuf)))
        .arg(
            Arg::new("stdout")
                .short('n')
                .action(ArgAction::SetTrue)
                .help("Write the DS record to standard output instead of a file"),
        )
        .arg(
            Arg::new("sha1")
                .short('1')
                .action(ArgAction::SetTrue)
                .overrides_with("sha256")
                .help("Use SHA1 as the digest algorithm (default)"),
        )
        .arg(
            Arg::new("sha256")
                .short('2')
                .action(ArgAction::SetTrue)
                .overrides_with("sha1")
                .help("Use SHA256 as the digest algorithm"),
        )
}

fn algorithm(args: &ArgMatches) -> DigestAlgorithm {
    if args.get_flag("sha256") {
        DigestAlgorithm::Sha256
    } else {
        DigestAlgorithm::Sha1
    }
}

fn key2ds() -> Result<(), ()> {
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = command().get_matches();
    let keyfile = args
        .get_one::<PathBuf>("KEYFILE")
        .expect("KEYFILE is required");

    let record = zonefile::read_record_file(keyfile, None).map_err(|error| {
        eprintln!("Could not read public key from {}: {error}", keyfile.display());
    })?;

    let ds = DsRecord::derive(&record, algorithm(&args)).map_err(|error| {
        eprintln!("Conversion to a DS RR failed: {error}");
    })?;

    if args.get_flag("stdout") {
        println!("{ds}");
        return Ok(());
    }

    let label = ds.label();
    let path = label.ds_file_name();
    fs::write(&path, format!("{ds}\n")).map_err(|error| {
        eprintln!("Unable to open {path} for writing: {error}");
    })?;

    println!("{label}");
    Ok(())
}
