use std::net::IpAddr;

use clap::Parser;
use ipnet::IpNet;
use mrtfilter::models::{parse_canonical_prefix, Asn};
use mrtfilter::{FilterConfig, MrtOpener, Runner};

/// mrtfilter prints the routes of MRT dumps that match the given filters, one line per route.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Opts {
    /// MRT files to read, local paths or URLs. Compressed files are decompressed based on their
    /// extension.
    #[clap(name = "FILE", required = true)]
    files: Vec<String>,

    /// Print protocol violations found in the input to stderr
    #[clap(short = 'v', long)]
    report_violations: bool,

    /// Legacy mode: also print peer state changes
    #[clap(short = 'm', long)]
    legacy: bool,

    #[clap(flatten)]
    filters: Filters,
}

#[derive(Parser, Debug)]
struct Filters {
    /// Only IPv4 prefixes
    #[clap(short = '4', long)]
    ipv4_only: bool,

    /// Only IPv6 prefixes
    #[clap(short = '6', long)]
    ipv6_only: bool,

    /// Only routes received from this peer
    #[clap(short = 'p', long)]
    peer: Option<IpAddr>,

    /// Only this exact prefix
    #[clap(short = 'P', long, value_parser = parse_canonical_prefix)]
    prefix: Option<IpNet>,

    /// Only routes originated by this AS
    #[clap(short = 'o', long)]
    originator: Option<Asn>,

    /// Only routes whose AS path contains this AS
    #[clap(short = 't', long)]
    traverses: Option<Asn>,
}

fn main() {
    let opts: Opts = Opts::parse();

    env_logger::init();

    let config = match FilterConfig::builder()
        .ipv4_only(opts.filters.ipv4_only)
        .ipv6_only(opts.filters.ipv6_only)
        .prefix(opts.filters.prefix)
        .peer(opts.filters.peer)
        .originator(opts.filters.originator)
        .traverses(opts.filters.traverses)
        .legacy(opts.legacy)
        .report_violations(opts.report_violations)
        .build()
    {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    let mut runner = Runner::new(&config, stdout.lock(), stderr.lock());
    if let Err(e) = runner.run(&MrtOpener, &opts.files) {
        if e.kind() != std::io::ErrorKind::BrokenPipe {
            eprintln!("{}", e);
        }
        std::process::exit(1);
    }
}
