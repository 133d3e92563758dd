/*!
mrtfilter reads MRT routing dumps (RFC 6396) and prints the routes that match a set of filters, one
line per route in the `bgpdump -m` format.

# Filtering a dump

```no_run
use mrtfilter::{FilterConfig, MrtOpener, Runner};

let config = FilterConfig::builder()
    .ipv4_only(true)
    .traverses(Some(3356.into()))
    .build()
    .unwrap();

let stdout = std::io::stdout();
let stderr = std::io::stderr();
let mut runner = Runner::new(&config, stdout.lock(), stderr.lock());
runner
    .run(&MrtOpener, ["http://archive.routeviews.org/bgpdata/2021.10/UPDATES/updates.20211001.0000.bz2"])
    .unwrap();
```

# Reading records

[MrtReader] yields decoded [Record]s one at a time. Updates announcing or withdrawing several
prefixes, and RIB entries seen by several peers, come out as one record per route.

```no_run
use mrtfilter::MrtReader;

for record in MrtReader::new("rib.20211001.0000.bz2").unwrap() {
    match record {
        Ok(record) => println!("{}", record),
        Err(e) if e.is_protocol_violation() => continue,
        Err(e) => {
            eprintln!("{}", e);
            break;
        }
    }
}
```
*/
pub mod error;
pub mod filter;
pub mod io;
pub mod models;
pub mod parser;
pub mod runner;

pub use error::{ConfigError, EvaluationError, ParserError};
pub use filter::{FilterConfig, FilterConfigBuilder, Filterable};
pub use models::Record;
pub use parser::MrtReader;
pub use runner::{MrtOpener, Runner, SourceOpener, SourceOutcome, SourceStats};
