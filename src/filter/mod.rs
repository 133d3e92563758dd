/*!
Record filtering.

A run is configured once with a [FilterConfig]. Each decoded record is first classified by
variant ([classify]); route records then go through the gate chain ([passes]): address family,
exact prefix, exact peer, then AS path (originator, or else traversal).

```
use mrtfilter::filter::{Filterable, FilterConfig};
use mrtfilter::models::*;
use std::str::FromStr;

let config = FilterConfig::builder()
    .traverses(Some(Asn::from(3356)))
    .build()
    .unwrap();

let record = Record::UpdateEntry(UpdateEntry {
    timestamp: 0,
    prefix: NetworkPrefix::from_str("1.1.1.0/24").unwrap(),
    peer_ip: "192.0.2.1".parse().unwrap(),
    peer_asn: Asn::from(64500),
    change: RouteChange::Announce(RouteAttributes {
        as_path: AsPath::from_sequence([64500, 3356, 13335]),
        ..Default::default()
    }),
});
assert!(record.match_filters(&config).unwrap());
```
*/
mod chain;
mod classify;
mod config;

pub use chain::{passes, Filterable};
pub use classify::{classify, Classification, FilterableRecord};
pub use config::{FilterConfig, FilterConfigBuilder};
