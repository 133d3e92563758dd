use crate::error::EvaluationError;
use crate::filter::classify::{classify, Classification, FilterableRecord};
use crate::filter::config::FilterConfig;
use crate::models::*;
use std::net::IpAddr;

/// The gates of the filter chain, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gate {
    Family,
    Prefix,
    Peer,
    AsPath,
}

const GATES: [Gate; 4] = [Gate::Family, Gate::Prefix, Gate::Peer, Gate::AsPath];

impl Gate {
    fn check(
        &self,
        record: &FilterableRecord,
        config: &FilterConfig,
    ) -> Result<bool, EvaluationError> {
        match self {
            Gate::Family => Ok(match record.prefix.afi() {
                Afi::Ipv4 => config.show_ipv4(),
                Afi::Ipv6 => config.show_ipv6(),
            }),
            // exact match only, a covering or more specific prefix does not pass
            Gate::Prefix => Ok(config
                .prefix()
                .is_none_or(|prefix| prefix == &record.prefix.prefix)),
            Gate::Peer => Ok(peer_matches(&record.peer, config)),
            Gate::AsPath => {
                if let Some(originator) = config.originator() {
                    return Ok(record.as_path.generator()? == Some(originator));
                }
                Ok(config
                    .traverses()
                    .is_none_or(|asn| record.as_path.contains_asn(asn)))
            }
        }
    }
}

fn peer_matches(peer: &IpAddr, config: &FilterConfig) -> bool {
    config.peer().is_none_or(|p| p == peer)
}

/// Runs the filter chain on a route record, stopping at the first gate that rejects it.
///
/// When an originator is configured the traversal filter is not consulted.
pub fn passes(record: &FilterableRecord, config: &FilterConfig) -> Result<bool, EvaluationError> {
    for gate in GATES {
        if !gate.check(record, config)? {
            return Ok(false);
        }
    }
    Ok(true)
}

pub trait Filterable {
    /// Whether the record should be printed under the given configuration.
    fn match_filters(&self, config: &FilterConfig) -> Result<bool, EvaluationError>;
}

impl Filterable for Record {
    fn match_filters(&self, config: &FilterConfig) -> Result<bool, EvaluationError> {
        match classify(self) {
            Classification::Skip => Ok(false),
            Classification::LegacyOnly(state) => {
                Ok(config.legacy() && peer_matches(&state.peer_ip, config))
            }
            Classification::Filterable(record) => passes(&record, config),
        }
    }
}
