use crate::error::ConfigError;
use crate::models::Asn;
use ipnet::IpNet;
use std::net::IpAddr;

/// Filter settings of one run. Built once through [FilterConfigBuilder] before any input is
/// opened and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    show_ipv4: bool,
    show_ipv6: bool,
    prefix: Option<IpNet>,
    peer: Option<IpAddr>,
    originator: Option<Asn>,
    traverses: Option<Asn>,
    legacy: bool,
    report_violations: bool,
}

impl FilterConfig {
    pub fn builder() -> FilterConfigBuilder {
        FilterConfigBuilder::default()
    }

    pub fn show_ipv4(&self) -> bool {
        self.show_ipv4
    }

    pub fn show_ipv6(&self) -> bool {
        self.show_ipv6
    }

    pub fn prefix(&self) -> Option<&IpNet> {
        self.prefix.as_ref()
    }

    pub fn peer(&self) -> Option<&IpAddr> {
        self.peer.as_ref()
    }

    pub fn originator(&self) -> Option<Asn> {
        self.originator
    }

    pub fn traverses(&self) -> Option<Asn> {
        self.traverses
    }

    /// Whether peer state changes are printed.
    pub fn legacy(&self) -> bool {
        self.legacy
    }

    /// Whether skipped malformed records are reported on the error stream.
    pub fn report_violations(&self) -> bool {
        self.report_violations
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            show_ipv4: true,
            show_ipv6: true,
            prefix: None,
            peer: None,
            originator: None,
            traverses: None,
            legacy: false,
            report_violations: false,
        }
    }
}

/// Collects option values for a [FilterConfig].
///
/// ```
/// use mrtfilter::filter::FilterConfig;
///
/// let config = FilterConfig::builder()
///     .ipv4_only(true)
///     .originator(Some(13335.into()))
///     .build()
///     .unwrap();
/// assert!(!config.show_ipv6());
///
/// assert!(FilterConfig::builder().ipv4_only(true).ipv6_only(true).build().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterConfigBuilder {
    ipv4_only: bool,
    ipv6_only: bool,
    prefix: Option<IpNet>,
    peer: Option<IpAddr>,
    originator: Option<Asn>,
    traverses: Option<Asn>,
    legacy: bool,
    report_violations: bool,
}

impl FilterConfigBuilder {
    pub fn ipv4_only(mut self, value: bool) -> Self {
        self.ipv4_only = value;
        self
    }

    pub fn ipv6_only(mut self, value: bool) -> Self {
        self.ipv6_only = value;
        self
    }

    pub fn prefix(mut self, prefix: Option<IpNet>) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn peer(mut self, peer: Option<IpAddr>) -> Self {
        self.peer = peer;
        self
    }

    pub fn originator(mut self, asn: Option<Asn>) -> Self {
        self.originator = asn;
        self
    }

    pub fn traverses(mut self, asn: Option<Asn>) -> Self {
        self.traverses = asn;
        self
    }

    pub fn legacy(mut self, value: bool) -> Self {
        self.legacy = value;
        self
    }

    pub fn report_violations(mut self, value: bool) -> Self {
        self.report_violations = value;
        self
    }

    pub fn build(self) -> Result<FilterConfig, ConfigError> {
        if self.ipv4_only && self.ipv6_only {
            return Err(ConfigError::ConflictingFamilies);
        }
        Ok(FilterConfig {
            show_ipv4: !self.ipv6_only,
            show_ipv6: !self.ipv4_only,
            prefix: self.prefix,
            peer: self.peer,
            originator: self.originator,
            traverses: self.traverses,
            legacy: self.legacy,
            report_violations: self.report_violations,
        })
    }
}
