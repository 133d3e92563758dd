use crate::error::ModelError;
use crate::models::Afi;
use ipnet::IpNet;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// A representation of a network prefix with an optional add-path identifier.
#[derive(PartialEq, Eq, Clone, Copy, Hash)]
pub struct NetworkPrefix {
    pub prefix: IpNet,
    pub path_id: Option<u32>,
}

// Attempt to reduce the size of the debug output
impl Debug for NetworkPrefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.path_id {
            Some(path_id) => write!(f, "{}#{}", self.prefix, path_id),
            None => write!(f, "{}", self.prefix),
        }
    }
}

impl FromStr for NetworkPrefix {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let prefix = IpNet::from_str(s).map_err(|_| ModelError::InvalidPrefix(s.to_string()))?;
        Ok(NetworkPrefix::new(prefix, None))
    }
}

impl NetworkPrefix {
    pub fn new(prefix: IpNet, path_id: Option<u32>) -> NetworkPrefix {
        NetworkPrefix { prefix, path_id }
    }

    #[inline]
    pub fn afi(&self) -> Afi {
        Afi::from(&self.prefix)
    }

    #[inline]
    pub fn is_ipv4(&self) -> bool {
        matches!(self.prefix, IpNet::V4(_))
    }

    #[inline]
    pub fn is_ipv6(&self) -> bool {
        matches!(self.prefix, IpNet::V6(_))
    }
}

impl Display for NetworkPrefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.prefix)
    }
}

/// Parses a prefix given on the command line, rejecting host bits below the mask so the value can
/// be compared exactly against decoded prefixes.
pub fn parse_canonical_prefix(s: &str) -> Result<IpNet, ModelError> {
    let prefix = IpNet::from_str(s).map_err(|_| ModelError::InvalidPrefix(s.to_string()))?;
    if prefix.trunc() != prefix {
        return Err(ModelError::PrefixHostBits(s.to_string()));
    }
    Ok(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_family() {
        let v4 = NetworkPrefix::from_str("192.168.0.0/24").unwrap();
        assert!(v4.is_ipv4());
        assert!(!v4.is_ipv6());
        assert_eq!(v4.afi(), Afi::Ipv4);

        let v6 = NetworkPrefix::from_str("2001:db8::/32").unwrap();
        assert!(v6.is_ipv6());
        assert_eq!(v6.afi(), Afi::Ipv6);
    }

    #[test]
    fn test_prefix_display() {
        let prefix = NetworkPrefix::new(IpNet::from_str("10.0.0.0/8").unwrap(), Some(7));
        assert_eq!(prefix.to_string(), "10.0.0.0/8");
        assert_eq!(format!("{:?}", prefix), "10.0.0.0/8#7");
    }

    #[test]
    fn test_parse_canonical_prefix() {
        assert_eq!(
            parse_canonical_prefix("10.0.0.0/8").unwrap(),
            IpNet::from_str("10.0.0.0/8").unwrap()
        );
        assert!(matches!(
            parse_canonical_prefix("10.0.0.1/8"),
            Err(ModelError::PrefixHostBits(_))
        ));
        assert!(matches!(
            parse_canonical_prefix("10.0.0.0"),
            Err(ModelError::InvalidPrefix(_))
        ));
        assert!(parse_canonical_prefix("2001:db8::/33").is_ok());
    }
}
