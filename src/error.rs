/*!
error module defines the error types used in mrtfilter.

Faults are split by how far they reach:
- [ConfigError] aborts the whole run before any input is opened;
- [ParserError] is raised while opening or reading an input, and
  [ParserError::is_protocol_violation] tells a skippable record apart from a broken source;
- [EvaluationError] is raised while filtering one decoded record;
- [ModelError] covers parsing of user supplied values.
*/
use num_enum::{TryFromPrimitive, TryFromPrimitiveError};
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    /// The named input does not exist or cannot be reached.
    ///
    /// ## Occurs during:
    ///  - Opening an input file or URL
    #[error("cannot open {path}: {reason}")]
    SourceNotFound { path: String, reason: String },
    /// A general IO error triggered by the internal reader, including a record cut short by the
    /// end of the input.
    ///
    /// ## Occurs during:
    ///  - Reading of an MRT record header
    ///  - Buffering of an MRT record body before parsing
    #[error(transparent)]
    IoError(#[from] io::Error),
    /// The MRT common header is self-contradictory, so the position of the next record is unknown.
    #[error("invalid MRT header: {0}")]
    InvalidHeader(String),

    /// This error represents a [num_enum::TryFromPrimitiveError] error for any of a number of
    /// different types.
    ///
    /// ## Occurs during:
    ///  - Parsing of an MRT message body
    #[error("unrecognized value {value} for {type_name}")]
    UnrecognizedEnumVariant { type_name: &'static str, value: u64 },
    #[error("unable to parse unsupported MRT type {entry_type} subtype {subtype}")]
    UnsupportedMrtType { entry_type: u16, subtype: u16 },
    /// A field runs past the end of the record body.
    #[error("not enough bytes to read: need {needed}, {remaining} remaining")]
    NotEnoughBytes { needed: usize, remaining: usize },
    /// This error represents a [ipnet::PrefixLenError] error. It occurs if an address mask is
    /// larger than the length of the address it is being applied to.
    #[error("invalid network prefix mask")]
    InvalidPrefixLength(#[from] ipnet::PrefixLenError),
    /// AS4_PATH / AS4_AGGREGATOR handling that contradicts RFC 6793 (formerly RFC 4893).
    #[error("RFC4893 violation: {0}")]
    As4Violation(String),
    #[error("{0}")]
    ParseError(String),
}

impl ParserError {
    /// Whether this error concerns a single record whose MRT framing is intact. Reading may
    /// continue with the next record after a protocol violation; after any other error the input
    /// position is unknown.
    pub fn is_protocol_violation(&self) -> bool {
        !matches!(
            self,
            ParserError::SourceNotFound { .. }
                | ParserError::IoError(_)
                | ParserError::InvalidHeader(_)
        )
    }
}

impl<T> From<TryFromPrimitiveError<T>> for ParserError
where
    T: TryFromPrimitive,
    T::Primitive: Into<u64>,
{
    #[inline]
    fn from(value: TryFromPrimitiveError<T>) -> Self {
        ParserError::UnrecognizedEnumVariant {
            type_name: T::NAME,
            value: value.number.into(),
        }
    }
}

/// Contradictory filter configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("IPv4-only and IPv6-only cannot be used together")]
    ConflictingFamilies,
}

/// Fault raised while evaluating the filter chain on a decoded record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("AS path '{path}' ends in an AS_SET, its generator is ambiguous")]
    AmbiguousGenerator { path: String },
    #[error("AS path '{path}' ends in an empty segment")]
    EmptySegment { path: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid AS number: {0}")]
    InvalidAsn(String),
    #[error("invalid network prefix: {0}")]
    InvalidPrefix(String),
    #[error("prefix {0} has host bits set")]
    PrefixHostBits(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Afi;

    #[test]
    fn test_protocol_violation_classification() {
        assert!(ParserError::ParseError("bad".to_string()).is_protocol_violation());
        assert!(ParserError::As4Violation("bad".to_string()).is_protocol_violation());
        assert!(ParserError::UnsupportedMrtType {
            entry_type: 11,
            subtype: 0
        }
        .is_protocol_violation());
        assert!(ParserError::NotEnoughBytes {
            needed: 4,
            remaining: 1
        }
        .is_protocol_violation());

        let eof = io::Error::new(io::ErrorKind::UnexpectedEof, "eof");
        assert!(!ParserError::IoError(eof).is_protocol_violation());
        assert!(!ParserError::InvalidHeader("len".to_string()).is_protocol_violation());
        assert!(!ParserError::SourceNotFound {
            path: "x".to_string(),
            reason: "y".to_string()
        }
        .is_protocol_violation());
    }

    #[test]
    fn test_from_try_from_primitive_error() {
        let err: ParserError = Afi::try_from(7u16).unwrap_err().into();
        match err {
            ParserError::UnrecognizedEnumVariant { type_name, value } => {
                assert_eq!(type_name, "Afi");
                assert_eq!(value, 7);
            }
            _ => panic!("unexpected error {err:?}"),
        }
    }
}
