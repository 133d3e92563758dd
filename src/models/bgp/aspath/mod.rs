use crate::error::EvaluationError;
use crate::models::*;
use itertools::Itertools;
use std::fmt::{Display, Formatter};


/// Enum of AS path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AsPathSegment {
    AsSequence(Vec<Asn>),
    AsSet(Vec<Asn>),
    ConfedSequence(Vec<Asn>),
    ConfedSet(Vec<Asn>),
}

impl AsPathSegment {
    /// Shorthand for creating an `AsSequence` segment.
    pub fn sequence<S: AsRef<[u32]>>(seq: S) -> Self {
        AsPathSegment::AsSequence(seq.as_ref().iter().copied().map_into().collect())
    }

    /// Shorthand for creating an `AsSet` segment.
    pub fn set<S: AsRef<[u32]>>(seq: S) -> Self {
        AsPathSegment::AsSet(seq.as_ref().iter().copied().map_into().collect())
    }

    /// Get the number of ASNs this segment adds to the route. For the number of ASNs within the
    /// segment use [AsPathSegment::len] instead.
    pub fn route_len(&self) -> usize {
        match self {
            AsPathSegment::AsSequence(v) => v.len(),
            AsPathSegment::AsSet(_) => 1,
            AsPathSegment::ConfedSequence(_) | AsPathSegment::ConfedSet(_) => 0,
        }
    }

    /// Get the total number of ASNs within this segment.
    pub fn len(&self) -> usize {
        self.as_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_ref().is_empty()
    }

    /// Gets if a segment represents the local members of an autonomous system confederation.
    ///
    /// <https://datatracker.ietf.org/doc/html/rfc3065#section-5>
    pub fn is_confed(&self) -> bool {
        matches!(
            self,
            AsPathSegment::ConfedSequence(_) | AsPathSegment::ConfedSet(_)
        )
    }
}

impl AsRef<[Asn]> for AsPathSegment {
    fn as_ref(&self) -> &[Asn] {
        let (AsPathSegment::AsSequence(x)
        | AsPathSegment::AsSet(x)
        | AsPathSegment::ConfedSequence(x)
        | AsPathSegment::ConfedSet(x)) = self;
        x
    }
}

#[derive(Debug, PartialEq, Clone, Eq, Default, Hash)]
pub struct AsPath {
    pub segments: Vec<AsPathSegment>,
}

impl AsPath {
    pub fn new() -> AsPath {
        AsPath { segments: vec![] }
    }

    /// Shorthand for creating an `AsPath` consisting of a single `AsSequence` segment.
    pub fn from_sequence<S: AsRef<[u32]>>(seq: S) -> Self {
        AsPath {
            segments: vec![AsPathSegment::sequence(seq)],
        }
    }

    pub fn from_segments(segments: Vec<AsPathSegment>) -> AsPath {
        AsPath { segments }
    }

    /// Adds a new segment to the end of the path. No validation or merging is performed.
    pub fn append_segment(&mut self, segment: AsPathSegment) {
        self.segments.push(segment);
    }

    /// Note that a non-empty path may have a route length of 0 due to empty or confederation
    /// segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Get the total length of the route this path represents. A sequence of 5 ASNs followed by a
    /// set of 3 ASNs has a route length of 6. Confederation segments do not count.
    pub fn route_len(&self) -> usize {
        self.segments.iter().map(AsPathSegment::route_len).sum()
    }

    /// Iterate over every ASN of every segment, in path order.
    pub fn iter_asns(&self) -> impl Iterator<Item = &Asn> {
        self.segments.iter().flat_map(|s| s.as_ref().iter())
    }

    /// Checks if any segment of this path contains the given ASN.
    pub fn contains_asn(&self, asn: Asn) -> bool {
        self.iter_asns().contains(&asn)
    }

    /// The AS that generated the route: the last ASN of the last non-confederation segment.
    ///
    /// Returns `Ok(None)` for a path without any such segment. A path ending in an empty segment or
    /// in an AS_SET with more than one member has no well-defined generator.
    pub fn generator(&self) -> Result<Option<Asn>, EvaluationError> {
        let last = self.segments.iter().rev().find(|s| !s.is_confed());
        match last {
            None => Ok(None),
            Some(segment) if segment.is_empty() => Err(EvaluationError::EmptySegment {
                path: self.to_string(),
            }),
            Some(AsPathSegment::AsSet(v)) if v.len() > 1 => {
                Err(EvaluationError::AmbiguousGenerator {
                    path: self.to_string(),
                })
            }
            Some(segment) => Ok(segment.as_ref().last().copied()),
        }
    }

    /// Construct AsPath from AS_PATH and AS4_PATH
    ///
    /// <https://datatracker.ietf.org/doc/html/rfc6793#section-4.2.3>
    ///
    /// ```text
    ///    If the number of AS numbers in the AS_PATH attribute is larger than
    ///    or equal to the number of AS numbers in the AS4_PATH attribute, then
    ///    the AS path information SHALL be constructed by taking as many AS
    ///    numbers and path segments as necessary from the leading part of the
    ///    AS_PATH attribute, and then prepending them to the AS4_PATH attribute
    ///    so that the AS path information has a number of AS numbers identical
    ///    to that of the AS_PATH attribute.  Note that a valid
    ///    AS_CONFED_SEQUENCE or AS_CONFED_SET path segment SHALL be prepended
    ///    if it is either the leading path segment or is adjacent to a path
    ///    segment that is prepended.
    /// ```
    ///
    /// Returns `None` when AS4_PATH is longer than AS_PATH, which the RFC says must not happen.
    pub fn merge_aspath_as4path(aspath: &AsPath, as4path: &AsPath) -> Option<AsPath> {
        if aspath.route_len() < as4path.route_len() {
            return None;
        }

        let mut remaining = aspath.route_len() - as4path.route_len();
        let mut segments: Vec<AsPathSegment> = vec![];
        for segment in &aspath.segments {
            match segment {
                s if s.is_confed() => {
                    if remaining > 0 || segments.iter().all(AsPathSegment::is_confed) {
                        segments.push(s.clone());
                    }
                }
                _ if remaining == 0 => break,
                AsPathSegment::AsSequence(v) if v.len() > remaining => {
                    segments.push(AsPathSegment::AsSequence(v[..remaining].to_vec()));
                    remaining = 0;
                }
                s => {
                    remaining -= s.route_len();
                    segments.push(s.clone());
                }
            }
        }

        for segment in &as4path.segments {
            match (segments.last_mut(), segment) {
                (Some(AsPathSegment::AsSequence(x)), AsPathSegment::AsSequence(y)) => {
                    x.extend_from_slice(y)
                }
                _ => segments.push(segment.clone()),
            }
        }

        Some(AsPath { segments })
    }
}

impl Display for AsPath {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            if index != 0 {
                write!(f, " ")?;
            }

            match segment {
                AsPathSegment::AsSequence(v) | AsPathSegment::ConfedSequence(v) => {
                    write!(f, "{}", v.iter().join(" "))?;
                }
                AsPathSegment::AsSet(v) | AsPathSegment::ConfedSet(v) => {
                    write!(f, "{{{}}}", v.iter().join(","))?;
                }
            }
        }

        Ok(())
    }
}
