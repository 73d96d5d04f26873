//! Configuration paths.
//!
//! A path is an ordered sequence of non-empty segments. The space-joined
//! wire form (`firewall name TEST`) is produced and parsed only at the
//! boundary; everything inside the crate works on segments.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::tree::PathError;

/// Separator between segments in the wire form.
pub const DELIMITER: char = ' ';

/// Ordered segments addressing one node of the configuration tree.
///
/// Serializes as an array of segments, which is the form the batch
/// endpoint expects.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ConfigPath(Vec<String>);

impl ConfigPath {
    /// The empty path, addressing the whole tree.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parse the space-joined wire form. The empty string is the root.
    pub fn parse(wire: &str) -> Result<Self, PathError> {
        if wire.is_empty() {
            return Ok(Self::root());
        }
        Self::from_segments(wire.split(DELIMITER))
    }

    /// Build a path from segments, rejecting any segment that cannot
    /// round-trip through the wire form.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut path = Self::root();
        for segment in segments {
            path.push(segment)?;
        }
        Ok(path)
    }

    /// Append one segment.
    pub fn push(&mut self, segment: impl Into<String>) -> Result<(), PathError> {
        let segment = segment.into();
        validate_segment(&segment)?;
        self.0.push(segment);
        Ok(())
    }

    /// A copy of this path extended by `segment`.
    pub fn child(&self, segment: impl Into<String>) -> Result<Self, PathError> {
        let mut path = self.clone();
        path.push(segment)?;
        Ok(path)
    }

    /// Concatenate two paths.
    pub fn join(&self, relative: &ConfigPath) -> Self {
        let mut segments = self.0.clone();
        segments.extend(relative.0.iter().cloned());
        Self(segments)
    }

    /// Split into the parent path and the final segment.
    pub fn split_last(&self) -> Option<(ConfigPath, &str)> {
        let (last, parent) = self.0.split_last()?;
        Some((Self(parent.to_vec()), last.as_str()))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Segments joined with the delimiter.
    pub fn to_wire(&self) -> String {
        self.0.join(" ")
    }
}

fn validate_segment(segment: &str) -> Result<(), PathError> {
    if segment.is_empty() {
        return Err(PathError::EmptySegment);
    }
    if segment.contains(DELIMITER) {
        return Err(PathError::DelimiterInSegment(segment.to_string()));
    }
    Ok(())
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

impl FromStr for ConfigPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
