//! Route patterns
//!
//! Patterns are written relative to the matcher's mount point:
//!
//! - `items` - literal segment
//! - `items/:id` - named parameter, decoded value lands in [`RouteParams`]
//! - `settings/*` - trailing catch-all; whatever follows is left unclaimed
//!   for a nested matcher
//! - `` (empty) - matches only when nothing is left
//!
//! Without a catch-all a pattern must consume the remaining path exactly.

use crate::location::RouterLocation;
use std::collections::HashMap;
use std::fmt;

/// Parameters captured by a pattern
pub type RouteParams = HashMap<String, String>;

/// Segment type in a pattern
#[derive(Debug, Clone, PartialEq, Eq)]
enum PatternSegment {
    /// Literal segment
    Literal(String),
    /// Parameter segment
    Param(String),
}

/// Parsed route pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    source: String,
    segments: Vec<PatternSegment>,
    catch_all: bool,
}

/// Result of matching a pattern against a location
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch {
    /// The matched parameters
    pub params: RouteParams,
    /// Number of segments the pattern consumed
    pub consumed: usize,
    /// Location the pattern was matched against
    pub location: RouterLocation,
}

impl RouteMatch {
    /// Location for whatever is mounted below the match
    pub fn child_location(&self) -> RouterLocation {
        self.location.claim(self.consumed)
    }

    /// Absolute path of everything up to and including the match
    pub fn matched_path(&self) -> String {
        self.child_location().claimed_path()
    }

    /// Look up a parameter
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

impl RoutePattern {
    /// Parse a pattern such as `profile/:name/*`
    pub fn parse(pattern: &str) -> Self {
        let mut raw: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
        let catch_all = raw.last() == Some(&"*");
        if catch_all {
            raw.pop();
        }

        let segments = raw
            .into_iter()
            .map(|s| {
                if let Some(param) = s.strip_prefix(':') {
                    PatternSegment::Param(param.to_string())
                } else {
                    PatternSegment::Literal(s.to_string())
                }
            })
            .collect();

        Self {
            source: pattern.to_string(),
            segments,
            catch_all,
        }
    }

    /// The pattern as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Check if the pattern ends with a catch-all
    pub fn is_catch_all(&self) -> bool {
        self.catch_all
    }

    /// Match against the unclaimed part of `location`
    pub fn matches(&self, location: &RouterLocation) -> Option<RouteMatch> {
        let path = location.unclaimed_segments();

        if path.len() < self.segments.len() {
            return None;
        }
        if !self.catch_all && path.len() != self.segments.len() {
            return None;
        }

        let mut params = RouteParams::new();
        for (segment, actual) in self.segments.iter().zip(path.iter()) {
            match segment {
                PatternSegment::Literal(expected) => {
                    if expected != actual {
                        return None;
                    }
                }
                PatternSegment::Param(name) => {
                    params.insert(name.clone(), actual.clone());
                }
            }
        }

        Some(RouteMatch {
            params,
            consumed: self.segments.len(),
            location: location.clone(),
        })
    }
}

impl From<&str> for RoutePattern {
    fn from(pattern: &str) -> Self {
        Self::parse(pattern)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
