//! Router locations
//!
//! A [`RouterLocation`] is an immutable, parsed href: decoded path segments
//! plus an optional query. Nested route matchers *claim* a prefix of the
//! segments; everything after the claimed prefix is what the next matcher
//! down the tree gets to look at.
//!
//! Serialisation is canonical: segments and query pairs are percent-encoded
//! with [`urlencoding`], query keys are written in sorted order, and empty
//! segments (trailing or doubled slashes) disappear. Parsing an href and
//! serialising it again therefore yields the normalised form of that href.

use crate::error::{Result, RouterError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Query parameters of a location (order irrelevant)
pub type Query = BTreeMap<String, String>;

/// Parsed path + query
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RouterLocation {
    /// Decoded path segments
    segments: Vec<String>,
    /// `None` when the href had no `?` at all
    query: Option<Query>,
    /// Number of leading segments consumed by ancestor matchers
    claimed: usize,
}

impl Default for RouterLocation {
    fn default() -> Self {
        Self::root()
    }
}

impl RouterLocation {
    /// The root location `/`
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
            query: None,
            claimed: 0,
        }
    }

    /// Parse an absolute href such as `/items/42?tab=info`
    pub fn from_href(href: &str) -> Result<Self> {
        if !href.starts_with('/') {
            return Err(RouterError::invalid_path(
                href,
                "expected an absolute path starting with '/'",
            ));
        }

        let (path, query) = split_query(href);
        Ok(Self {
            segments: parse_segments(href, path)?,
            query: query.map(|q| parse_query(href, q)).transpose()?,
            claimed: 0,
        })
    }

    /// Serialise back to a canonical href
    pub fn href(&self) -> String {
        let mut href = self.path();
        if let Some(query) = &self.query {
            href.push('?');
            href.push_str(&encode_query(query));
        }
        href
    }

    /// The href without its query
    pub fn path(&self) -> String {
        encode_path(&self.segments)
    }

    /// Resolve `relative` against the claimed part of this location
    ///
    /// A leading `/` makes the argument absolute. Otherwise its segments are
    /// appended to [`claimed_segments`](Self::claimed_segments), so a matcher
    /// mounted at `/settings` links to `/settings/account` with
    /// `link_to("account")`. The relative path may carry its own query.
    /// `.` and `..` segments are rejected.
    pub fn link_to(&self, relative: &str) -> Result<String> {
        if relative.starts_with('/') {
            return Ok(Self::from_href(relative)?.href());
        }

        let (path, query) = split_query(relative);
        let mut segments = self.claimed_segments().to_vec();
        segments.extend(parse_segments(relative, path)?);

        let target = Self {
            segments,
            query: query.map(|q| parse_query(relative, q)).transpose()?,
            claimed: 0,
        };
        Ok(target.href())
    }

    /// Query parameters, if the href had a `?`
    pub fn query(&self) -> Option<&Query> {
        self.query.as_ref()
    }

    /// Look up a single query parameter
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.as_ref()?.get(key).map(String::as_str)
    }

    /// All decoded path segments
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Segments consumed by ancestor matchers
    pub fn claimed_segments(&self) -> &[String] {
        &self.segments[..self.claimed]
    }

    /// Segments still available to the next matcher
    pub fn unclaimed_segments(&self) -> &[String] {
        &self.segments[self.claimed..]
    }

    /// Absolute path of the claimed prefix, `/` when nothing is claimed
    pub fn claimed_path(&self) -> String {
        encode_path(self.claimed_segments())
    }

    /// Encoded unclaimed suffix without a leading slash
    pub fn unclaimed_path(&self) -> String {
        self.unclaimed_segments()
            .iter()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Number of claimed segments
    pub fn claimed_len(&self) -> usize {
        self.claimed
    }

    /// Child location with `count` more segments claimed
    pub fn claim(&self, count: usize) -> Self {
        Self {
            segments: self.segments.clone(),
            query: self.query.clone(),
            claimed: (self.claimed + count).min(self.segments.len()),
        }
    }

    /// Check if this is `/` (query ignored)
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for RouterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href())
    }
}

impl FromStr for RouterLocation {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_href(s)
    }
}

impl TryFrom<String> for RouterLocation {
    type Error = RouterError;

    fn try_from(href: String) -> Result<Self> {
        Self::from_href(&href)
    }
}

impl From<RouterLocation> for String {
    fn from(location: RouterLocation) -> Self {
        location.href()
    }
}

fn split_query(href: &str) -> (&str, Option<&str>) {
    match href.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (href, None),
    }
}

fn parse_segments(href: &str, path: &str) -> Result<Vec<String>> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|raw| {
            // Checked after decoding so `%2E%2E` cannot smuggle in `..`
            let segment = decode(href, raw)?;
            if segment == "." || segment == ".." {
                return Err(RouterError::invalid_path(
                    href,
                    "dot segments are not supported",
                ));
            }
            Ok(segment)
        })
        .collect()
}

fn parse_query(href: &str, query: &str) -> Result<Query> {
    let mut params = Query::new();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params.insert(decode(href, key)?, decode(href, value)?);
    }
    Ok(params)
}

fn decode(href: &str, raw: &str) -> Result<String> {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .map_err(|_| RouterError::invalid_path(href, format!("{raw:?} does not decode to UTF-8")))
}

fn encode_path(segments: &[String]) -> String {
    if segments.is_empty() {
        return "/".to_string();
    }
    segments
        .iter()
        .map(|s| format!("/{}", urlencoding::encode(s)))
        .collect()
}

fn encode_query(query: &Query) -> String {
    query
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_simple() {
        for href in ["/", "/home", "/items/42", "/search?q=rust", "/a/b/c?x=1&y=2"] {
            assert_eq!(RouterLocation::from_href(href).unwrap().href(), href);
        }
    }

    #[test]
    fn test_trailing_slash_normalized() {
        assert_eq!(RouterLocation::from_href("/items/").unwrap().href(), "/items");
        assert_eq!(RouterLocation::from_href("//a//b/").unwrap().href(), "/a/b");
        assert_eq!(RouterLocation::from_href("/").unwrap().href(), "/");
    }

    #[test]
    fn test_empty_query_distinct_from_absent() {
        let absent = RouterLocation::from_href("/a").unwrap();
        let empty = RouterLocation::from_href("/a?").unwrap();

        assert!(absent.query().is_none());
        assert_eq!(empty.query(), Some(&Query::new()));
        assert_ne!(absent, empty);
        assert_eq!(empty.href(), "/a?");
    }

    #[test]
    fn test_percent_decoding_round_trip() {
        let location = RouterLocation::from_href("/tags/hello%20world?q=a%26b").unwrap();
        assert_eq!(location.segments(), ["tags", "hello world"]);
        assert_eq!(location.query_param("q"), Some("a&b"));
        assert_eq!(location.href(), "/tags/hello%20world?q=a%26b");
    }

    #[test]
    fn test_encoding_is_canonicalized() {
        // Unencoded characters come back encoded
        let location = RouterLocation::from_href("/a b").unwrap();
        assert_eq!(location.href(), "/a%20b");
        // Query keys come back sorted
        let location = RouterLocation::from_href("/p?b=2&a=1").unwrap();
        assert_eq!(location.href(), "/p?a=1&b=2");
    }

    #[test]
    fn test_query_key_without_value() {
        let location = RouterLocation::from_href("/p?flag").unwrap();
        assert_eq!(location.query_param("flag"), Some(""));
        assert_eq!(location.href(), "/p?flag=");
    }

    #[test]
    fn test_relative_href_rejected() {
        let err = RouterLocation::from_href("items/42").unwrap_err();
        assert!(matches!(err, RouterError::InvalidPath { .. }));
        assert!(RouterLocation::from_href("").is_err());
    }

    #[test]
    fn test_dot_segments_rejected() {
        assert!(RouterLocation::from_href("/a/../b").is_err());
        assert!(RouterLocation::from_href("/a/./b").is_err());
    }

    #[test]
    fn test_encoded_dot_segments_rejected() {
        for href in ["/a/%2E%2E", "/a/%2e%2E/b", "/%2E", "/a/.%2E?x=1"] {
            assert!(
                matches!(
                    RouterLocation::from_href(href),
                    Err(RouterError::InvalidPath { .. })
                ),
                "accepted {href}"
            );
        }
        let root = RouterLocation::root();
        assert!(root.link_to("a/%2E%2E").is_err());

        // Dots inside a segment are ordinary characters
        let location = RouterLocation::from_href("/files/..hidden/a.b").unwrap();
        let href = location.href();
        assert_eq!(RouterLocation::from_href(&href).unwrap(), location);
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        assert!(RouterLocation::from_href("/%FF").is_err());
    }

    #[test]
    fn test_link_to_from_root() {
        let location = RouterLocation::from_href("/home").unwrap();
        assert_eq!(location.link_to("pages/two").unwrap(), "/pages/two");
        assert_eq!(location.link_to("/abs/path/").unwrap(), "/abs/path");
    }

    #[test]
    fn test_link_to_from_claimed_location() {
        let location = RouterLocation::from_href("/settings/account/email")
            .unwrap()
            .claim(1);
        assert_eq!(location.claimed_path(), "/settings");
        assert_eq!(location.unclaimed_path(), "account/email");
        assert_eq!(location.link_to("privacy").unwrap(), "/settings/privacy");
        assert_eq!(location.link_to("").unwrap(), "/settings");
        assert_eq!(
            location.link_to("search?q=a b").unwrap(),
            "/settings/search?q=a%20b"
        );
    }

    #[test]
    fn test_link_to_rejects_parent_segments() {
        let location = RouterLocation::root();
        assert!(location.link_to("../up").is_err());
    }

    #[test]
    fn test_claim_is_clamped() {
        let location = RouterLocation::from_href("/a/b").unwrap();
        let child = location.claim(5);
        assert_eq!(child.claimed_len(), 2);
        assert!(child.unclaimed_segments().is_empty());
        assert_eq!(child.unclaimed_path(), "");
    }

    #[test]
    fn test_display_and_from_str() {
        let location: RouterLocation = "/items/42?x=1".parse().unwrap();
        assert_eq!(location.to_string(), "/items/42?x=1");
    }

    #[test]
    fn test_location_serialization() {
        let location = RouterLocation::from_href("/items/42?x=1").unwrap();
        let json = serde_json::to_string(&location).unwrap();
        assert_eq!(json, "\"/items/42?x=1\"");
        let parsed: RouterLocation = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, location);

        assert!(serde_json::from_str::<RouterLocation>("\"relative\"").is_err());
    }
}
