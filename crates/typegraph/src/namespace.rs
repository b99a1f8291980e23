// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Immutable namespace paths.
//!
//! A [`Namespace`] is an ordered list of non-empty segments. Parsing drops
//! empty segments, so `"A..B"` and `"A.B"` describe the same path and the
//! global namespace is the empty path.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Default segment delimiter.
pub const DELIMITER: char = '.';

/// Ordered, immutable namespace path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace {
    segments: Arc<[String]>,
}

impl Namespace {
    /// The global (empty) namespace.
    pub fn global() -> Self {
        Self::default()
    }

    /// Build from segments, skipping empty ones.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments
            .into_iter()
            .map(Into::into)
            .filter(|s| !s.is_empty())
            .collect();
        Self {
            segments: segments.into(),
        }
    }

    /// Parse a path joined by `delimiter`.
    pub fn parse_with(path: &str, delimiter: char) -> Self {
        Self::from_segments(path.split(delimiter).map(str::trim))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_global(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns `true` if `prefix` is a leading sub-path of `self` (or equal to it).
    pub fn starts_with(&self, prefix: &Namespace) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Remove `prefix` from the front, or `None` if it is not a prefix.
    pub fn strip_prefix(&self, prefix: &Namespace) -> Option<Namespace> {
        self.segments
            .strip_prefix(&*prefix.segments)
            .map(|rest| Self::from_segments(rest.iter().cloned()))
    }

    /// New path with `parent` in front.
    pub fn prepend(&self, parent: &Namespace) -> Namespace {
        Self::from_segments(parent.segments.iter().chain(self.segments.iter()).cloned())
    }

    /// New path with `child` appended.
    pub fn append(&self, child: &Namespace) -> Namespace {
        child.prepend(self)
    }

    /// New path with a single extra segment.
    pub fn child(&self, segment: impl Into<String>) -> Namespace {
        Self::from_segments(
            self.segments
                .iter()
                .cloned()
                .chain(std::iter::once(segment.into())),
        )
    }

    /// Enclosing namespace; the global namespace is its own parent.
    pub fn parent(&self) -> Namespace {
        match self.segments.split_last() {
            Some((_, rest)) => Self::from_segments(rest.iter().cloned()),
            None => Self::global(),
        }
    }

    /// Join the segments with `delimiter`.
    pub fn join(&self, delimiter: &str) -> String {
        self.segments.join(delimiter)
    }

    /// Qualify `name` with this namespace (`Ns.Name`, or just `Name` when global).
    pub fn qualify(&self, name: &str) -> String {
        if self.is_global() {
            name.to_string()
        } else {
            format!("{}{}{}", self, DELIMITER, name)
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join(&DELIMITER.to_string()))
    }
}

impl FromStr for Namespace {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_with(s, DELIMITER))
    }
}

impl From<&str> for Namespace {
    fn from(value: &str) -> Self {
        Self::parse_with(value, DELIMITER)
    }
}

impl Serialize for Namespace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Namespace {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_empty_segments() {
        let ns = Namespace::from("App..Models.");
        assert_eq!(ns.segments(), ["App", "Models"]);
        assert!(Namespace::from("").is_global());
        assert_eq!(Namespace::from("  "), Namespace::global());
    }

    #[test]
    fn test_round_trip_through_string() {
        let ns = Namespace::from("System.Collections.Generic");
        let text = ns.to_string();
        assert_eq!(text, "System.Collections.Generic");
        assert_eq!(text.parse::<Namespace>().unwrap(), ns);
        assert_eq!(Namespace::parse_with("a/b", '/').join("::"), "a::b");
    }

    #[test]
    fn test_prefix_operations() {
        let root = Namespace::from("App");
        let ns = Namespace::from("App.Models.Orders");
        assert!(ns.starts_with(&root));
        assert!(ns.starts_with(&ns));
        assert!(!root.starts_with(&ns));
        assert!(!Namespace::from("Application").starts_with(&root));

        let rest = ns.strip_prefix(&root).unwrap();
        assert_eq!(rest.to_string(), "Models.Orders");
        assert_eq!(rest.prepend(&root), ns);
        assert_eq!(root.append(&rest), ns);
        assert!(root.strip_prefix(&ns).is_none());
    }

    #[test]
    fn test_child_parent_and_qualify() {
        let ns = Namespace::global().child("App").child("Models");
        assert_eq!(ns.to_string(), "App.Models");
        assert_eq!(ns.parent(), Namespace::from("App"));
        assert_eq!(Namespace::global().parent(), Namespace::global());
        assert_eq!(ns.qualify("Order"), "App.Models.Order");
        assert_eq!(Namespace::global().qualify("Order"), "Order");
    }

    #[test]
    fn test_serializes_as_string() {
        let ns = Namespace::from("App.Models");
        let json = serde_json::to_string(&ns).unwrap();
        assert_eq!(json, "\"App.Models\"");
        let back: Namespace = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ns);
    }
}
