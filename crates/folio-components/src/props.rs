//! Component props.

use std::collections::BTreeMap;

use crate::{ComponentError, Result};

/// Attribute values passed to a component tag.
///
/// Bare attributes (`<Step last>`) are stored with the value `"true"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Props(BTreeMap<String, String>);

impl Props {
    /// Create an empty prop set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a prop. The last duplicate wins.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Get a prop value. Empty values count as absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Get a prop value or fail with [`ComponentError::MissingProp`].
    pub fn require(&self, component: &'static str, name: &'static str) -> Result<&str> {
        self.get(name).ok_or(ComponentError::MissingProp {
            component,
            prop: name,
        })
    }

    /// Whether a boolean prop is set.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.get(name), Some("true") | Some("1"))
    }

    /// Parse a numeric prop.
    pub fn number(&self, component: &'static str, name: &'static str) -> Result<Option<u32>> {
        self.get(name)
            .map(|v| {
                v.trim().parse().map_err(|_| ComponentError::InvalidProp {
                    component,
                    prop: name,
                    value: v.to_string(),
                    reason: "expected a non-negative integer",
                })
            })
            .transpose()
    }

    /// Number of props.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no props were given.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over props in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
