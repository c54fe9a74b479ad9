use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Maps statement placeholder names to the event fields supplying their values
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterBinding(HashMap<String, String>);

impl ParameterBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the event field bound to the supplied placeholder
    pub fn get(&self, placeholder: &str) -> Option<&str> {
        self.0.get(placeholder).map(|f| f.as_str())
    }

    pub fn insert(&mut self, placeholder: impl Into<String>, field: impl Into<String>) {
        self.0.insert(placeholder.into(), field.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(p, f)| (p.as_str(), f.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<P: Into<String>, F: Into<String>> FromIterator<(P, F)> for ParameterBinding {
    fn from_iter<T: IntoIterator<Item = (P, F)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(p, f)| (p.into(), f.into()))
                .collect(),
        )
    }
}

/// The static description of a lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    /// SQL text containing `:name` placeholders
    pub statement: String,
    /// Placeholder name to event field mapping
    pub parameters: ParameterBinding,
    /// Event field receiving the result set
    pub target: String,
    /// Tags appended to the event when the lookup fails
    pub tag_on_failure: Vec<String>,
}

impl QuerySpec {
    pub fn new(
        statement: impl Into<String>,
        parameters: ParameterBinding,
        target: impl Into<String>,
        tag_on_failure: Vec<String>,
    ) -> Self {
        Self {
            statement: statement.into(),
            parameters,
            target: target.into(),
            tag_on_failure,
        }
    }
}
