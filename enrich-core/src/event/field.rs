use std::fmt::{self, Display};

use anyhow::{bail, ensure, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A reference to a (possibly nested) field of an event
///
/// Supported formats:
///     `country_code`         top-level field
///     `[geo][country_code]`  field `country_code` nested in object `geo`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRef {
    path: Vec<String>,
}

impl FieldRef {
    pub fn parse(field: &str) -> Result<Self> {
        ensure!(!field.is_empty(), "Field reference must not be empty");

        if !field.starts_with('[') {
            ensure!(
                !field.contains(['[', ']']),
                "Invalid field reference \"{field}\": brackets must enclose every path segment"
            );
            return Ok(Self {
                path: vec![field.to_string()],
            });
        }

        let mut path = vec![];
        let mut rest = field;

        while !rest.is_empty() {
            let Some(inner) = rest.strip_prefix('[') else {
                bail!("Invalid field reference \"{field}\": expected '[' at \"{rest}\"");
            };
            let Some(end) = inner.find(']') else {
                bail!("Invalid field reference \"{field}\": unclosed '['");
            };
            let segment = &inner[..end];

            ensure!(
                !segment.is_empty() && !segment.contains('['),
                "Invalid field reference \"{field}\": empty or malformed segment"
            );

            path.push(segment.to_string());
            rest = &inner[end + 1..];
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn is_top_level(&self) -> bool {
        self.path.len() == 1
    }
}

impl Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_top_level() {
            return write!(f, "{}", self.path[0]);
        }

        for segment in self.path.iter() {
            write!(f, "[{}]", segment)?;
        }

        Ok(())
    }
}

impl TryFrom<&str> for FieldRef {
    type Error = anyhow::Error;

    fn try_from(field: &str) -> Result<Self> {
        Self::parse(field)
    }
}

impl Serialize for FieldRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let field = String::deserialize(deserializer)?;
        Self::parse(&field).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_ref_top_level() {
        let field = FieldRef::parse("country_code").unwrap();

        assert_eq!(field.path(), &["country_code".to_string()]);
        assert!(field.is_top_level());
        assert_eq!(field.to_string(), "country_code");
    }

    #[test]
    fn test_field_ref_nested() {
        let field = FieldRef::parse("[geo][country][code]").unwrap();

        assert_eq!(field.path(), &["geo", "country", "code"]);
        assert_eq!(field.to_string(), "[geo][country][code]");
    }

    #[test]
    fn test_field_ref_bracketed_single_segment_is_top_level() {
        assert_eq!(
            FieldRef::parse("[code]").unwrap(),
            FieldRef::parse("code").unwrap()
        );
    }

    #[test]
    fn test_field_ref_invalid() {
        assert!(FieldRef::parse("").is_err());
        assert!(FieldRef::parse("[]").is_err());
        assert!(FieldRef::parse("[a").is_err());
        assert!(FieldRef::parse("[a]b").is_err());
        assert!(FieldRef::parse("a[b]").is_err());
        assert!(FieldRef::parse("[a[b]]").is_err());
    }
}
