use std::any::type_name;

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize};
use serde_yaml::{Deserializer, Value};

/// Parses the supplied string as a config value
pub fn parse_config<'a>(conf_str: impl Into<&'a str>) -> Result<Value> {
    Value::deserialize(Deserializer::from_str(conf_str.into()))
        .context("Failed to parse configuration yaml")
}

/// Deserialises the supplied config value into a strongly typed options struct
pub fn parse_options<T: DeserializeOwned>(options: Value) -> Result<T> {
    serde_yaml::from_value::<T>(options).with_context(|| {
        format!(
            "Failed to parse configuration options into {}",
            type_name::<T>().rsplit("::").next().unwrap_or_default()
        )
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_yaml::Mapping;

    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Options {
        host: String,
        #[serde(default)]
        port: Option<u16>,
    }

    #[test]
    fn test_parse_config() {
        let parsed = parse_config("a: test").unwrap();

        assert_eq!(
            parsed,
            Value::Mapping({
                let mut map = Mapping::new();
                map.insert(
                    Value::String("a".to_string()),
                    Value::String("test".to_string()),
                );
                map
            })
        );
    }

    #[test]
    fn test_parse_config_invalid() {
        assert!(parse_config("@@@").is_err());
    }

    #[test]
    fn test_parse_options() {
        let parsed = parse_options::<Options>(parse_config("host: db").unwrap()).unwrap();

        assert_eq!(
            parsed,
            Options {
                host: "db".into(),
                port: None
            }
        );
    }

    #[test]
    fn test_parse_options_invalid_type() {
        let err = parse_options::<Options>(parse_config("host: db\nport: abc").unwrap())
            .unwrap_err();

        assert!(format!("{:?}", err).contains("Options"));
    }
}
