use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Data container for values exchanged with a database
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum DataValue {
    Null,
    Utf8String(String),
    Binary(Vec<u8>),
    Boolean(bool),
    Int64(i64),
    UInt64(u64),
    Float64(f64),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    JSON(String),
}

impl DataValue {
    pub fn is_null(&self) -> bool {
        *self == DataValue::Null
    }

    /// Converts an event field value into a value which can be bound
    /// to a query parameter.
    ///
    /// Nested arrays and objects are bound as their JSON text.
    pub fn from_json(val: &serde_json::Value) -> Self {
        match val {
            serde_json::Value::Null => DataValue::Null,
            serde_json::Value::Bool(b) => DataValue::Boolean(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    DataValue::Int64(i)
                } else if let Some(u) = n.as_u64() {
                    DataValue::UInt64(u)
                } else {
                    n.as_f64().map(DataValue::Float64).unwrap_or(DataValue::Null)
                }
            }
            serde_json::Value::String(s) => DataValue::Utf8String(s.clone()),
            nested @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                DataValue::JSON(nested.to_string())
            }
        }
    }

    /// Converts a value read from a result set into its event representation
    pub fn into_json(self) -> serde_json::Value {
        match self {
            DataValue::Null => serde_json::Value::Null,
            DataValue::Utf8String(s) => serde_json::Value::String(s),
            DataValue::Binary(b) => {
                serde_json::Value::String(String::from_utf8_lossy(&b).into_owned())
            }
            DataValue::Boolean(b) => serde_json::Value::Bool(b),
            DataValue::Int64(i) => serde_json::Value::Number(i.into()),
            DataValue::UInt64(u) => serde_json::Value::Number(u.into()),
            DataValue::Float64(f) => Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            DataValue::Date(d) => serde_json::Value::String(d.format("%Y-%m-%d").to_string()),
            DataValue::Time(t) => serde_json::Value::String(t.format("%H:%M:%S%.f").to_string()),
            DataValue::DateTime(dt) => {
                serde_json::Value::String(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
            }
            DataValue::JSON(json) => {
                serde_json::from_str(&json).unwrap_or(serde_json::Value::String(json))
            }
        }
    }
}

impl From<&str> for DataValue {
    fn from(str: &str) -> Self {
        DataValue::Utf8String(str.to_string())
    }
}

impl From<String> for DataValue {
    fn from(str: String) -> Self {
        DataValue::Utf8String(str)
    }
}

impl From<i64> for DataValue {
    fn from(i: i64) -> Self {
        DataValue::Int64(i)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_data_value_from_json_scalars() {
        assert_eq!(DataValue::from_json(&json!(null)), DataValue::Null);
        assert_eq!(DataValue::from_json(&json!(true)), DataValue::Boolean(true));
        assert_eq!(DataValue::from_json(&json!(-12)), DataValue::Int64(-12));
        assert_eq!(
            DataValue::from_json(&json!(u64::MAX)),
            DataValue::UInt64(u64::MAX)
        );
        assert_eq!(DataValue::from_json(&json!(1.5)), DataValue::Float64(1.5));
        assert_eq!(DataValue::from_json(&json!("FRA")), DataValue::from("FRA"));
    }

    #[test]
    fn test_data_value_from_json_nested() {
        assert_eq!(
            DataValue::from_json(&json!({"a": [1, 2]})),
            DataValue::JSON(r#"{"a":[1,2]}"#.into())
        );
    }

    #[test]
    fn test_data_value_into_json_temporal() {
        let date = NaiveDate::from_ymd_opt(2022, 3, 4).unwrap();
        let time = NaiveTime::from_hms_opt(10, 11, 12).unwrap();

        assert_eq!(DataValue::Date(date).into_json(), json!("2022-03-04"));
        assert_eq!(DataValue::Time(time).into_json(), json!("10:11:12"));
        assert_eq!(
            DataValue::DateTime(NaiveDateTime::new(date, time)).into_json(),
            json!("2022-03-04T10:11:12")
        );
    }

    #[test]
    fn test_data_value_into_json_non_finite_float() {
        assert_eq!(DataValue::Float64(f64::NAN).into_json(), json!(null));
    }

    #[test]
    fn test_data_value_into_json_binary_and_json() {
        assert_eq!(DataValue::Binary(b"abc".to_vec()).into_json(), json!("abc"));
        assert_eq!(
            DataValue::JSON(r#"{"x":1}"#.into()).into_json(),
            json!({"x": 1})
        );
        assert_eq!(DataValue::JSON("not json".into()).into_json(), json!("not json"));
    }
}
