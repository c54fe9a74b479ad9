mod field;
pub use field::*;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The name of the field holding the list of event tags
pub const TAGS_FIELD: &str = "tags";

/// A structured event flowing through the pipeline
///
/// Events are JSON objects of named fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event {
    fields: Map<String, Value>,
}

impl Event {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an event from a JSON value, which must be an object
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => bail!("Expected event to be a JSON object, found: {}", other),
        }
    }

    pub fn into_json(self) -> Value {
        Value::Object(self.fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Gets the value at the referenced field, if present
    pub fn get(&self, field: &FieldRef) -> Option<&Value> {
        let (first, rest) = field.path().split_first()?;
        let mut current = self.fields.get(first)?;

        for segment in rest {
            current = current.as_object()?.get(segment)?;
        }

        Some(current)
    }

    pub fn contains(&self, field: &FieldRef) -> bool {
        self.get(field).is_some()
    }

    /// Sets the value at the referenced field, overwriting any existing value.
    /// Missing parent objects are created, non-object parents are replaced.
    pub fn set(&mut self, field: &FieldRef, value: Value) {
        let Some((last, parents)) = field.path().split_last() else {
            return;
        };

        let mut current = &mut self.fields;

        for segment in parents {
            let entry = current
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new()));

            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }

            let Value::Object(map) = entry else {
                return;
            };
            current = map;
        }

        current.insert(last.clone(), value);
    }

    /// Removes the value at the referenced field, returning it if present
    pub fn remove(&mut self, field: &FieldRef) -> Option<Value> {
        let (last, parents) = field.path().split_last()?;
        let mut current = &mut self.fields;

        for segment in parents {
            current = current.get_mut(segment)?.as_object_mut()?;
        }

        current.remove(last)
    }

    /// Returns the tags of the event
    pub fn tags(&self) -> Vec<&str> {
        match self.fields.get(TAGS_FIELD) {
            Some(Value::Array(tags)) => tags.iter().filter_map(|t| t.as_str()).collect(),
            Some(Value::String(tag)) => vec![tag.as_str()],
            _ => vec![],
        }
    }

    /// Appends the supplied tag to the event's tags.
    ///
    /// The tag list is created if absent and an existing scalar value
    /// becomes the first element of the list. Tags are not de-duplicated.
    pub fn tag(&mut self, tag: impl Into<String>) {
        let tags = self
            .fields
            .entry(TAGS_FIELD)
            .or_insert_with(|| Value::Array(vec![]));

        match tags {
            Value::Array(tags) => tags.push(Value::String(tag.into())),
            Value::Null => *tags = Value::Array(vec![Value::String(tag.into())]),
            other => {
                let existing = other.take();
                *other = Value::Array(vec![existing, Value::String(tag.into())]);
            }
        }
    }
}

impl From<Map<String, Value>> for Event {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl TryFrom<Value> for Event {
    type Error = anyhow::Error;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_json(value)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn event(value: Value) -> Event {
        Event::from_json(value).unwrap()
    }

    fn field(field: &str) -> FieldRef {
        FieldRef::parse(field).unwrap()
    }

    #[test]
    fn test_event_from_json_requires_object() {
        assert!(Event::from_json(json!([1, 2])).is_err());
        assert!(Event::from_json(json!("abc")).is_err());
        assert!(Event::from_json(json!({})).is_ok());
    }

    #[test]
    fn test_event_get() {
        let event = event(json!({"country_code": "FRA", "geo": {"city": "Paris"}}));

        assert_eq!(event.get(&field("country_code")), Some(&json!("FRA")));
        assert_eq!(event.get(&field("[geo][city]")), Some(&json!("Paris")));
        assert_eq!(event.get(&field("[geo][zip]")), None);
        assert_eq!(event.get(&field("[country_code][x]")), None);
        assert!(!event.contains(&field("missing")));
    }

    #[test]
    fn test_event_set_overwrites() {
        let mut event = event(json!({"target": "old"}));

        event.set(&field("target"), json!([{"a": 1}]));

        assert_eq!(event.into_json(), json!({"target": [{"a": 1}]}));
    }

    #[test]
    fn test_event_set_creates_parents() {
        let mut event = event(json!({"geo": "scalar"}));

        event.set(&field("[geo][country]"), json!("FRA"));
        event.set(&field("[a][b][c]"), json!(1));

        assert_eq!(
            event.into_json(),
            json!({"geo": {"country": "FRA"}, "a": {"b": {"c": 1}}})
        );
    }

    #[test]
    fn test_event_set_keeps_siblings_and_replaces_arrays() {
        let mut event = event(json!({"geo": {"city": "Paris", "codes": [1, 2]}}));

        event.set(&field("[geo][country]"), json!("FRA"));
        event.set(&field("[geo][codes][iso]"), json!("FR"));

        assert_eq!(
            event.into_json(),
            json!({"geo": {"city": "Paris", "country": "FRA", "codes": {"iso": "FR"}}})
        );
    }

    #[test]
    fn test_event_remove() {
        let mut event = event(json!({"geo": {"country": "FRA", "city": "Paris"}}));

        assert_eq!(event.remove(&field("[geo][city]")), Some(json!("Paris")));
        assert_eq!(event.remove(&field("[geo][city]")), None);
        assert_eq!(event.into_json(), json!({"geo": {"country": "FRA"}}));
    }

    #[test]
    fn test_event_tag_creates_list() {
        let mut event = Event::new();

        event.tag("_lookupfailure");

        assert_eq!(event.tags(), vec!["_lookupfailure"]);
        assert_eq!(event.into_json(), json!({"tags": ["_lookupfailure"]}));
    }

    #[test]
    fn test_event_tag_appends_in_order_without_dedup() {
        let mut event = event(json!({"tags": ["db_err"]}));

        event.tag("db_err");
        event.tag("retry_me");

        assert_eq!(event.tags(), vec!["db_err", "db_err", "retry_me"]);
    }

    #[test]
    fn test_event_tag_converts_scalar() {
        let mut event = event(json!({"tags": "existing"}));

        event.tag("new");

        assert_eq!(event.tags(), vec!["existing", "new"]);
    }

    #[test]
    fn test_event_serde_transparent() {
        let event: Event = serde_json::from_str(r#"{"a":1}"#).unwrap();

        assert_eq!(serde_json::to_string(&event).unwrap(), r#"{"a":1}"#);
    }
}
