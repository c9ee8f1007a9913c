use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A structured description of one thing an agent wants to do.
///
/// Actions have no fixed schema: they are JSON objects whose keys rules read
/// as needed, tolerating absent keys. Two conventional fields are recognized
/// by the audit surfaces when present: `agent_id` and `action_type`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Action(pub Map<String, Value>);

impl Action {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build an action from a JSON value. Returns `None` unless the value is
    /// an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    /// The acting agent, or `"unknown"` when the action does not carry one.
    pub fn agent_id(&self) -> &str {
        self.get_str("agent_id").unwrap_or("unknown")
    }

    /// The action's declared type, or `"unknown"` when absent.
    pub fn action_type(&self) -> &str {
        self.get_str("action_type").unwrap_or("unknown")
    }

    /// Every string-valued field in the action, depth first, with its dotted
    /// path (`details.note`, `recipients.0`). Content-scanning rules use this
    /// so nested payloads are not a blind spot.
    pub fn string_fields(&self) -> Vec<(String, &str)> {
        let mut fields = Vec::new();
        for (key, value) in &self.0 {
            collect_string_fields(key.clone(), value, &mut fields);
        }
        fields
    }
}

impl From<Map<String, Value>> for Action {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn collect_string_fields<'a>(path: String, value: &'a Value, out: &mut Vec<(String, &'a str)>) {
    match value {
        Value::String(text) => out.push((path, text.as_str())),
        Value::Object(map) => {
            for (key, nested) in map {
                collect_string_fields(format!("{path}.{key}"), nested, out);
            }
        }
        Value::Array(items) => {
            for (index, nested) in items.iter().enumerate() {
                collect_string_fields(format!("{path}.{index}"), nested, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn action(value: Value) -> Action {
        Action::from_value(value).expect("action fixture must be an object")
    }

    #[test]
    fn from_value_rejects_non_objects() {
        assert!(Action::from_value(json!("not an object")).is_none());
        assert!(Action::from_value(json!([1, 2, 3])).is_none());
        assert!(Action::from_value(json!({"ok": true})).is_some());
    }

    #[test]
    fn conventional_fields_fall_back_to_unknown() {
        let tagged = action(json!({"agent_id": "agent-7", "action_type": "send_email"}));
        assert_eq!(tagged.agent_id(), "agent-7");
        assert_eq!(tagged.action_type(), "send_email");

        let bare = action(json!({"body": "hello"}));
        assert_eq!(bare.agent_id(), "unknown");
        assert_eq!(bare.action_type(), "unknown");
    }

    #[test]
    fn numeric_getter_tolerates_absent_and_non_numeric() {
        let a = action(json!({"cost": 2.5, "label": "x"}));
        assert_eq!(a.get_f64("cost"), Some(2.5));
        assert_eq!(a.get_f64("label"), None);
        assert_eq!(a.get_f64("missing"), None);
    }

    #[test]
    fn string_fields_walk_nested_objects_and_arrays() {
        let a = action(json!({
            "subject": "quarterly report",
            "details": {"note": "internal only", "count": 3},
            "recipients": ["a@example.com", {"cc": "b@example.com"}]
        }));

        let fields = a.string_fields();
        let paths: Vec<&str> = fields.iter().map(|(p, _)| p.as_str()).collect();
        assert!(paths.contains(&"subject"));
        assert!(paths.contains(&"details.note"));
        assert!(paths.contains(&"recipients.0"));
        assert!(paths.contains(&"recipients.1.cc"));
        // the numeric leaf is not a string field
        assert!(!paths.iter().any(|p| p.contains("count")));
    }
}
