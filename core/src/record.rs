use indexmap::IndexMap;
use serde_json::Value;

/// Property bag of a node or relationship record. Iteration order is the
/// field order of the originating record; tooltip listings depend on it.
pub type PropertyMap = IndexMap<String, Value>;

/// Render the display key for a database-internal identity: its decimal
/// string form. `42` becomes `"42"`, negatives keep the sign.
pub fn display_id(identity: i64) -> String {
    identity.to_string()
}

/// A node row as returned by the graph database, driver-agnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    pub identity: i64,
    pub labels: Vec<String>,
    pub properties: PropertyMap,
}

impl NodeRecord {
    /// Stable key used throughout the visual model.
    pub fn display_id(&self) -> String {
        display_id(self.identity)
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Text form of a property, if present and textual (string or number).
    /// Booleans, nulls and composites do not qualify as display text.
    pub fn property_text(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// A relationship row as returned by the graph database. `start` and `end`
/// are node identities.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    pub identity: i64,
    pub start: i64,
    pub end: i64,
    pub rel_type: String,
    pub properties: PropertyMap,
}

impl EdgeRecord {
    pub fn display_id(&self) -> String {
        display_id(self.identity)
    }

    /// Display key of the start node.
    pub fn start_id(&self) -> String {
        display_id(self.start)
    }

    /// Display key of the end node.
    pub fn end_id(&self) -> String {
        display_id(self.end)
    }
}

/// Render a property value for listings. Strings appear bare (no quotes),
/// composites as compact JSON.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(identity: i64, labels: &[&str]) -> NodeRecord {
        NodeRecord {
            identity,
            labels: labels.iter().map(|l| l.to_string()).collect(),
            properties: PropertyMap::new(),
        }
    }

    #[test]
    fn test_display_id_is_decimal_string() {
        assert_eq!(display_id(42), "42");
        assert_eq!(display_id(0), "0");
        assert_eq!(display_id(-7), "-7");
        assert_eq!(node(1234567, &[]).display_id(), "1234567");
    }

    #[test]
    fn test_edge_endpoint_ids_match_node_keys() {
        let e = EdgeRecord {
            identity: 9,
            start: 3,
            end: -1,
            rel_type: "KNOWS".to_string(),
            properties: PropertyMap::new(),
        };
        assert_eq!(e.display_id(), "9");
        assert_eq!(e.start_id(), "3");
        assert_eq!(e.end_id(), "-1");
        assert_eq!(e.start_id(), display_id(3));
    }

    #[test]
    fn test_label_membership() {
        let n = node(1, &["Movie", "Classic"]);
        assert!(n.has_label("Movie"));
        assert!(n.has_label("Classic"));
        assert!(!n.has_label("Person"));
        assert!(!node(2, &[]).has_label("Movie"));
    }

    #[test]
    fn test_property_text_accepts_strings_and_numbers() {
        let mut n = node(1, &["Movie"]);
        n.properties.insert("title".to_string(), json!("The Matrix"));
        n.properties.insert("released".to_string(), json!(1999));
        n.properties.insert("ongoing".to_string(), json!(false));
        n.properties.insert("cast".to_string(), json!(["Keanu"]));

        assert_eq!(n.property_text("title"), Some("The Matrix".to_string()));
        assert_eq!(n.property_text("released"), Some("1999".to_string()));
        assert_eq!(n.property_text("ongoing"), None);
        assert_eq!(n.property_text("cast"), None);
        assert_eq!(n.property_text("missing"), None);
    }

    #[test]
    fn test_format_value_strips_string_quotes_only() {
        assert_eq!(format_value(&json!("Keanu Reeves")), "Keanu Reeves");
        assert_eq!(format_value(&json!(1964)), "1964");
        assert_eq!(format_value(&json!(true)), "true");
        assert_eq!(format_value(&json!(null)), "null");
        assert_eq!(format_value(&json!(["a", "b"])), r#"["a","b"]"#);
    }

    #[test]
    fn test_property_order_is_preserved() {
        let mut n = node(1, &["Person"]);
        n.properties.insert("name".to_string(), json!("Ann"));
        n.properties.insert("born".to_string(), json!(1970));
        n.properties.insert("city".to_string(), json!("Oslo"));
        let keys: Vec<&String> = n.properties.keys().collect();
        assert_eq!(keys, ["name", "born", "city"]);
    }
}
