use jyut_types::VocabRecord;
use serde_json::{Map, Value, json};

/// Field set on every stored document, filled by the server
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// One Firestore write inside a commit
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    /// Create or overwrite `name` with `fields`, stamping `TIMESTAMP_FIELD` server-side
    Set { name: String, fields: Map<String, Value> },
    Delete { name: String },
    /// Stamp `TIMESTAMP_FIELD` on an existing document, leaving other fields alone
    Touch { name: String },
}

impl Write {
    pub fn to_json(&self) -> Value {
        let stamp = json!([{ "fieldPath": TIMESTAMP_FIELD, "setToServerValue": "REQUEST_TIME" }]);

        match self {
            Write::Set { name, fields } => json!({
                "update": { "name": name, "fields": fields },
                "updateTransforms": stamp,
            }),
            Write::Delete { name } => json!({ "delete": name }),
            Write::Touch { name } => json!({
                "transform": { "document": name, "fieldTransforms": stamp },
            }),
        }
    }
}

fn string_value(s: &str) -> Value {
    json!({ "stringValue": s })
}

pub fn record_fields(record: &VocabRecord) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("simplified".to_string(), string_value(&record.simplified));
    fields.insert("mandarin".to_string(), string_value(&record.mandarin));
    fields.insert("cantonese".to_string(), string_value(&record.cantonese));
    fields
}
