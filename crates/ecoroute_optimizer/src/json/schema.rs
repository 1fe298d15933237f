use schemars::schema_for;

use crate::json::types;

pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schema_for!(types::JsonRoutingRequest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lists_request_fields() {
        let schema = generate_json_schema().unwrap();
        let value: serde_json::Value = serde_json::from_str(&schema).unwrap();

        let properties = value["properties"].as_object().unwrap();
        assert!(properties.contains_key("orders"));
        assert!(properties.contains_key("vehicles"));
        assert!(properties.contains_key("params"));
    }
}
