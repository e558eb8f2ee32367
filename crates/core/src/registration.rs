//! Capability registration descriptors.
//!
//! A hosting platform discovers an integration's parameter surface from a
//! declarative [`CapabilitySpec`]: one entry per host-facing field, each
//! with a kind, an optional default, and a required flag. The host renders
//! and validates these itself; integrations only declare them.

use serde::Serialize;

/// Rendering/validation kind of a host-facing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    /// Free-form single-line text.
    Text,
    /// Sensitive text the host must mask (API keys, tokens).
    Secret,
    /// Numeric input.
    Number,
    /// A JSON document, edited as multi-line text.
    Json,
}

/// Declaration of a single host-facing field.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    /// Machine name the host passes values back under.
    pub name: String,
    /// Human-readable label shown in the host UI.
    pub display_name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Pre-filled value when the user has not supplied one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldSpec {
    /// Create an optional field with no default and no description.
    pub fn new(name: impl Into<String>, display_name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            kind,
            default: None,
            required: false,
            description: None,
        }
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach a default value.
    pub fn with_default(mut self, default: serde_json::Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Attach a description shown as help text in the host UI.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Declaration of one integration capability: identity plus its fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilitySpec {
    /// Machine name the host registers the capability under.
    pub name: String,
    /// Human-readable name shown in the host UI.
    pub display_name: String,
    pub description: String,
    pub fields: Vec<FieldSpec>,
}

impl CapabilitySpec {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        fields: Vec<FieldSpec>,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            description: description.into(),
            fields,
        }
    }

    /// Look up a field declaration by machine name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_spec_serializes_kind_as_type() {
        let field = FieldSpec::new("apiKey", "API Key", FieldKind::Secret);
        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "apiKey",
                "displayName": "API Key",
                "type": "secret",
                "required": false,
            })
        );
    }

    #[test]
    fn default_and_description_serialize_when_present() {
        let field = FieldSpec::new("timeout", "Timeout", FieldKind::Number)
            .with_default(json!(30))
            .with_description("Maximum wait in minutes");
        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(value["default"], json!(30));
        assert_eq!(value["description"], "Maximum wait in minutes");
    }

    #[test]
    fn capability_field_lookup() {
        let spec = CapabilitySpec::new(
            "demo",
            "Demo",
            "A demo capability",
            vec![
                FieldSpec::new("a", "A", FieldKind::Text),
                FieldSpec::new("b", "B", FieldKind::Json).required(),
            ],
        );
        assert!(spec.field("a").is_some());
        assert!(spec.field("b").unwrap().required);
        assert!(spec.field("missing").is_none());
    }

    #[test]
    fn capability_serializes_camel_case() {
        let spec = CapabilitySpec::new("demo", "Demo", "desc", vec![]);
        let value = serde_json::to_value(&spec).unwrap();
        assert!(value.get("displayName").is_some());
        assert!(value.get("display_name").is_none());
    }
}
