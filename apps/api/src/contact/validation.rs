use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::contact::rules::{rule_for, rule_table, FieldName};
use crate::contact::sanitize::sanitize;

/// Raw contact form values as typed by the visitor.
///
/// Missing, `null` or non-string values deserialize to the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactFormData {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(deserialize_with = "lenient_string")]
    pub subject: String,
    #[serde(deserialize_with = "lenient_string")]
    pub message: String,
    #[serde(deserialize_with = "lenient_string")]
    pub company: String,
}

/// The string inside a JSON value, or `""` for anything else.
pub fn text_or_empty(value: &Value) -> &str {
    value.as_str().unwrap_or_default()
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_or_empty(&value).to_string())
}

impl ContactFormData {
    pub fn get(&self, field: FieldName) -> &str {
        match field {
            FieldName::Name => &self.name,
            FieldName::Email => &self.email,
            FieldName::Subject => &self.subject,
            FieldName::Message => &self.message,
            FieldName::Company => &self.company,
        }
    }

    pub fn set(&mut self, field: FieldName, value: impl Into<String>) {
        let slot = match field {
            FieldName::Name => &mut self.name,
            FieldName::Email => &mut self.email,
            FieldName::Subject => &mut self.subject,
            FieldName::Message => &mut self.message,
            FieldName::Company => &mut self.company,
        };
        *slot = value.into();
    }

    /// Every field run through [`sanitize`].
    pub fn sanitized(&self) -> ContactFormData {
        ContactFormData {
            name: sanitize(&self.name),
            email: sanitize(&self.email),
            subject: sanitize(&self.subject),
            message: sanitize(&self.message),
            company: sanitize(&self.company),
        }
    }
}

/// Field name → error message, only for fields that failed.
pub type FieldErrors = BTreeMap<FieldName, &'static str>;

/// Validates a single field value against its rule set.
///
/// Checks run in order and the first failure wins:
/// required, optional-and-empty short circuit, min length, max length, pattern.
pub fn validate_field(field: FieldName, raw_value: &str) -> Option<&'static str> {
    let rule = rule_for(field);
    let value = sanitize(raw_value);
    let len = value.chars().count();

    if value.is_empty() {
        return if rule.required {
            rule.messages.required
        } else {
            None
        };
    }

    if let (Some(min), Some(msg)) = (rule.min_length, rule.messages.min_length) {
        if len < min {
            return Some(msg);
        }
    }

    if let (Some(max), Some(msg)) = (rule.max_length, rule.messages.max_length) {
        if len > max {
            return Some(msg);
        }
    }

    if let (Some(pattern), Some(msg)) = (&rule.pattern, rule.messages.pattern) {
        if !pattern.is_match(&value) {
            return Some(msg);
        }
    }

    None
}

/// String-keyed entry point. Unknown field names pass silently.
pub fn validate_named_field(field_name: &str, raw_value: &str) -> Option<&'static str> {
    field_name
        .parse::<FieldName>()
        .ok()
        .and_then(|field| validate_field(field, raw_value))
}

/// Validates every field declared in the rule table.
pub fn validate_form(data: &ContactFormData) -> FieldErrors {
    rule_table()
        .filter_map(|(field, _)| validate_field(field, data.get(field)).map(|msg| (field, msg)))
        .collect()
}

pub fn is_form_valid(errors: &FieldErrors) -> bool {
    errors.is_empty()
}
