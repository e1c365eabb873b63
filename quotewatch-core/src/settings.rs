//! Agent settings

use crate::enums::{SettingCategory, SettingType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Setting value as sent by the backend: a string or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Number(serde_json::Number),
    Text(String),
}

impl SettingValue {
    /// Interpret raw form input according to the widget type.
    ///
    /// Number fields never carry text: anything that doesn't start with an
    /// integer becomes `0`.
    pub fn from_input(setting_type: SettingType, input: &str) -> Self {
        match setting_type {
            SettingType::Number => SettingValue::Number(coerce_number(input)),
            SettingType::Text | SettingType::Textarea | SettingType::Password => {
                SettingValue::Text(input.to_string())
            }
        }
    }

    /// Re-shape a server value to match its declared type. The server's
    /// `type` is not a guarantee of the value shape.
    pub fn normalized(&self, setting_type: SettingType) -> Self {
        match (setting_type, self) {
            (SettingType::Number, SettingValue::Number(_)) => self.clone(),
            (SettingType::Number, SettingValue::Text(text)) => {
                SettingValue::Number(coerce_number(text))
            }
            (_, SettingValue::Number(n)) => SettingValue::Text(n.to_string()),
            (_, SettingValue::Text(_)) => self.clone(),
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Number(n) => write!(f, "{}", n),
            SettingValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::Text(value.to_string())
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        SettingValue::Number(value.into())
    }
}

/// Parse the leading integer of `input`; `0` when there is none.
pub fn coerce_number(input: &str) -> serde_json::Number {
    let trimmed = input.trim_start();
    let mut end = 0;
    for (idx, ch) in trimmed.char_indices() {
        let sign = idx == 0 && (ch == '-' || ch == '+');
        if ch.is_ascii_digit() || sign {
            end = idx + ch.len_utf8();
        } else {
            break;
        }
    }
    trimmed[..end]
        .parse::<i64>()
        .map(serde_json::Number::from)
        .unwrap_or_else(|_| serde_json::Number::from(0))
}

/// One configurable agent parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSetting {
    pub key: String,
    pub value: SettingValue,
    pub description: String,
    #[serde(rename = "type")]
    pub setting_type: SettingType,
    pub category: SettingCategory,
}

/// Body of `PUT /agent-settings`: setting key to value.
pub type SettingsUpdate = BTreeMap<String, SettingValue>;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn decodes_string_and_number_values() {
        let settings: Vec<AgentSetting> = serde_json::from_str(
            r#"[
                {"key": "timeout_supplier_response_hours", "value": 4, "description": "d",
                 "type": "number", "category": "general"},
                {"key": "gemini_api_key", "value": "****", "description": "d",
                 "type": "password", "category": "api"}
            ]"#,
        )
        .unwrap();
        assert_eq!(settings[0].value, SettingValue::from(4i64));
        assert_eq!(settings[1].value, SettingValue::from("****"));
        assert_eq!(settings[1].setting_type, SettingType::Password);
    }

    #[test]
    fn non_numeric_input_becomes_zero() {
        assert_eq!(
            SettingValue::from_input(SettingType::Number, "abc"),
            SettingValue::from(0i64)
        );
        assert_eq!(
            SettingValue::from_input(SettingType::Number, ""),
            SettingValue::from(0i64)
        );
        assert_eq!(
            SettingValue::from_input(SettingType::Number, "-"),
            SettingValue::from(0i64)
        );
    }

    #[test]
    fn numeric_prefix_is_kept() {
        assert_eq!(coerce_number("12abc"), serde_json::Number::from(12));
        assert_eq!(coerce_number(" 48"), serde_json::Number::from(48));
        assert_eq!(coerce_number("-3.7"), serde_json::Number::from(-3));
    }

    #[test]
    fn normalization_follows_declared_type() {
        assert_eq!(
            SettingValue::from("24").normalized(SettingType::Number),
            SettingValue::from(24i64)
        );
        assert_eq!(
            SettingValue::from(5i64).normalized(SettingType::Text),
            SettingValue::from("5")
        );
    }

    #[test]
    fn update_serializes_as_flat_map() {
        let mut update = SettingsUpdate::new();
        update.insert("a".into(), SettingValue::from(1i64));
        update.insert("b".into(), SettingValue::from("x"));
        assert_eq!(serde_json::to_string(&update).unwrap(), r#"{"a":1,"b":"x"}"#);
    }

    proptest! {
        #[test]
        fn number_input_never_yields_text(input in ".*") {
            let value = SettingValue::from_input(SettingType::Number, &input);
            prop_assert!(matches!(value, SettingValue::Number(_)));
        }

        #[test]
        fn integers_survive_coercion(n in any::<i32>()) {
            prop_assert_eq!(coerce_number(&n.to_string()), serde_json::Number::from(n));
        }
    }
}
