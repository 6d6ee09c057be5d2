use serde::{Deserialize, Serialize};

use crate::error::{BoardError, Result};
use crate::formation::{self, TacticalCategory};

fn default_formation() -> String {
    "4-3-3".to_string()
}

fn default_category() -> TacticalCategory {
    TacticalCategory::Attacking
}

/// Editor start-up settings. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Formation shown before the user picks one.
    #[serde(default = "default_formation")]
    pub default_formation: String,
    /// Used when asked for a formation the catalog does not know.
    #[serde(default = "default_formation")]
    pub fallback_formation: String,
    #[serde(default = "default_category")]
    pub default_category: TacticalCategory,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_formation: default_formation(),
            fallback_formation: default_formation(),
            default_category: default_category(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (field, name) in [
            ("defaultFormation", &self.default_formation),
            ("fallbackFormation", &self.fallback_formation),
        ] {
            if formation::template(name).is_err() {
                return Err(BoardError::InvalidConfig(format!(
                    "{field} `{name}` is not a known formation"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_uses_defaults() {
        let config = EditorConfig::from_json("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.default_formation, "4-3-3");
    }

    #[test]
    fn fields_are_camel_case() {
        let config = EditorConfig::from_json(
            r#"{"defaultFormation":"3-5-2","defaultCategory":"midfield-control"}"#,
        )
        .unwrap();

        assert_eq!(config.default_formation, "3-5-2");
        assert_eq!(config.fallback_formation, "4-3-3");
        assert_eq!(config.default_category, TacticalCategory::MidfieldControl);
    }

    #[test]
    fn unknown_formation_is_rejected() {
        let err = EditorConfig::from_json(r#"{"fallbackFormation":"1-1-8"}"#).unwrap_err();
        assert!(matches!(err, BoardError::InvalidConfig(msg) if msg.contains("1-1-8")));
    }

    #[test]
    fn malformed_json_is_invalid_payload() {
        let err = EditorConfig::from_json("{").unwrap_err();
        assert!(matches!(err, BoardError::InvalidPayload(_)));
    }
}
