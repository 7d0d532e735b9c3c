use molt_types::Config;
use serde_json::{Map, Value};

use crate::errors::LoadError;

/// Parse one override document into a key-value layer.
///
/// The document is a flat JSON object keyed by parameter name; values keep
/// their JSON types and are checked against the parameter they target when
/// the layer merges.
pub fn parse_layer(json: &str) -> Result<Map<String, Value>, LoadError> {
    serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))
}

/// Merge an override document into `cfg`. Returns the keys that matched no
/// parameter, for the caller to warn about.
pub fn apply_config_layer(cfg: &mut Config, json: &str) -> Result<Vec<String>, LoadError> {
    let layer = parse_layer(json)?;
    Ok(cfg.merge_layer(&layer)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_land_and_unknown_keys_surface() {
        let mut cfg = Config::default();
        let unknown = apply_config_layer(
            &mut cfg,
            r#"{"wall_z_height": 6.5, "carrycase": false, "wall_hz_height": 1}"#,
        )
        .unwrap();
        assert_eq!(cfg.wall_z_height, 6.5);
        assert!(!cfg.carrycase);
        assert_eq!(unknown, vec!["wall_hz_height".to_string()]);
    }

    #[test]
    fn mistyped_value_is_a_config_error() {
        let mut cfg = Config::default();
        let err = apply_config_layer(&mut cfg, r#"{"wall_z_height": "tall"}"#).unwrap_err();
        assert!(matches!(err, LoadError::BadConfig(_)));
    }

    #[test]
    fn top_level_array_is_a_parse_error() {
        let mut cfg = Config::default();
        assert!(matches!(
            apply_config_layer(&mut cfg, r#"[1, 2]"#),
            Err(LoadError::ParseError(_))
        ));
    }
}
