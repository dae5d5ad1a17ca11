//! Serialization bridge between [`SceneConfig`] and YAML documents.
//!
//! Import never partially applies a broken document: on any error the
//! caller keeps its prior config. Export is a lossless dump of the full
//! in-memory config (key order follows field declaration order).

use std::path::Path;

use serde_yaml::Value;

use super::SceneConfig;
use crate::error::ConfigError;

/// Top-level keys a strict apply requires in the original document text.
const REQUIRED_KEYS: [&str; 3] = ["background", "lighting", "objects"];

/// Serialize the full config to YAML text.
pub fn export(config: &SceneConfig) -> Result<String, ConfigError> {
    serde_yaml::to_string(config).map_err(|e| ConfigError::InvalidDocument(e.to_string()))
}

/// Parse document text and repair it into a fully-populated config.
pub fn import(text: &str) -> Result<SceneConfig, ConfigError> {
    let raw = parse(text)?;
    SceneConfig::apply_defaults(raw)
}

/// Like [`import`], but additionally requires the original parsed text to
/// explicitly contain `background`, `lighting`, and `objects`. Defaulting
/// would always supply these, so the check targets intentionally
/// incomplete hand-edited documents.
pub fn import_strict(text: &str) -> Result<SceneConfig, ConfigError> {
    let raw = parse(text)?;
    let mapping = raw.as_mapping().ok_or_else(|| {
        ConfigError::InvalidDocument("top-level document is not a mapping".to_string())
    })?;

    let missing: Vec<String> = REQUIRED_KEYS
        .iter()
        .filter(|&&key| !mapping.contains_key(&Value::String(key.to_string())))
        .map(|&key| key.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ConfigError::MissingRequiredKeys(missing));
    }

    SceneConfig::apply_defaults(raw)
}

/// Read and import a scene document from disk (startup load path).
pub fn load_file(path: &Path) -> Result<SceneConfig, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ResourceFetch(format!("{}: {}", path.display(), e)))?;
    import(&text)
}

fn parse(text: &str) -> Result<Value, ConfigError> {
    serde_yaml::from_str(text).map_err(|e| ConfigError::InvalidDocument(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneObject;

    #[test]
    fn test_import_malformed_yaml_is_invalid_document() {
        let result = import("not: [valid, yaml: structure");
        assert!(matches!(result, Err(ConfigError::InvalidDocument(_))));
    }

    #[test]
    fn test_import_non_mapping_is_invalid_document() {
        assert!(matches!(
            import("- a\n- b"),
            Err(ConfigError::InvalidDocument(_))
        ));
        assert!(matches!(import(""), Err(ConfigError::InvalidDocument(_))));
    }

    #[test]
    fn test_import_without_objects_yields_default_object() {
        let config = import(
            "background: '#123456'\n\
             lighting:\n\
             \x20 ambient: {color: '#ffffff', intensity: 0.5}\n\
             \x20 directional: {color: '#ffffff', intensity: 1.0}\n",
        )
        .unwrap();

        assert_eq!(config.background, "#123456");
        // The single object is the full documented default, not merged
        // with any partial data.
        assert_eq!(config.objects, vec![SceneObject::default()]);
    }

    #[test]
    fn test_export_import_round_trip_is_lossless() {
        let mut config = SceneConfig::default();
        config.objects[0].geometry.radius = 7.25;
        config.objects[0].animation.insert(
            crate::scene::GeomParam::Tube,
            crate::modulation::ModulationSpec {
                min: 1.0,
                max: 6.0,
                bands: vec![crate::modulation::Band::Mid, crate::modulation::Band::High],
            },
        );

        let text = export(&config).unwrap();
        let back = import(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_default_fill_is_idempotent() {
        let partial = "background: '#010203'\nobjects:\n  - name: Solo\n";
        let once = import(partial).unwrap();
        let twice = import(&export(&once).unwrap()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_import_strict_reports_missing_keys() {
        let result = import_strict("background: '#123456'\n");
        match result {
            Err(ConfigError::MissingRequiredKeys(keys)) => {
                assert_eq!(keys, vec!["lighting".to_string(), "objects".to_string()]);
            }
            other => panic!("expected MissingRequiredKeys, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_import_strict_accepts_complete_document() {
        let text = export(&SceneConfig::default()).unwrap();
        let config = import_strict(&text).unwrap();
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn test_load_file_missing_is_resource_fetch() {
        let result = load_file(Path::new("/nonexistent/knotwave-scene.yaml"));
        assert!(matches!(result, Err(ConfigError::ResourceFetch(_))));
    }
}
