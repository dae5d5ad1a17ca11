//! Recursive scene config diffing with dotted paths.
//!
//! Walks two configs key-by-key over the union of keys at each level, in
//! insertion order, so diff output is reproducible. Structural nodes
//! (mapping vs mapping, sequence vs sequence) recurse; everything else is
//! compared as a leaf.

use serde_yaml::Value;

use super::SceneConfig;

/// One leaf difference between two configs.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffEntry {
    /// Dotted field path, with numeric segments for sequence indices
    /// (e.g. `objects.0.material.color`).
    pub path: String,
    pub old: Value,
    pub new: Value,
}

impl std::fmt::Display for DiffEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} -> {}",
            self.path,
            format_value(&self.old),
            format_value(&self.new)
        )
    }
}

fn format_value(value: &Value) -> String {
    serde_yaml::to_string(value)
        .map(|s| s.trim_end().to_string())
        .unwrap_or_else(|_| "<unprintable>".to_string())
}

/// Compute the ordered leaf differences between two configs.
pub fn diff(a: &SceneConfig, b: &SceneConfig) -> Vec<DiffEntry> {
    // The typed model serializes infallibly; a default Value on failure
    // keeps this function total.
    let va = serde_yaml::to_value(a).unwrap_or_default();
    let vb = serde_yaml::to_value(b).unwrap_or_default();

    let mut entries = Vec::new();
    walk(&va, &vb, "", &mut entries);
    entries
}

fn walk(a: &Value, b: &Value, prefix: &str, out: &mut Vec<DiffEntry>) {
    match (a, b) {
        (Value::Mapping(ma), Value::Mapping(mb)) => {
            // Union of keys: a's insertion order first, then keys only in b.
            for (key, va) in ma {
                let child = child_path(prefix, key);
                match mb.get(key) {
                    Some(vb) => walk(va, vb, &child, out),
                    None => leaf(va, &Value::Null, &child, out),
                }
            }
            for (key, vb) in mb {
                if !ma.contains_key(key) {
                    let child = child_path(prefix, key);
                    leaf(&Value::Null, vb, &child, out);
                }
            }
        }
        (Value::Sequence(sa), Value::Sequence(sb)) => {
            for i in 0..sa.len().max(sb.len()) {
                let child = join_path(prefix, &i.to_string());
                let va = sa.get(i).unwrap_or(&Value::Null);
                let vb = sb.get(i).unwrap_or(&Value::Null);
                walk(va, vb, &child, out);
            }
        }
        _ => leaf(a, b, prefix, out),
    }
}

fn leaf(a: &Value, b: &Value, path: &str, out: &mut Vec<DiffEntry>) {
    if values_differ(a, b) {
        out.push(DiffEntry {
            path: path.to_string(),
            old: a.clone(),
            new: b.clone(),
        });
    }
}

/// A leaf difference exists when the runtime type classification differs
/// or the serialized forms are unequal.
fn values_differ(a: &Value, b: &Value) -> bool {
    classify(a) != classify(b) || format_value(a) != format_value(b)
}

fn classify(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged",
    }
}

fn child_path(prefix: &str, key: &Value) -> String {
    let segment = match key {
        Value::String(s) => s.clone(),
        other => format_value(other),
    };
    join_path(prefix, &segment)
}

fn join_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modulation::{Band, ModulationSpec};
    use crate::scene::{GeomParam, SceneObject};

    #[test]
    fn test_diff_of_equal_configs_is_empty() {
        let a = SceneConfig::default();
        let b = a.clone();
        assert!(diff(&a, &b).is_empty());

        let mut c = SceneConfig::default();
        c.objects[0].animation.insert(
            GeomParam::Radius,
            ModulationSpec {
                min: 1.0,
                max: 5.0,
                bands: vec![Band::Low],
            },
        );
        assert!(diff(&c, &c.clone()).is_empty());
    }

    #[test]
    fn test_diff_single_material_color_change() {
        let a = SceneConfig::default();
        let mut b = a.clone();
        b.objects[0].material.color = "#000000".to_string();

        let entries = diff(&a, &b);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "objects.0.material.color");
        assert_eq!(entries[0].old, Value::String("#ff00ff".into()));
        assert_eq!(entries[0].new, Value::String("#000000".into()));
    }

    #[test]
    fn test_diff_reports_added_object_fields() {
        let a = SceneConfig::default();
        let mut b = a.clone();
        b.objects.push(SceneObject {
            id: "obj-2".to_string(),
            ..SceneObject::default()
        });

        let entries = diff(&a, &b);
        assert!(!entries.is_empty());
        // Sequence growth appears under the new index.
        assert!(entries.iter().all(|e| e.path.starts_with("objects.1")));
    }

    #[test]
    fn test_diff_order_is_stable() {
        let a = SceneConfig::default();
        let mut b = a.clone();
        b.background = "#111111".to_string();
        b.objects[0].geometry.radius = 2.0;

        let first = diff(&a, &b);
        let second = diff(&a, &b);
        assert_eq!(first, second);
        // Field declaration order: background precedes objects.
        assert_eq!(first[0].path, "background");
        assert_eq!(first[1].path, "objects.0.geometry.radius");
    }

    #[test]
    fn test_diff_entry_display_format() {
        let a = SceneConfig::default();
        let mut b = a.clone();
        // 0.25 survives the f32-to-f64 widening in Value exactly.
        b.lighting.ambient.intensity = 0.25;

        let entries = diff(&a, &b);
        assert_eq!(
            entries[0].to_string(),
            "lighting.ambient.intensity: 0.5 -> 0.25"
        );
    }
}
