use serde_yaml::{Mapping, Value};
use std::path::Path;

use super::ConfigError;

/// Load a YAML file, if it exists, and deep-merge it into `root`.
pub(crate) fn load_yaml_file(path: &Path, root: &mut Value) -> Result<(), ConfigError> {
    if path.exists() {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Load(e.to_string()))?;
        merge_yaml_str(&content, root)?;
    }
    Ok(())
}

/// Parse a YAML string and deep-merge it into `root`.
pub(crate) fn merge_yaml_str(content: &str, root: &mut Value) -> Result<(), ConfigError> {
    let yaml: Value = serde_yaml::from_str(content).map_err(|e| ConfigError::Load(e.to_string()))?;
    if !yaml.is_null() {
        deep_merge(root, yaml);
    }
    Ok(())
}

/// Merge `overlay` into `base`. Mappings merge key by key; anything else replaces.
pub(crate) fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Resolve a dot-separated key (`swagger.path`) against the tree.
pub(crate) fn lookup<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(root, |node, segment| match node {
            Value::Mapping(map) => map.get(segment),
            Value::Sequence(seq) => segment.parse::<usize>().ok().and_then(|i| seq.get(i)),
            _ => None,
        })
}

/// Replace scalar leaves whose upper-snake-case key matches an env var.
pub(crate) fn overlay_env(root: &mut Value, vars: impl IntoIterator<Item = (String, String)>) {
    let vars: Vec<(String, String)> = vars
        .into_iter()
        .map(|(k, v)| (k.to_uppercase(), v))
        .collect();
    if let Value::Mapping(map) = root {
        overlay_mapping("", map, &vars);
    }
}

fn overlay_mapping(prefix: &str, map: &mut Mapping, vars: &[(String, String)]) {
    for (key, value) in map.iter_mut() {
        let Some(key) = key.as_str() else { continue };
        let env_key = if prefix.is_empty() {
            key.to_uppercase()
        } else {
            format!("{prefix}_{}", key.to_uppercase())
        };
        match value {
            Value::Mapping(child) => overlay_mapping(&env_key, child, vars),
            Value::Sequence(_) => {}
            leaf => {
                if let Some((_, raw)) = vars.iter().find(|(name, _)| *name == env_key) {
                    *leaf = serde_yaml::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_existing_leaf() {
        let mut root: Value = serde_yaml::from_str("swagger:\n  path: /swagger\n  excludeStaticFile: true\n").unwrap();
        overlay_env(
            &mut root,
            vec![
                ("SWAGGER_PATH".to_string(), "/docs".to_string()),
                ("SWAGGER_EXCLUDESTATICFILE".to_string(), "false".to_string()),
                ("UNRELATED".to_string(), "x".to_string()),
            ],
        );
        assert_eq!(lookup(&root, "swagger.path").unwrap().as_str(), Some("/docs"));
        assert_eq!(lookup(&root, "swagger.excludeStaticFile").unwrap().as_bool(), Some(false));
        assert!(lookup(&root, "unrelated").is_none());
    }

    #[test]
    fn deep_merge_keeps_unrelated_keys() {
        let mut base: Value = serde_yaml::from_str("a:\n  b: 1\n  c: 2\n").unwrap();
        let overlay: Value = serde_yaml::from_str("a:\n  c: 3\n").unwrap();
        deep_merge(&mut base, overlay);
        assert_eq!(lookup(&base, "a.b").unwrap().as_i64(), Some(1));
        assert_eq!(lookup(&base, "a.c").unwrap().as_i64(), Some(3));
    }
}
