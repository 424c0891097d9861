//! Site configuration.
//!
//! Layers are merged as JSON values (defaults, then an optional file, then environment
//! overrides) and only then deserialised into [`SiteConfig`], so a file may set any subset of
//! keys.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "https://www.myscheme.gov.in";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// A dotted-path view over a JSON configuration tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigTree(Value);

impl Default for ConfigTree {
    fn default() -> Self {
        Self::empty_object()
    }
}

impl ConfigTree {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub fn get(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.get(dotted_path)?.as_str()
    }

    pub fn get_bool(&self, dotted_path: &str) -> Option<bool> {
        self.get(dotted_path)?.as_bool()
    }

    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }

        let Value::Object(ref mut root) = self.0 else {
            return;
        };
        let mut cur: &mut Map<String, Value> = root;
        let mut segments = dotted_path.split('.').peekable();
        while let Some(seg) = segments.next() {
            if segments.peek().is_none() {
                cur.insert(seg.to_string(), value);
                return;
            }
            let slot = cur.entry(seg).or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Some(next) = slot.as_object_mut() else {
                return;
            };
            cur = next;
        }
    }

    /// Objects merge key by key; any other incoming value replaces the base value.
    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub base_url: String,
    pub api_paths: Vec<String>,
    pub html_paths: Vec<String>,
    pub user_agent: String,
    pub timeout_ms: u64,
    pub max_html_entries: usize,
    pub enabled: bool,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_paths: [
                "/api/schemes",
                "/api/v1/schemes",
                "/api/scheme/list",
                "/api/search/schemes",
            ]
            .map(String::from)
            .to_vec(),
            html_paths: ["/", "/schemes", "/find-schemes"].map(String::from).to_vec(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_ms: 10_000,
            max_html_entries: 20,
            enabled: true,
        }
    }
}

impl PortalConfig {
    /// `base_url` without a trailing slash, joined with `path`.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MindMapConfig {
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for MindMapConfig {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 380.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub portal: PortalConfig,
    pub server: ServerConfig,
    pub mindmap: MindMapConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnvKind {
    Text,
    Integer,
    Flag,
}

const ENV_OVERRIDES: [(&str, &str, EnvKind); 4] = [
    ("NAGRIK_PORTAL_BASE_URL", "portal.base_url", EnvKind::Text),
    ("NAGRIK_PORTAL_TIMEOUT_MS", "portal.timeout_ms", EnvKind::Integer),
    ("NAGRIK_PORTAL_ENABLED", "portal.enabled", EnvKind::Flag),
    ("NAGRIK_BIND", "server.bind", EnvKind::Text),
];

fn env_value(kind: EnvKind, raw: &str) -> Option<Value> {
    let raw = raw.trim();
    match kind {
        EnvKind::Text => (!raw.is_empty()).then(|| Value::String(raw.to_string())),
        EnvKind::Integer => raw.parse::<u64>().ok().map(Value::from),
        EnvKind::Flag => match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(Value::Bool(true)),
            "0" | "false" | "no" | "off" => Some(Value::Bool(false)),
            _ => None,
        },
    }
}

fn parse_config_text(origin: &str, text: &str) -> Result<Value> {
    let lower = origin.to_ascii_lowercase();
    let parsed = if lower.ends_with(".yaml") || lower.ends_with(".yml") {
        serde_yaml::from_str::<Value>(text).map_err(|e| e.to_string())
    } else if lower.ends_with(".json5") {
        json5::from_str::<Value>(text).map_err(|e| e.to_string())
    } else {
        serde_json::from_str::<Value>(text).map_err(|e| e.to_string())
    };
    let value = parsed.map_err(|message| Error::Config {
        origin: origin.to_string(),
        message,
    })?;
    match value {
        Value::Object(_) => Ok(value),
        Value::Null => Ok(Value::Object(Map::new())),
        _ => Err(Error::Config {
            origin: origin.to_string(),
            message: "top level must be a mapping".to_string(),
        }),
    }
}

impl SiteConfig {
    fn defaults_tree() -> Result<ConfigTree> {
        Ok(ConfigTree::from_value(serde_json::to_value(Self::default())?))
    }

    fn from_tree(origin: &str, tree: ConfigTree) -> Result<Self> {
        serde_json::from_value(tree.into_value()).map_err(|e| Error::Config {
            origin: origin.to_string(),
            message: e.to_string(),
        })
    }

    /// Parses configuration text; the format is picked from `origin`'s extension.
    pub fn from_str_with_origin(origin: &str, text: &str) -> Result<Self> {
        let mut tree = Self::defaults_tree()?;
        tree.deep_merge(&parse_config_text(origin, text)?);
        Self::from_tree(origin, tree)
    }

    /// Defaults, then the optional file, then `NAGRIK_*` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    pub fn load_with_env(
        path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut tree = Self::defaults_tree()?;
        let mut origin = "defaults".to_string();
        if let Some(path) = path {
            origin = path.display().to_string();
            let text = std::fs::read_to_string(path)?;
            tree.deep_merge(&parse_config_text(&origin, &text)?);
            tracing::debug!(path = %origin, "loaded configuration file");
        }

        for (key, dotted, kind) in ENV_OVERRIDES {
            let Some(raw) = env(key) else { continue };
            match env_value(kind, &raw) {
                Some(value) => tree.set_value(dotted, value),
                None => tracing::warn!(key, value = %raw, "ignoring invalid environment override"),
            }
        }

        Self::from_tree(&origin, tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_match_the_portal() {
        let cfg = SiteConfig::load_with_env(None, no_env).unwrap();
        assert_eq!(cfg.portal.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.portal.api_paths.len(), 4);
        assert_eq!(cfg.portal.html_paths, ["/", "/schemes", "/find-schemes"]);
        assert_eq!(cfg.portal.timeout_ms, 10_000);
        assert_eq!(cfg.portal.max_html_entries, 20);
        assert_eq!(cfg.server.bind, "127.0.0.1:3000");
        assert_eq!(cfg.mindmap.viewport_height, 380.0);
        assert_eq!(
            cfg.portal.url_for("/api/schemes"),
            "https://www.myscheme.gov.in/api/schemes"
        );
    }

    #[test]
    fn file_layers_are_partial_and_format_follows_extension() {
        let yaml = SiteConfig::from_str_with_origin(
            "site.yaml",
            "portal:\n  timeout_ms: 500\n  enabled: false\n",
        )
        .unwrap();
        assert_eq!(yaml.portal.timeout_ms, 500);
        assert!(!yaml.portal.enabled);
        assert_eq!(yaml.portal.base_url, DEFAULT_BASE_URL);

        let json5 = SiteConfig::from_str_with_origin(
            "site.json5",
            "{ server: { bind: '0.0.0.0:8080' }, /* c */ }",
        )
        .unwrap();
        assert_eq!(json5.server.bind, "0.0.0.0:8080");

        let err = SiteConfig::from_str_with_origin("site.json", "[1, 2]").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        let err = SiteConfig::from_str_with_origin("site.json", "{\"portal\": {\"timeout_ms\": \"x\"}}")
            .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn env_overrides_win_and_bad_values_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nagrik.json");
        std::fs::write(&path, r#"{"portal": {"timeout_ms": 2500}, "server": {"bind": "x:1"}}"#)
            .unwrap();

        let env: HashMap<&str, &str> = [
            ("NAGRIK_PORTAL_TIMEOUT_MS", "soon"),
            ("NAGRIK_PORTAL_ENABLED", "off"),
            ("NAGRIK_BIND", "127.0.0.1:9999"),
        ]
        .into_iter()
        .collect();
        let cfg =
            SiteConfig::load_with_env(Some(&path), |k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(cfg.portal.timeout_ms, 2500);
        assert!(!cfg.portal.enabled);
        assert_eq!(cfg.server.bind, "127.0.0.1:9999");
    }

    #[test]
    fn dotted_paths_create_intermediate_objects() {
        let mut tree = ConfigTree::from_value(Value::Null);
        tree.set_value("a.b.c", Value::Bool(true));
        assert_eq!(tree.get_bool("a.b.c"), Some(true));
        tree.deep_merge(&serde_json::json!({"a": {"d": "x"}}));
        assert_eq!(tree.get_str("a.d"), Some("x"));
        assert_eq!(tree.get_bool("a.b.c"), Some(true));
    }
}
