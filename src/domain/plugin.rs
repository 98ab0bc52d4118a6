use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PluginType {
    PaymentProcessor,
    Notification,
}

/// Semantic type hint for a configuration key a plugin reads from the environment.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum EnvKind {
    Secret,
    String,
    Boolean,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct EnvVarSpec {
    pub key: String,
    pub kind: EnvKind,
    #[serde(default)]
    pub required: bool,
}

impl EnvVarSpec {
    pub fn new(key: impl Into<String>, kind: EnvKind, required: bool) -> Self {
        Self {
            key: key.into(),
            kind,
            required,
        }
    }
}

/// Static metadata a plugin publishes to the host at registration time.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct PluginDescriptor {
    /// Unique name the host uses to look the plugin up.
    pub name: String,
    pub plugin_type: PluginType,
    pub plugin_uri: String,
    pub version: Version,
    pub author: String,
    pub author_uri: String,
    pub description: String,
    pub license: String,
    /// Host platform versions this plugin runs against.
    pub host_compatibility: VersionReq,
    #[serde(default)]
    pub env: Vec<EnvVarSpec>,
}

impl PluginDescriptor {
    pub fn is_compatible_with(&self, host: &Version) -> bool {
        self.host_compatibility.matches(host)
    }
}

/// Parses a boolean written as `true/false`, `1/0` or `yes/no`, ignoring case.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// A resolved configuration value.
#[derive(Clone, PartialEq, Eq)]
pub enum ConfigValue {
    Secret(String),
    Text(String),
    Flag(bool),
}

impl ConfigValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Secret(s) | ConfigValue::Text(s) => Some(s),
            ConfigValue::Flag(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Flag(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Debug for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Secret(_) => f.write_str("Secret(<redacted>)"),
            ConfigValue::Text(s) => f.debug_tuple("Text").field(s).finish(),
            ConfigValue::Flag(b) => f.debug_tuple("Flag").field(b).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(req: &str) -> PluginDescriptor {
        PluginDescriptor {
            name: "test".to_string(),
            plugin_type: PluginType::PaymentProcessor,
            plugin_uri: String::new(),
            version: Version::new(0, 1, 0),
            author: String::new(),
            author_uri: String::new(),
            description: String::new(),
            license: String::new(),
            host_compatibility: VersionReq::parse(req).unwrap(),
            env: vec![],
        }
    }

    #[test]
    fn test_host_compatibility() {
        let d = descriptor(">=1.0.0");
        assert!(d.is_compatible_with(&Version::new(1, 0, 0)));
        assert!(d.is_compatible_with(&Version::new(2, 3, 1)));
        assert!(!d.is_compatible_with(&Version::new(0, 9, 9)));
    }

    #[test]
    fn test_plugin_type_wire_name() {
        let json = serde_json::to_string(&PluginType::PaymentProcessor).unwrap();
        assert_eq!(json, "\"PAYMENT_PROCESSOR\"");
    }

    #[test]
    fn test_descriptor_deserializes_without_env() {
        let json = r#"{
            "name": "code",
            "plugin_type": "PAYMENT_PROCESSOR",
            "plugin_uri": "",
            "version": "1.0.1",
            "author": "",
            "author_uri": "",
            "description": "",
            "license": "",
            "host_compatibility": ">=1.0.0"
        }"#;
        let d: PluginDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(d.version, Version::new(1, 0, 1));
        assert!(d.env.is_empty());
    }

    #[test]
    fn test_parse_flag() {
        for raw in ["true", "TRUE", "1", "yes", " Yes "] {
            assert_eq!(parse_flag(raw), Some(true), "{raw}");
        }
        for raw in ["false", "0", "no", "NO"] {
            assert_eq!(parse_flag(raw), Some(false), "{raw}");
        }
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(parse_flag(""), None);
    }

    #[test]
    fn test_secret_is_redacted_in_debug() {
        let value = ConfigValue::Secret("sk_live_123".to_string());
        let rendered = format!("{value:?}");
        assert!(!rendered.contains("sk_live_123"));
        assert_eq!(value.as_str(), Some("sk_live_123"));
        assert_eq!(ConfigValue::Flag(true).as_bool(), Some(true));
    }
}
