use serde::{Deserialize, Serialize};

pub const DEFAULT_GEOMETRY_FUNCTION: &str = "ST_AsGeoJSON";
pub const DEFAULT_GEOMETRY_ALIAS: &str = "geojson";

/// Settings for one pipeline run.
///
/// `default_namespace` is prefixed onto unqualified table references.
/// Two-part names whose first part is the default namespace or one of
/// `qualified_namespaces` are treated as already qualified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    pub default_namespace: String,
    pub qualified_namespaces: Vec<String>,
    pub geometry_functions: Vec<String>,
    pub fallback_geometry_alias: Option<String>,
    pub sanitize_aggregate_aliases: bool,
}

impl RewriteConfig {
    pub fn with_default_namespace(namespace: impl Into<String>) -> Self {
        Self {
            default_namespace: namespace.into(),
            qualified_namespaces: Vec::new(),
            geometry_functions: vec![DEFAULT_GEOMETRY_FUNCTION.to_string()],
            fallback_geometry_alias: Some(DEFAULT_GEOMETRY_ALIAS.to_string()),
            sanitize_aggregate_aliases: false,
        }
    }

    pub(crate) fn is_qualified_namespace(&self, name: &str) -> bool {
        name.eq_ignore_ascii_case(&self.default_namespace)
            || self
                .qualified_namespaces
                .iter()
                .any(|namespace| namespace.eq_ignore_ascii_case(name))
    }

    pub(crate) fn is_geometry_function(&self, name: &str) -> bool {
        self.geometry_functions
            .iter()
            .any(|function| function.eq_ignore_ascii_case(name))
    }
}

impl Default for RewriteConfig {
    fn default() -> Self {
        crate::EngineProfile::default().rewrite_config(None)
    }
}

#[cfg(test)]
mod tests {
    use super::RewriteConfig;

    #[test]
    fn default_namespace_counts_as_qualified() {
        let config = RewriteConfig::with_default_namespace("catalog1");
        assert!(config.is_qualified_namespace("CATALOG1"));
        assert!(!config.is_qualified_namespace("sales"));
    }

    #[test]
    fn namespace_only_config_leaves_aggregate_aliases_alone() {
        let config = RewriteConfig::with_default_namespace("catalog1");
        assert!(!config.sanitize_aggregate_aliases);
        assert!(RewriteConfig::default().sanitize_aggregate_aliases);
    }

    #[test]
    fn omitted_fields_fall_back_to_defaults() {
        let config: RewriteConfig =
            serde_json::from_str(r#"{ "default_namespace": "lake" }"#).expect("valid config");
        assert_eq!(config.default_namespace, "lake");
        assert!(config.is_geometry_function("st_asgeojson"));
        assert_eq!(config.fallback_geometry_alias.as_deref(), Some("geojson"));
        assert!(config.sanitize_aggregate_aliases);
    }
}
