use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_GEOMETRY_ALIAS, DEFAULT_GEOMETRY_FUNCTION};
use crate::{GeosqlError, RewriteConfig};

pub const DEFAULT_ENGINE: &str = "wherobots";
pub const DEFAULT_CATALOG: &str = "wherobots_open_data";
pub const DEFAULT_CATALOGS: &[&str] = &["wherobots", "wherobots_open_data", "wherobots_pro_data"];

/// Description of the target engine: the catalogs it exposes, which of
/// them unqualified statements resolve against, and the geometry options
/// the rewrite pipeline runs with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineProfile {
    pub engine: String,
    pub default_catalog: String,
    pub catalogs: Vec<String>,
    pub geometry_functions: Vec<String>,
    pub fallback_geometry_alias: Option<String>,
    pub sanitize_aggregate_aliases: bool,
}

/// Connection parameters handed to the engine driver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectParams {
    pub database: Option<String>,
    pub args: BTreeMap<String, String>,
}

impl Default for EngineProfile {
    fn default() -> Self {
        Self {
            engine: DEFAULT_ENGINE.to_string(),
            default_catalog: DEFAULT_CATALOG.to_string(),
            catalogs: DEFAULT_CATALOGS.iter().map(|name| name.to_string()).collect(),
            geometry_functions: vec![DEFAULT_GEOMETRY_FUNCTION.to_string()],
            fallback_geometry_alias: Some(DEFAULT_GEOMETRY_ALIAS.to_string()),
            sanitize_aggregate_aliases: true,
        }
    }
}

impl EngineProfile {
    pub fn from_json_str(json: &str) -> Result<Self, GeosqlError> {
        let profile: Self = serde_json::from_str(json)
            .map_err(|err| GeosqlError::new(format!("invalid engine profile: {err}")))?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn from_path(path: &Path) -> Result<Self, GeosqlError> {
        let json = std::fs::read_to_string(path).map_err(|err| {
            GeosqlError::new(format!(
                "failed to read engine profile {}: {err}",
                path.display()
            ))
        })?;
        Self::from_json_str(&json)
    }

    fn validate(&self) -> Result<(), GeosqlError> {
        if !is_identifier(&self.default_catalog) {
            return Err(GeosqlError::new(format!(
                "default_catalog must be a plain identifier, got '{}'",
                self.default_catalog
            )));
        }
        if let Some(bad) = self.catalogs.iter().find(|name| !is_identifier(name)) {
            return Err(GeosqlError::new(format!(
                "catalog names must be plain identifiers, got '{bad}'"
            )));
        }
        Ok(())
    }

    pub fn default_catalog(&self) -> &str {
        &self.default_catalog
    }

    /// Known catalogs, with the default catalog included even when the
    /// profile does not list it.
    pub fn catalog_names(&self) -> Vec<String> {
        let mut names = self.catalogs.clone();
        if !names
            .iter()
            .any(|name| name.eq_ignore_ascii_case(&self.default_catalog))
        {
            names.push(self.default_catalog.clone());
        }
        names
    }

    /// Builds the pipeline settings. `namespace` overrides the default
    /// catalog; every known catalog counts as already qualified.
    pub fn rewrite_config(&self, namespace: Option<&str>) -> RewriteConfig {
        RewriteConfig {
            default_namespace: namespace.unwrap_or(self.default_catalog.as_str()).to_string(),
            qualified_namespaces: self.catalog_names(),
            geometry_functions: self.geometry_functions.clone(),
            fallback_geometry_alias: self.fallback_geometry_alias.clone(),
            sanitize_aggregate_aliases: self.sanitize_aggregate_aliases,
        }
    }

    /// Points the connection at `schema` and selects `catalog`, falling back
    /// to the default catalog.
    pub fn adjust_connect_params(
        &self,
        mut params: ConnectParams,
        schema: Option<&str>,
        catalog: Option<&str>,
    ) -> ConnectParams {
        if let Some(schema) = schema.filter(|schema| !schema.is_empty()) {
            params.database = Some(schema.to_string());
            params.args.insert("schema".to_string(), schema.to_string());
        }
        let catalog = catalog
            .filter(|catalog| !catalog.is_empty())
            .unwrap_or(self.default_catalog.as_str());
        params
            .args
            .insert("catalog".to_string(), catalog.to_string());
        log::debug!(
            "adjusted connect params for engine {}: catalog={catalog}",
            self.engine
        );
        params
    }
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}
