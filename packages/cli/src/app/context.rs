use crate::error::CliError;
use geosql_engine::EngineProfile;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct AppContext {
    pub config_path: Option<PathBuf>,
}

impl AppContext {
    /// Loads the engine profile from `--config`, or the built-in default.
    pub fn load_profile(&self) -> Result<EngineProfile, CliError> {
        match &self.config_path {
            Some(path) => {
                log::debug!("loading engine profile from {}", path.display());
                Ok(EngineProfile::from_path(path)?)
            }
            None => Ok(EngineProfile::default()),
        }
    }
}
