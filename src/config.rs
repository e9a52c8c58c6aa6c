use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{Language, ThemeMode};

/// Built-in defaults, also written out as the user's config on first run.
const BLUEPRINT: &str = include_str!("../codexplain.default.toml");
const LOCAL_CONFIG: &str = "codexplain.toml";
const ENV_PREFIX: &str = "CODEXPLAIN";

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub api_base_url: Option<String>,
    pub default_language: Language,
    pub theme: ThemeMode,
    pub log_file: Option<String>,
}

impl Settings {
    /// Layers: blueprint, user config, `./codexplain.toml`, `CODEXPLAIN_*` env vars.
    pub fn new(user_config_path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load(
            user_config_path,
            Some(Path::new(LOCAL_CONFIG)),
            Some(Environment::with_prefix(ENV_PREFIX)),
        )
    }

    /// Same layering with every outside source made explicit. A missing
    /// layer is skipped.
    pub fn load(user: Option<&Path>, local: Option<&Path>, env: Option<Environment>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(File::from_str(BLUEPRINT, FileFormat::Toml));
        for path in [user, local].into_iter().flatten() {
            builder = builder.add_source(File::from(path).required(false));
        }
        if let Some(env) = env {
            builder = builder.add_source(env);
        }
        let s = builder.build()?;

        let mut settings: Settings = s.try_deserialize()?;
        // An empty value in a file or env var means "not configured".
        settings.api_base_url = settings.api_base_url.filter(|url| !url.trim().is_empty());
        Ok(settings)
    }

    pub fn log_path(&self) -> PathBuf {
        match &self.log_file {
            Some(path) => PathBuf::from(shellexpand::tilde(path).as_ref()),
            None => config_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("codexplain.log"),
        }
    }
}

fn config_dir() -> Option<PathBuf> {
    let mut path = dirs::home_dir()?;
    path.push(".config");
    path.push("codexplain");
    Some(path)
}

pub fn get_user_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("codexplain.toml"))
}

/// Writes the blueprint to the user config path if nothing is there yet.
pub fn ensure_user_config() -> anyhow::Result<Option<PathBuf>> {
    let Some(path) = get_user_config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, BLUEPRINT)?;
    }
    Ok(Some(path))
}
