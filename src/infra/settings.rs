use super::config::DEFAULT_CONFIG_FILE_NAME;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const SETTINGS_FILE_NAME: &str = "composer.toml";
pub const DEFAULT_COMPOSE_COMMAND: &str = "docker-compose";

/// Values taken from the command line or the environment
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub workdir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub compose_cmd: Option<String>,
}

/// Optional `composer.toml` in the working directory
#[derive(Deserialize, Debug, Default)]
pub struct SettingsFile {
    pub config: Option<PathBuf>,
    #[serde(default)]
    pub compose: ComposeSettings,
}

#[derive(Deserialize, Debug, Default)]
pub struct ComposeSettings {
    /// argv of the orchestration tool, e.g. `["docker", "compose"]`
    pub command: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub workdir: PathBuf,
    pub config_path: PathBuf,
    pub compose_command: Vec<String>,
}

impl Settings {
    /// Overrides win over `composer.toml`, which wins over defaults.
    pub fn resolve(overrides: SettingsOverrides) -> Result<Self> {
        let workdir = overrides
            .workdir
            .map(expand_tilde)
            .unwrap_or_else(|| PathBuf::from("."));

        let file = load_settings_file(&workdir)?;

        let config = overrides
            .config
            .or(file.config)
            .map(expand_tilde)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE_NAME));
        let config_path = if config.is_absolute() {
            config
        } else {
            workdir.join(config)
        };

        let mut compose_command = match overrides.compose_cmd {
            Some(cmd) => cmd.split_whitespace().map(str::to_string).collect(),
            None => file
                .compose
                .command
                .unwrap_or_else(|| vec![DEFAULT_COMPOSE_COMMAND.to_string()]),
        };
        compose_command.retain(|part| !part.trim().is_empty());

        if compose_command.is_empty() {
            bail!("compose command must not be empty");
        }

        Ok(Self {
            workdir,
            config_path,
            compose_command,
        })
    }
}

pub fn load_settings_file(workdir: &Path) -> Result<SettingsFile> {
    let path = workdir.join(SETTINGS_FILE_NAME);
    if !path.exists() {
        return Ok(SettingsFile::default());
    }

    let content = fs::read_to_string(&path).with_context(|| format!("reading {:?}", path))?;
    let file: SettingsFile =
        toml::from_str(&content).with_context(|| format!("parsing {:?}", path))?;
    debug!("Loaded settings from {:?}", path);
    Ok(file)
}

fn expand_tilde(path: PathBuf) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path.to_string_lossy().as_ref()).into_owned())
}
