use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable Claude Code itself honors for its data directory.
pub const CLAUDE_DIR_ENV: &str = "CLAUDE_CONFIG_DIR";

/// Resolve the Claude data directory based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. CLAUDE_CONFIG_DIR environment variable (with tilde expansion)
/// 3. `claude_dir` from the config file
/// 4. ~/.claude
///
/// The config file is only read when neither 1 nor 2 applies.
pub fn resolve_claude_dir(explicit_path: Option<&str>) -> Result<PathBuf> {
    let env_path = std::env::var(CLAUDE_DIR_ENV).ok();
    resolve_with(explicit_path, env_path.as_deref(), Config::load)
}

fn resolve_with(
    explicit_path: Option<&str>,
    env_path: Option<&str>,
    load_config: impl FnOnce() -> Result<Config>,
) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Some(path) = env_path.filter(|p| !p.is_empty()) {
        return Ok(expand_tilde(path));
    }

    if let Some(path) = load_config()?.claude_dir {
        return Ok(path);
    }

    if let Some(home) = dirs::home_dir() {
        return Ok(home.join(".claude"));
    }

    Err(Error::Config(
        "Could not determine Claude directory: no HOME directory found".to_string(),
    ))
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Claude Code data directory (the one holding `projects/`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claude_dir: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::default_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// `<config_dir>/claude-replay/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("claude-replay").join("config.toml"))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.claude_dir.is_none());
    }

    #[test]
    fn test_config_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            claude_dir: Some(PathBuf::from("/srv/claude")),
        };
        config.save_to(&config_path)?;
        assert!(config_path.exists());

        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded, config);

        Ok(())
    }

    #[test]
    fn test_load_nonexistent_returns_default() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path)?;
        assert_eq!(config, Config::default());

        Ok(())
    }

    #[test]
    fn test_load_malformed_is_config_error() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "claude_dir = [")?;

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        Ok(())
    }

    fn from_config() -> Result<Config> {
        Ok(Config {
            claude_dir: Some(PathBuf::from("/from/config")),
        })
    }

    fn broken_config() -> Result<Config> {
        Err(Error::Config("claude_dir = [".to_string()))
    }

    #[test]
    fn test_resolution_priority() -> Result<()> {
        assert_eq!(
            resolve_with(Some("/explicit"), Some("/from/env"), from_config)?,
            PathBuf::from("/explicit")
        );
        assert_eq!(
            resolve_with(None, Some("/from/env"), from_config)?,
            PathBuf::from("/from/env")
        );
        assert_eq!(
            resolve_with(None, Some(""), from_config)?,
            PathBuf::from("/from/config")
        );
        assert_eq!(
            resolve_with(None, None, from_config)?,
            PathBuf::from("/from/config")
        );

        Ok(())
    }

    #[test]
    fn test_broken_config_ignored_when_not_needed() -> Result<()> {
        assert_eq!(
            resolve_with(Some("/explicit"), None, broken_config)?,
            PathBuf::from("/explicit")
        );
        assert_eq!(
            resolve_with(None, Some("/from/env"), broken_config)?,
            PathBuf::from("/from/env")
        );

        let err = resolve_with(None, Some(""), broken_config).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        Ok(())
    }

    #[test]
    fn test_default_falls_back_to_home() -> Result<()> {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                resolve_with(None, None, || Ok(Config::default()))?,
                home.join(".claude")
            );
        }
        Ok(())
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/.claude"), home.join(".claude"));
        }
    }
}
