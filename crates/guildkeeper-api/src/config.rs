//! Configuration loading: toml file plus environment overrides.

use std::path::{Path, PathBuf};

use anyhow::Context;
use guildkeeper_types::config::AppConfig;

/// Default config location: `~/.guildkeeper/guildkeeper.toml`.
fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".guildkeeper").join("guildkeeper.toml"))
}

/// Load configuration.
///
/// A missing file is not an error -- defaults apply, which is the normal
/// first-run experience. Environment variables override file values for
/// the secrets-adjacent settings so tokens need not live on disk.
pub fn load(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let path = path.map(PathBuf::from).or_else(default_config_path);

    let mut config = match path {
        Some(path) if path.exists() => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?
        }
        _ => AppConfig::default(),
    };

    if let Ok(endpoint) = std::env::var("GUILDKEEPER_SHEET_ENDPOINT") {
        config.sheet.endpoint = Some(endpoint);
    }
    if let Ok(token) = std::env::var("GUILDKEEPER_SHEET_TOKEN") {
        config.sheet.token = Some(token);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.session.ttl_secs, 1800);
        assert!(config.guilds.is_empty());
    }

    #[test]
    fn test_file_values_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guildkeeper.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "guilds = [\"Night Watch\"]\n[sync]\nmin_interval_secs = 10").unwrap();

        let config = load(Some(&path)).unwrap();
        assert_eq!(config.guilds, vec!["Night Watch".to_string()]);
        assert_eq!(config.sync.min_interval_secs, 10);
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guildkeeper.toml");
        std::fs::write(&path, "guilds = not-a-list").unwrap();
        assert!(load(Some(&path)).is_err());
    }
}
