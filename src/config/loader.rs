use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::WrapErr;
use tracing::{debug, warn};

use crate::config::AppConfig;

const CONFIG_DIR: &str = "lazyrent";
const CONFIG_FILE: &str = "config.toml";

pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(CONFIG_DIR))
}

pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE))
}

pub fn load() -> color_eyre::Result<AppConfig> {
    let Some(path) = config_path() else {
        debug!("No config directory found, using defaults");
        return Ok(AppConfig::default());
    };

    if !path.exists() {
        debug!(?path, "Config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_from(&path)
}

pub fn load_from(path: &Path) -> color_eyre::Result<AppConfig> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read config {}", path.display()))?;
    let config: AppConfig = toml::from_str(&content)
        .wrap_err_with(|| format!("Invalid config {}", path.display()))?;
    debug!(?path, "Loaded config");
    Ok(config)
}

pub fn save(config: &AppConfig) -> color_eyre::Result<()> {
    let Some(dir) = config_dir() else {
        warn!("Could not determine config directory");
        return Ok(());
    };

    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }

    let path = dir.join(CONFIG_FILE);
    let content = toml::to_string_pretty(config)?;
    fs::write(&path, content)?;
    debug!(?path, "Saved config");
    Ok(())
}

pub fn save_last_screen(screen: &str) -> color_eyre::Result<()> {
    let mut config = load()?;
    config.last_screen = Some(screen.to_string());
    save(&config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config() {
        let config: AppConfig = toml::from_str(
            r#"
            data_path = "/srv/site.json"

            [table]
            showTotalEntries = false
            entriesPerPage = { defaultValue = 25, entries = [10, 25, 50] }

            [keybindings.table]
            sort = "o"
            "#,
        )
        .unwrap();
        assert_eq!(config.theme.name, "Catppuccin Mocha");
        assert!(!config.table.show_total_entries);
        assert_eq!(config.table.entries_per_page.initial(), 25);
        assert_eq!(config.keybindings.table.sort.display(), "o");
        assert_eq!(config.keybindings.table.next_page.display(), "n/PageDown");
        assert_eq!(config.data_path, Some(PathBuf::from("/srv/site.json")));
    }

    #[test]
    fn test_round_trip_defaults() {
        let text = toml::to_string_pretty(&AppConfig::default()).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.table, AppConfig::default().table);
        assert_eq!(
            parsed.keybindings.global.suspend.display(),
            "ctrl+z"
        );
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        assert!(load_from(&temp_dir.path().join(CONFIG_FILE)).is_err());
    }
}
