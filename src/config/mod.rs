pub mod actions;
pub mod key;
pub mod keybindings;
pub mod loader;
pub mod resolver;

use std::path::PathBuf;

pub use actions::*;
use keybindings::KeybindingsConfig;
pub use loader::{load, save_last_screen};
pub use resolver::KeyResolver;
use serde::{Deserialize, Serialize};

use crate::table::TableOptions;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "Catppuccin Mocha".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
    /// Defaults applied to every table.
    #[serde(default)]
    pub table: TableOptions,
    /// Dataset used when `--data` is not given.
    #[serde(default)]
    pub data_path: Option<PathBuf>,
    #[serde(default)]
    pub last_screen: Option<String>,
}
