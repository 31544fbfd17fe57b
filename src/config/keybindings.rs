use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};

use crate::config::key::{Key, KeyBinding};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalKeybindings {
    pub quit: KeyBinding,
    pub help: KeyBinding,
    pub next_tab: KeyBinding,
    pub previous_tab: KeyBinding,
    pub reload: KeyBinding,
    pub suspend: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationKeybindings {
    pub up: KeyBinding,
    pub down: KeyBinding,
    pub select: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchKeybindings {
    pub toggle: KeyBinding,
    pub exit: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableKeybindings {
    pub next_page: KeyBinding,
    pub previous_page: KeyBinding,
    pub first_page: KeyBinding,
    pub last_page: KeyBinding,
    pub page_size_up: KeyBinding,
    pub page_size_down: KeyBinding,
    pub sort: KeyBinding,
    pub column_left: KeyBinding,
    pub column_right: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractKeybindings {
    pub save: KeyBinding,
    pub back: KeyBinding,
    pub clear: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogKeybindings {
    pub dismiss: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KeybindingsConfig {
    pub global: GlobalKeybindings,
    pub navigation: NavigationKeybindings,
    pub search: SearchKeybindings,
    pub table: TableKeybindings,
    pub contract: ContractKeybindings,
    pub dialog: DialogKeybindings,
}

impl Default for GlobalKeybindings {
    fn default() -> Self {
        Self {
            quit: Key::char('q').into(),
            help: Key::char('?').into(),
            next_tab: Key::new(KeyCode::Tab).into(),
            previous_tab: Key::new(KeyCode::BackTab).into(),
            reload: Key::char('r').into(),
            suspend: Key::with_ctrl(KeyCode::Char('z')).into(),
        }
    }
}

impl Default for NavigationKeybindings {
    fn default() -> Self {
        Self {
            up: KeyBinding::keys([Key::char('k'), Key::new(KeyCode::Up)]),
            down: KeyBinding::keys([Key::char('j'), Key::new(KeyCode::Down)]),
            select: Key::new(KeyCode::Enter).into(),
        }
    }
}

impl Default for SearchKeybindings {
    fn default() -> Self {
        Self {
            toggle: Key::char('/').into(),
            exit: Key::new(KeyCode::Esc).into(),
        }
    }
}

impl Default for TableKeybindings {
    fn default() -> Self {
        Self {
            next_page: KeyBinding::keys([Key::char('n'), Key::new(KeyCode::PageDown)]),
            previous_page: KeyBinding::keys([Key::char('p'), Key::new(KeyCode::PageUp)]),
            first_page: KeyBinding::keys([Key::char('g'), Key::new(KeyCode::Home)]),
            last_page: KeyBinding::keys([Key::char('G'), Key::new(KeyCode::End)]),
            page_size_up: Key::char('+').into(),
            page_size_down: Key::char('-').into(),
            sort: Key::char('s').into(),
            column_left: KeyBinding::keys([Key::char('h'), Key::new(KeyCode::Left)]),
            column_right: KeyBinding::keys([Key::char('l'), Key::new(KeyCode::Right)]),
        }
    }
}

impl Default for ContractKeybindings {
    fn default() -> Self {
        Self {
            save: Key::with_ctrl(KeyCode::Char('s')).into(),
            back: Key::new(KeyCode::Backspace).into(),
            clear: Key::char('x').into(),
        }
    }
}

impl Default for DialogKeybindings {
    fn default() -> Self {
        Self {
            dismiss: KeyBinding::keys([
                Key::new(KeyCode::Enter),
                Key::new(KeyCode::Esc),
                Key::char('q'),
            ]),
        }
    }
}
