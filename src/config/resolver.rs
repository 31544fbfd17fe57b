use std::sync::Arc;

use crossterm::event::KeyEvent;

use crate::config::actions::*;
use crate::config::key::KeyBinding;
use crate::config::keybindings::KeybindingsConfig;

/// Maps key events onto configured actions.
pub struct KeyResolver {
    pub keybindings: Arc<KeybindingsConfig>,
}

impl KeyResolver {
    pub const fn new(keybindings: Arc<KeybindingsConfig>) -> Self {
        Self { keybindings }
    }

    fn global(&self, action: GlobalAction) -> &KeyBinding {
        let kb = &self.keybindings.global;
        match action {
            GlobalAction::Quit => &kb.quit,
            GlobalAction::Help => &kb.help,
            GlobalAction::NextTab => &kb.next_tab,
            GlobalAction::PreviousTab => &kb.previous_tab,
            GlobalAction::Reload => &kb.reload,
            GlobalAction::Suspend => &kb.suspend,
        }
    }

    fn nav(&self, action: NavAction) -> &KeyBinding {
        let kb = &self.keybindings.navigation;
        match action {
            NavAction::Up => &kb.up,
            NavAction::Down => &kb.down,
            NavAction::Select => &kb.select,
        }
    }

    fn search(&self, action: SearchAction) -> &KeyBinding {
        let kb = &self.keybindings.search;
        match action {
            SearchAction::Toggle => &kb.toggle,
            SearchAction::Exit => &kb.exit,
        }
    }

    fn table(&self, action: TableAction) -> &KeyBinding {
        let kb = &self.keybindings.table;
        match action {
            TableAction::NextPage => &kb.next_page,
            TableAction::PreviousPage => &kb.previous_page,
            TableAction::FirstPage => &kb.first_page,
            TableAction::LastPage => &kb.last_page,
            TableAction::PageSizeUp => &kb.page_size_up,
            TableAction::PageSizeDown => &kb.page_size_down,
            TableAction::Sort => &kb.sort,
            TableAction::ColumnLeft => &kb.column_left,
            TableAction::ColumnRight => &kb.column_right,
        }
    }

    fn contract(&self, action: ContractAction) -> &KeyBinding {
        let kb = &self.keybindings.contract;
        match action {
            ContractAction::Save => &kb.save,
            ContractAction::Back => &kb.back,
            ContractAction::Clear => &kb.clear,
        }
    }

    fn dialog(&self, action: DialogAction) -> &KeyBinding {
        let kb = &self.keybindings.dialog;
        match action {
            DialogAction::Dismiss => &kb.dismiss,
        }
    }

    // Global actions
    pub fn matches_global(&self, event: &KeyEvent, action: GlobalAction) -> bool {
        self.global(action).matches(event)
    }

    pub fn display_global(&self, action: GlobalAction) -> String {
        self.global(action).display()
    }

    // Navigation actions
    pub fn matches_nav(&self, event: &KeyEvent, action: NavAction) -> bool {
        self.nav(action).matches(event)
    }

    pub fn display_nav(&self, action: NavAction) -> String {
        self.nav(action).display()
    }

    // Search actions
    pub fn matches_search(&self, event: &KeyEvent, action: SearchAction) -> bool {
        self.search(action).matches(event)
    }

    pub fn display_search(&self, action: SearchAction) -> String {
        self.search(action).display()
    }

    // Table actions
    pub fn matches_table(&self, event: &KeyEvent, action: TableAction) -> bool {
        self.table(action).matches(event)
    }

    pub fn display_table(&self, action: TableAction) -> String {
        self.table(action).display()
    }

    // Contract actions
    pub fn matches_contract(&self, event: &KeyEvent, action: ContractAction) -> bool {
        self.contract(action).matches(event)
    }

    pub fn display_contract(&self, action: ContractAction) -> String {
        self.contract(action).display()
    }

    // Dialog actions
    pub fn matches_dialog(&self, event: &KeyEvent, action: DialogAction) -> bool {
        self.dialog(action).matches(event)
    }
}

impl Default for KeyResolver {
    fn default() -> Self {
        Self::new(Arc::new(KeybindingsConfig::default()))
    }
}
