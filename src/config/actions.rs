#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalAction {
    Quit,
    Help,
    NextTab,
    PreviousTab,
    Reload,
    Suspend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Up,
    Down,
    Select,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchAction {
    Toggle,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableAction {
    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,
    PageSizeUp,
    PageSizeDown,
    Sort,
    ColumnLeft,
    ColumnRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractAction {
    Save,
    Back,
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    Dismiss,
}
