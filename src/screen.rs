//! Full-page screens, one tab each.

mod collection;
mod contract;

pub use collection::CollectionScreen;
pub use contract::ContractScreen;

/// What a screen reports back to the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenMsg {
    /// Informational text for the status bar.
    Notice(String),
    /// Shown in the error dialog.
    Error(String),
}
