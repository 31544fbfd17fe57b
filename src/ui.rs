pub mod components;

mod error_dialog;
mod help;
mod status_bar;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

pub use color_eyre::Result;

use crate::Theme;

pub use components::{DataTable, TableEvent};
pub use error_dialog::{ErrorDialog, ErrorDialogEvent};
pub use help::{HelpEvent, HelpOverlay, Keybinding, KeybindingSection};
pub use status_bar::StatusBar;

/// Result of handling an input event.
///
/// - `Ignored` - the handler did not recognize the input, the parent should try
/// - `Consumed` - the input was handled and produced nothing
/// - `Event(E)` - the input was handled and produced an event for the parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResult<E> {
    Ignored,
    Consumed,
    Event(E),
}

impl<E> EventResult<E> {
    pub const fn is_consumed(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

impl<E> From<E> for EventResult<E> {
    fn from(event: E) -> Self {
        Self::Event(event)
    }
}

/// Extension trait for processing `Result<EventResult<T>>` from handlers.
pub trait EventResultExt<T> {
    /// Split into (was_consumed, optional_event).
    fn process(self) -> (bool, Option<T>);
}

impl<T> EventResultExt<T> for Result<EventResult<T>> {
    fn process(self) -> (bool, Option<T>) {
        match self {
            Ok(EventResult::Event(msg)) => (true, Some(msg)),
            Ok(EventResult::Consumed) => (true, None),
            Ok(EventResult::Ignored) | Err(_) => (false, None),
        }
    }
}

/// Interactive UI building block.
///
/// Components handle input and emit generic outputs. They know nothing about
/// rentals, owners or contracts.
pub trait Component {
    type Output;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        _ = key;
        Ok(EventResult::Ignored)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);
}

/// Full-page view that wires components to the dataset.
///
/// Screens translate component events into domain messages.
pub trait Screen {
    type Output;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>>;

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);

    /// Breadcrumb segments shown in the status bar.
    fn breadcrumbs(&self) -> Vec<String> {
        vec![]
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        vec![]
    }
}
