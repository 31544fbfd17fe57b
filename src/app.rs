use std::path::PathBuf;
use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Tabs;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

use crate::Theme;
use crate::command::Command;
use crate::config::{self, AppConfig, GlobalAction, KeyResolver};
use crate::data::{Collection, Dataset, source};
use crate::screen::{CollectionScreen, ContractScreen, ScreenMsg};
use crate::table::TableOptions;
use crate::tui::{Event, Tui};
use crate::ui::{
    Component, ErrorDialog, ErrorDialogEvent, EventResult, EventResultExt, HelpEvent, HelpOverlay,
    KeybindingSection, Screen, StatusBar,
};

/// Name under which the contract tab is remembered.
const CONTRACT_TAB: &str = "new-contract";

enum Tab {
    Collection(CollectionScreen),
    Contract(ContractScreen),
}

impl Tab {
    fn title(&self) -> &'static str {
        match self {
            Self::Collection(screen) => screen.collection().title(),
            Self::Contract(_) => "New contract",
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Collection(screen) => screen.collection().name(),
            Self::Contract(_) => CONTRACT_TAB,
        }
    }

    fn screen(&self) -> &dyn Screen<Output = ScreenMsg> {
        match self {
            Self::Collection(screen) => screen,
            Self::Contract(screen) => screen,
        }
    }

    fn screen_mut(&mut self) -> &mut dyn Screen<Output = ScreenMsg> {
        match self {
            Self::Collection(screen) => screen,
            Self::Contract(screen) => screen,
        }
    }

    fn reload(&mut self, dataset: &Arc<Dataset>) {
        match self {
            Self::Collection(screen) => screen.reload(dataset),
            Self::Contract(screen) => screen.reload(Arc::clone(dataset)),
        }
    }
}

pub struct App {
    tabs: Vec<Tab>,
    active: usize,
    data_path: PathBuf,
    theme: Theme,
    resolver: Arc<KeyResolver>,
    status_bar: StatusBar,
    help: Option<HelpOverlay>,
    error: Option<ErrorDialog>,
    should_quit: bool,
    should_suspend: bool,
    command_tx: UnboundedSender<Command>,
    command_rx: UnboundedReceiver<Command>,
}

impl App {
    pub fn new(
        config: &AppConfig,
        table_options: TableOptions,
        dataset: Dataset,
        data_path: PathBuf,
        theme: Theme,
        resolver: Arc<KeyResolver>,
    ) -> Self {
        let dataset = Arc::new(dataset);
        let mut tabs: Vec<Tab> = Collection::ALL
            .into_iter()
            .map(|collection| {
                Tab::Collection(CollectionScreen::new(
                    collection,
                    &dataset,
                    table_options.clone(),
                    Arc::clone(&resolver),
                ))
            })
            .collect();
        tabs.push(Tab::Contract(ContractScreen::new(
            Arc::clone(&dataset),
            table_options,
            Arc::clone(&resolver),
        )));

        let active = config
            .last_screen
            .as_deref()
            .and_then(|name| tabs.iter().position(|tab| tab.name() == name))
            .unwrap_or(0);

        let mut status_bar = StatusBar::new(Arc::clone(&resolver));
        status_bar.set_source(data_path.display().to_string());

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        Self {
            tabs,
            active,
            data_path,
            theme,
            resolver,
            status_bar,
            help: None,
            error: None,
            should_quit: false,
            should_suspend: false,
            command_tx,
            command_rx,
        }
    }

    /// Open on the tab showing `collection`.
    pub fn select_collection(&mut self, collection: Collection) {
        if let Some(index) = self
            .tabs
            .iter()
            .position(|tab| matches!(tab, Tab::Collection(s) if s.collection() == collection))
        {
            self.active = index;
        }
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.error = Some(ErrorDialog::new(message, Arc::clone(&self.resolver)));
    }

    pub async fn run(&mut self) -> color_eyre::Result<()> {
        let mut tui = Tui::new(30.0, 4.0)?;
        tui.enter()?;

        loop {
            self.handle_events(&mut tui).await?;
            self.handle_commands(&mut tui)?;
            if self.should_suspend {
                tui.suspend()?;
                self.command_tx.send(Command::Resume)?;
                tui.resume()?;
            } else if self.should_quit {
                break;
            }
        }

        tui.exit()?;
        if let Err(err) = config::save_last_screen(self.tabs[self.active].name()) {
            warn!(error = %err, "failed to remember last screen");
        }
        Ok(())
    }

    async fn handle_events(&mut self, tui: &mut Tui) -> color_eyre::Result<()> {
        let Some(event) = tui.next_event().await else {
            return Ok(());
        };

        match event {
            Event::Quit => self.command_tx.send(Command::Quit)?,
            Event::Tick => self.command_tx.send(Command::Tick)?,
            Event::Render => self.command_tx.send(Command::Render)?,
            Event::Resize(width, height) => self.command_tx.send(Command::Resize(width, height))?,
            Event::Key(key) => self.handle_key_event(key)?,
            Event::Error(message) => {
                error!(error = %message, "terminal event error");
                self.command_tx.send(Command::DisplayError(message))?;
            }
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> color_eyre::Result<()> {
        if let Some(dialog) = &mut self.error {
            if let (_, Some(ErrorDialogEvent::Dismissed)) = dialog.handle_key(key).process() {
                self.error = None;
            }
            return Ok(());
        }

        if let Some(help) = &mut self.help {
            if let (_, Some(HelpEvent::Close)) = help.handle_key(key).process() {
                self.help = None;
            }
            return Ok(());
        }

        match self.tabs[self.active].screen_mut().handle_key(key)? {
            EventResult::Event(msg) => {
                self.handle_screen_msg(msg)?;
                return Ok(());
            }
            EventResult::Consumed => return Ok(()),
            EventResult::Ignored => {}
        }

        let r = &self.resolver;
        let command = if r.matches_global(&key, GlobalAction::Quit) {
            Command::Quit
        } else if r.matches_global(&key, GlobalAction::Help) {
            Command::DisplayHelp
        } else if r.matches_global(&key, GlobalAction::Reload) {
            Command::Reload
        } else if r.matches_global(&key, GlobalAction::Suspend) {
            Command::Suspend
        } else if r.matches_global(&key, GlobalAction::NextTab) {
            self.active = (self.active + 1) % self.tabs.len();
            return Ok(());
        } else if r.matches_global(&key, GlobalAction::PreviousTab) {
            self.active = (self.active + self.tabs.len() - 1) % self.tabs.len();
            return Ok(());
        } else {
            return Ok(());
        };
        self.command_tx.send(command)?;
        Ok(())
    }

    fn handle_screen_msg(&self, msg: ScreenMsg) -> color_eyre::Result<()> {
        let command = match msg {
            ScreenMsg::Notice(text) => Command::DisplayNotice(text),
            ScreenMsg::Error(text) => Command::DisplayError(text),
        };
        self.command_tx.send(command)?;
        Ok(())
    }

    fn handle_commands(&mut self, tui: &mut Tui) -> color_eyre::Result<()> {
        while let Ok(command) = self.command_rx.try_recv() {
            if !matches!(command, Command::Tick | Command::Render) {
                debug!(?command, "handling command");
            }
            match command {
                Command::Render => {
                    tui.draw(|frame| self.draw(frame))?;
                }
                Command::Resize(width, height) => {
                    tui.resize(Rect::new(0, 0, width, height))?;
                    tui.draw(|frame| self.draw(frame))?;
                }
                Command::ClearScreen => tui.clear()?,
                other => self.update(other),
            }
        }
        Ok(())
    }

    /// State changes that need no terminal access.
    fn update(&mut self, command: Command) {
        match command {
            Command::Quit => self.should_quit = true,
            Command::Suspend => self.should_suspend = true,
            Command::Resume => self.should_suspend = false,
            Command::Reload => self.reload(),
            Command::DisplayNotice(text) => self.status_bar.set_notice(text),
            Command::DisplayError(text) => self.show_error(text),
            Command::DisplayHelp => self.help = Some(HelpOverlay::new(self.help_sections())),
            Command::Tick | Command::Render | Command::Resize(..) | Command::ClearScreen => {}
        }
    }

    fn reload(&mut self) {
        match source::load(&self.data_path) {
            Ok(dataset) => {
                let dataset = Arc::new(dataset);
                for tab in &mut self.tabs {
                    tab.reload(&dataset);
                }
                info!(path = %self.data_path.display(), "reloaded dataset");
                self.status_bar.set_notice("Dataset reloaded");
            }
            Err(err) => {
                error!(error = ?err, "failed to reload dataset");
                self.show_error(format!("{err:#}"));
            }
        }
    }

    fn help_sections(&self) -> Vec<KeybindingSection> {
        let tab = &self.tabs[self.active];
        vec![
            KeybindingSection::new(tab.title(), tab.screen().keybindings()),
            KeybindingSection::new("Global", self.status_bar.global_keybindings()),
        ]
    }

    fn draw(&mut self, frame: &mut Frame) {
        let [tabs_area, screen_area, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(8),
        ])
        .areas(frame.area());

        let theme = &self.theme;
        let titles: Vec<Line> = self.tabs.iter().map(|tab| Line::from(tab.title())).collect();
        let tabs = Tabs::new(titles)
            .select(self.active)
            .style(Style::default().fg(theme.muted()))
            .highlight_style(
                Style::default()
                    .fg(theme.primary())
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, tabs_area);

        let tab = &mut self.tabs[self.active];
        tab.screen_mut().render(frame, screen_area, theme);

        let screen = tab.screen();
        self.status_bar.render_with_keybindings(
            frame,
            status_area,
            theme,
            &screen.breadcrumbs(),
            &screen.keybindings(),
        );

        if let Some(help) = &mut self.help {
            help.render(frame, frame.area(), theme);
        }
        if let Some(dialog) = &mut self.error {
            dialog.render(frame, frame.area(), theme);
        }
    }
}
