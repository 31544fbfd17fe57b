use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use tracing::{info, warn};

use crate::Theme;
use crate::config::{ContractAction, KeyResolver, NavAction};
use crate::data::{Collection, Dataset, EntityId, join};
use crate::screen::ScreenMsg;
use crate::session::{ContractSession, SessionEvent, Step};
use crate::table::{RowKey, TableDescriptor, TableOptions};
use crate::ui::{Component, DataTable, EventResult, Keybinding, Result, Screen, TableEvent};

/// Guided owner → apartment → tenant selection ending in a contract draft.
pub struct ContractScreen {
    dataset: Arc<Dataset>,
    session: ContractSession,
    table: DataTable,
    options: TableOptions,
    resolver: Arc<KeyResolver>,
}

impl ContractScreen {
    pub fn new(dataset: Arc<Dataset>, options: TableOptions, resolver: Arc<KeyResolver>) -> Self {
        let session = ContractSession::new();
        let table = Self::table_for_step(&dataset, &session, &options, &resolver);
        Self {
            dataset,
            session,
            table,
            options,
            resolver,
        }
    }

    pub const fn session(&self) -> &ContractSession {
        &self.session
    }

    pub const fn table(&self) -> &DataTable {
        &self.table
    }

    pub fn reload(&mut self, dataset: Arc<Dataset>) {
        self.dataset = dataset;
        self.table.set_table(Arc::new(Self::rows_for_step(&self.dataset, &self.session)));
    }

    fn rows_for_step(dataset: &Dataset, session: &ContractSession) -> TableDescriptor {
        match (session.step(), &session.owner) {
            (Step::Apartment, Some(owner)) => join::owned_apartments_table(dataset, owner),
            (Step::Tenant | Step::Confirm, _) => join::table_for(Collection::Tenants, dataset),
            _ => join::owners_table(dataset),
        }
    }

    fn table_for_step(
        dataset: &Dataset,
        session: &ContractSession,
        options: &TableOptions,
        resolver: &Arc<KeyResolver>,
    ) -> DataTable {
        let title = match session.step() {
            Step::Owner => "Select owner",
            Step::Apartment => "Select apartment",
            Step::Tenant | Step::Confirm => "Select tenant",
        };
        DataTable::new(
            Arc::new(Self::rows_for_step(dataset, session)),
            options.clone(),
            Arc::clone(resolver),
        )
        .with_title(title)
    }

    /// Backend id behind a row key at the current step.
    fn entity_id(&self, key: &RowKey) -> Option<EntityId> {
        let RowKey::Id(raw) = key else {
            return None;
        };
        match self.session.step() {
            Step::Apartment => self
                .dataset
                .apartments
                .iter()
                .find(|a| a.id.is(raw))
                .map(|a| a.id.clone()),
            _ => self.dataset.users.iter().find(|u| u.id.is(raw)).map(|u| u.id.clone()),
        }
    }

    fn selection_event(&self, id: EntityId) -> SessionEvent {
        match self.session.step() {
            Step::Owner => SessionEvent::SelectOwner(id),
            Step::Apartment => SessionEvent::SelectApartment(id),
            Step::Tenant | Step::Confirm => SessionEvent::SetTenant(id),
        }
    }

    /// Run `event` through the session, rebuilding the table when the
    /// step changes.
    fn apply(&mut self, event: SessionEvent) -> EventResult<ScreenMsg> {
        let step_before = self.session.step();
        let next = match self.session.reduce(event, &self.dataset) {
            Ok(next) => next,
            Err(err) => {
                warn!(error = %err, "contract session rejected event");
                return ScreenMsg::Error(err.to_string()).into();
            }
        };

        let saved = next.saved.clone().filter(|_| self.session.saved.is_none());
        self.session = next;
        if self.session.step() != step_before {
            self.table =
                Self::table_for_step(&self.dataset, &self.session, &self.options, &self.resolver);
        }

        match saved {
            Some(draft) => {
                info!(
                    owner = %draft.owner_id,
                    apartment = %draft.apartment_id,
                    tenant = %draft.tenant_id,
                    "contract draft ready"
                );
                ScreenMsg::Notice(format!("Contract draft ready: {draft}")).into()
            }
            None => EventResult::Consumed,
        }
    }

    fn selection_line(&self, theme: &Theme) -> Line<'static> {
        let label = Style::default().fg(theme.overlay1);
        let value = Style::default().fg(theme.text).add_modifier(Modifier::BOLD);
        let pending = Style::default().fg(theme.muted());

        let owner = self
            .session
            .owner
            .as_ref()
            .and_then(|id| self.dataset.user(id))
            .map(|u| u.name.clone());
        let apartment = self
            .session
            .apartment
            .as_ref()
            .and_then(|id| self.dataset.apartment(id))
            .map(|a| a.label());
        let tenant = self
            .session
            .tenant
            .as_ref()
            .and_then(|id| self.dataset.user(id))
            .map(|u| u.name.clone());

        let mut spans = Vec::new();
        for (i, (name, selected)) in [("Owner", owner), ("Apartment", apartment), ("Tenant", tenant)]
            .into_iter()
            .enumerate()
        {
            if i > 0 {
                spans.push(Span::styled("  ›  ", pending));
            }
            spans.push(Span::styled(format!("{name}: "), label));
            match selected {
                Some(text) => spans.push(Span::styled(text, value)),
                None => spans.push(Span::styled("—", pending)),
            }
        }
        Line::from(spans)
    }
}

impl Screen for ContractScreen {
    type Output = ScreenMsg;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if !self.table.is_searching() {
            if self.resolver.matches_contract(&key, ContractAction::Save) {
                return Ok(self.apply(SessionEvent::SaveContract));
            }
            if self.resolver.matches_contract(&key, ContractAction::Back) {
                return Ok(self.apply(SessionEvent::Back));
            }
            if self.resolver.matches_contract(&key, ContractAction::Clear) {
                return Ok(self.apply(SessionEvent::ClearSelection));
            }
        }

        Ok(match self.table.handle_key(key)? {
            EventResult::Event(TableEvent::Activated(row)) => match self.entity_id(&row) {
                Some(id) => self.apply(self.selection_event(id)),
                None => EventResult::Consumed,
            },
            EventResult::Consumed => EventResult::Consumed,
            EventResult::Ignored => EventResult::Ignored,
        })
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let [selection_area, table_area, prompt_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border()))
            .title(" New contract ")
            .title_style(Style::default().fg(theme.mauve).add_modifier(Modifier::BOLD));
        frame.render_widget(
            Paragraph::new(self.selection_line(theme)).block(block),
            selection_area,
        );

        self.table.render(frame, table_area, theme);

        let step = self.session.step();
        let prompt = if step == Step::Confirm {
            format!(
                "Press {} to save the contract",
                self.resolver.display_contract(ContractAction::Save)
            )
        } else {
            format!(
                "Press {} to {}",
                self.resolver.display_nav(NavAction::Select),
                step.prompt()
            )
        };
        frame.render_widget(
            Paragraph::new(prompt)
                .style(Style::default().fg(theme.yellow))
                .alignment(Alignment::Center),
            prompt_area,
        );
    }

    fn breadcrumbs(&self) -> Vec<String> {
        vec!["Contracts".to_string(), "New".to_string()]
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        let r = &self.resolver;
        let mut bindings = vec![
            Keybinding::hint(r.display_contract(ContractAction::Save), "Save contract"),
            Keybinding::hint(r.display_contract(ContractAction::Back), "Undo selection"),
            Keybinding::new(r.display_contract(ContractAction::Clear), "Clear selection"),
        ];
        bindings.extend(self.table.keybindings());
        bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::join::tests::dataset;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn screen() -> ContractScreen {
        ContractScreen::new(
            Arc::new(dataset()),
            TableOptions::default(),
            Arc::new(KeyResolver::default()),
        )
    }

    fn press(screen: &mut ContractScreen, code: KeyCode, modifiers: KeyModifiers) -> EventResult<ScreenMsg> {
        screen.handle_key(KeyEvent::new(code, modifiers)).unwrap()
    }

    fn enter(screen: &mut ContractScreen) -> EventResult<ScreenMsg> {
        press(screen, KeyCode::Enter, KeyModifiers::NONE)
    }

    #[test]
    fn test_walkthrough_to_saved_draft() {
        let mut screen = screen();
        // Zeynep Demir
        enter(&mut screen);
        assert_eq!(screen.session().step(), Step::Apartment);
        assert_eq!(screen.table().table().rows.len(), 2);

        // A-2
        press(&mut screen, KeyCode::Down, KeyModifiers::NONE);
        enter(&mut screen);
        assert_eq!(screen.session().step(), Step::Tenant);

        // Elif Aydın
        press(&mut screen, KeyCode::Down, KeyModifiers::NONE);
        enter(&mut screen);
        assert_eq!(screen.session().step(), Step::Confirm);

        let result = press(&mut screen, KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(
            result,
            EventResult::Event(ScreenMsg::Notice(
                "Contract draft ready: Elif Aydın rents A-2 from Zeynep Demir".into()
            ))
        );
        assert_eq!(screen.session().step(), Step::Owner);
    }

    #[test]
    fn test_save_too_early_is_an_error() {
        let mut screen = screen();
        let result = press(&mut screen, KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert!(matches!(result, EventResult::Event(ScreenMsg::Error(_))));
    }

    #[test]
    fn test_back_returns_to_owner_list() {
        let mut screen = screen();
        enter(&mut screen);
        assert_eq!(screen.session().step(), Step::Apartment);
        press(&mut screen, KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(screen.session().step(), Step::Owner);
        assert_eq!(screen.table().table().rows.len(), 2);
    }

    #[test]
    fn test_backspace_edits_search_while_searching() {
        let mut screen = screen();
        press(&mut screen, KeyCode::Char('/'), KeyModifiers::NONE);
        press(&mut screen, KeyCode::Char('m'), KeyModifiers::NONE);
        press(&mut screen, KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(screen.session().step(), Step::Owner);
        assert_eq!(screen.table().state().query, "");
    }
}
