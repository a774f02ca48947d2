use crate::adapter::{MenuView, UiCommand};
use crate::config::Config;
use crate::menu::{ClickReceiver, MenuStore};
use crate::model::EntryId;
use crate::poller::PollSignal;
use crate::portwatch::{Tracker, export_snapshot};
use crate::ui::{
    footer_component::FooterComponent, keybindings_component::KeybindingsComponent,
    menu_component::MenuComponent, theme::Theme,
};

use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Layout};
use ratatui::{DefaultTerminal, Frame};
use std::{
    collections::{HashMap, hash_map::Entry},
    path::PathBuf,
    sync::{
        Arc,
        mpsc::{Receiver, Sender},
    },
    time::Duration,
};

const TICK: Duration = Duration::from_millis(200);

enum AppControlFlow {
    Continue,
    Exit,
}

/// Terminal front end: mirrors the menu the poller publishes and turns key
/// presses into clicks, exports and poller signals.
pub struct App {
    store: Arc<MenuStore>,
    commands: Receiver<UiCommand>,
    control: Sender<PollSignal>,
    view: MenuView,
    clicks: HashMap<EntryId, ClickReceiver>,
    menu: MenuComponent,
    footer: FooterComponent,
    help: KeybindingsComponent,
    theme: Theme,
    tracker: Tracker,
    export_dir: PathBuf,
}

impl App {
    pub fn new(
        config: &Config,
        store: Arc<MenuStore>,
        commands: Receiver<UiCommand>,
        control: Sender<PollSignal>,
    ) -> Self {
        Self {
            store,
            commands,
            control,
            view: MenuView::default(),
            clicks: HashMap::new(),
            menu: MenuComponent::default(),
            footer: FooterComponent::new(config.export_format),
            help: KeybindingsComponent::default(),
            theme: Theme::default(),
            tracker: Tracker::new(config.export_format),
            export_dir: config.export_dir.clone(),
        }
    }

    /// Run the application's main loop until the user quits.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        loop {
            self.drain_commands();
            self.poll_clicks();
            terminal.draw(|frame| self.render(frame))?;

            if !event::poll(TICK)? {
                continue;
            }
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && matches!(self.handle_key_event(key), AppControlFlow::Exit)
                {
                    break;
                }
            }
        }

        let _ = self.control.send(PollSignal::Shutdown);
        Ok(())
    }

    /// Applies every pending adapter call from the poller.
    fn drain_commands(&mut self) {
        let mut dirty = false;
        while let Ok(command) = self.commands.try_recv() {
            if let UiCommand::Upsert(entry) = &command {
                if let Entry::Vacant(slot) = self.clicks.entry(entry.id()) {
                    if let Some(rx) = entry.click().subscribe() {
                        slot.insert(rx);
                    }
                }
            }
            if let Some((change, entry)) = self.view.apply(command) {
                self.tracker.record(change, entry);
            }
            dirty = true;
        }
        if dirty {
            self.menu.set_items(self.view.visible());
        }
    }

    /// The application-level click handler.
    fn poll_clicks(&mut self) {
        let clicked: Vec<EntryId> = self
            .clicks
            .iter()
            .filter(|(_, rx)| rx.try_recv())
            .map(|(id, _)| *id)
            .collect();

        for id in clicked {
            if let Some(entry) = self.store.lookup(&id) {
                tracing::info!(%id, title = entry.title(), "entry clicked");
                self.footer
                    .set_status(format!("{} ({})", entry.title(), entry.tooltip()));
            }
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> AppControlFlow {
        if self.help.display {
            match key.code {
                KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?' | 'q') => self.help.toggle(),
                KeyCode::Down | KeyCode::Char('j') => self.help.next_row(),
                KeyCode::Up | KeyCode::Char('k') => self.help.previous_row(),
                _ => {}
            }
            return AppControlFlow::Continue;
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q' | 'Q'))
            | (KeyModifiers::NONE, KeyCode::Esc)
            | (KeyModifiers::CONTROL, KeyCode::Char('c' | 'C')) => return AppControlFlow::Exit,
            (_, KeyCode::F(1)) | (_, KeyCode::Char('?')) => self.help.toggle(),
            (_, KeyCode::Down) | (_, KeyCode::Char('j')) => self.menu.next_row(),
            (_, KeyCode::Up) | (_, KeyCode::Char('k')) => self.menu.previous_row(),
            (_, KeyCode::PageDown) => self.menu.page_down(),
            (_, KeyCode::PageUp) => self.menu.page_up(),
            (_, KeyCode::Home) => self.menu.first_row(),
            (_, KeyCode::End) => self.menu.last_row(),
            (_, KeyCode::Char('l')) => self.theme.cycle_next(),
            (_, KeyCode::Char('h')) => self.theme.cycle_prev(),
            (_, KeyCode::Enter) => self.click_selected(),
            (_, KeyCode::Char('r')) => {
                let _ = self.control.send(PollSignal::Refresh);
                self.footer.set_status("Refresh requested");
            }
            (_, KeyCode::Char('s')) => self.toggle_recording(),
            (_, KeyCode::Char('x')) => self.export_visible(),
            (_, KeyCode::Char('f')) => {
                let format = self.footer.export_format.next();
                self.footer.export_format = format;
                self.tracker.export_format = format;
            }
            _ => {}
        }
        AppControlFlow::Continue
    }

    fn click_selected(&mut self) {
        let Some(id) = self.menu.selected().map(|e| e.id()) else {
            return;
        };
        if !self.store.dispatch_click(&id) {
            tracing::debug!(%id, "click dropped, one is already pending");
        }
    }

    fn toggle_recording(&mut self) {
        if self.tracker.is_active {
            match self.tracker.stop(&self.export_dir) {
                Ok(path) => self
                    .footer
                    .set_status(format!("Changes exported to {}", path.display())),
                Err(e) => {
                    tracing::error!(error = %e, "failed to export recorded changes");
                    self.footer.set_status(format!("Export failed: {e}"));
                }
            }
        } else {
            self.tracker.start(self.view.visible());
            self.footer.set_status("Recording port changes");
        }
    }

    fn export_visible(&mut self) {
        let format = self.footer.export_format;
        match export_snapshot(&self.view.visible(), format, &self.export_dir) {
            Ok(path) => self
                .footer
                .set_status(format!("Snapshot exported to {}", path.display())),
            Err(e) => {
                tracing::error!(error = %e, "failed to export snapshot");
                self.footer.set_status(format!("Export failed: {e}"));
            }
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let [menu_area, footer_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(4)]).areas(area);

        let colors = &self.theme.colors;
        let title = self.view.title().unwrap_or("Loading...");
        self.menu.render(frame, menu_area, colors, title);
        self.footer
            .render(frame, footer_area, colors, self.tracker.is_active);

        if self.help.display {
            self.help.render(frame, area, colors);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::ChannelAdapter;
    use crate::model::{ListeningSocket, ProtocolFamily};
    use crate::poller::MenuAdapter;
    use crate::menu::MenuEntry;
    use std::sync::mpsc;

    fn app() -> (App, ChannelAdapter, Arc<MenuStore>, Receiver<PollSignal>) {
        let store = Arc::new(MenuStore::new());
        let (adapter, commands) = ChannelAdapter::new();
        let (control, signals) = mpsc::channel();
        let app = App::new(&Config::default(), Arc::clone(&store), commands, control);
        (app, adapter, store, signals)
    }

    fn publish(adapter: &ChannelAdapter, store: &MenuStore, port: u16) -> MenuEntry {
        let entry = MenuEntry::from_socket(&ListeningSocket {
            port,
            family: ProtocolFamily::IPv4,
            pid: Some(99),
            process_name: "vite".into(),
        });
        store.upsert(entry.clone());
        adapter.create_or_update_entry(&entry);
        adapter.show_entry(&entry.id());
        adapter.set_title("Utilized Ports: 1");
        entry
    }

    fn press(app: &mut App, code: KeyCode) -> AppControlFlow {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn published_entries_reach_the_table() {
        let (mut app, adapter, store, _) = app();
        publish(&adapter, &store, 5173);
        app.drain_commands();

        assert_eq!(app.menu.items.len(), 1);
        assert_eq!(app.view.title(), Some("Utilized Ports: 1"));
    }

    #[test]
    fn enter_clicks_selected_entry() {
        let (mut app, adapter, store, _) = app();
        publish(&adapter, &store, 5173);
        app.drain_commands();

        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);
        app.poll_clicks();
        assert_eq!(app.footer.status.as_deref(), Some("5173 -- vite (PID: 99)"));
    }

    #[test]
    fn refresh_and_quit_signal_the_poller() {
        let (mut app, _, _, signals) = app();
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(signals.try_recv(), Ok(PollSignal::Refresh));
        assert!(matches!(press(&mut app, KeyCode::Char('q')), AppControlFlow::Exit));
    }

    #[test]
    fn recording_captures_changes_between_start_and_stop() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, adapter, store, _) = app();
        app.export_dir = dir.path().to_path_buf();

        press(&mut app, KeyCode::Char('s'));
        let entry = publish(&adapter, &store, 8000);
        adapter.hide_entry(&entry.id());
        app.drain_commands();
        assert_eq!(app.tracker.events.len(), 3);

        press(&mut app, KeyCode::Char('s'));
        assert!(!app.tracker.is_active);
        assert!(app.footer.status.as_deref().unwrap().starts_with("Changes exported to"));
    }
}
