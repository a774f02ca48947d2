use crate::menu::MenuEntry;
use crate::model::EntryId;
use crate::poller::MenuAdapter;
use crate::portwatch::PortChange;

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::mpsc::{self, Receiver, Sender},
};

/// Adapter calls, as they travel from the poller thread to the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    Upsert(MenuEntry),
    Show(EntryId),
    Hide(EntryId),
    Title(String),
}

/// [`MenuAdapter`] that forwards every call to the UI thread.
///
/// Sends never block. Once the UI is gone the calls are silently dropped.
#[derive(Debug, Clone)]
pub struct ChannelAdapter {
    tx: Sender<UiCommand>,
}

impl ChannelAdapter {
    pub fn new() -> (Self, Receiver<UiCommand>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }

    fn send(&self, command: UiCommand) {
        if self.tx.send(command).is_err() {
            tracing::trace!("ui is gone, dropping menu update");
        }
    }
}

impl MenuAdapter for ChannelAdapter {
    fn create_or_update_entry(&self, entry: &MenuEntry) {
        self.send(UiCommand::Upsert(entry.clone()));
    }

    fn hide_entry(&self, id: &EntryId) {
        self.send(UiCommand::Hide(*id));
    }

    fn show_entry(&self, id: &EntryId) {
        self.send(UiCommand::Show(*id));
    }

    fn set_title(&self, title: &str) {
        self.send(UiCommand::Title(title.to_string()));
    }
}

/// What the UI currently shows, rebuilt purely from adapter calls.
#[derive(Debug, Default)]
pub struct MenuView {
    entries: BTreeMap<EntryId, MenuEntry>,
    shown: BTreeSet<EntryId>,
    title: Option<String>,
}

impl MenuView {
    /// Applies one adapter call. Returns the change it represents, if any,
    /// so it can be recorded.
    pub fn apply(&mut self, command: UiCommand) -> Option<(PortChange, MenuEntry)> {
        match command {
            UiCommand::Upsert(entry) => {
                let change = if self.shown.contains(&entry.id()) {
                    PortChange::Changed
                } else {
                    PortChange::Opened
                };
                self.entries.insert(entry.id(), entry.clone());
                Some((change, entry))
            }
            UiCommand::Show(id) => {
                if self.entries.contains_key(&id) {
                    self.shown.insert(id);
                }
                None
            }
            UiCommand::Hide(id) => {
                if self.shown.remove(&id) {
                    self.entries.get(&id).map(|e| (PortChange::Closed, e.clone()))
                } else {
                    None
                }
            }
            UiCommand::Title(title) => {
                self.title = Some(title);
                None
            }
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Shown entries ordered by port.
    pub fn visible(&self) -> Vec<MenuEntry> {
        let mut visible: Vec<MenuEntry> = self
            .shown
            .iter()
            .filter_map(|id| self.entries.get(id).cloned())
            .collect();
        visible.sort_by_key(|e| (e.socket().port, e.id()));
        visible
    }
}
