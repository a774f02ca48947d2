use crate::menu::MenuEntry;
use crate::model::{EntryId, ListeningSocket};

use std::collections::{BTreeMap, HashMap};

/// A change the UI has to make to mirror the latest sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    CreateAndShow(MenuEntry),
    UpdateAndShow(MenuEntry),
    Hide(MenuEntry),
}

impl SideEffect {
    pub fn entry(&self) -> &MenuEntry {
        match self {
            SideEffect::CreateAndShow(entry)
            | SideEffect::UpdateAndShow(entry)
            | SideEffect::Hide(entry) => entry,
        }
    }

    pub fn id(&self) -> EntryId {
        self.entry().id()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    pub entries: BTreeMap<EntryId, MenuEntry>,
    pub effects: Vec<SideEffect>,
}

/// Moves the menu from `previous` to what `sample` reports.
///
/// Unchanged sockets produce no effects, so reconciling the same sample twice
/// is a no-op the second time. Entries that vanish are hidden and kept.
pub fn reconcile(
    previous: &BTreeMap<EntryId, MenuEntry>,
    sample: &[ListeningSocket],
) -> Reconciliation {
    // Duplicate identities: the last record wins, but the effect keeps the
    // position of the first one.
    let mut order = Vec::new();
    let mut latest: HashMap<EntryId, &ListeningSocket> = HashMap::new();
    for socket in sample {
        if latest.insert(socket.id(), socket).is_none() {
            order.push(socket.id());
        }
    }

    let mut entries = previous.clone();
    let mut effects = Vec::new();

    for id in order {
        let socket = latest[&id];
        match entries.get_mut(&id) {
            Some(entry) => {
                if entry.observe(socket) {
                    effects.push(SideEffect::UpdateAndShow(entry.clone()));
                }
            }
            None => {
                let entry = MenuEntry::from_socket(socket);
                effects.push(SideEffect::CreateAndShow(entry.clone()));
                entries.insert(id, entry);
            }
        }
    }

    for (id, entry) in entries.iter_mut() {
        if !latest.contains_key(id) && entry.hide() {
            effects.push(SideEffect::Hide(entry.clone()));
        }
    }

    Reconciliation { entries, effects }
}
