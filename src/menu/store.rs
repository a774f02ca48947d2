use crate::menu::MenuEntry;
use crate::model::EntryId;

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Mutex, MutexGuard, PoisonError},
};

/// Shared `id -> MenuEntry` map used by the poller and the click path.
///
/// The store owns its lock. Callers only ever get clones back, so the only
/// way to change an entry is [`MenuStore::upsert`].
#[derive(Debug, Default)]
pub struct MenuStore {
    entries: Mutex<BTreeMap<EntryId, MenuEntry>>,
}

impl MenuStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, BTreeMap<EntryId, MenuEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts or replaces an entry. An existing entry's click signal is kept,
    /// so anyone listening on it keeps working across updates.
    pub fn upsert(&self, mut entry: MenuEntry) -> Option<MenuEntry> {
        let mut entries = self.guard();
        if let Some(existing) = entries.get(&entry.id()) {
            entry.adopt_click(existing.click().clone());
        }
        entries.insert(entry.id(), entry)
    }

    pub fn lookup(&self, id: &EntryId) -> Option<MenuEntry> {
        self.guard().get(id).cloned()
    }

    pub fn snapshot_identities(&self) -> BTreeSet<EntryId> {
        self.guard().keys().copied().collect()
    }

    pub fn snapshot(&self) -> BTreeMap<EntryId, MenuEntry> {
        self.guard().clone()
    }

    pub fn visible_entries(&self) -> Vec<MenuEntry> {
        self.guard()
            .values()
            .filter(|entry| entry.visible())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    /// Forwards a UI click to the entry's signal without blocking.
    /// Returns whether a notification was queued.
    pub fn dispatch_click(&self, id: &EntryId) -> bool {
        let Some(click) = self.guard().get(id).map(|entry| entry.click().clone()) else {
            tracing::debug!(%id, "click for unknown entry");
            return false;
        };
        click.notify()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ListeningSocket, ProtocolFamily};
    use std::{sync::Arc, thread};

    fn entry(port: u16, name: &str) -> MenuEntry {
        MenuEntry::from_socket(&ListeningSocket {
            port,
            family: ProtocolFamily::IPv4,
            pid: Some(1),
            process_name: name.into(),
        })
    }

    #[test]
    fn upsert_then_lookup() {
        let store = MenuStore::new();
        let e = entry(80, "nginx");
        assert!(store.upsert(e.clone()).is_none());
        assert_eq!(store.lookup(&e.id()), Some(e));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn upsert_keeps_original_click_signal() {
        let store = MenuStore::new();
        let first = entry(80, "nginx");
        let rx = first.click().subscribe().unwrap();
        store.upsert(first.clone());

        let replacement = entry(80, "nginx-new");
        assert_ne!(replacement.click(), first.click());
        store.upsert(replacement);

        let stored = store.lookup(&first.id()).unwrap();
        assert_eq!(stored.title(), "80 -- nginx-new");
        assert_eq!(stored.click(), first.click());

        assert!(store.dispatch_click(&first.id()));
        assert!(rx.try_recv());
    }

    #[test]
    fn dispatch_click_for_unknown_entry_is_false() {
        let store = MenuStore::new();
        assert!(!store.dispatch_click(&entry(1, "x").id()));
    }

    #[test]
    fn snapshot_identities_lists_hidden_entries_too() {
        let store = MenuStore::new();
        let mut hidden = entry(22, "sshd");
        hidden.hide();
        store.upsert(hidden.clone());
        store.upsert(entry(80, "nginx"));

        let ids = store.snapshot_identities();
        assert!(ids.contains(&hidden.id()));
        assert_eq!(ids.len(), 2);
        assert_eq!(store.visible_entries().len(), 1);
    }

    #[test]
    fn concurrent_clicks_and_upserts_do_not_block() {
        let store = Arc::new(MenuStore::new());
        let e = entry(3000, "node");
        store.upsert(e.clone());
        let id = e.id();

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for n in 0..200 {
                    store.upsert(entry(3000, &format!("node-{n}")));
                }
            })
        };
        for _ in 0..200 {
            store.dispatch_click(&id);
        }
        writer.join().unwrap();

        assert_eq!(store.lookup(&id).unwrap().title(), "3000 -- node-199");
        let rx = e.click().subscribe().unwrap();
        assert!(rx.try_recv());
        assert!(!rx.try_recv());
    }
}
