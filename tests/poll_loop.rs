#![cfg(unix)]

use harboor_tray::error::SampleError;
use harboor_tray::menu::{MenuEntry, MenuStore};
use harboor_tray::model::EntryId;
use harboor_tray::poller::{MenuAdapter, PollLoop};
use harboor_tray::sampler::{CommandSampler, SocketSampler};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

/// First call answers with canned lsof text, later calls run a slow command.
struct SlowAfterFirst {
    calls: AtomicUsize,
    slow: CommandSampler,
}

impl SocketSampler for SlowAfterFirst {
    fn sample(&self) -> Result<String, SampleError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok("nginx 77 root 6u IPv4 0x2 0t0 TCP *:80 (LISTEN)\n\
                sshd 512 root 3u IPv4 0x6 0t0 TCP *:22 (LISTEN)\n"
                .to_string())
        } else {
            self.slow.sample()
        }
    }
}

#[derive(Default)]
struct CountingAdapter {
    calls: Mutex<usize>,
}

impl MenuAdapter for CountingAdapter {
    fn create_or_update_entry(&self, _: &MenuEntry) {
        *self.calls.lock().unwrap() += 1;
    }
    fn hide_entry(&self, _: &EntryId) {
        *self.calls.lock().unwrap() += 1;
    }
    fn show_entry(&self, _: &EntryId) {
        *self.calls.lock().unwrap() += 1;
    }
    fn set_title(&self, _: &str) {
        *self.calls.lock().unwrap() += 1;
    }
}

#[test]
fn sampler_timeout_leaves_menu_untouched() {
    let store = Arc::new(MenuStore::new());
    let adapter = Arc::new(CountingAdapter::default());
    let sampler = SlowAfterFirst {
        calls: AtomicUsize::new(0),
        slow: CommandSampler::new("sleep", ["5"], Duration::from_millis(150)),
    };
    let mut poller = PollLoop::new(sampler, Arc::clone(&adapter), Arc::clone(&store), Duration::from_secs(15));

    assert_eq!(poller.run_cycle().unwrap(), 2);
    let calls_before = *adapter.calls.lock().unwrap();
    let before = store.snapshot();

    let err = poller.run_cycle().unwrap_err();
    assert!(matches!(err, SampleError::Timeout { .. }), "{err}");

    assert_eq!(*adapter.calls.lock().unwrap(), calls_before);
    assert_eq!(store.snapshot(), before);
    assert!(store.snapshot().values().all(MenuEntry::visible));
}

#[test]
fn clicks_reach_subscribers_while_poller_updates() {
    let store = Arc::new(MenuStore::new());
    let sampler = SlowAfterFirst {
        calls: AtomicUsize::new(0),
        slow: CommandSampler::new("sh", ["-c", "exit 1"], Duration::from_secs(5)),
    };
    let mut poller = PollLoop::new(sampler, CountingAdapter::default(), Arc::clone(&store), Duration::from_secs(15));
    poller.run_cycle().unwrap();

    let entry = store.visible_entries().into_iter().next().unwrap();
    let rx = entry.click().subscribe().unwrap();

    // Empty sample: everything hidden, but the click path keeps working.
    assert_eq!(poller.run_cycle().unwrap(), 2);
    assert!(!store.lookup(&entry.id()).unwrap().visible());
    assert!(store.dispatch_click(&entry.id()));
    assert!(!store.dispatch_click(&entry.id()));
    assert!(rx.recv_timeout(Duration::from_secs(1)));
}
