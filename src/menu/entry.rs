use crate::model::{EntryId, ListeningSocket};

use serde::Serialize;
use std::{
    fmt,
    sync::{
        Arc, Mutex, PoisonError,
        mpsc::{Receiver, RecvTimeoutError, SyncSender, TrySendError, sync_channel},
    },
    time::Duration,
};

/// Per-entry click notification with a single slot.
///
/// Sending never blocks: when a click is already pending, or nobody holds the
/// receiver any more, the extra notification is dropped. Clones share the
/// same slot.
#[derive(Clone)]
pub struct ClickSignal {
    inner: Arc<ClickSlot>,
}

struct ClickSlot {
    tx: SyncSender<()>,
    rx: Mutex<Option<Receiver<()>>>,
}

impl ClickSignal {
    pub fn new() -> Self {
        let (tx, rx) = sync_channel(1);
        Self {
            inner: Arc::new(ClickSlot {
                tx,
                rx: Mutex::new(Some(rx)),
            }),
        }
    }

    /// Queues a click. Returns `false` if it was dropped.
    pub fn notify(&self) -> bool {
        match self.inner.tx.try_send(()) {
            Ok(()) => true,
            Err(TrySendError::Full(())) | Err(TrySendError::Disconnected(())) => false,
        }
    }

    /// Hands out the reading end. Only the first caller gets it.
    pub fn subscribe(&self) -> Option<ClickReceiver> {
        self.inner
            .rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .map(ClickReceiver)
    }
}

impl Default for ClickSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for ClickSignal {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for ClickSignal {}

impl fmt::Debug for ClickSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClickSignal")
            .field("slot", &Arc::as_ptr(&self.inner))
            .finish()
    }
}

#[derive(Debug)]
pub struct ClickReceiver(Receiver<()>);

impl ClickReceiver {
    pub fn try_recv(&self) -> bool {
        self.0.try_recv().is_ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> bool {
        match self.0.recv_timeout(timeout) {
            Ok(()) => true,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }
}

/// One line of the port menu.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    id: EntryId,
    socket: ListeningSocket,
    title: String,
    tooltip: String,
    visible: bool,
    disabled: bool,
    checked: bool,
    #[serde(skip)]
    click: ClickSignal,
}

impl MenuEntry {
    /// A fresh, visible entry for a socket seen for the first time.
    pub fn from_socket(socket: &ListeningSocket) -> Self {
        Self {
            id: socket.id(),
            title: socket.title(),
            tooltip: socket.tooltip(),
            socket: socket.clone(),
            visible: true,
            disabled: false,
            checked: false,
            click: ClickSignal::new(),
        }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn socket(&self) -> &ListeningSocket {
        &self.socket
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn disabled(&self) -> bool {
        self.disabled
    }

    pub fn checked(&self) -> bool {
        self.checked
    }

    /// Greys the entry out. Kept across later observations.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Kept across later observations.
    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    pub fn click(&self) -> &ClickSignal {
        &self.click
    }

    /// Applies a new observation of the same identity and makes the entry
    /// visible. Returns whether anything the menu displays changed.
    pub(crate) fn observe(&mut self, socket: &ListeningSocket) -> bool {
        let title = socket.title();
        let tooltip = socket.tooltip();
        let changed = !self.visible || self.title != title || self.tooltip != tooltip;

        self.title = title;
        self.tooltip = tooltip;
        self.socket = socket.clone();
        self.visible = true;
        changed
    }

    /// Returns whether the entry was visible before.
    pub(crate) fn hide(&mut self) -> bool {
        std::mem::replace(&mut self.visible, false)
    }

    pub(crate) fn adopt_click(&mut self, click: ClickSignal) {
        self.click = click;
    }

    pub fn ref_array(&self) -> Vec<String> {
        vec![
            self.socket.port.to_string(),
            self.title.clone(),
            self.tooltip.clone(),
        ]
    }
}
