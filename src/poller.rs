use crate::error::SampleError;
use crate::menu::{MenuEntry, MenuStore, SideEffect, reconcile};
use crate::model::{EntryId, parse_lsof_output};
use crate::sampler::SocketSampler;

use std::{
    sync::{
        Arc,
        mpsc::{Receiver, RecvTimeoutError},
    },
    time::Duration,
};

/// The menu surface the poller drives. All calls must be idempotent.
pub trait MenuAdapter {
    fn create_or_update_entry(&self, entry: &MenuEntry);
    fn hide_entry(&self, id: &EntryId);
    fn show_entry(&self, id: &EntryId);
    fn set_title(&self, title: &str);
}

impl<A: MenuAdapter + ?Sized> MenuAdapter for Arc<A> {
    fn create_or_update_entry(&self, entry: &MenuEntry) {
        (**self).create_or_update_entry(entry)
    }
    fn hide_entry(&self, id: &EntryId) {
        (**self).hide_entry(id)
    }
    fn show_entry(&self, id: &EntryId) {
        (**self).show_entry(id)
    }
    fn set_title(&self, title: &str) {
        (**self).set_title(title)
    }
}

/// Messages accepted between cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollSignal {
    Refresh,
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Sampling,
    Reconciling,
    Applying,
}

/// Sample → parse → reconcile → apply, once per interval.
pub struct PollLoop<S, A> {
    sampler: S,
    adapter: A,
    store: Arc<MenuStore>,
    interval: Duration,
    state: PollState,
    title: Option<String>,
}

impl<S: SocketSampler, A: MenuAdapter> PollLoop<S, A> {
    pub fn new(sampler: S, adapter: A, store: Arc<MenuStore>, interval: Duration) -> Self {
        Self {
            sampler,
            adapter,
            store,
            interval,
            state: PollState::Idle,
            title: None,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    fn transition(&mut self, next: PollState) {
        tracing::trace!(from = ?self.state, to = ?next, "poll state");
        self.state = next;
    }

    /// Runs one cycle and returns how many side effects were applied.
    ///
    /// A failed sample leaves the store and the UI exactly as they were.
    pub fn run_cycle(&mut self) -> Result<usize, SampleError> {
        self.transition(PollState::Sampling);
        let raw = match self.sampler.sample() {
            Ok(raw) => raw,
            Err(e) => {
                self.transition(PollState::Idle);
                return Err(e);
            }
        };

        self.transition(PollState::Reconciling);
        let sockets = parse_lsof_output(&raw);
        let previous = self.store.snapshot();
        let result = reconcile(&previous, &sockets);
        tracing::debug!(
            sockets = sockets.len(),
            known = previous.len(),
            effects = result.effects.len(),
            "reconciled sample"
        );

        self.transition(PollState::Applying);
        for effect in &result.effects {
            self.apply(effect);
        }
        self.publish_title();

        self.transition(PollState::Idle);
        Ok(result.effects.len())
    }

    fn apply(&self, effect: &SideEffect) {
        let entry = effect.entry();
        self.store.upsert(entry.clone());
        match effect {
            SideEffect::CreateAndShow(_) | SideEffect::UpdateAndShow(_) => {
                self.adapter.create_or_update_entry(entry);
                self.adapter.show_entry(&entry.id());
            }
            SideEffect::Hide(_) => self.adapter.hide_entry(&entry.id()),
        }
    }

    fn publish_title(&mut self) {
        let title = format!("Utilized Ports: {}", self.store.visible_entries().len());
        if self.title.as_deref() != Some(title.as_str()) {
            self.adapter.set_title(&title);
            self.title = Some(title);
        }
    }

    /// Polls until a [`PollSignal::Shutdown`] arrives or the sender is dropped.
    /// Signals are only looked at between cycles.
    pub fn run(mut self, control: Receiver<PollSignal>) {
        tracing::info!(interval = ?self.interval, "poller started");
        loop {
            match self.run_cycle() {
                Ok(0) => {}
                Ok(applied) => tracing::info!(applied, "menu updated"),
                Err(e) => tracing::warn!(error = %e, "sampling failed, keeping previous menu"),
            }

            match control.recv_timeout(self.interval) {
                Ok(PollSignal::Refresh) | Err(RecvTimeoutError::Timeout) => continue,
                Ok(PollSignal::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        tracing::info!("poller stopped");
    }
}
