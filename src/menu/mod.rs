pub mod entry;
pub mod reconcile;
pub mod store;

pub use entry::{ClickReceiver, ClickSignal, MenuEntry};
pub use reconcile::{Reconciliation, SideEffect, reconcile};
pub use store::MenuStore;
