pub mod common;
pub mod parse;

pub use common::{EntryId, ListeningSocket, ProtocolFamily};
pub use parse::parse_lsof_output;
