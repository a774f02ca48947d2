use serde::{Serialize, Serializer};
use std::fmt;

/// Address family marker reported next to a socket.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProtocolFamily {
    IPv4,
    IPv6,
    Other,
}

impl ProtocolFamily {
    /// Recognises the `TYPE` column of lsof. Anything else is not a family marker.
    pub fn from_marker(field: &str) -> Option<Self> {
        match field {
            "IPv4" => Some(ProtocolFamily::IPv4),
            "IPv6" => Some(ProtocolFamily::IPv6),
            _ => None,
        }
    }
}

impl fmt::Display for ProtocolFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProtocolFamily::IPv4 => "IPv4",
            ProtocolFamily::IPv6 => "IPv6",
            ProtocolFamily::Other => "other",
        };
        f.write_str(s)
    }
}

/// Stable identity of a socket across samples.
///
/// Built from what the socket *is*, never from where it showed up in the
/// sample, so reordered output maps onto the same menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId {
    pub family: ProtocolFamily,
    pub port: u16,
    pub pid: Option<u32>,
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pid {
            Some(pid) => write!(f, "{}|{}|{}", self.family, self.port, pid),
            None => write!(f, "{}|{}|-", self.family, self.port),
        }
    }
}

impl Serialize for EntryId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One listening socket as reported by a single sample.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ListeningSocket {
    pub port: u16,
    pub family: ProtocolFamily,
    pub pid: Option<u32>,
    pub process_name: String,
}

impl ListeningSocket {
    pub fn id(&self) -> EntryId {
        EntryId {
            family: self.family,
            port: self.port,
            pid: self.pid,
        }
    }

    pub fn title(&self) -> String {
        format!("{} -- {}", self.port, self.process_name)
    }

    pub fn tooltip(&self) -> String {
        match self.pid {
            Some(pid) => format!("PID: {pid}"),
            None => "PID: unknown".to_string(),
        }
    }

    pub fn ref_array(&self) -> Vec<String> {
        vec![
            self.port.to_string(),
            self.pid.map_or_else(|| "-".to_string(), |pid| pid.to_string()),
            self.process_name.clone(),
            self.family.to_string(),
        ]
    }
}
