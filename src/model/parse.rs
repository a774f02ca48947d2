use crate::model::{ListeningSocket, ProtocolFamily};

const LISTEN_MARKER: &str = "LISTEN";

/// Parses `lsof` output into the IPv4 listening sockets it reports.
///
/// Lines are best-effort text: anything that does not look like a listening
/// socket is dropped, and a line with an unreadable port is skipped on its own
/// without affecting the rest. Output keeps sample order.
pub fn parse_lsof_output(output: &str) -> Vec<ListeningSocket> {
    output.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<ListeningSocket> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    let family = parts.iter().find_map(|p| ProtocolFamily::from_marker(p))?;
    if !parts.iter().any(|p| p.contains(LISTEN_MARKER)) {
        return None;
    }
    if family != ProtocolFamily::IPv4 {
        return None;
    }

    let process_name = parts.first()?;
    // The first all-digit field is the PID. If it does not fit, the PID is
    // absent rather than taken from a later field.
    let pid = parts
        .iter()
        .find(|p| is_digits(p))
        .and_then(|p| p.parse().ok());

    let address = parts.iter().find(|p| p.contains(':'))?;
    let (_, port) = address.rsplit_once(':')?;
    let port: u16 = match port.parse() {
        Ok(port) => port,
        Err(_) => {
            tracing::trace!(line, address, "skipping line with unreadable port");
            return None;
        }
    };

    Some(ListeningSocket {
        port,
        family,
        pid,
        process_name: process_name.to_string(),
    })
}

// `u32::from_str` tolerates a leading `+`, which is not a PID.
fn is_digits(field: &str) -> bool {
    !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit())
}
