//! Roster checksum used to notice that the remote table layout changed.

use crate::models::event::Event;

/// Order-independent, content-sensitive checksum of the roster names.
///
/// Names are sorted, joined with `|` and folded with `h = h * 31 + unit`
/// over UTF-16 code units in wrapping 32-bit signed arithmetic. The result
/// is rendered as signed lowercase hex (`-1a2b` for negative values), which
/// keeps hashes stored by earlier installs comparable.
///
/// Not collision-free: only use it as an advisory signal.
pub fn structure_hash<S: AsRef<str>>(names: &[S]) -> String {
    let mut sorted: Vec<&str> = names.iter().map(|n| n.as_ref()).collect();
    sorted.sort_by(|a, b| a.encode_utf16().cmp(b.encode_utf16()));
    let joined = sorted.join("|");

    let mut hash: i32 = 0;
    for unit in joined.encode_utf16() {
        hash = hash.wrapping_shl(5).wrapping_sub(hash).wrapping_add(unit as i32);
    }

    let value = hash as i64;
    if value < 0 {
        format!("-{:x}", -value)
    } else {
        format!("{:x}", value)
    }
}

pub fn events_hash(events: &[Event]) -> String {
    let names: Vec<&str> = events.iter().map(|e| e.name.as_str()).collect();
    structure_hash(&names)
}
