//! Output ordering of SDP lines
//!
//! Each table lists property names or wire types in emission order. `*` is the
//! bucket for every property not listed; properties matching nothing sort
//! after the whole table.

use super::registry::PropertyRegistry;

/// Session-level line order (RFC 4566 §5).
pub const SESSION_ORDER: &[&str] = &["v", "o", "s", "i", "u", "e", "p", "c", "b", "t", "r", "z", "k", "a", "*", "m"];

/// Line order inside a media description.
pub const MEDIA_ORDER: &[&str] = &[
    "i",
    "c",
    "b",
    "k",
    "rtcp",
    "ice-ufrag",
    "ice-pwd",
    "fingerprint",
    "setup",
    "mid",
    "extmap",
    "sendrecv",
    "rtcp-mux",
    "payloads",
    "ptime",
    "maxptime",
    "ssrc",
];

/// Attribute order inside a payload.
pub const PAYLOAD_ORDER: &[&str] = &["rtpmap", "fmtp"];

/// Rank of a property in an ordering table.
///
/// Tries the literal name, then the registry alternate, then the `*` bucket,
/// and finally ranks the property after every table entry.
pub fn position(table: &[&str], property: &str) -> usize {
    let index_of = |key: &str| table.iter().position(|entry| *entry == key);
    index_of(property)
        .or_else(|| PropertyRegistry::global().alternate(property).and_then(index_of))
        .or_else(|| index_of("*"))
        .unwrap_or(table.len())
}

/// Rank of an attribute-bag entry by its wire name.
///
/// Only the literal name is looked up, and never when it is one character
/// long, so an attribute spelled like a line type (`a=v`, `a=m`) or like a
/// field name (`a=version`) stays in the attribute bucket.
pub fn attribute_position(table: &[&str], wire_name: &str) -> usize {
    let index_of = |key: &str| table.iter().position(|entry| *entry == key);
    Some(wire_name)
        .filter(|name| name.len() > 1)
        .and_then(index_of)
        .or_else(|| index_of("*"))
        .unwrap_or(table.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_resolution() {
        // literal
        assert_eq!(position(SESSION_ORDER, "v"), 0);
        // registry alternate
        assert_eq!(position(SESSION_ORDER, "origin"), 1);
        assert_eq!(position(SESSION_ORDER, "media"), 15);
        assert_eq!(position(MEDIA_ORDER, "packetTime"), 14);
        // wildcard
        assert_eq!(position(SESSION_ORDER, "group"), 14);
        // unknown without wildcard
        assert_eq!(position(MEDIA_ORDER, "candidate"), MEDIA_ORDER.len());
        assert_eq!(position(PAYLOAD_ORDER, "id"), PAYLOAD_ORDER.len());
    }

    #[test]
    fn test_attribute_position() {
        assert_eq!(attribute_position(MEDIA_ORDER, "ptime"), 14);
        assert_eq!(attribute_position(MEDIA_ORDER, "rtcp-mux"), 12);
        // field names and line types fall to the attribute bucket
        assert_eq!(attribute_position(SESSION_ORDER, "version"), 14);
        assert_eq!(attribute_position(SESSION_ORDER, "origin"), 14);
        assert_eq!(attribute_position(SESSION_ORDER, "v"), 14);
        assert_eq!(attribute_position(SESSION_ORDER, "m"), 14);
        assert_eq!(attribute_position(MEDIA_ORDER, "i"), MEDIA_ORDER.len());
        assert_eq!(attribute_position(MEDIA_ORDER, "sessionDescription"), MEDIA_ORDER.len());
    }

    #[test]
    fn test_equal_ranks_keep_their_order() {
        let mut names = vec!["media", "tool", "origin", "group", "version", "msid-semantic"];
        names.sort_by_key(|name| position(SESSION_ORDER, name));
        assert_eq!(names, vec!["version", "origin", "tool", "group", "msid-semantic", "media"]);
    }
}
