//! SDP attribute values (`a=` lines)
//!
//! Attributes form an open, insertion-ordered bag keyed by attribute name. Each
//! entry is either a flag (`a=name`), a single value (`a=name:value`) or an
//! ordered sequence of values emitted as one line each.
//!
//! Well-known sub-grammars (ssrc, candidate, extmap, ...) are decoded into
//! their own structs; every other valued attribute keeps its raw text.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// Attribute names whose occurrences are always collected into a sequence,
/// even when only one line is present.
///
/// A `Scalar` stored under one of these names formats the same line as a
/// one-element `Sequence`, and parses back as the `Sequence`.
pub const SEQUENCE_ATTRIBUTES: &[&str] = &["ssrc", "candidate", "extmap", "rtcp-fb", "ssrc-group"];

/// Source-specific attribute (a=ssrc), RFC 5576.
///
/// Format: `a=ssrc:<ssrc-id> <attribute>[:<value>]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Ssrc {
    /// SSRC identifier
    pub id: u32,
    /// Source attribute name (e.g. "cname")
    pub attribute: String,
    /// Optional source attribute value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// ICE candidate attribute (a=candidate), RFC 8839.
///
/// Format: `a=candidate:<foundation> <component-id> <transport> <priority>
/// <connection-address> <port> typ <candidate-type> [<name> <value>]*`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Candidate {
    pub foundation: String,
    /// 1 for RTP, 2 for RTCP
    pub component: u32,
    pub transport: String,
    pub priority: u64,
    pub address: String,
    pub port: u32,
    /// host, srflx, prflx or relay
    #[serde(rename = "type")]
    pub candidate_type: String,
    /// Trailing `<name> <value>` pairs (raddr, rport, generation, ...)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<(String, String)>,
}

/// RTP header extension mapping (a=extmap), RFC 8285.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExtMap {
    pub id: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_attributes: Option<String>,
}

/// DTLS certificate fingerprint (a=fingerprint), RFC 8122.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Fingerprint {
    pub hash_function: String,
    pub fingerprint: String,
}

/// Explicit RTCP port (a=rtcp), RFC 3605.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Rtcp {
    pub port: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Media line grouping (a=group), RFC 5888.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Group {
    /// Grouping semantics (e.g. "BUNDLE", "LS")
    pub semantics: String,
    /// Identification tags of the grouped media
    pub mids: Vec<String>,
}

/// RTCP feedback capability (a=rtcp-fb), RFC 4585.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RtcpFb {
    /// Payload type or `*`
    pub payload: String,
    pub feedback_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
}

/// The value carried by one valued attribute line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Attribute {
    /// Raw text of an attribute without a dedicated sub-grammar
    Text(String),
    Ssrc(Ssrc),
    Candidate(Candidate),
    ExtMap(ExtMap),
    Fingerprint(Fingerprint),
    Group(Group),
    RtcpFb(RtcpFb),
    Rtcp(Rtcp),
}

impl From<&str> for Attribute {
    fn from(text: &str) -> Self {
        Attribute::Text(text.to_string())
    }
}

impl From<String> for Attribute {
    fn from(text: String) -> Self {
        Attribute::Text(text)
    }
}

/// The value of an attribute entry in the bag.
///
/// Parsing yields the canonical shape: `Flag(true)` for a bare name,
/// `Scalar` for one valued line and `Sequence` for repeated names or
/// [`SEQUENCE_ATTRIBUTES`]. `Flag(false)` writes nothing, so it does not
/// survive a format and parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Presence-only attribute. `true` emits `a=name`, `false` emits nothing.
    Flag(bool),
    /// One line per element, all sharing the same attribute name
    Sequence(Vec<Attribute>),
    /// A single `a=name:value` line
    Scalar(Attribute),
}

impl AttributeValue {
    /// Shorthand for a raw text scalar.
    pub fn text(value: impl Into<String>) -> Self {
        AttributeValue::Scalar(Attribute::Text(value.into()))
    }

    /// Returns the raw text of a text scalar.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Scalar(Attribute::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Iterates over the valued lines this entry stands for.
    pub fn values(&self) -> std::slice::Iter<'_, Attribute> {
        match self {
            AttributeValue::Flag(_) => [].iter(),
            AttributeValue::Scalar(value) => std::slice::from_ref(value).iter(),
            AttributeValue::Sequence(values) => values.iter(),
        }
    }
}

/// Insertion-ordered attribute bag.
///
/// Serializes as a JSON object whose keys keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, AttributeValue)>,
}

impl Attributes {
    pub fn new() -> Self {
        Attributes { entries: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the first entry with the given name.
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// True when the attribute is present as a set flag.
    pub fn has_flag(&self, name: &str) -> bool {
        self.entries
            .iter()
            .any(|(key, value)| key == name && *value == AttributeValue::Flag(true))
    }

    /// Sets the value of an attribute, replacing the first entry with that
    /// name in place or appending a new entry.
    pub fn insert(&mut self, name: impl Into<String>, value: AttributeValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Builder form of [`Attributes::insert`].
    pub fn with(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.insert(name, value);
        self
    }

    /// Removes every entry with the given name, returning the first one.
    pub fn remove(&mut self, name: &str) -> Option<AttributeValue> {
        let position = self.entries.iter().position(|(key, _)| key == name)?;
        let (_, value) = self.entries.remove(position);
        self.entries.retain(|(key, _)| key != name);
        Some(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Records one attribute line as read from SDP text.
    ///
    /// Flags are recorded once. A valued attribute becomes a sequence on its
    /// second occurrence, or immediately when listed in
    /// [`SEQUENCE_ATTRIBUTES`]. A value never merges into a flag entry of the
    /// same name; it gets its own entry.
    pub(crate) fn record(&mut self, name: &str, value: Option<Attribute>) {
        let Some(value) = value else {
            if !self.has_flag(name) {
                self.entries.push((name.to_string(), AttributeValue::Flag(true)));
            }
            return;
        };

        let existing = self.entries.iter_mut().find(|(key, entry)| {
            key == name && !matches!(entry, AttributeValue::Flag(_))
        });
        match existing {
            Some((_, entry)) => {
                if let AttributeValue::Scalar(previous) = entry {
                    let previous = std::mem::replace(previous, Attribute::Text(String::new()));
                    *entry = AttributeValue::Sequence(vec![previous]);
                }
                if let AttributeValue::Sequence(values) = entry {
                    values.push(value);
                }
            }
            None => {
                let entry = if SEQUENCE_ATTRIBUTES.contains(&name) {
                    AttributeValue::Sequence(vec![value])
                } else {
                    AttributeValue::Scalar(value)
                };
                self.entries.push((name.to_string(), entry));
            }
        }
    }
}

impl<N: Into<String>> FromIterator<(N, AttributeValue)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (N, AttributeValue)>>(iter: T) -> Self {
        Attributes {
            entries: iter.into_iter().map(|(name, value)| (name.into(), value)).collect(),
        }
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_ordered_map(&self.entries, serializer)
    }
}

impl<'de> Deserialize<'de> for Attributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Attributes {
            entries: deserialize_ordered_map(deserializer)?,
        })
    }
}

/// Serializes name/value pairs as a map, keeping their order.
pub(crate) fn serialize_ordered_map<S, V>(entries: &[(String, V)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
{
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for (name, value) in entries {
        map.serialize_entry(name, value)?;
    }
    map.end()
}

/// Reads a map into name/value pairs in document order.
pub(crate) fn deserialize_ordered_map<'de, D, V>(deserializer: D) -> Result<Vec<(String, V)>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct OrderedMapVisitor<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
        type Value = Vec<(String, V)>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a map of names to values")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((name, value)) = access.next_entry::<String, V>()? {
                entries.push((name, value));
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_promotes_repeated_values() {
        let mut attrs = Attributes::new();
        attrs.record("sendrecv", None);
        attrs.record("sendrecv", None);
        attrs.record("tool", Some("a".into()));
        attrs.record("tool", Some("b".into()));
        attrs.record("ssrc", Some(Attribute::Ssrc(Ssrc {
            id: 1,
            attribute: "cname".to_string(),
            value: Some("x".to_string()),
        })));

        assert_eq!(attrs.len(), 3);
        assert!(attrs.has_flag("sendrecv"));
        assert_eq!(
            attrs.get("tool"),
            Some(&AttributeValue::Sequence(vec!["a".into(), "b".into()]))
        );
        assert!(matches!(attrs.get("ssrc"), Some(AttributeValue::Sequence(v)) if v.len() == 1));
    }

    #[test]
    fn test_value_does_not_merge_into_flag() {
        let mut attrs = Attributes::new();
        attrs.record("x-custom", None);
        attrs.record("x-custom", Some("1".into()));
        let entries: Vec<_> = attrs.iter().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].1, &AttributeValue::Flag(true));
        assert_eq!(entries[1].1, &AttributeValue::text("1"));
    }

    #[test]
    fn test_insert_and_remove() {
        let mut attrs = Attributes::new()
            .with("mid", AttributeValue::text("audio"))
            .with("rtcp-mux", AttributeValue::Flag(true));
        attrs.insert("mid", AttributeValue::text("video"));
        assert_eq!(attrs.get("mid").and_then(AttributeValue::as_text), Some("video"));
        assert_eq!(attrs.iter().next().map(|(name, _)| name), Some("mid"));

        assert_eq!(attrs.remove("rtcp-mux"), Some(AttributeValue::Flag(true)));
        assert!(!attrs.contains("rtcp-mux"));
        assert_eq!(attrs.remove("rtcp-mux"), None);
    }

    #[test]
    fn test_json_keeps_insertion_order() {
        let attrs = Attributes::new()
            .with("zeta", AttributeValue::Flag(true))
            .with("alpha", AttributeValue::text("1"))
            .with("group", AttributeValue::Scalar(Attribute::Group(Group {
                semantics: "BUNDLE".to_string(),
                mids: vec!["0".to_string(), "1".to_string()],
            })));
        let json = serde_json::to_string(&attrs).unwrap();
        assert_eq!(
            json,
            r#"{"zeta":true,"alpha":"1","group":{"semantics":"BUNDLE","mids":["0","1"]}}"#
        );

        let back: Attributes = serde_json::from_str(&json).unwrap();
        assert_eq!(back, attrs);
    }

    #[test]
    fn test_untagged_attribute_variants() {
        let ssrc: Attribute = serde_json::from_str(r#"{"id":42,"attribute":"cname","value":"abc"}"#).unwrap();
        assert!(matches!(ssrc, Attribute::Ssrc(ref s) if s.id == 42));

        let rtcp: Attribute = serde_json::from_str(r#"{"port":9}"#).unwrap();
        assert!(matches!(rtcp, Attribute::Rtcp(ref r) if r.port == 9 && r.address.is_none()));

        let seq: AttributeValue = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(seq.values().count(), 2);
    }
}
