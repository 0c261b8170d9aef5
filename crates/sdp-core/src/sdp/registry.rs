//! Property registry
//!
//! Bidirectional mapping between SDP line types / attribute names as they
//! appear on the wire (`v`, `o`, `ptime`, ...) and the descriptive property
//! names used by the structured value (`version`, `origin`, `packetTime`, ...).
//!
//! `payloads` maps to the empty type: payload entries are emitted without a
//! prefix of their own, since their lines are produced by the nested
//! rtpmap/fmtp encoders.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Wire type and property name pairs, in the order of RFC 4566 §5.
const PROPERTY_TYPES: &[(&str, &str)] = &[
    ("v", "version"),
    ("o", "origin"),
    ("s", "sessionName"),
    ("i", "sessionDescription"),
    ("u", "uri"),
    ("e", "emailAddress"),
    ("p", "phoneNumber"),
    ("c", "connection"),
    ("m", "media"),
    ("b", "bandwidth"),
    ("t", "timing"),
    ("r", "repeat"),
    ("z", "timezones"),
    ("k", "encryptionKey"),
    ("cat", "category"),
    ("keywds", "keywords"),
    ("ptime", "packetTime"),
    ("maxptime", "maximumPacketTime"),
    ("orient", "orientation"),
    ("", "payloads"),
];

static REGISTRY: OnceLock<PropertyRegistry> = OnceLock::new();

/// Immutable name/type maps built once from [`PROPERTY_TYPES`].
#[derive(Debug)]
pub struct PropertyRegistry {
    type_to_name: HashMap<&'static str, &'static str>,
    name_to_type: HashMap<&'static str, &'static str>,
}

impl PropertyRegistry {
    /// Builds the registry from type/name pairs.
    ///
    /// # Panics
    ///
    /// Panics if a type or a name appears twice, or if a type is also used as
    /// a name: the maps must stay a bijection.
    fn from_pairs(pairs: &[(&'static str, &'static str)]) -> Self {
        let mut type_to_name = HashMap::with_capacity(pairs.len());
        let mut name_to_type = HashMap::with_capacity(pairs.len());
        for &(sdp_type, name) in pairs {
            assert!(
                type_to_name.insert(sdp_type, name).is_none(),
                "duplicate SDP type in registry: {sdp_type:?}"
            );
            assert!(
                name_to_type.insert(name, sdp_type).is_none(),
                "duplicate property name in registry: {name:?}"
            );
        }
        for sdp_type in type_to_name.keys() {
            assert!(
                !name_to_type.contains_key(sdp_type),
                "SDP type {sdp_type:?} is also a property name"
            );
        }
        PropertyRegistry {
            type_to_name,
            name_to_type,
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static PropertyRegistry {
        REGISTRY.get_or_init(|| PropertyRegistry::from_pairs(PROPERTY_TYPES))
    }

    /// Wire type of a property name.
    pub fn type_of(&self, name: &str) -> Option<&'static str> {
        self.name_to_type.get(name).copied()
    }

    /// Property name of a wire type.
    pub fn name_of(&self, sdp_type: &str) -> Option<&'static str> {
        self.type_to_name.get(sdp_type).copied()
    }

    /// The other side of the mapping, whichever side `key` belongs to.
    pub fn alternate(&self, key: &str) -> Option<&'static str> {
        self.type_of(key).or_else(|| self.name_of(key))
    }
}

/// Wire type of a property name (`"origin"` → `"o"`).
///
/// Unknown names yield `None`; callers use the name itself as the prefix.
pub fn type_of(name: &str) -> Option<&'static str> {
    PropertyRegistry::global().type_of(name)
}

/// Property name of a wire type (`"o"` → `"origin"`).
pub fn name_of(sdp_type: &str) -> Option<&'static str> {
    PropertyRegistry::global().name_of(sdp_type)
}

/// Attribute name to store a parsed `a=` line under.
///
/// Only attribute aliases are translated; an attribute that happens to be
/// spelled like a line type keeps its name.
pub fn attribute_property(attribute: &str) -> &str {
    if attribute.len() < 2 {
        return attribute;
    }
    name_of(attribute).unwrap_or(attribute)
}

/// Attribute name to emit for a property of the attribute bag.
pub fn attribute_wire_name(property: &str) -> &str {
    match type_of(property) {
        Some(sdp_type) if sdp_type.len() > 1 => sdp_type,
        _ => property,
    }
}
