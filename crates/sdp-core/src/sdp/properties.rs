//! Property view of SDP sections
//!
//! A section (session, media block or payload) exposes its present fields as
//! named properties in declaration order, followed by its attributes in
//! insertion order. [`ordered`] drops excluded names and stable-sorts the
//! rest by an ordering table; the formatter walks that sequence.

use crate::types::{
    AttributeValue, Bandwidth, Connection, EncryptionKey, Fmtp, Media, MediaFormats, Origin, Payload,
    RepeatTime, RtpMap, SessionDescription, TimeZone, Timing,
};

use super::ordering::{attribute_position, position};
use super::registry::{attribute_wire_name, PropertyRegistry};

/// A borrowed view of one property value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue<'a> {
    Number(u64),
    Text(&'a str),
    Origin(&'a Origin),
    Connection(&'a Connection),
    Bandwidth(&'a [Bandwidth]),
    Timing(&'a Timing),
    Repeat(&'a [RepeatTime]),
    TimeZones(&'a [TimeZone]),
    EncryptionKey(&'a EncryptionKey),
    Media(&'a [Media]),
    Formats(&'a [String]),
    Payloads(&'a [Payload]),
    /// Codec mapping, with the id of the payload it belongs to
    RtpMap(u8, &'a RtpMap),
    /// Format parameters, with the id of the payload they belong to
    Fmtp(u8, &'a Fmtp),
    Attribute(&'a AttributeValue),
}

/// A named property of a section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Property<'a> {
    pub name: &'a str,
    pub value: PropertyValue<'a>,
}

impl<'a> Property<'a> {
    fn new(name: &'a str, value: PropertyValue<'a>) -> Self {
        Property { name, value }
    }

    fn is_attribute(&self) -> bool {
        matches!(self.value, PropertyValue::Attribute(_))
    }

    /// Position in an ordering table. Attribute-bag entries are ranked by
    /// their wire name only.
    fn rank(&self, order: &[&str]) -> usize {
        if self.is_attribute() {
            attribute_position(order, attribute_wire_name(self.name))
        } else {
            position(order, self.name)
        }
    }
}

/// Something whose properties can be iterated.
pub trait Section {
    /// Present properties in declaration order, attributes last.
    fn properties(&self) -> Vec<Property<'_>>;
}

/// Properties of `section` minus `excluded`, stable-sorted by `order`.
///
/// A field is excluded when its name, or its registry alternate, is listed.
/// Attribute-bag entries are never excluded.
pub fn ordered<'a, S: Section + ?Sized>(section: &'a S, excluded: &[&str], order: &[&str]) -> Vec<Property<'a>> {
    let registry = PropertyRegistry::global();
    let mut properties: Vec<Property<'a>> = section
        .properties()
        .into_iter()
        .filter(|property| {
            property.is_attribute()
                || (!excluded.contains(&property.name)
                    && !registry
                        .alternate(property.name)
                        .is_some_and(|alternate| excluded.contains(&alternate)))
        })
        .collect();
    properties.sort_by_key(|property| property.rank(order));
    properties
}

fn push_attributes<'a>(properties: &mut Vec<Property<'a>>, attributes: &'a crate::types::Attributes) {
    properties.extend(
        attributes
            .iter()
            .map(|(name, value)| Property::new(name, PropertyValue::Attribute(value))),
    );
}

impl Section for SessionDescription {
    fn properties(&self) -> Vec<Property<'_>> {
        let mut properties = vec![
            Property::new("version", PropertyValue::Number(u64::from(self.version))),
            Property::new("origin", PropertyValue::Origin(&self.origin)),
            Property::new("sessionName", PropertyValue::Text(&self.session_name)),
        ];
        if let Some(info) = &self.session_description {
            properties.push(Property::new("sessionDescription", PropertyValue::Text(info)));
        }
        if let Some(uri) = &self.uri {
            properties.push(Property::new("uri", PropertyValue::Text(uri)));
        }
        if let Some(email) = &self.email_address {
            properties.push(Property::new("emailAddress", PropertyValue::Text(email)));
        }
        if let Some(phone) = &self.phone_number {
            properties.push(Property::new("phoneNumber", PropertyValue::Text(phone)));
        }
        if let Some(connection) = &self.connection {
            properties.push(Property::new("connection", PropertyValue::Connection(connection)));
        }
        if !self.bandwidth.is_empty() {
            properties.push(Property::new("bandwidth", PropertyValue::Bandwidth(&self.bandwidth)));
        }
        properties.push(Property::new("timing", PropertyValue::Timing(&self.timing)));
        if !self.repeat.is_empty() {
            properties.push(Property::new("repeat", PropertyValue::Repeat(&self.repeat)));
        }
        if !self.timezones.is_empty() {
            properties.push(Property::new("timezones", PropertyValue::TimeZones(&self.timezones)));
        }
        if let Some(key) = &self.encryption_key {
            properties.push(Property::new("encryptionKey", PropertyValue::EncryptionKey(key)));
        }
        if !self.media.is_empty() {
            properties.push(Property::new("media", PropertyValue::Media(&self.media)));
        }
        push_attributes(&mut properties, &self.attributes);
        properties
    }
}

impl Section for Media {
    fn properties(&self) -> Vec<Property<'_>> {
        let mut properties = vec![
            Property::new("type", PropertyValue::Text(&self.media_type)),
            Property::new("port", PropertyValue::Number(u64::from(self.port))),
        ];
        if let Some(count) = self.number_of_ports {
            properties.push(Property::new("numberOfPorts", PropertyValue::Number(u64::from(count))));
        }
        properties.push(Property::new("protocol", PropertyValue::Text(&self.protocol)));
        match &self.formats {
            MediaFormats::Formats(formats) => {
                properties.push(Property::new("formats", PropertyValue::Formats(formats)));
            }
            MediaFormats::Payloads(payloads) => {
                properties.push(Property::new("payloads", PropertyValue::Payloads(payloads)));
            }
        }
        if let Some(info) = &self.information {
            properties.push(Property::new("sessionDescription", PropertyValue::Text(info)));
        }
        if let Some(connection) = &self.connection {
            properties.push(Property::new("connection", PropertyValue::Connection(connection)));
        }
        if !self.bandwidth.is_empty() {
            properties.push(Property::new("bandwidth", PropertyValue::Bandwidth(&self.bandwidth)));
        }
        if let Some(key) = &self.encryption_key {
            properties.push(Property::new("encryptionKey", PropertyValue::EncryptionKey(key)));
        }
        push_attributes(&mut properties, &self.attributes);
        properties
    }
}

impl Section for Payload {
    fn properties(&self) -> Vec<Property<'_>> {
        let mut properties = vec![Property::new("id", PropertyValue::Number(u64::from(self.id)))];
        if let Some(rtpmap) = &self.rtpmap {
            properties.push(Property::new("rtpmap", PropertyValue::RtpMap(self.id, rtpmap)));
        }
        if let Some(fmtp) = &self.fmtp {
            properties.push(Property::new("fmtp", PropertyValue::Fmtp(self.id, fmtp)));
        }
        properties
    }
}
