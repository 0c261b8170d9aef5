//! Session-level value grammars: v=, o=, c=, b= and k=
//!
//! c=, b= and k= may also appear inside a media description; their grammar is
//! the same at both levels.

use nom::{
    bytes::complete::take_till1,
    character::complete::char,
    combinator::{opt, rest},
    sequence::{preceded, separated_pair, tuple},
};

use crate::types::{Bandwidth, Connection, EncryptionKey, Origin};

use super::line_parser::{complete, number, spaced, token};
use super::ValueResult;

/// Parse the value of a version line (v=).
pub fn parse_version_line(value: &str) -> ValueResult<u32> {
    complete(value, number::<u32>, "version", &["<version>"])
}

/// Parse the value of an origin line (o=).
///
/// Format: `<username> <sess-id> <sess-version> <nettype> <addrtype> <unicast-address>`
///
/// # Examples
///
/// ```
/// use rvoip_sdp_core::sdp::parser::session_parser::parse_origin_line;
///
/// let origin = parse_origin_line("jdoe 2890844526 2890842807 IN IP4 10.47.16.5").unwrap();
/// assert_eq!(origin.username, "jdoe");
/// assert_eq!(origin.session_version, "2890842807");
/// assert_eq!(origin.unicast_address, "10.47.16.5");
///
/// assert!(parse_origin_line("jdoe 2890844526 IN IP4 10.47.16.5").is_err());
/// ```
pub fn parse_origin_line(value: &str) -> ValueResult<Origin> {
    let (username, session_id, session_version, network_type, address_type, unicast_address) = complete(
        value,
        tuple((token, spaced(token), spaced(token), spaced(token), spaced(token), spaced(token))),
        "origin",
        &["<username> <sess-id> <sess-version> <nettype> <addrtype> <unicast-address>"],
    )?;
    Ok(Origin {
        username: username.to_string(),
        session_id: session_id.to_string(),
        session_version: session_version.to_string(),
        network_type: network_type.to_string(),
        address_type: address_type.to_string(),
        unicast_address: unicast_address.to_string(),
    })
}

/// Parse the value of a connection line (c=).
///
/// Format: `<nettype> <addrtype> <connection-address>`. A multicast address
/// keeps its `/ttl` and `/count` suffixes.
pub fn parse_connection_line(value: &str) -> ValueResult<Connection> {
    let (network_type, address_type, connection_address) = complete(
        value,
        tuple((token, spaced(token), spaced(token))),
        "connection",
        &["<nettype> <addrtype> <connection-address>"],
    )?;
    Ok(Connection {
        network_type: network_type.to_string(),
        address_type: address_type.to_string(),
        connection_address: connection_address.to_string(),
    })
}

/// Parse the value of a bandwidth line (b=).
///
/// Format: `<bwtype>:<bandwidth>`
///
/// # Examples
///
/// ```
/// use rvoip_sdp_core::sdp::parser::session_parser::parse_bandwidth_line;
///
/// let bandwidth = parse_bandwidth_line("AS:128").unwrap();
/// assert_eq!(bandwidth.bandwidth_type, "AS");
/// assert_eq!(bandwidth.bandwidth, 128);
/// ```
pub fn parse_bandwidth_line(value: &str) -> ValueResult<Bandwidth> {
    let (bandwidth_type, bandwidth) = complete(
        value,
        separated_pair(take_till1(|c| c == ':' || c == ' '), char(':'), number::<u64>),
        "bandwidth",
        &["<bwtype>:<bandwidth>"],
    )?;
    Ok(Bandwidth::new(bandwidth_type, bandwidth))
}

/// Parse the value of an encryption key line (k=).
///
/// Format: `<method>[:<encryption key>]`. An empty key is the same as none.
pub fn parse_encryption_key_line(value: &str) -> ValueResult<EncryptionKey> {
    let (method, key) = complete(
        value,
        tuple((take_till1(|c| c == ':'), opt(preceded(char(':'), rest)))),
        "encryption key",
        &["<method>[:<encryption key>]"],
    )?;
    Ok(EncryptionKey {
        method: method.to_string(),
        key: key.filter(|key: &&str| !key.is_empty()).map(str::to_string),
    })
}
