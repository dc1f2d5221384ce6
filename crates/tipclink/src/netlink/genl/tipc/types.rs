//! TIPC node type definitions.

use std::fmt;
use std::str::FromStr;

use winnow::prelude::*;
use winnow::token::take_while;

use crate::netlink::error::{Error, Result};
use crate::netlink::genl::PResult;

/// Size of a node identity in bytes.
pub const NODE_ID_LEN: usize = 16;

/// Longest identity that is shown and accepted as a plain name.
const NODE_NAME_MAX: usize = 16;

/// Longest accepted identity text (32 hex digits).
const NODE_ID_TEXT_MAX: usize = 2 * NODE_ID_LEN;

const ZONE_MAX: u32 = 255;
const CLUSTER_MAX: u32 = 4095;
const NODE_MAX: u32 = 4095;

/// 32-bit TIPC node address.
///
/// Printed as eight lowercase hex digits. Operator input uses the legacy
/// `Z.C.N` notation (zone, cluster, node), see [`NodeAddress::from_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeAddress(u32);

impl NodeAddress {
    /// Wrap a raw address.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Pack a zone/cluster/node triple, or `None` if a part is out of range.
    pub fn from_parts(zone: u32, cluster: u32, node: u32) -> Option<Self> {
        if zone > ZONE_MAX || cluster > CLUSTER_MAX || node > NODE_MAX {
            return None;
        }
        Some(Self(zone << 24 | cluster << 12 | node))
    }

    /// The raw 32-bit value.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

fn dec_u32(input: &mut &str) -> PResult<u32> {
    take_while(1.., |c: char| c.is_ascii_digit())
        .try_map(|digits: &str| digits.parse::<u32>())
        .parse_next(input)
}

fn zone_cluster_node(input: &mut &str) -> PResult<(u32, u32, u32)> {
    (dec_u32, '.', dec_u32, '.', dec_u32)
        .map(|(zone, _, cluster, _, node)| (zone, cluster, node))
        .parse_next(input)
}

impl FromStr for NodeAddress {
    type Err = Error;

    /// Parse `Z.C.N`. Out-of-range parts and the all-zero address are rejected.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidAddress(s.to_string());

        let mut input = s;
        let (zone, cluster, node) = zone_cluster_node(&mut input).map_err(|_| invalid())?;
        if !input.is_empty() {
            return Err(invalid());
        }

        match Self::from_parts(zone, cluster, node) {
            Some(addr) if addr.0 != 0 => Ok(addr),
            _ => Err(invalid()),
        }
    }
}

/// 128-bit node identity.
///
/// On the wire the identity travels as two 64-bit words in host byte
/// order: word 0 holds bytes `0..8`, word 1 holds bytes `8..16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NodeIdentity([u8; NODE_ID_LEN]);

impl NodeIdentity {
    /// Wrap raw identity bytes.
    pub const fn from_bytes(bytes: [u8; NODE_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw identity bytes.
    pub const fn as_bytes(&self) -> &[u8; NODE_ID_LEN] {
        &self.0
    }

    /// Join the two wire words.
    pub fn from_words(w0: u64, w1: u64) -> Self {
        let mut bytes = [0u8; NODE_ID_LEN];
        bytes[..8].copy_from_slice(&w0.to_ne_bytes());
        bytes[8..].copy_from_slice(&w1.to_ne_bytes());
        Self(bytes)
    }

    /// Split into the two wire words, word 0 first.
    pub fn words(&self) -> (u64, u64) {
        let (lo, hi) = self.0.split_at(8);
        let mut w0 = [0u8; 8];
        let mut w1 = [0u8; 8];
        w0.copy_from_slice(lo);
        w1.copy_from_slice(hi);
        (u64::from_ne_bytes(w0), u64::from_ne_bytes(w1))
    }

    /// The identity as a printable name, if it is one.
    fn as_name(&self) -> Option<&str> {
        let len = self.0.iter().rposition(|&b| b != 0)? + 1;
        let name = std::str::from_utf8(&self.0[..len]).ok()?;
        is_name(name).then_some(name)
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':' | '@')
}

fn is_name(s: &str) -> bool {
    !s.is_empty() && s.len() <= NODE_NAME_MAX && s.chars().all(is_name_char)
}

impl fmt::Display for NodeIdentity {
    /// Names are shown verbatim; anything else as hex without trailing zeros.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.as_name() {
            return f.pad(name);
        }

        let hex: String = self.0.iter().map(|b| format!("{:02x}", b)).collect();
        let trimmed = hex.trim_end_matches('0');
        f.pad(if trimmed.is_empty() { "0" } else { trimmed })
    }
}

impl FromStr for NodeIdentity {
    type Err = Error;

    /// Accept a name of up to 16 name characters, or up to 32 hex digits.
    ///
    /// A name is stored byte for byte. A string that is not a name is read
    /// as hex two digits per byte; an odd digit count gets a trailing `0`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidNodeIdentity(s.to_string());

        if s.is_empty() || s.len() > NODE_ID_TEXT_MAX {
            return Err(invalid());
        }

        let mut bytes = [0u8; NODE_ID_LEN];

        if is_name(s) {
            bytes[..s.len()].copy_from_slice(s.as_bytes());
            return Ok(Self(bytes));
        }

        if !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let mut digits = s.to_string();
        if digits.len() % 2 == 1 {
            digits.push('0');
        }
        for (byte, pair) in bytes.iter_mut().zip(digits.as_bytes().chunks(2)) {
            let pair = std::str::from_utf8(pair).map_err(|_| invalid())?;
            *byte = u8::from_str_radix(pair, 16).map_err(|_| invalid())?;
        }
        Ok(Self(bytes))
    }
}

/// 32-bit network (cluster) id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NetworkId(u32);

impl NetworkId {
    /// Wrap a raw network id.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw 32-bit value.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Parse with C `atoi` semantics: skip leading whitespace, take an
    /// optional sign and the leading digits, ignore the rest. Text without
    /// leading digits yields 0 and negative values wrap to 32 bits.
    pub fn parse_lenient(s: &str) -> Self {
        let text = s.trim_start_matches([' ', '\t', '\n', '\x0b', '\x0c', '\r']);
        let (negative, rest) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };

        let digits = rest.bytes().take_while(u8::is_ascii_digit);
        if digits.clone().next().is_none() {
            tracing::warn!(input = s, "network id has no leading digits, using 0");
        }

        let magnitude = digits.fold(0i64, |acc, d| {
            acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
        });
        let value = if negative { -magnitude } else { magnitude };

        Self(value as u32)
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry of a peer listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerRecord {
    /// Peer node address.
    pub address: NodeAddress,
    /// Whether the kernel reports the peer as reachable.
    pub up: bool,
}
