//! Netlink attribute (nlattr) handling.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use super::error::{Error, Result};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Netlink attribute alignment.
pub const NLA_ALIGNTO: usize = 4;

/// Align a length to NLA_ALIGNTO boundary.
#[inline]
pub const fn nla_align(len: usize) -> usize {
    (len + NLA_ALIGNTO - 1) & !(NLA_ALIGNTO - 1)
}

/// Size of the attribute header.
pub const NLA_HDRLEN: usize = 4; // nla_align(size_of::<NlAttr>())

/// Netlink attribute header (mirrors struct nlattr).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct NlAttr {
    /// Length including header.
    pub nla_len: u16,
    /// Attribute type.
    pub nla_type: u16,
}

/// Attribute type flags.
pub const NLA_F_NESTED: u16 = 1 << 15;
pub const NLA_F_NET_BYTEORDER: u16 = 1 << 14;
pub const NLA_TYPE_MASK: u16 = !(NLA_F_NESTED | NLA_F_NET_BYTEORDER);

impl NlAttr {
    /// Create a new attribute header.
    pub fn new(attr_type: u16, data_len: usize) -> Self {
        Self {
            nla_len: (NLA_HDRLEN + data_len) as u16,
            nla_type: attr_type,
        }
    }

    /// Get the attribute type without flags.
    pub fn kind(&self) -> u16 {
        self.nla_type & NLA_TYPE_MASK
    }

    /// Check if this is a nested attribute.
    pub fn is_nested(&self) -> bool {
        self.nla_type & NLA_F_NESTED != 0
    }

    /// Convert to bytes.
    pub fn as_bytes(&self) -> &[u8] {
        <Self as IntoBytes>::as_bytes(self)
    }

    /// Parse from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<&Self> {
        Self::ref_from_prefix(data)
            .map(|(r, _)| r)
            .map_err(|_| Error::Truncated {
                expected: std::mem::size_of::<Self>(),
                actual: data.len(),
            })
    }
}

/// Iterator over netlink attributes in a buffer.
///
/// Iteration stops at the first attribute whose length field does not fit
/// the remaining buffer.
pub struct AttrIter<'a> {
    data: &'a [u8],
}

impl<'a> AttrIter<'a> {
    /// Create a new attribute iterator.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl<'a> Iterator for AttrIter<'a> {
    /// Returns (attribute type, payload data).
    type Item = (u16, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let attr = NlAttr::from_bytes(self.data).ok()?;

        let len = attr.nla_len as usize;
        if len < NLA_HDRLEN || len > self.data.len() {
            return None;
        }

        let payload = &self.data[NLA_HDRLEN..len];
        let aligned_len = nla_align(len);

        if aligned_len >= self.data.len() {
            self.data = &[];
        } else {
            self.data = &self.data[aligned_len..];
        }

        Some((attr.kind(), payload))
    }
}

/// A closed set of attribute keys belonging to one attribute group.
///
/// Implemented by the `#[repr(u16)]` key enums of a netlink family so that
/// [`AttrTable`] can be indexed by key instead of by raw number.
pub trait AttrKey: Copy {
    /// Name of the group, used in error messages.
    const GROUP: &'static str;
    /// Highest key number understood; higher keys are ignored.
    const MAX: u16;

    /// Wire number of this key.
    fn id(self) -> u16;

    /// Human-readable key name, used in error messages.
    fn name(self) -> &'static str;
}

/// Attributes of one group, indexed by key.
///
/// Unknown keys (zero, or above [`AttrKey::MAX`]) are dropped while
/// parsing. Reading a key that is absent through one of the typed getters
/// fails with [`Error::MissingAttribute`]; use [`AttrTable::has`] or
/// [`AttrTable::get`] for optional keys. When a key repeats, the last
/// occurrence wins.
#[derive(Debug, Clone)]
pub struct AttrTable<'a, K> {
    attrs: BTreeMap<u16, &'a [u8]>,
    _keys: PhantomData<K>,
}

impl<'a, K: AttrKey> AttrTable<'a, K> {
    /// Index the attributes in `data`.
    pub fn parse(data: &'a [u8]) -> Self {
        let attrs = AttrIter::new(data)
            .filter(|&(kind, _)| kind != 0 && kind <= K::MAX)
            .collect();
        Self {
            attrs,
            _keys: PhantomData,
        }
    }

    /// Number of recognised attributes.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Whether no recognised attribute was found.
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Whether `key` is present. Flag attributes are read this way.
    pub fn has(&self, key: K) -> bool {
        self.attrs.contains_key(&key.id())
    }

    /// Raw payload of `key`, if present.
    pub fn get(&self, key: K) -> Option<&'a [u8]> {
        self.attrs.get(&key.id()).copied()
    }

    /// Raw payload of `key`, failing if absent.
    pub fn require(&self, key: K) -> Result<&'a [u8]> {
        self.get(key).ok_or(Error::MissingAttribute {
            group: K::GROUP,
            attr: key.name(),
        })
    }

    /// Required `u32` attribute (native endian).
    pub fn u32(&self, key: K) -> Result<u32> {
        get::u32_ne(self.require(key)?)
    }

    /// Required `u64` attribute (native endian).
    pub fn u64(&self, key: K) -> Result<u64> {
        get::u64_ne(self.require(key)?)
    }

    /// Required nested group, indexed by its own key set.
    pub fn nested<N: AttrKey>(&self, key: K) -> Result<AttrTable<'a, N>> {
        Ok(AttrTable::parse(self.require(key)?))
    }
}

/// Helper functions for extracting typed values from attribute payloads.
pub mod get {
    use super::*;

    /// Extract a u16 value (native endian).
    pub fn u16_ne(data: &[u8]) -> Result<u16> {
        match data {
            [a, b, ..] => Ok(u16::from_ne_bytes([*a, *b])),
            _ => Err(Error::InvalidAttribute("truncated u16 attribute".into())),
        }
    }

    /// Extract a u32 value (native endian).
    pub fn u32_ne(data: &[u8]) -> Result<u32> {
        data.first_chunk::<4>()
            .map(|b| u32::from_ne_bytes(*b))
            .ok_or_else(|| Error::InvalidAttribute("truncated u32 attribute".into()))
    }

    /// Extract a u64 value (native endian).
    pub fn u64_ne(data: &[u8]) -> Result<u64> {
        data.first_chunk::<8>()
            .map(|b| u64::from_ne_bytes(*b))
            .ok_or_else(|| Error::InvalidAttribute("truncated u64 attribute".into()))
    }
}
