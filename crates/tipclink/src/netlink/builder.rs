//! Builders for netlink messages and standalone attribute payloads.

use super::attr::{NLA_F_NESTED, NlAttr, nla_align};
use super::message::{NLMSG_HDRLEN, NlMsgHdr, nlmsg_align};

/// Token returned when starting a nested attribute.
/// Used to finalize the nested attribute length.
#[derive(Debug, Clone, Copy)]
pub struct NestToken {
    /// Offset of the nested attribute header in the buffer.
    offset: usize,
}

fn put_attr(buf: &mut Vec<u8>, attr_type: u16, data: &[u8]) {
    let attr = NlAttr::new(attr_type, data.len());
    buf.extend_from_slice(attr.as_bytes());
    buf.extend_from_slice(data);
    buf.resize(nla_align(buf.len()), 0);
}

fn put_nest_start(buf: &mut Vec<u8>, attr_type: u16) -> NestToken {
    let offset = buf.len();
    // Placeholder header, length patched by put_nest_end
    let attr = NlAttr::new(attr_type | NLA_F_NESTED, 0);
    buf.extend_from_slice(attr.as_bytes());
    NestToken { offset }
}

fn put_nest_end(buf: &mut Vec<u8>, token: NestToken) {
    let len = (buf.len() - token.offset) as u16;
    buf[token.offset..token.offset + 2].copy_from_slice(&len.to_ne_bytes());
    buf.resize(nla_align(buf.len()), 0);
}

/// Builder for a sequence of attributes without any message header.
///
/// Family request types use this to encode their attribute section once;
/// the transport splices the bytes behind the netlink and GENL headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttrBuilder {
    buf: Vec<u8>,
}

impl AttrBuilder {
    /// Create an empty attribute buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an attribute with the given type and data.
    pub fn append_attr(&mut self, attr_type: u16, data: &[u8]) -> &mut Self {
        put_attr(&mut self.buf, attr_type, data);
        self
    }

    /// Append an empty (flag) attribute with no payload.
    pub fn append_attr_flag(&mut self, attr_type: u16) -> &mut Self {
        self.append_attr(attr_type, &[])
    }

    /// Append a u32 attribute (native endian).
    pub fn append_attr_u32(&mut self, attr_type: u16, value: u32) -> &mut Self {
        self.append_attr(attr_type, &value.to_ne_bytes())
    }

    /// Append a u64 attribute (native endian).
    pub fn append_attr_u64(&mut self, attr_type: u16, value: u64) -> &mut Self {
        self.append_attr(attr_type, &value.to_ne_bytes())
    }

    /// Start a nested attribute. Returns a token to finalize it.
    pub fn nest_start(&mut self, attr_type: u16) -> NestToken {
        put_nest_start(&mut self.buf, attr_type)
    }

    /// End a nested attribute started with `nest_start`.
    pub fn nest_end(&mut self, token: NestToken) -> &mut Self {
        put_nest_end(&mut self.buf, token);
        self
    }

    /// Encoded attribute bytes, already aligned.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the builder and return the encoded attributes.
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

/// Builder for constructing netlink messages.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    buf: Vec<u8>,
}

impl MessageBuilder {
    /// Create a new message builder with the given type and flags.
    pub fn new(msg_type: u16, flags: u16) -> Self {
        let header = NlMsgHdr::new(msg_type, flags);
        let mut buf = vec![0u8; NLMSG_HDRLEN];
        buf[..std::mem::size_of::<NlMsgHdr>()].copy_from_slice(header.as_bytes());
        Self { buf }
    }

    /// Append raw bytes to the message (with alignment padding).
    pub fn append_bytes(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
        let aligned = nlmsg_align(self.buf.len());
        self.buf.resize(aligned, 0);
    }

    /// Append an attribute with the given type and data.
    pub fn append_attr(&mut self, attr_type: u16, data: &[u8]) {
        put_attr(&mut self.buf, attr_type, data);
    }

    /// Append a null-terminated string attribute.
    pub fn append_attr_str(&mut self, attr_type: u16, value: &str) {
        let mut data = value.as_bytes().to_vec();
        data.push(0);
        self.append_attr(attr_type, &data);
    }

    /// Append a pre-encoded attribute section.
    pub fn append_attrs(&mut self, attrs: &AttrBuilder) {
        self.append_bytes(attrs.as_bytes());
    }

    /// Set the sequence number.
    pub fn set_seq(&mut self, seq: u32) {
        self.buf[8..12].copy_from_slice(&seq.to_ne_bytes());
    }

    /// Set the port ID.
    pub fn set_pid(&mut self, pid: u32) {
        self.buf[12..16].copy_from_slice(&pid.to_ne_bytes());
    }

    /// Finalize and return the message bytes.
    pub fn finish(mut self) -> Vec<u8> {
        let len = self.buf.len() as u32;
        self.buf[0..4].copy_from_slice(&len.to_ne_bytes());
        self.buf
    }
}
