//! Netlink protocol implementation for Linux.
//!
//! Only the pieces the TIPC family needs are provided: the message header,
//! TLV attributes (flat and nested), a message builder, an async socket for
//! `NETLINK_GENERIC`, and the Generic Netlink layer on top of it.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tipclink::netlink::genl::GenlConnection;
//!
//! # async fn example() -> tipclink::Result<()> {
//! let conn = GenlConnection::new()?;
//! let family = conn.get_family("TIPCv2").await?;
//! println!("TIPC family ID: {}", family.id);
//! # Ok(())
//! # }
//! ```

pub mod attr;
mod builder;
mod error;
pub mod genl;
pub mod message;
mod socket;

pub use attr::{AttrIter, AttrKey, AttrTable, NlAttr};
pub use builder::{AttrBuilder, MessageBuilder, NestToken};
pub use error::{Error, Result};
pub use message::{MessageIter, NLMSG_HDRLEN, NlMsgHdr, NlMsgType};
pub use socket::NetlinkSocket;
