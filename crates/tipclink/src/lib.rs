//! Async Generic Netlink client for TIPC node configuration.
//!
//! This crate implements the small slice of netlink needed to talk to the
//! kernel's `TIPCv2` Generic Netlink family: message and attribute
//! encoding, an async `NETLINK_GENERIC` socket, family resolution, and a
//! typed TIPC module for node identity, address and network id.
//!
//! # Example
//!
//! ```rust,no_run
//! use tipclink::netlink::genl::tipc::{Request, TipcConnection, Transport, decode_network_id};
//!
//! # async fn example() -> tipclink::Result<()> {
//! let conn = TipcConnection::new().await?;
//!
//! for payload in conn.dumpit(&Request::get_net()).await? {
//!     println!("{}", decode_network_id(&payload)?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod netlink;

// Re-export common types at crate root for convenience
pub use netlink::{Error, Result};
