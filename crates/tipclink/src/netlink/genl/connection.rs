//! Generic Netlink connection with family resolution.

use super::header::{GenlMsgHdr, split_payload};
use super::{CtrlAttr, CtrlCmd, GENL_ID_CTRL};
use crate::netlink::attr::{AttrIter, get};
use crate::netlink::builder::MessageBuilder;
use crate::netlink::error::{Error, Result};
use crate::netlink::message::{MessageIter, NLM_F_ACK, NLM_F_DUMP, NLM_F_REQUEST, NlMsgError};
use crate::netlink::socket::NetlinkSocket;

/// Information about a Generic Netlink family.
#[derive(Debug, Clone)]
pub struct FamilyInfo {
    /// Dynamically assigned family ID (used as nlmsg_type).
    pub id: u16,
    /// Family version.
    pub version: u8,
    /// Header size (additional bytes after genlmsghdr).
    pub hdr_size: u32,
    /// Maximum attribute number.
    pub max_attr: u32,
}

/// Generic Netlink connection.
///
/// Resolves family IDs through the control family and runs the two
/// exchange shapes families need: an acknowledged command and a dump.
///
/// # Example
///
/// ```rust,no_run
/// use tipclink::netlink::genl::GenlConnection;
///
/// # async fn example() -> tipclink::Result<()> {
/// let conn = GenlConnection::new()?;
///
/// if conn.get_family("TIPCv2").await.is_ok() {
///     println!("TIPC is available");
/// }
/// # Ok(())
/// # }
/// ```
pub struct GenlConnection {
    socket: NetlinkSocket,
}

impl GenlConnection {
    /// Create a new Generic Netlink connection.
    pub fn new() -> Result<Self> {
        Ok(Self {
            socket: NetlinkSocket::generic()?,
        })
    }

    /// Look up a Generic Netlink family by name.
    ///
    /// The request carries no ACK flag, so the kernel answers with exactly
    /// one message: the family description or an error.
    pub async fn get_family(&self, name: &str) -> Result<FamilyInfo> {
        let mut builder = MessageBuilder::new(GENL_ID_CTRL, NLM_F_REQUEST);
        builder.append_bytes(GenlMsgHdr::new(CtrlCmd::GetFamily as u8, 1).as_bytes());
        builder.append_attr_str(CtrlAttr::FamilyName as u16, name);

        let seq = self.socket.next_seq();
        builder.set_seq(seq);
        builder.set_pid(self.socket.pid());

        self.socket.send(&builder.finish()).await?;

        loop {
            let response = self.socket.recv_msg().await?;
            if let Some(info) = parse_family_response(&response, seq, name)? {
                tracing::debug!(
                    family = name,
                    id = info.id,
                    version = info.version,
                    "resolved genl family"
                );
                return Ok(info);
            }
        }
    }

    /// Get the family ID for a given family name.
    pub async fn get_family_id(&self, name: &str) -> Result<u16> {
        Ok(self.get_family(name).await?.id)
    }

    /// Send a GENL command and wait for its acknowledgement.
    ///
    /// Datagrams that do not carry the acknowledgement for this request are
    /// skipped, so a reply left over from an earlier exchange is never taken
    /// for this one.
    pub async fn command(
        &self,
        family_id: u16,
        cmd: u8,
        version: u8,
        build_attrs: impl FnOnce(&mut MessageBuilder),
    ) -> Result<()> {
        let seq = self
            .send_request(family_id, NLM_F_REQUEST | NLM_F_ACK, cmd, version, build_attrs)
            .await?;

        loop {
            let response = self.socket.recv_msg().await?;
            if check_ack(&response, seq)? {
                return Ok(());
            }
        }
    }

    /// Send a GENL dump command and collect all responses.
    ///
    /// Each element is one message payload, GENL header included, in the
    /// order the kernel delivered them.
    pub async fn dump_command(
        &self,
        family_id: u16,
        cmd: u8,
        version: u8,
        build_attrs: impl FnOnce(&mut MessageBuilder),
    ) -> Result<Vec<Vec<u8>>> {
        let seq = self
            .send_request(family_id, NLM_F_REQUEST | NLM_F_DUMP, cmd, version, build_attrs)
            .await?;

        let mut responses = Vec::new();

        loop {
            let data = self.socket.recv_msg().await?;
            let mut done = false;

            for result in MessageIter::new(&data) {
                let (header, payload) = result?;

                if header.nlmsg_seq != seq {
                    continue;
                }

                if header.is_error() {
                    let err = NlMsgError::from_bytes(payload)?;
                    if !err.is_ack() {
                        return Err(Error::from_errno(err.error));
                    }
                    continue;
                }

                if header.is_done() {
                    done = true;
                    break;
                }

                responses.push(payload.to_vec());
            }

            if done {
                break;
            }
        }

        tracing::debug!(cmd, messages = responses.len(), "dump complete");
        Ok(responses)
    }

    async fn send_request(
        &self,
        family_id: u16,
        flags: u16,
        cmd: u8,
        version: u8,
        build_attrs: impl FnOnce(&mut MessageBuilder),
    ) -> Result<u32> {
        let mut builder = MessageBuilder::new(family_id, flags);
        builder.append_bytes(GenlMsgHdr::new(cmd, version).as_bytes());
        build_attrs(&mut builder);

        let seq = self.socket.next_seq();
        builder.set_seq(seq);
        builder.set_pid(self.socket.pid());

        let msg = builder.finish();
        tracing::debug!(family_id, cmd, seq, len = msg.len(), "sending genl request");
        self.socket.send(&msg).await?;
        Ok(seq)
    }
}

/// Parse a CTRL_CMD_GETFAMILY response.
///
/// Returns `None` if the datagram holds nothing for `seq`.
fn parse_family_response(data: &[u8], seq: u32, name: &str) -> Result<Option<FamilyInfo>> {
    for result in MessageIter::new(data) {
        let (header, payload) = result?;

        if header.nlmsg_seq != seq {
            continue;
        }

        if header.is_error() {
            let err = NlMsgError::from_bytes(payload)?;
            if !err.is_ack() {
                // Older kernels answer an unknown name with ENOENT, newer with EINVAL
                if err.error == -libc::ENOENT || err.error == -libc::EINVAL {
                    return Err(Error::FamilyNotFound {
                        name: name.to_string(),
                    });
                }
                return Err(Error::from_errno(err.error));
            }
            continue;
        }

        if header.is_done() {
            continue;
        }

        let (_, attrs) = split_payload(payload)?;
        return parse_family_attrs(attrs).map(Some);
    }

    Ok(None)
}

/// Parse family attributes from a CTRL_CMD_GETFAMILY response.
fn parse_family_attrs(data: &[u8]) -> Result<FamilyInfo> {
    let mut id: Option<u16> = None;
    let mut version: u8 = 0;
    let mut hdr_size: u32 = 0;
    let mut max_attr: u32 = 0;

    for (attr_type, payload) in AttrIter::new(data) {
        match attr_type {
            t if t == CtrlAttr::FamilyId as u16 => {
                id = Some(get::u16_ne(payload)?);
            }
            t if t == CtrlAttr::Version as u16 => {
                version = get::u32_ne(payload)? as u8;
            }
            t if t == CtrlAttr::HdrSize as u16 => {
                hdr_size = get::u32_ne(payload)?;
            }
            t if t == CtrlAttr::MaxAttr as u16 => {
                max_attr = get::u32_ne(payload)?;
            }
            _ => {}
        }
    }

    let id = id.ok_or_else(|| Error::InvalidMessage("missing family ID".into()))?;

    Ok(FamilyInfo {
        id,
        version,
        hdr_size,
        max_attr,
    })
}

/// Scan a datagram for the acknowledgement of `seq`.
///
/// Returns `Ok(true)` on an ACK, the kernel error on a NACK, and
/// `Ok(false)` when the datagram holds no error message for `seq`.
fn check_ack(data: &[u8], seq: u32) -> Result<bool> {
    for result in MessageIter::new(data) {
        let (header, payload) = result?;

        if header.nlmsg_seq != seq {
            continue;
        }

        if header.is_error() {
            let err = NlMsgError::from_bytes(payload)?;
            if !err.is_ack() {
                return Err(Error::from_errno(err.error));
            }
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlink::attr::{NlAttr, nla_align};
    use crate::netlink::message::{NLMSG_HDRLEN, NlMsgHdr, NlMsgType, nlmsg_align};

    fn message(msg_type: u16, seq: u32, payload: &[u8]) -> Vec<u8> {
        let mut hdr = NlMsgHdr::new(msg_type, 0);
        hdr.nlmsg_len = (NLMSG_HDRLEN + payload.len()) as u32;
        hdr.nlmsg_seq = seq;
        let mut buf = hdr.as_bytes().to_vec();
        buf.extend_from_slice(payload);
        buf.resize(nlmsg_align(buf.len()), 0);
        buf
    }

    fn error_payload(errno: i32) -> Vec<u8> {
        let mut payload = errno.to_ne_bytes().to_vec();
        payload.extend_from_slice(NlMsgHdr::new(GENL_ID_CTRL, NLM_F_REQUEST).as_bytes());
        payload
    }

    fn attr(kind: u16, data: &[u8]) -> Vec<u8> {
        let mut buf = NlAttr::new(kind, data.len()).as_bytes().to_vec();
        buf.extend_from_slice(data);
        buf.resize(nla_align(buf.len()), 0);
        buf
    }

    #[test]
    fn test_parse_family_response() {
        let mut payload = GenlMsgHdr::new(CtrlCmd::NewFamily as u8, 2).as_bytes().to_vec();
        payload.extend(attr(CtrlAttr::FamilyName as u16, b"TIPCv2\0"));
        payload.extend(attr(CtrlAttr::FamilyId as u16, &0x1cu16.to_ne_bytes()));
        payload.extend(attr(CtrlAttr::Version as u16, &1u32.to_ne_bytes()));
        payload.extend(attr(CtrlAttr::MaxAttr as u16, &10u32.to_ne_bytes()));

        let mut data = message(GENL_ID_CTRL, 3, &payload);
        data.extend(message(NlMsgType::ERROR, 3, &error_payload(0)));

        let info = parse_family_response(&data, 3, "TIPCv2").unwrap().unwrap();
        assert_eq!(info.id, 0x1c);
        assert_eq!(info.version, 1);
        assert_eq!(info.max_attr, 10);
    }

    #[test]
    fn test_family_not_found() {
        let data = message(NlMsgType::ERROR, 5, &error_payload(-libc::ENOENT));
        assert!(matches!(
            parse_family_response(&data, 5, "TIPCv2"),
            Err(Error::FamilyNotFound { name }) if name == "TIPCv2"
        ));
    }

    #[test]
    fn test_family_not_found_einval() {
        let data = message(NlMsgType::ERROR, 6, &error_payload(-libc::EINVAL));
        assert!(matches!(
            parse_family_response(&data, 6, "TIPCv2"),
            Err(Error::FamilyNotFound { .. })
        ));

        let data = message(NlMsgType::ERROR, 6, &error_payload(-libc::EPERM));
        assert!(parse_family_response(&data, 6, "TIPCv2").unwrap_err().is_permission_denied());
    }

    #[test]
    fn test_family_response_without_id() {
        let payload = GenlMsgHdr::new(CtrlCmd::NewFamily as u8, 2).as_bytes().to_vec();
        let data = message(GENL_ID_CTRL, 1, &payload);
        assert!(matches!(
            parse_family_response(&data, 1, "TIPCv2"),
            Err(Error::InvalidMessage(_))
        ));
    }

    #[test]
    fn test_family_response_for_other_request() {
        let data = message(NlMsgType::ERROR, 2, &error_payload(0));
        assert!(parse_family_response(&data, 3, "TIPCv2").unwrap().is_none());
    }

    #[test]
    fn test_check_ack() {
        let ack = message(NlMsgType::ERROR, 9, &error_payload(0));
        assert!(check_ack(&ack, 9).unwrap());

        let nack = message(NlMsgType::ERROR, 9, &error_payload(-libc::EPERM));
        let err = check_ack(&nack, 9).unwrap_err();
        assert!(err.is_permission_denied());
    }

    #[test]
    fn test_stale_ack_does_not_answer_request() {
        // ACK of an earlier lookup still queued ahead of the real reply
        let stale = message(NlMsgType::ERROR, 4, &error_payload(0));
        let reply = message(NlMsgType::ERROR, 5, &error_payload(-libc::EINVAL));

        assert!(!check_ack(&stale, 5).unwrap());
        let err = check_ack(&reply, 5).unwrap_err();
        assert_eq!(err.errno(), Some(libc::EINVAL));

        // Both in one datagram
        let mut data = stale;
        data.extend(reply);
        assert_eq!(check_ack(&data, 5).unwrap_err().errno(), Some(libc::EINVAL));
    }

    #[test]
    fn test_check_ack_ignores_non_error_messages() {
        let data = message(GENL_ID_CTRL, 7, &GenlMsgHdr::new(1, 1).as_bytes().to_vec());
        assert!(!check_ack(&data, 7).unwrap());
    }
}
