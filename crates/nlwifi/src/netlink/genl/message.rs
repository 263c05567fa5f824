//! Generic Netlink message framing.

use super::header::{GENL_HDRLEN, GenlMsgHdr};
use crate::error::Result;
use crate::netlink::attr::{self, Attribute};
use crate::netlink::builder::MessageBuilder;
use crate::netlink::message::NlMsgHdr;
#[cfg(test)]
use crate::netlink::message::{MessageIter, NlReply};

/// Start a GENL message: netlink header, GENL header and attributes.
///
/// Sequence and port are stamped by the connection that sends it.
pub fn build(
    family: u16,
    cmd: u8,
    version: u8,
    flags: u16,
    attrs: &[Attribute],
) -> Result<MessageBuilder> {
    let mut builder = MessageBuilder::new(family, flags);
    builder.append(&GenlMsgHdr::new(cmd, version));
    for attr in attrs {
        builder.append_attribute(attr)?;
    }
    Ok(builder)
}

/// A parsed Generic Netlink message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenlMessage {
    /// Family ID (the netlink message type).
    pub family: u16,
    /// Netlink flags.
    pub flags: u16,
    /// Sequence number.
    pub seq: u32,
    /// Family-specific command.
    pub cmd: u8,
    /// Interface version.
    pub version: u8,
    attrs: Vec<u8>,
}

impl GenlMessage {
    /// Parse a netlink payload that starts with a GENL header.
    pub fn parse(header: &NlMsgHdr, payload: &[u8]) -> Result<Self> {
        let genl = GenlMsgHdr::from_bytes(payload)?;
        Ok(Self {
            family: header.nlmsg_type,
            flags: header.nlmsg_flags,
            seq: header.nlmsg_seq,
            cmd: genl.cmd,
            version: genl.version,
            attrs: payload[GENL_HDRLEN..].to_vec(),
        })
    }

    /// Parse a payload as returned by [`Connection`](crate::netlink::Connection),
    /// which has already been matched to its request.
    pub fn from_payload(family: u16, payload: &[u8]) -> Result<Self> {
        let header = NlMsgHdr::new(family, 0);
        Self::parse(&header, payload)
    }

    /// Decode the top-level attributes.
    ///
    /// A header that overruns the message or is shorter than itself fails
    /// the whole message.
    pub fn attrs(&self) -> Result<Vec<(u16, &[u8])>> {
        attr::decode(&self.attrs)
    }

    /// Payload of the first top-level attribute of type `kind`.
    pub fn attr(&self, kind: u16) -> Result<Option<&[u8]>> {
        Ok(self
            .attrs()?
            .into_iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, payload)| payload))
    }

    /// Raw attribute block.
    pub fn attr_bytes(&self) -> &[u8] {
        &self.attrs
    }

    /// Decode the attribute block into owned trees.
    pub fn attr_tree(&self) -> Result<Vec<Attribute>> {
        Attribute::decode_tree(&self.attrs)
    }
}

/// One message of a received datagram, as seen by the scripted kernel.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Frame {
    Message(GenlMessage),
    Ack { seq: u32 },
    Error { seq: u32, errno: i32 },
    Done { seq: u32 },
}

/// Split a datagram into frames. NOOP messages are skipped.
#[cfg(test)]
pub(crate) fn parse(datagram: &[u8]) -> Result<Vec<Frame>> {
    let mut frames = Vec::new();
    for result in MessageIter::new(datagram) {
        let (header, payload) = result?;
        let seq = header.nlmsg_seq;
        match NlReply::classify(header, payload)? {
            NlReply::Data(payload) => frames.push(Frame::Message(GenlMessage::parse(header, payload)?)),
            NlReply::Ack => frames.push(Frame::Ack { seq }),
            NlReply::Error(errno) => frames.push(Frame::Error { seq, errno }),
            NlReply::Done => frames.push(Frame::Done { seq }),
            NlReply::Noop => {}
        }
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlink::attr::get;
    use crate::netlink::message::{NLM_F_ACK, NLM_F_REQUEST, NLMSG_HDRLEN};

    #[test]
    fn test_build_layout() {
        let mut builder =
            build(0x1c, 5, 1, NLM_F_REQUEST | NLM_F_ACK, &[Attribute::u32(3, 7)]).unwrap();
        builder.set_seq(9);
        let msg = builder.finish();

        assert_eq!(msg.len(), NLMSG_HDRLEN + GENL_HDRLEN + 8);
        assert_eq!(&msg[NLMSG_HDRLEN..NLMSG_HDRLEN + 2], &[5, 1]);

        let frames = parse(&msg).unwrap();
        let Frame::Message(parsed) = &frames[0] else {
            panic!("expected a message, got {:?}", frames[0]);
        };
        assert_eq!(parsed.family, 0x1c);
        assert_eq!(parsed.cmd, 5);
        assert_eq!(parsed.seq, 9);
        let attrs = parsed.attrs().unwrap();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].0, 3);
        assert_eq!(get::u32_ne(attrs[0].1).unwrap(), 7);
    }

    #[test]
    fn test_parse_control_frames() {
        use crate::netlink::fixtures;

        let datagram = fixtures::datagram(&[
            fixtures::ack(4),
            fixtures::error(5, -19),
            fixtures::done(6),
        ]);
        assert_eq!(
            parse(&datagram).unwrap(),
            vec![
                Frame::Ack { seq: 4 },
                Frame::Error { seq: 5, errno: -19 },
                Frame::Done { seq: 6 },
            ]
        );
    }

    #[test]
    fn test_attrs_reject_overrun() {
        let mut payload = vec![5, 1, 0, 0];
        payload.extend_from_slice(&255u16.to_ne_bytes());
        payload.extend_from_slice(&3u16.to_ne_bytes());
        payload.extend_from_slice(&[0; 4]);
        let msg = GenlMessage::from_payload(0x13, &payload).unwrap();

        assert!(matches!(
            msg.attrs(),
            Err(crate::Error::Truncated {
                expected: 255,
                actual: 8
            })
        ));
        assert!(msg.attr(3).is_err());
    }

    #[test]
    fn test_missing_genl_header() {
        let header = NlMsgHdr::new(0x1c, 0);
        assert!(GenlMessage::parse(&header, &[1, 2]).is_err());
    }

    #[test]
    fn test_attr_tree() {
        let nested = Attribute::nested(45, vec![Attribute::bytes(1, b"lab".to_vec())]);
        let msg = build(0x1c, 33, 0, 0, std::slice::from_ref(&nested))
            .unwrap()
            .finish();
        let parsed = GenlMessage::parse(
            NlMsgHdr::from_bytes(&msg).unwrap(),
            &msg[NLMSG_HDRLEN..],
        )
        .unwrap();
        assert_eq!(parsed.attr_tree().unwrap(), vec![nested]);
    }
}
