//! Netlink message header and parsing.

use super::attr::{AttrIter, get};
use crate::error::{Error, Result};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Netlink message header alignment.
pub const NLMSG_ALIGNTO: usize = 4;

/// Align a length to NLMSG_ALIGNTO boundary.
#[inline]
pub const fn nlmsg_align(len: usize) -> usize {
    (len + NLMSG_ALIGNTO - 1) & !(NLMSG_ALIGNTO - 1)
}

/// Size of the netlink message header.
pub const NLMSG_HDRLEN: usize = nlmsg_align(std::mem::size_of::<NlMsgHdr>());

/// Netlink message header (mirrors struct nlmsghdr).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct NlMsgHdr {
    /// Length of message including header.
    pub nlmsg_len: u32,
    /// Message type.
    pub nlmsg_type: u16,
    /// Additional flags.
    pub nlmsg_flags: u16,
    /// Sequence number.
    pub nlmsg_seq: u32,
    /// Sending process port ID.
    pub nlmsg_pid: u32,
}

impl NlMsgHdr {
    /// Create a new message header.
    pub fn new(msg_type: u16, flags: u16) -> Self {
        Self {
            nlmsg_len: NLMSG_HDRLEN as u32,
            nlmsg_type: msg_type,
            nlmsg_flags: flags,
            nlmsg_seq: 0,
            nlmsg_pid: 0,
        }
    }

    /// Get the payload length (total length minus header).
    pub fn payload_len(&self) -> usize {
        (self.nlmsg_len as usize).saturating_sub(NLMSG_HDRLEN)
    }

    /// Check if this is an error message.
    pub fn is_error(&self) -> bool {
        self.nlmsg_type == NlMsgType::ERROR
    }

    /// Check if this is a done message.
    pub fn is_done(&self) -> bool {
        self.nlmsg_type == NlMsgType::DONE
    }

    /// Check if this message has the multi flag.
    pub fn is_multi(&self) -> bool {
        self.nlmsg_flags & NLM_F_MULTI != 0
    }

    /// Convert header to bytes.
    pub fn as_bytes(&self) -> &[u8] {
        <Self as IntoBytes>::as_bytes(self)
    }

    /// Parse header from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<&Self> {
        Self::ref_from_prefix(data)
            .map(|(r, _)| r)
            .map_err(|_| Error::Truncated {
                expected: std::mem::size_of::<Self>(),
                actual: data.len(),
            })
    }
}

/// Standard netlink control message types.
pub struct NlMsgType;

impl NlMsgType {
    /// No operation, message must be discarded.
    pub const NOOP: u16 = 1;
    /// Error message or ACK.
    pub const ERROR: u16 = 2;
    /// End of multipart message.
    pub const DONE: u16 = 3;
    /// Data lost, request resend.
    pub const OVERRUN: u16 = 4;
}

/// Request flags used by this crate.
pub const NLM_F_REQUEST: u16 = 0x01;
pub const NLM_F_MULTI: u16 = 0x02;
pub const NLM_F_ACK: u16 = 0x04;
/// `NLM_F_ROOT | NLM_F_MATCH`.
pub const NLM_F_DUMP: u16 = 0x300;

// Flags on NLMSG_ERROR replies
const NLM_F_CAPPED: u16 = 0x100;
const NLM_F_ACK_TLVS: u16 = 0x200;

const NLMSGERR_ATTR_MSG: u16 = 1;

/// Iterator over netlink messages in a buffer.
pub struct MessageIter<'a> {
    data: &'a [u8],
}

impl<'a> MessageIter<'a> {
    /// Create a new message iterator.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl<'a> Iterator for MessageIter<'a> {
    type Item = Result<(&'a NlMsgHdr, &'a [u8])>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.data.is_empty() {
            return None;
        }

        let header = match NlMsgHdr::from_bytes(self.data) {
            Ok(h) => h,
            Err(e) => {
                self.data = &[];
                return Some(Err(e));
            }
        };

        let msg_len = header.nlmsg_len as usize;
        if msg_len < NLMSG_HDRLEN || msg_len > self.data.len() {
            self.data = &[];
            return Some(Err(Error::InvalidMessage(format!(
                "invalid message length: {}",
                msg_len
            ))));
        }

        let payload = &self.data[NLMSG_HDRLEN..msg_len];
        self.data = self.data.get(nlmsg_align(msg_len)..).unwrap_or(&[]);

        Some(Ok((header, payload)))
    }
}

/// Netlink error message payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, Immutable, KnownLayout)]
pub struct NlMsgError {
    /// Error code (negative errno or 0 for ACK).
    pub error: i32,
    /// Original message header that caused the error.
    pub msg: NlMsgHdr,
}

impl NlMsgError {
    /// Parse error message from payload.
    ///
    /// Only the error code is required; kernels that cap the echoed request
    /// still send the full header, shorter payloads are malformed.
    pub fn from_bytes(data: &[u8]) -> Result<&Self> {
        Self::ref_from_prefix(data)
            .map(|(r, _)| r)
            .map_err(|_| Error::Truncated {
                expected: std::mem::size_of::<Self>(),
                actual: data.len(),
            })
    }

    /// Check if this is an ACK (no error).
    pub fn is_ack(&self) -> bool {
        self.error == 0
    }

    /// Text the kernel attached through extended ACK, if any.
    ///
    /// The attributes follow the echoed request, which is the full
    /// original message unless the kernel capped it to its header.
    pub fn ext_ack_message<'a>(&self, header: &NlMsgHdr, payload: &'a [u8]) -> Option<&'a str> {
        if header.nlmsg_flags & NLM_F_ACK_TLVS == 0 {
            return None;
        }
        let echoed = if header.nlmsg_flags & NLM_F_CAPPED != 0 {
            NLMSG_HDRLEN
        } else {
            self.msg.nlmsg_len as usize
        };
        let offset = nlmsg_align(std::mem::size_of::<i32>() + echoed);
        AttrIter::new(payload.get(offset..)?)
            .find(|(kind, _)| *kind == NLMSGERR_ATTR_MSG)
            .and_then(|(_, data)| get::string(data).ok())
            .filter(|msg| !msg.is_empty())
    }
}

/// Classified view of one received message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NlReply<'a> {
    /// NLMSG_ERROR carrying 0: the request succeeded.
    Ack,
    /// NLMSG_ERROR (or a failed DONE) carrying a negative errno.
    Error(i32),
    /// NLMSG_DONE: end of a multipart exchange.
    Done,
    /// NLMSG_NOOP: nothing to do.
    Noop,
    /// A protocol payload message.
    Data(&'a [u8]),
}

impl<'a> NlReply<'a> {
    /// Classify a message by its header type.
    pub fn classify(header: &NlMsgHdr, payload: &'a [u8]) -> Result<Self> {
        match header.nlmsg_type {
            NlMsgType::ERROR => {
                let err = NlMsgError::from_bytes(payload)?;
                if err.is_ack() {
                    Ok(Self::Ack)
                } else {
                    Ok(Self::Error(err.error))
                }
            }
            // A failed dump reports its errno in the DONE payload.
            NlMsgType::DONE => match payload.get(..4) {
                Some(code) => {
                    let code = i32::from_ne_bytes([code[0], code[1], code[2], code[3]]);
                    if code < 0 {
                        Ok(Self::Error(code))
                    } else {
                        Ok(Self::Done)
                    }
                }
                None => Ok(Self::Done),
            },
            NlMsgType::NOOP => Ok(Self::Noop),
            NlMsgType::OVERRUN => Err(Error::InvalidMessage(
                "kernel reported receive buffer overrun".into(),
            )),
            _ => Ok(Self::Data(payload)),
        }
    }
}
