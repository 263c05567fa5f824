//! Scripted kernel for exercising connections without a netlink socket.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::attr::{Attribute, encode};
use super::connection::SocketConfig;
use super::genl::message::{self as genl_message, Frame};
use super::genl::{CtrlAttr, CtrlCmd, GENL_ID_CTRL, GenlMessage, GenlMsgHdr};
use super::message::{NLM_F_MULTI, NLMSG_HDRLEN, NlMsgHdr, NlMsgType, nlmsg_align};
use super::socket::Transport;
use crate::error::{Error, Result};

/// Port ID reported by mock transports.
pub(crate) const MOCK_PID: u32 = 4242;

/// Family ID the mock controller hands out for nl80211.
pub(crate) const NL80211_ID: u16 = 0x13;

type Handler = Box<dyn FnMut(&[u8]) -> Vec<Vec<u8>>>;

struct MockState {
    handler: Handler,
    sent: Vec<Vec<u8>>,
    queue: VecDeque<Vec<u8>>,
    opened: usize,
    live: usize,
}

/// A fake kernel answering each sent datagram through a handler.
///
/// The handler returns the datagrams to queue for the sender; a transport
/// with nothing queued reports a receive timeout.
#[derive(Clone)]
pub(crate) struct MockKernel {
    state: Rc<RefCell<MockState>>,
}

impl MockKernel {
    pub(crate) fn new(handler: impl FnMut(&[u8]) -> Vec<Vec<u8>> + 'static) -> Self {
        Self {
            state: Rc::new(RefCell::new(MockState {
                handler: Box::new(handler),
                sent: Vec::new(),
                queue: VecDeque::new(),
                opened: 0,
                live: 0,
            })),
        }
    }

    /// Opener for [`Connection::with_opener`](super::Connection::with_opener).
    pub(crate) fn opener(&self) -> impl Fn(&SocketConfig) -> Result<MockTransport> + 'static {
        let state = Rc::clone(&self.state);
        move |_config| {
            let mut s = state.borrow_mut();
            s.opened += 1;
            s.live += 1;
            Ok(MockTransport {
                state: Rc::clone(&state),
            })
        }
    }

    /// Every datagram sent so far.
    pub(crate) fn sent(&self) -> Vec<Vec<u8>> {
        self.state.borrow().sent.clone()
    }

    /// Parsed GENL requests sent so far.
    pub(crate) fn requests(&self) -> Vec<GenlMessage> {
        self.sent().iter().map(|req| request(req)).collect()
    }

    /// Transports opened so far.
    pub(crate) fn opened(&self) -> usize {
        self.state.borrow().opened
    }

    /// Transports not yet dropped.
    pub(crate) fn live(&self) -> usize {
        self.state.borrow().live
    }
}

pub(crate) struct MockTransport {
    state: Rc<RefCell<MockState>>,
}

impl Transport for MockTransport {
    fn pid(&self) -> u32 {
        MOCK_PID
    }

    fn send(&mut self, msg: &[u8]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.sent.push(msg.to_vec());
        let replies = (state.handler)(msg);
        state.queue.extend(replies);
        Ok(())
    }

    fn recv(&mut self) -> Result<Vec<u8>> {
        self.state
            .borrow_mut()
            .queue
            .pop_front()
            .ok_or_else(|| Error::Timeout {
                operation: "netlink reply".into(),
            })
    }
}

impl Drop for MockTransport {
    fn drop(&mut self) {
        self.state.borrow_mut().live -= 1;
    }
}

/// Sequence number of a sent request.
pub(crate) fn request_seq(req: &[u8]) -> u32 {
    NlMsgHdr::from_bytes(req).map(|h| h.nlmsg_seq).unwrap_or(0)
}

/// Port ID of a sent request.
pub(crate) fn request_pid(req: &[u8]) -> u32 {
    NlMsgHdr::from_bytes(req).map(|h| h.nlmsg_pid).unwrap_or(0)
}

/// Parse a sent request as a GENL message.
pub(crate) fn request(req: &[u8]) -> GenlMessage {
    match genl_message::parse(req).unwrap().remove(0) {
        Frame::Message(msg) => msg,
        other => panic!("request is not a GENL message: {other:?}"),
    }
}

/// A single netlink message with a raw payload.
pub(crate) fn message(msg_type: u16, flags: u16, seq: u32, payload: &[u8]) -> Vec<u8> {
    let mut header = NlMsgHdr::new(msg_type, flags);
    header.nlmsg_len = (NLMSG_HDRLEN + payload.len()) as u32;
    header.nlmsg_seq = seq;
    header.nlmsg_pid = MOCK_PID;
    let mut buf = header.as_bytes().to_vec();
    buf.extend_from_slice(payload);
    buf.resize(nlmsg_align(buf.len()), 0);
    buf
}

/// GENL header followed by encoded attributes.
pub(crate) fn genl_payload(cmd: u8, attrs: &[Attribute]) -> Vec<u8> {
    let mut payload = zerocopy::IntoBytes::as_bytes(&GenlMsgHdr::new(cmd, 1)).to_vec();
    payload.extend(encode(attrs).unwrap());
    payload
}

/// A GENL message as the kernel would send it.
pub(crate) fn genl_reply(family: u16, cmd: u8, flags: u16, seq: u32, attrs: &[Attribute]) -> Vec<u8> {
    message(family, flags, seq, &genl_payload(cmd, attrs))
}

/// One part of a multipart reply.
pub(crate) fn multi(family: u16, cmd: u8, seq: u32, attrs: &[Attribute]) -> Vec<u8> {
    genl_reply(family, cmd, NLM_F_MULTI, seq, attrs)
}

fn error_payload(errno: i32, seq: u32) -> Vec<u8> {
    let mut echoed = NlMsgHdr::new(0, 0);
    echoed.nlmsg_seq = seq;
    let mut payload = errno.to_ne_bytes().to_vec();
    payload.extend_from_slice(echoed.as_bytes());
    payload
}

pub(crate) fn ack(seq: u32) -> Vec<u8> {
    message(NlMsgType::ERROR, 0, seq, &error_payload(0, seq))
}

/// Kernel error reply; `errno` is negative.
pub(crate) fn error(seq: u32, errno: i32) -> Vec<u8> {
    message(NlMsgType::ERROR, 0, seq, &error_payload(errno, seq))
}

pub(crate) fn done(seq: u32) -> Vec<u8> {
    message(NlMsgType::DONE, NLM_F_MULTI, seq, &0i32.to_ne_bytes())
}

/// Several messages packed into one datagram.
pub(crate) fn datagram(parts: &[Vec<u8>]) -> Vec<u8> {
    parts.concat()
}

/// Controller reply to CTRL_CMD_GETFAMILY.
pub(crate) fn family_reply(seq: u32, name: &str, id: u16) -> Vec<u8> {
    genl_reply(
        GENL_ID_CTRL,
        CtrlCmd::NewFamily as u8,
        0,
        seq,
        &[
            Attribute::string(CtrlAttr::FamilyName as u16, name),
            Attribute::u16(CtrlAttr::FamilyId as u16, id),
            Attribute::u32(CtrlAttr::Version as u16, 1),
        ],
    )
}

/// A kernel that resolves `nl80211` to [`NL80211_ID`] and hands every other
/// request, parsed, to `handler`.
pub(crate) fn nl80211_kernel(
    mut handler: impl FnMut(&GenlMessage) -> Vec<Vec<u8>> + 'static,
) -> MockKernel {
    MockKernel::new(move |req| {
        let msg = request(req);
        if msg.family == GENL_ID_CTRL {
            return vec![family_reply(msg.seq, "nl80211", NL80211_ID), ack(msg.seq)];
        }
        handler(&msg)
    })
}
