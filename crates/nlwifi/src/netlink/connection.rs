//! Netlink connection with request/response correlation.

use std::time::Duration;

use super::builder::MessageBuilder;
use super::message::{MessageIter, NLM_F_ACK, NLM_F_DUMP, NLM_F_REQUEST, NlMsgError, NlReply};
use super::socket::{NetlinkSocket, Transport};
use crate::error::{Error, Result};

/// Socket lifetime policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SocketMode {
    /// One socket opened at construction and reused for every request.
    #[default]
    Persistent,
    /// A fresh socket per request, closed when the exchange ends.
    OneShot,
}

/// Connection settings.
///
/// ```
/// use std::time::Duration;
/// use nlwifi::netlink::{SocketConfig, SocketMode};
///
/// let config = SocketConfig::new()
///     .mode(SocketMode::OneShot)
///     .recv_timeout(Some(Duration::from_secs(2)));
/// assert_eq!(config.get_mode(), SocketMode::OneShot);
/// ```
#[derive(Debug, Clone)]
pub struct SocketConfig {
    mode: SocketMode,
    recv_timeout: Option<Duration>,
    max_reply_size: usize,
    ext_ack: bool,
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self {
            mode: SocketMode::Persistent,
            recv_timeout: Some(Duration::from_secs(5)),
            max_reply_size: 32768,
            ext_ack: true,
        }
    }
}

impl SocketConfig {
    /// Default settings: persistent, 5 second receive window, 32 KiB replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the socket lifetime policy.
    pub fn mode(mut self, mode: SocketMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the receive window. `None` blocks until the kernel answers.
    pub fn recv_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.recv_timeout = timeout;
        self
    }

    /// Set the largest datagram accepted from the kernel.
    pub fn max_reply_size(mut self, size: usize) -> Self {
        self.max_reply_size = size;
        self
    }

    /// Request extended ACK reporting.
    pub fn ext_ack(mut self, enable: bool) -> Self {
        self.ext_ack = enable;
        self
    }

    pub fn get_mode(&self) -> SocketMode {
        self.mode
    }

    pub fn get_recv_timeout(&self) -> Option<Duration> {
        self.recv_timeout
    }

    pub fn get_max_reply_size(&self) -> usize {
        self.max_reply_size
    }

    pub fn get_ext_ack(&self) -> bool {
        self.ext_ack
    }

    /// Open a kernel socket with these settings.
    pub fn open(&self) -> Result<NetlinkSocket> {
        let mut socket = NetlinkSocket::new()?;
        if self.ext_ack {
            socket.set_ext_ack(true);
        }
        socket.set_recv_timeout(self.recv_timeout)?;
        socket.set_max_reply_size(self.max_reply_size);
        Ok(socket)
    }
}

type Opener<T> = Box<dyn Fn(&SocketConfig) -> Result<T>>;

enum Endpoint<T> {
    Persistent(T),
    OneShot,
}

/// What ends an exchange besides a kernel error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Until {
    /// ACK or DONE carrying our sequence.
    Ack,
    /// DONE carrying our sequence.
    Done,
}

/// Netlink connection.
///
/// Stamps each request with a fresh sequence number and collects the payload
/// messages that echo it, discarding everything else. Requests take
/// `&mut self`: a connection serves one exchange at a time.
pub struct Connection<T: Transport = NetlinkSocket> {
    config: SocketConfig,
    opener: Opener<T>,
    endpoint: Endpoint<T>,
    seq: u32,
}

impl Connection<NetlinkSocket> {
    /// Create a connection backed by kernel sockets.
    ///
    /// In persistent mode the socket is opened here.
    pub fn new(config: SocketConfig) -> Result<Self> {
        Self::with_opener(config, SocketConfig::open)
    }
}

impl<T: Transport> Connection<T> {
    /// Create a connection over transports produced by `opener`.
    pub fn with_opener(
        config: SocketConfig,
        opener: impl Fn(&SocketConfig) -> Result<T> + 'static,
    ) -> Result<Self> {
        let endpoint = match config.mode {
            SocketMode::Persistent => Endpoint::Persistent(opener(&config)?),
            SocketMode::OneShot => Endpoint::OneShot,
        };
        Ok(Self {
            config,
            opener: Box::new(opener),
            endpoint,
            seq: 0,
        })
    }

    /// Connection settings.
    pub fn config(&self) -> &SocketConfig {
        &self.config
    }

    /// Get the next sequence number.
    pub fn next_seq(&mut self) -> u32 {
        self.seq = self.seq.wrapping_add(1);
        if self.seq == 0 {
            // Zero is what the kernel stamps on notifications.
            self.seq = 1;
        }
        self.seq
    }

    /// Send a request and collect its reply messages until the ACK.
    ///
    /// Returns the payload (everything after the netlink header) of each
    /// data message in receipt order.
    pub fn request(&mut self, builder: MessageBuilder) -> Result<Vec<Vec<u8>>> {
        self.transact(builder, Until::Ack)
    }

    /// Send a request that expects an ACK only (no data response).
    pub fn request_ack(&mut self, builder: MessageBuilder) -> Result<()> {
        self.transact(builder, Until::Ack).map(|_| ())
    }

    /// Send a dump request and collect all responses up to DONE.
    ///
    /// Nothing is returned if the kernel reports an error part way through.
    pub fn dump(&mut self, builder: MessageBuilder) -> Result<Vec<Vec<u8>>> {
        self.transact(builder, Until::Done)
    }

    fn transact(&mut self, builder: MessageBuilder, until: Until) -> Result<Vec<Vec<u8>>> {
        let seq = self.next_seq();
        tracing::debug!(
            msg_type = builder.msg_type(),
            flags = builder.flags(),
            seq,
            "netlink request"
        );

        match &mut self.endpoint {
            Endpoint::Persistent(transport) => exchange(transport, builder, seq, until),
            Endpoint::OneShot => {
                let mut transport = (self.opener)(&self.config)?;
                exchange(&mut transport, builder, seq, until)
            }
        }
    }
}

fn exchange<T: Transport>(
    transport: &mut T,
    mut builder: MessageBuilder,
    seq: u32,
    until: Until,
) -> Result<Vec<Vec<u8>>> {
    builder.set_seq(seq);
    builder.set_pid(transport.pid());
    transport.send(&builder.finish())?;

    let mut payloads = Vec::new();
    loop {
        let data = transport.recv()?;

        for result in MessageIter::new(&data) {
            let (header, payload) = result?;

            if header.nlmsg_seq != seq {
                tracing::trace!(
                    expected = seq,
                    got = header.nlmsg_seq,
                    msg_type = header.nlmsg_type,
                    "dropping unrelated message"
                );
                continue;
            }

            match NlReply::classify(header, payload)? {
                NlReply::Data(payload) => payloads.push(payload.to_vec()),
                NlReply::Error(errno) => {
                    let ext_ack = NlMsgError::from_bytes(payload)
                        .ok()
                        .and_then(|err| err.ext_ack_message(header, payload));
                    return Err(match ext_ack {
                        Some(text) => Error::from_errno_with_message(errno, text),
                        None => Error::from_errno(errno),
                    });
                }
                NlReply::Ack if until == Until::Ack => return Ok(payloads),
                NlReply::Done => return Ok(payloads),
                NlReply::Ack | NlReply::Noop => {}
            }
        }
    }
}

/// Helper to build a dump request.
pub fn dump_request(msg_type: u16) -> MessageBuilder {
    MessageBuilder::new(msg_type, NLM_F_REQUEST | NLM_F_DUMP)
}

/// Helper to build a request expecting ACK.
pub fn ack_request(msg_type: u16) -> MessageBuilder {
    MessageBuilder::new(msg_type, NLM_F_REQUEST | NLM_F_ACK)
}
