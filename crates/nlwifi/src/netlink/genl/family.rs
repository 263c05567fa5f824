//! Generic Netlink family resolution.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use super::message::{GenlMessage, build};
use super::{CTRL_VERSION, CtrlAttr, CtrlAttrMcastGrp, CtrlCmd, GENL_ID_CTRL};
use crate::error::{Error, Result};
use crate::netlink::attr::{self, Attribute, get};
use crate::netlink::connection::{Connection, SocketConfig};
use crate::netlink::message::{NLM_F_ACK, NLM_F_DUMP, NLM_F_REQUEST};
use crate::netlink::socket::{NetlinkSocket, Transport};

/// Information about a Generic Netlink family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Family {
    /// Registered family name.
    pub name: String,
    /// Dynamically assigned family ID (used as nlmsg_type).
    pub id: u16,
    /// Family version.
    pub version: u32,
    /// Header size (additional bytes after genlmsghdr).
    pub hdr_size: u32,
    /// Maximum attribute number.
    pub max_attr: u32,
    /// Multicast groups: name -> group ID.
    pub mcast_groups: HashMap<String, u32>,
}

static GLOBAL_CACHE: LazyLock<Arc<FamilyCache>> = LazyLock::new(|| Arc::new(FamilyCache::new()));

/// Name to [`Family`] cache.
///
/// Entries are written once and read many times. A miss is resolved while
/// the write lock is held, so concurrent first lookups of one name cost a
/// single kernel round trip.
#[derive(Debug, Default)]
pub struct FamilyCache {
    families: RwLock<HashMap<String, Family>>,
}

impl FamilyCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache shared by connections that do not bring their own.
    pub fn global() -> Arc<FamilyCache> {
        Arc::clone(&GLOBAL_CACHE)
    }

    /// Cached entry for `name`, if any.
    pub fn get(&self, name: &str) -> Option<Family> {
        self.families
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Return the cached family or resolve it with `query` and remember it.
    ///
    /// Failed queries are not cached.
    pub fn get_or_resolve(
        &self,
        name: &str,
        query: impl FnOnce(&str) -> Result<Family>,
    ) -> Result<Family> {
        if let Some(family) = self.get(name) {
            return Ok(family);
        }

        let mut families = self
            .families
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(family) = families.get(name) {
            return Ok(family.clone());
        }

        let family = query(name)?;
        tracing::debug!(family = name, id = family.id, "resolved generic netlink family");
        families.insert(name.to_string(), family.clone());
        Ok(family)
    }

    /// Forget one family, e.g. after its module was reloaded.
    pub fn invalidate(&self, name: &str) {
        self.families
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name);
    }

    /// Forget every family.
    pub fn clear(&self) {
        self.families
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of cached families.
    pub fn len(&self) -> usize {
        self.families
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Generic Netlink connection.
///
/// Provides family ID resolution and GENL request helpers on top of a
/// [`Connection`].
///
/// # Example
///
/// ```rust,no_run
/// use nlwifi::netlink::SocketConfig;
/// use nlwifi::netlink::genl::GenlConnection;
///
/// # fn example() -> nlwifi::Result<()> {
/// let mut conn = GenlConnection::new(SocketConfig::default())?;
/// let family = conn.resolve("nl80211")?;
/// println!("nl80211 family ID: {}", family.id);
/// # Ok(())
/// # }
/// ```
pub struct GenlConnection<T: Transport = NetlinkSocket> {
    conn: Connection<T>,
    cache: Arc<FamilyCache>,
}

impl GenlConnection<NetlinkSocket> {
    /// Create a GENL connection using the process-wide family cache.
    pub fn new(config: SocketConfig) -> Result<Self> {
        Ok(Self::from_connection(
            Connection::new(config)?,
            FamilyCache::global(),
        ))
    }
}

impl<T: Transport> GenlConnection<T> {
    /// Wrap an existing connection with the given family cache.
    pub fn from_connection(conn: Connection<T>, cache: Arc<FamilyCache>) -> Self {
        Self { conn, cache }
    }

    /// The underlying netlink connection.
    pub fn connection(&mut self) -> &mut Connection<T> {
        &mut self.conn
    }

    /// The family cache in use.
    pub fn cache(&self) -> &Arc<FamilyCache> {
        &self.cache
    }

    /// Get information about a Generic Netlink family.
    ///
    /// The result is cached, so subsequent calls for the same family
    /// do not require kernel communication.
    pub fn resolve(&mut self, name: &str) -> Result<Family> {
        let conn = &mut self.conn;
        self.cache
            .get_or_resolve(name, |name| query_family(conn, name))
    }

    /// Get the family ID for a given family name.
    pub fn family_id(&mut self, name: &str) -> Result<u16> {
        Ok(self.resolve(name)?.id)
    }

    /// Send a GENL command and collect its replies until the ACK.
    pub fn command(
        &mut self,
        family: u16,
        cmd: u8,
        version: u8,
        attrs: &[Attribute],
    ) -> Result<Vec<GenlMessage>> {
        let payloads = self
            .conn
            .request(build(family, cmd, version, NLM_F_REQUEST | NLM_F_ACK, attrs)?)?;
        parse_payloads(family, &payloads)
    }

    /// Send a GENL command that expects only an ACK.
    pub fn command_ack(
        &mut self,
        family: u16,
        cmd: u8,
        version: u8,
        attrs: &[Attribute],
    ) -> Result<()> {
        self.conn
            .request_ack(build(family, cmd, version, NLM_F_REQUEST | NLM_F_ACK, attrs)?)
    }

    /// Send a GENL dump command and collect all responses.
    pub fn dump_command(
        &mut self,
        family: u16,
        cmd: u8,
        version: u8,
        attrs: &[Attribute],
    ) -> Result<Vec<GenlMessage>> {
        let payloads = self
            .conn
            .dump(build(family, cmd, version, NLM_F_REQUEST | NLM_F_DUMP, attrs)?)?;
        parse_payloads(family, &payloads)
    }
}

fn parse_payloads(family: u16, payloads: &[Vec<u8>]) -> Result<Vec<GenlMessage>> {
    payloads
        .iter()
        .map(|payload| GenlMessage::from_payload(family, payload))
        .collect()
}

/// Query the controller for `name`.
fn query_family<T: Transport>(conn: &mut Connection<T>, name: &str) -> Result<Family> {
    let request = build(
        GENL_ID_CTRL,
        CtrlCmd::GetFamily as u8,
        CTRL_VERSION,
        NLM_F_REQUEST | NLM_F_ACK,
        &[Attribute::string(CtrlAttr::FamilyName as u16, name)],
    )?;

    let payloads = conn.request(request).map_err(|e| match e.errno() {
        Some(libc::ENOENT) => Error::FamilyNotFound {
            name: name.to_string(),
        },
        _ => e.with_context(format!("resolve family {name}")),
    })?;

    let payload = payloads.first().ok_or_else(|| Error::FamilyNotFound {
        name: name.to_string(),
    })?;
    let msg = GenlMessage::from_payload(GENL_ID_CTRL, payload)?;
    parse_family(name, &msg)
}

/// Parse a CTRL_CMD_NEWFAMILY reply.
fn parse_family(name: &str, msg: &GenlMessage) -> Result<Family> {
    let mut family = Family {
        name: name.to_string(),
        id: 0,
        version: 0,
        hdr_size: 0,
        max_attr: 0,
        mcast_groups: HashMap::new(),
    };
    let mut id = None;

    for (attr_type, payload) in msg.attrs()? {
        match attr_type {
            t if t == CtrlAttr::FamilyId as u16 => id = Some(get::u16_ne(payload)?),
            t if t == CtrlAttr::FamilyName as u16 => family.name = get::string(payload)?.to_string(),
            t if t == CtrlAttr::Version as u16 => family.version = get::u32_ne(payload)?,
            t if t == CtrlAttr::HdrSize as u16 => family.hdr_size = get::u32_ne(payload)?,
            t if t == CtrlAttr::MaxAttr as u16 => family.max_attr = get::u32_ne(payload)?,
            t if t == CtrlAttr::McastGroups as u16 => {
                family.mcast_groups = parse_mcast_groups(payload)?
            }
            _ => {}
        }
    }

    family.id = id.ok_or_else(|| Error::InvalidMessage("missing family ID".into()))?;
    Ok(family)
}

/// Parse multicast groups from CTRL_ATTR_MCAST_GROUPS.
fn parse_mcast_groups(data: &[u8]) -> Result<HashMap<String, u32>> {
    let mut groups = HashMap::new();

    // An array: each entry is itself a nested group description.
    for (_index, group) in attr::decode(data)? {
        let mut name = None;
        let mut id = None;
        for (attr_type, payload) in attr::decode(group)? {
            match attr_type {
                t if t == CtrlAttrMcastGrp::Name as u16 => {
                    name = Some(get::string(payload)?.to_string())
                }
                t if t == CtrlAttrMcastGrp::Id as u16 => id = Some(get::u32_ne(payload)?),
                _ => {}
            }
        }
        if let (Some(name), Some(id)) = (name, id) {
            groups.insert(name, id);
        }
    }

    Ok(groups)
}
